use serde::{Deserialize, Serialize};

/// A question as the relay hands it to the browser.
#[derive(Serialize, Debug, Deserialize, Clone, PartialEq)]
pub struct Question {
    pub question: String,
    pub correct_answer: String,
    /// Incorrect answers in upstream order, correct answer last. Never shuffled.
    pub answers: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

/// Body of a trivia API reply.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TriviaResponse {
    pub response_code: i64,
    #[serde(default)]
    pub results: Vec<TriviaQuestion>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct TriviaQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
    pub category: String,
    pub difficulty: String,
}

impl From<TriviaQuestion> for Question {
    fn from(upstream: TriviaQuestion) -> Self {
        let mut answers = upstream.incorrect_answers;
        answers.push(upstream.correct_answer.clone());

        Question {
            question: upstream.question,
            correct_answer: upstream.correct_answer,
            answers,
            category: upstream.category,
            difficulty: upstream.difficulty,
        }
    }
}

#[cfg(test)]
mod question_tests {
    use super::*;

    fn upstream(incorrect: &[&str]) -> TriviaQuestion {
        TriviaQuestion {
            question: "Which planet is known as the Red Planet?".to_string(),
            correct_answer: "Mars".to_string(),
            incorrect_answers: incorrect.iter().map(|a| a.to_string()).collect(),
            category: "Science &amp; Nature".to_string(),
            difficulty: "easy".to_string(),
        }
    }

    #[test]
    fn correct_answer_is_appended_last() {
        let question = Question::from(upstream(&["Venus", "Jupiter", "Saturn"]));
        assert_eq!(question.answers, vec!["Venus", "Jupiter", "Saturn", "Mars"]);
        assert_eq!(question.answers.last(), Some(&question.correct_answer));
    }

    #[test]
    fn fields_pass_through_untouched() {
        let question = Question::from(upstream(&["Venus"]));
        assert_eq!(question.question, "Which planet is known as the Red Planet?");
        assert_eq!(question.category, "Science &amp; Nature");
        assert_eq!(question.difficulty, "easy");
    }

    #[test]
    fn no_incorrect_answers_leaves_only_the_correct_one() {
        let question = Question::from(upstream(&[]));
        assert_eq!(question.answers, vec!["Mars"]);
    }

    #[test]
    fn deserializes_trivia_api_body() {
        let body = r#"{
            "response_code": 0,
            "results": [{
                "type": "multiple",
                "difficulty": "medium",
                "category": "General Knowledge",
                "question": "What is &quot;Rust&quot;?",
                "correct_answer": "A language",
                "incorrect_answers": ["A fish", "A bird", "A car"]
            }]
        }"#;
        let res: TriviaResponse = serde_json::from_str(body).unwrap();
        assert_eq!(res.response_code, 0);
        assert_eq!(res.results.len(), 1);
        assert_eq!(res.results[0].question, "What is &quot;Rust&quot;?");
    }

    #[test]
    fn missing_results_defaults_to_empty() {
        let res: TriviaResponse = serde_json::from_str(r#"{"response_code": 1}"#).unwrap();
        assert!(res.results.is_empty());
    }
}
