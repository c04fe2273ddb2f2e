use handle_errors::Error;
use std::collections::HashMap;

/// Number of questions requested per upstream call.
pub const AMOUNT: &str = "1";
/// Only multiple choice questions carry several incorrect answers.
pub const QUESTION_TYPE: &str = "multiple";

/// Filters the caller may forward to the trivia API
#[derive(Default, Debug, Clone, PartialEq)]
pub struct QuizFilter {
    /// Upstream category id, forwarded without checking it exists
    pub category: Option<i64>,
    /// Forwarded as-is, "easy", "medium" and "hard" are what the API knows
    pub difficulty: Option<String>,
}

/// Extract the filters from the `/quiz` query string
/// # Example query
/// A GET request to this route may narrow down the question:
/// `/quiz?category=9&difficulty=easy`
/// # Example usage
/// ```rust
/// use std::collections::HashMap;
/// use trivia_relay::types::filter::extract_filter;
///
/// let mut query = HashMap::new();
/// query.insert("category".to_string(), "9".to_string());
/// let filter = extract_filter(query).unwrap();
/// assert_eq!(filter.category, Some(9));
/// assert_eq!(filter.difficulty, None);
/// ```
pub fn extract_filter(params: HashMap<String, String>) -> Result<QuizFilter, Error> {
    // an empty value is what a form sends for "any"
    let category = match params.get("category").filter(|c| !c.is_empty()) {
        Some(category) => Some(category.parse::<i64>().map_err(Error::ParseError)?),
        None => None,
    };

    let difficulty = params
        .get("difficulty")
        .filter(|d| !d.is_empty())
        .cloned();

    Ok(QuizFilter {
        category,
        difficulty,
    })
}

impl QuizFilter {
    /// Query pairs for the upstream request. Unset filters are left out entirely.
    pub fn upstream_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("amount", AMOUNT.to_string()),
            ("type", QUESTION_TYPE.to_string()),
        ];

        if let Some(category) = self.category {
            query.push(("category", category.to_string()));
        }
        if let Some(difficulty) = &self.difficulty {
            query.push(("difficulty", difficulty.clone()));
        }

        query
    }
}
