use handle_errors::{Error, UpstreamStatusError};
use reqwest::Url;
use std::time::Duration;
use tracing::{Level, event, instrument};

use crate::types::filter::QuizFilter;
use crate::types::question::{Question, TriviaResponse};
use crate::types::response_code::ResponseCode;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";

/// HTTP client for the trivia API. Clones share one connection pool.
#[derive(Debug, Clone)]
pub struct TriviaClient {
    client: reqwest::Client,
    url: Url,
}

impl TriviaClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self, Error> {
        let url = Url::parse(url)
            .map_err(|e| Error::InvalidConfig(format!("trivia API url {}: {}", url, e)))?;

        if timeout.is_zero() {
            return Err(Error::InvalidConfig(
                "trivia API timeout must be greater than zero".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("cannot build HTTP client: {}", e)))?;

        Ok(TriviaClient { client, url })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetches one multiple choice question and reshapes it for the browser.
    #[instrument(skip(self))]
    pub async fn fetch_question(&self, filter: &QuizFilter) -> Result<Question, Error> {
        event!(Level::DEBUG, url = %self.url, "requesting trivia question");

        let res = self
            .client
            .get(self.url.clone())
            .query(&filter.upstream_query())
            .send()
            .await
            .map_err(Error::UpstreamUnavailable)?;

        if !res.status().is_success() {
            let err = transform_error(res).await;
            return Err(Error::UpstreamStatus(err));
        }

        let body = res.json::<TriviaResponse>().await.map_err(|e| {
            if e.is_decode() {
                Error::UpstreamMalformedResponse(e.to_string())
            } else {
                Error::UpstreamUnavailable(e)
            }
        })?;

        let code = ResponseCode::from(body.response_code);
        if !code.is_success() {
            event!(
                Level::INFO,
                response_code = body.response_code,
                "trivia API returned no question: {}",
                code
            );
            return Err(Error::NoQuestionAvailable(body.response_code));
        }

        body.results
            .into_iter()
            .next()
            .map(Question::from)
            .ok_or_else(|| {
                Error::UpstreamMalformedResponse("response code 0 without results".to_string())
            })
    }
}

async fn transform_error(res: reqwest::Response) -> UpstreamStatusError {
    UpstreamStatusError {
        status: res.status().as_u16(),
        message: res.text().await.unwrap_or_default(),
    }
}
