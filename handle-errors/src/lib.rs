use serde_json::json;
use warp::{
    Rejection, Reply,
    filters::cors::CorsForbidden,
    http::StatusCode,
    reject::{InvalidQuery, Reject},
    reply::{Json, WithStatus},
};

use reqwest::Error as ReqwestError;

use tracing::{Level, event, instrument};

#[derive(Debug)]
pub enum Error {
    ParseError(std::num::ParseIntError),
    InvalidConfig(String),
    /// The trivia API answered with a non-zero `response_code`.
    NoQuestionAvailable(i64),
    /// Connection refused, DNS failure, timeout or a broken body stream.
    UpstreamUnavailable(ReqwestError),
    /// The trivia API answered, but with a non-2xx HTTP status.
    UpstreamStatus(UpstreamStatusError),
    UpstreamMalformedResponse(String),
}

#[derive(Debug, Clone)]
pub struct UpstreamStatusError {
    pub status: u16,
    pub message: String,
}

impl std::fmt::Display for UpstreamStatusError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Status: {}, Message: {}", self.status, self.message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::ParseError(err) => {
                write!(f, "Cannot parse parameter: {}", err)
            }
            Error::InvalidConfig(err) => {
                write!(f, "Invalid configuration: {}", err)
            }
            Error::NoQuestionAvailable(code) => {
                write!(f, "No question available (response code {})", code)
            }
            Error::UpstreamUnavailable(err) => {
                write!(f, "Trivia API unavailable: {}", err)
            }
            Error::UpstreamStatus(err) => {
                write!(f, "Trivia API error: {}", err)
            }
            Error::UpstreamMalformedResponse(err) => {
                write!(f, "Trivia API sent a malformed response: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Reject for Error {}

/// Message shown to callers when the trivia API has nothing for the filters.
pub const NO_QUESTION_MESSAGE: &str = "No question available";

impl Error {
    /// Stable name of the failure, sent to callers next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ParseError(_) => "InvalidParameter",
            Error::InvalidConfig(_) => "InvalidConfig",
            Error::NoQuestionAvailable(_) => "NoQuestionAvailable",
            Error::UpstreamUnavailable(_) | Error::UpstreamStatus(_) => "UpstreamUnavailable",
            Error::UpstreamMalformedResponse(_) => "UpstreamMalformedResponse",
        }
    }

    /// Reply status. A no-question reply may be upgraded by the caller's `--strict-status`.
    pub fn status(&self) -> StatusCode {
        match self {
            Error::ParseError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::NoQuestionAvailable(_) => StatusCode::OK,
            Error::UpstreamUnavailable(err) if err.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            Error::UpstreamUnavailable(_)
            | Error::UpstreamStatus(_)
            | Error::UpstreamMalformedResponse(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// The text a caller gets. Upstream details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            Error::NoQuestionAvailable(_) => NO_QUESTION_MESSAGE.to_string(),
            Error::UpstreamUnavailable(err) if err.is_timeout() => {
                "Trivia API did not answer in time".to_string()
            }
            Error::UpstreamUnavailable(_) | Error::UpstreamStatus(_) => {
                "Trivia API unavailable".to_string()
            }
            Error::UpstreamMalformedResponse(_) => {
                "Trivia API sent a malformed response".to_string()
            }
            Error::ParseError(_) | Error::InvalidConfig(_) => self.to_string(),
        }
    }
}

/// Builds the `{"error": .., "kind": ..}` body every failure is reported with.
pub fn error_reply(message: String, kind: &str, status: StatusCode) -> WithStatus<Json> {
    warp::reply::with_status(
        warp::reply::json(&json!({
            "error": message,
            "kind": kind,
        })),
        status,
    )
}

#[instrument]
pub async fn return_error(r: Rejection) -> Result<impl Reply, Rejection> {
    if let Some(error) = r.find::<Error>() {
        match error {
            Error::UpstreamUnavailable(_)
            | Error::UpstreamStatus(_)
            | Error::UpstreamMalformedResponse(_) => {
                event!(Level::ERROR, kind = error.kind(), "{}", error);
            }
            _ => {
                event!(Level::WARN, kind = error.kind(), "{}", error);
            }
        }
        Ok(error_reply(
            error.public_message(),
            error.kind(),
            error.status(),
        ))
    } else if let Some(error) = r.find::<CorsForbidden>() {
        event!(Level::ERROR, "CORS forbidden error: {}", error);
        Ok(error_reply(
            error.to_string(),
            "CorsForbidden",
            StatusCode::FORBIDDEN,
        ))
    } else if let Some(error) = r.find::<InvalidQuery>() {
        event!(Level::ERROR, "Cannot deserialize query string: {}", error);
        Ok(error_reply(
            error.to_string(),
            "InvalidParameter",
            StatusCode::UNPROCESSABLE_ENTITY,
        ))
    } else {
        event!(Level::WARN, "Requested route was not found");
        Ok(error_reply(
            "Route not found".to_string(),
            "NotFound",
            StatusCode::NOT_FOUND,
        ))
    }
}
