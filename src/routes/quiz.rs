use handle_errors::Error;
use serde_json::json;
use std::collections::HashMap;
use tracing::{Level, event, instrument};
use warp::http::StatusCode;
use warp::reply::{Json, WithStatus};

use crate::trivia::TriviaClient;
use crate::types::filter::extract_filter;

#[instrument(skip(client))]
pub async fn get_quiz(
    params: HashMap<String, String>,
    client: TriviaClient,
    no_question_status: Option<StatusCode>,
) -> Result<WithStatus<Json>, warp::Rejection> {
    event!(target: "trivia_relay", Level::INFO, "relaying quiz question");
    let filter = extract_filter(params).map_err(warp::reject::custom)?;

    match client.fetch_question(&filter).await {
        Ok(question) => Ok(warp::reply::with_status(
            warp::reply::json(&question),
            StatusCode::OK,
        )),
        // body is exactly `{"error": ..}`, front-ends check for that key
        Err(e @ Error::NoQuestionAvailable(_)) => Ok(warp::reply::with_status(
            warp::reply::json(&json!({ "error": e.public_message() })),
            no_question_status.unwrap_or_else(|| e.status()),
        )),
        Err(e) => Err(warp::reject::custom(e)),
    }
}
