#![warn(clippy::all)]
pub use handle_errors;
use std::net::SocketAddr;
use tokio::sync::{oneshot, oneshot::Sender};
use tracing_subscriber::fmt::format::FmtSpan;
use warp::{Filter, Reply, http::Method};

pub mod config;
mod routes;
pub mod trivia;
pub mod types;

use config::Config;
use routes::quiz::get_quiz;
use trivia::TriviaClient;

pub struct OneshotHandler {
    pub sender: Sender<i32>,
    pub addr: SocketAddr,
}

fn build_cors(config: &Config) -> warp::cors::Builder {
    let cors = warp::cors()
        .allow_headers(config.cors_headers())
        .allow_methods(&[
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
            Method::HEAD,
        ])
        .allow_credentials(!config.no_cors_credentials);

    let origins = config.cors_origins();
    if origins.is_empty() {
        cors.allow_any_origin()
    } else {
        cors.allow_origins(origins.iter().map(String::as_str))
    }
}

pub fn build_routes(
    client: TriviaClient,
    config: Config,
) -> impl Filter<Extract = impl Reply> + Clone {
    let client_filter = warp::any().map(move || client.clone());
    let no_question_status = config.no_question_status();
    let status_filter = warp::any().map(move || no_question_status);

    let get_quiz = warp::get()
        .and(warp::path("quiz"))
        .and(warp::path::end())
        .and(warp::query())
        .and(client_filter)
        .and(status_filter)
        .and_then(get_quiz)
        .with(warp::trace(|info| {
            tracing::info_span!(
                "get_quiz_request",
                method = %info.method(),
                path = %info.path(),
                id = %uuid::Uuid::new_v4(),
            )
        }));

    // error replies pass through CORS too, the outer recover only sees CorsForbidden
    get_quiz
        .recover(handle_errors::return_error)
        .with(build_cors(&config))
        .with(warp::trace::request())
        .recover(handle_errors::return_error)
}

pub fn setup_tracing(config: &Config) {
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!(
            "handle_errors={},trivia_relay={},warp={}",
            config.log_level, config.log_level, config.log_level
        )
    });

    tracing_subscriber::fmt()
        // Use the filter we built above to determine which traces to record.
        .with_env_filter(log_filter)
        // Record an event when each span closes, which times the upstream call.
        .with_span_events(FmtSpan::CLOSE)
        .init();
}

fn bind_error(addr: SocketAddr, e: warp::Error) -> handle_errors::Error {
    handle_errors::Error::InvalidConfig(format!("cannot bind {}: {}", addr, e))
}

pub async fn run(config: Config) -> Result<(), handle_errors::Error> {
    let addr = config.socket_addr()?;
    let client = TriviaClient::new(&config.upstream_url, config.upstream_timeout())?;
    let routes = build_routes(client, config.clone());

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(addr, async {
            tokio::signal::ctrl_c().await.ok();
        })
        .map_err(|e| bind_error(addr, e))?;

    tracing::info!(upstream = %config.upstream_url, "trivia relay listening on {}", addr);
    server.await;
    Ok(())
}

/// Serves until a value is sent on the returned handler's `sender`.
pub async fn oneshot(config: Config) -> Result<OneshotHandler, handle_errors::Error> {
    let socket = config.socket_addr()?;
    let client = TriviaClient::new(&config.upstream_url, config.upstream_timeout())?;
    let routes = build_routes(client, config);
    let (tx, rx) = oneshot::channel::<i32>();

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(socket, async {
            rx.await.ok();
        })
        .map_err(|e| bind_error(socket, e))?;

    tokio::task::spawn(server);

    Ok(OneshotHandler { sender: tx, addr })
}
