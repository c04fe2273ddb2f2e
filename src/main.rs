#![warn(clippy::all)]
use trivia_relay::{config, run, setup_tracing};

#[tokio::main]
async fn main() -> Result<(), handle_errors::Error> {
    dotenv::dotenv().ok();
    let config = config::Config::new()?;
    setup_tracing(&config);
    tracing::info!("trivia relay version {}", env!("CARGO_PKG_VERSION"));
    run(config).await
}
