use std::process::ExitCode;
use std::sync::Arc;

use appmeta::{Config, Server, api};
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::parse();
    let app = api::routes(Arc::new(config.store()));

    if let Err(e) = Server::bind(config.addr).serve(app).await {
        error!("{e}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
