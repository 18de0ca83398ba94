mod config;
mod http;

use clap::Parser;

use config::{Effective, ServeArgs};
use transform::Processor;

#[derive(Parser)]
#[command(name = "transform-server", about = "Record transform invocation endpoint")]
struct Cli {
    #[command(flatten)]
    args: ServeArgs,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let eff = match Effective::new(&cli.args) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!(error = %e, "failed to load config");
            std::process::exit(1);
        }
    };

    let app = http::router(Processor::new(eff.format));

    let listener = match tokio::net::TcpListener::bind(&eff.listen).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!(listen = %eff.listen, error = %e, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(listen = %eff.listen, "transform-server started, press Ctrl+C to stop");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutting down...");
}
