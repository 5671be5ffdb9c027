use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use logistics_query::{routes, state};
use logistics_query_configuration::{make_runtime_configuration, ServerOptions};

#[tokio::main]
pub async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(ServerOptions::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(options: ServerOptions) -> anyhow::Result<()> {
    let configuration = make_runtime_configuration(options)?;
    tracing::info!(?configuration, "Configuration loaded");

    let state = state::create_state(&configuration)
        .instrument(info_span!("Initialise state"))
        .await?;

    let router = routes::create_router(state);

    tracing::info!("Starting server on {}", configuration.address);
    axum::Server::try_bind(&configuration.address)
        .with_context(|| format!("unable to listen on {}", configuration.address))?
        .serve(router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("unable to listen for the shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
