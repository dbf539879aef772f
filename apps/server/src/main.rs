use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use yt_tldr_core::{Dispatcher, GenerationEvent, GenerationMode, ProviderSettings, YtDlpSource};

use crate::routes::{AppState, router};

mod routes;

#[derive(Parser)]
#[command(name = "yt-tldr-server")]
#[command(about = "HTTP API for YouTube video summaries")]
struct Args {
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// Model used when a request does not name one
    #[arg(long, env = "DEFAULT_MODEL", default_value = "gemini")]
    default_model: String,

    /// Request schema-constrained JSON from the model
    #[arg(long, env = "STRUCTURED_OUTPUT")]
    structured: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "yt_tldr_server=info,yt_tldr_core=info,tower_http=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let dispatcher = Dispatcher::new(ProviderSettings::from_env()).with_progress(Arc::new(
        |event: GenerationEvent| match event {
            GenerationEvent::Started { provider, model } => {
                tracing::info!(%provider, %model, "Generating summary");
            }
            GenerationEvent::Succeeded { provider, model } => {
                tracing::info!(%provider, %model, "Summary generated");
            }
            GenerationEvent::Failed {
                provider,
                model,
                message,
            } => {
                tracing::error!(%provider, %model, %message, "Summary generation failed");
            }
        },
    ));

    let state = AppState {
        source: Arc::new(YtDlpSource::default()),
        model: Arc::new(dispatcher),
        default_model: args.default_model,
        mode: if args.structured {
            GenerationMode::Structured
        } else {
            GenerationMode::Text
        },
    };

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, router(state))
        .await
        .context("Server error")?;

    Ok(())
}
