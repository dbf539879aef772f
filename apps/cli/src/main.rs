use std::{sync::Arc, time::Instant};

use anyhow::Result;
use clap::Parser;
use console::style;
use yt_tldr_core::{
    Dispatcher, GenerationMode, ProviderSettings, SummaryLength, SummaryRequest, VideoSource,
    YtDlpSource, extract_video_id, generate_summary, provider::DEFAULT_OLLAMA_MODEL,
};

use crate::progress::{SpinnerProgress, create_spinner};

mod progress;

#[derive(Parser)]
#[command(name = "yt-tldr")]
#[command(about = "Summarize YouTube videos with Gemini, Ollama or Mistral")]
#[command(after_help = "Models:
  llama3.2:latest        (default, Ollama)
  ollama:<name>          any installed Ollama model
  gemini                 uses gemini-2.0-flash
  gemini-2.0-flash, gemini-2.0-flash-lite, gemini-2.0-flash-exp
  mistral-small-latest, mistral-large-latest, ...")]
struct Cli {
    /// YouTube video URL or ID to summarize
    #[arg(short, long)]
    video: String,

    /// Summary length: short or long
    #[arg(short, long, default_value = "short")]
    length: String,

    /// AI model to use
    #[arg(short, long, default_value = DEFAULT_OLLAMA_MODEL)]
    model: String,

    /// Ask the model for schema-constrained JSON and render it locally
    #[arg(long)]
    structured: bool,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", style("Error:").red().bold(), style(message).red());
    std::process::exit(1);
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let length: SummaryLength = match cli.length.parse() {
        Ok(length) => length,
        Err(_) => {
            eprintln!(
                "{}",
                style(format!("Invalid length specified: \"{}\"", cli.length)).red()
            );
            eprintln!(
                "{}",
                style(format!("Valid options are: {}", SummaryLength::VALID.join(", "))).red()
            );
            std::process::exit(1);
        }
    };

    let Some(video_id) = extract_video_id(&cli.video) else {
        fail(format!("Not a YouTube video URL or ID: {}", cli.video));
    };

    println!(
        "\n{}  {}\n",
        style("yt-tldr").cyan().bold(),
        style("Video Summarizer").dim()
    );

    let total_start = Instant::now();
    let source = YtDlpSource::default();

    let metadata = source.fetch_metadata(&video_id).await;
    println!(
        "{} {}",
        style("Video title:").cyan(),
        metadata.title().unwrap_or("Unknown")
    );
    println!(
        "{} {}",
        style("Creator:").cyan(),
        metadata.creator().unwrap_or("Unknown")
    );

    let spinner = create_spinner("Fetching transcript from YouTube video...");
    let transcript = match source.fetch_transcript(&video_id).await {
        Ok(transcript) => {
            spinner.finish_with_message(format!(
                "{} Fetched transcript: {} lines",
                style("✓").green().bold(),
                transcript.len()
            ));
            transcript
        }
        Err(e) => {
            spinner.finish_and_clear();
            fail(format!("Failed to fetch transcript from YouTube: {e}"));
        }
    };

    println!(
        "{} {}",
        style("Using summary length:").cyan(),
        style(length).yellow()
    );

    let mode = if cli.structured {
        GenerationMode::Structured
    } else {
        GenerationMode::Text
    };
    let request = SummaryRequest::new(transcript, length, cli.model).with_metadata(&metadata);
    let dispatcher = Dispatcher::new(ProviderSettings::from_env())
        .with_progress(Arc::new(SpinnerProgress::default()));

    let summary = match generate_summary(&dispatcher, &request, mode).await {
        Ok(summary) => summary,
        Err(e) => fail(format!("Failed to generate summary: {e}")),
    };

    println!(
        "{} {:.1}s",
        style("Done in").dim(),
        total_start.elapsed().as_secs_f64()
    );
    println!("{}", style("─".repeat(60)).dim());
    println!("{}", summary);

    Ok(())
}
