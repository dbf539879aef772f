use std::{sync::Mutex, time::Duration};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use yt_tldr_core::{GenerationEvent, ProgressSink};

pub fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Drives a spinner from the dispatcher's generation events.
#[derive(Default)]
pub struct SpinnerProgress {
    spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressSink for SpinnerProgress {
    fn on_event(&self, event: GenerationEvent) {
        let Ok(mut spinner) = self.spinner.lock() else {
            return;
        };

        match event {
            GenerationEvent::Started { provider, model } => {
                *spinner = Some(create_spinner(&format!(
                    "Generating response with {} ({})...",
                    provider,
                    style(model).dim()
                )));
            }
            GenerationEvent::Succeeded { provider, .. } => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(format!(
                        "{} Generated response with {}",
                        style("✓").green().bold(),
                        provider
                    ));
                }
            }
            GenerationEvent::Failed {
                provider, message, ..
            } => {
                if let Some(pb) = spinner.take() {
                    pb.finish_with_message(format!(
                        "{} Failed to generate response with {}: {}",
                        style("✗").red().bold(),
                        provider,
                        style(message).red()
                    ));
                }
            }
        }
    }
}
