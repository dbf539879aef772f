//! yt-tldr Core Library
//!
//! Turns a YouTube transcript into a markdown summary with timestamped smart
//! sections, using Gemini, Ollama or Mistral as the language-model backend.

pub mod error;
pub mod format;
pub mod llm;
pub mod markdown;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod types;
pub mod youtube;

// Re-export commonly used items at crate root
pub use error::{ErrorKind, Result, SummaryError};
pub use format::{format_structured_summary, format_timestamp, transcript_to_text};
pub use llm::{
    Backend, Dispatcher, GenerationEvent, LanguageModel, ProgressSink, ProviderSettings,
};
pub use markdown::post_process;
pub use pipeline::generate_summary;
pub use prompt::{build_prompt, build_structured_prompt};
pub use provider::{ProviderFamily, ResolvedModel, resolve};
pub use types::{
    GenerationMode, SmartSection, StructuredSummary, SummaryLength, SummaryMetadata,
    SummaryRequest, TranscriptItem, VideoMetadata,
};
pub use youtube::{VideoSource, YtDlpSource, extract_video_id};
