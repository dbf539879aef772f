use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SummaryError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptItem {
    pub text: String,
    /// Seconds from the start of the video.
    pub offset: f64,
    pub duration: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub title: Option<String>,
    pub creator: Option<String>,
}

impl VideoMetadata {
    pub fn new(title: impl Into<String>, creator: impl Into<String>) -> Self {
        Self {
            title: non_blank(Some(title.into())),
            creator: non_blank(Some(creator.into())),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    #[default]
    Short,
    Long,
}

impl SummaryLength {
    pub const VALID: [&'static str; 2] = ["short", "long"];

    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryLength::Short => "short",
            SummaryLength::Long => "long",
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryLength {
    type Err = SummaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "short" => Ok(SummaryLength::Short),
            "long" => Ok(SummaryLength::Long),
            _ => Err(SummaryError::InvalidLength(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GenerationMode {
    /// Free-form markdown completion.
    #[default]
    Text,
    /// Schema-constrained JSON rendered to markdown locally.
    Structured,
}

#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub transcript: Vec<TranscriptItem>,
    pub length: SummaryLength,
    pub model_id: String,
    pub title: Option<String>,
    pub creator: Option<String>,
}

impl SummaryRequest {
    pub fn new(
        transcript: Vec<TranscriptItem>,
        length: SummaryLength,
        model_id: impl Into<String>,
    ) -> Self {
        Self {
            transcript,
            length,
            model_id: model_id.into(),
            title: None,
            creator: None,
        }
    }

    pub fn with_metadata(mut self, metadata: &VideoMetadata) -> Self {
        self.title = metadata.title().map(str::to_string);
        self.creator = metadata.creator().map(str::to_string);
        self
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.trim().is_empty())
    }

    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref().filter(|c| !c.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredSummary {
    pub summary: String,
    #[serde(default)]
    pub smart_sections: Vec<SmartSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<SummaryMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartSection {
    /// "MM:SS"
    pub timestamp: String,
    pub emoji: String,
    pub title: String,
    #[serde(default)]
    pub is_ad: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryMetadata {
    pub summary_length: SummaryLength,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
