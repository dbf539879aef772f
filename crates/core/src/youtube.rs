//! Transcript and metadata sources for YouTube videos.
//!
//! Transcripts come from `yt-dlp` (manual or automatic captions in the
//! `json3` format), metadata from the public oEmbed endpoint. Neither needs an
//! API key.

use std::{path::PathBuf, sync::LazyLock};

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tokio::{fs, process::Command};

use crate::{
    error::{Result, SummaryError},
    types::{TranscriptItem, VideoMetadata},
};

pub const OEMBED_URL: &str = "https://www.youtube.com/oembed";

/// `NoTranscriptAvailable` reasons for a video that simply has no captions,
/// as opposed to a fetch that failed.
pub const NO_CAPTIONS: &str = "video has no captions";
pub const EMPTY_CAPTIONS: &str = "captions are empty";

/// True when the error says the video has no usable captions.
pub fn is_missing_captions(err: &SummaryError) -> bool {
    matches!(
        err,
        SummaryError::NoTranscriptAvailable { reason, .. }
            if reason == NO_CAPTIONS || reason == EMPTY_CAPTIONS
    )
}

static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());

static VIDEO_URL_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"youtube\.com/watch\?(?:[^#]*&)?v=([A-Za-z0-9_-]{11})",
        r"youtu\.be/([A-Za-z0-9_-]{11})",
        r"youtube\.com/(?:v|embed|shorts|live)/([A-Za-z0-9_-]{11})",
    ]
    .into_iter()
    .map(|re| Regex::new(re).unwrap())
    .collect()
});

/// Extract the 11-character video id from a URL, or accept a bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    if VIDEO_ID_RE.is_match(input) {
        return Some(input.to_string());
    }
    VIDEO_URL_RES
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Empty or failed fetches are both `NoTranscriptAvailable`.
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptItem>>;

    /// Never fails: unknown fields come back as `None`.
    async fn fetch_metadata(&self, video_id: &str) -> VideoMetadata;
}

pub struct YtDlpSource {
    http: Client,
    binary: String,
    sub_langs: String,
    oembed_url: String,
}

impl Default for YtDlpSource {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl YtDlpSource {
    pub fn new(http: Client) -> Self {
        Self {
            http,
            binary: "yt-dlp".into(),
            sub_langs: "en.*,en".into(),
            oembed_url: OEMBED_URL.into(),
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_sub_langs(mut self, langs: impl Into<String>) -> Self {
        self.sub_langs = langs.into();
        self
    }

    async fn download_captions(&self, video_id: &str) -> Result<String> {
        let unavailable = |reason: String| SummaryError::NoTranscriptAvailable {
            video_id: video_id.to_string(),
            reason,
        };

        let workdir = tempfile::tempdir().map_err(|e| unavailable(e.to_string()))?;
        let output_template = workdir.path().join("%(id)s.%(ext)s");

        let output = Command::new(&self.binary)
            .arg("--skip-download")
            .arg("--write-subs")
            .arg("--write-auto-subs")
            .arg("--sub-langs")
            .arg(&self.sub_langs)
            .arg("--sub-format")
            .arg("json3")
            .arg("--no-warnings")
            .arg("-o")
            .arg(&output_template)
            .arg(watch_url(video_id))
            .output()
            .await
            .map_err(|e| unavailable(format!("failed to run {}: {e}", self.binary)))?;

        if !output.status.success() {
            return Err(unavailable(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        let mut captions: Vec<PathBuf> = Vec::new();
        let mut entries = fs::read_dir(workdir.path())
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        while let Ok(Some(entry)) = entries.next_entry().await {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json3") {
                captions.push(path);
            }
        }
        captions.sort();

        // Prefer plain "en" over regional or translated tracks
        let preferred = format!("{video_id}.en.json3");
        let chosen = captions
            .iter()
            .find(|p| p.file_name().is_some_and(|n| n == preferred.as_str()))
            .or_else(|| captions.first())
            .ok_or_else(|| unavailable(NO_CAPTIONS.into()))?;

        tracing::debug!(path = %chosen.display(), "Reading captions");
        fs::read_to_string(chosen)
            .await
            .map_err(|e| unavailable(e.to_string()))
    }
}

#[async_trait]
impl VideoSource for YtDlpSource {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Vec<TranscriptItem>> {
        let raw = self.download_captions(video_id).await?;
        let transcript = parse_json3(&raw).map_err(|e| SummaryError::NoTranscriptAvailable {
            video_id: video_id.to_string(),
            reason: format!("unreadable captions: {e}"),
        })?;

        if transcript.is_empty() {
            return Err(SummaryError::NoTranscriptAvailable {
                video_id: video_id.to_string(),
                reason: EMPTY_CAPTIONS.into(),
            });
        }
        tracing::info!(video_id, items = transcript.len(), "Fetched transcript");
        Ok(transcript)
    }

    async fn fetch_metadata(&self, video_id: &str) -> VideoMetadata {
        match fetch_oembed(&self.http, &self.oembed_url, video_id).await {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(video_id, error = %e, "Failed to fetch video metadata");
                VideoMetadata::default()
            }
        }
    }
}

#[derive(Deserialize)]
struct OEmbedResponse {
    title: Option<String>,
    author_name: Option<String>,
}

async fn fetch_oembed(
    http: &Client,
    oembed_url: &str,
    video_id: &str,
) -> std::result::Result<VideoMetadata, reqwest::Error> {
    let response = http
        .get(oembed_url)
        .query(&[("url", watch_url(video_id).as_str()), ("format", "json")])
        .send()
        .await?
        .error_for_status()?
        .json::<OEmbedResponse>()
        .await?;

    Ok(VideoMetadata {
        title: response.title.filter(|t| !t.trim().is_empty()),
        creator: response.author_name.filter(|a| !a.trim().is_empty()),
    })
}

#[derive(Deserialize)]
struct Json3 {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Deserialize)]
struct Json3Seg {
    utf8: Option<String>,
}

/// Parse YouTube `json3` captions into transcript items, dropping the
/// whitespace-only events automatic captions use for line breaks.
pub fn parse_json3(raw: &str) -> std::result::Result<Vec<TranscriptItem>, serde_json::Error> {
    let captions: Json3 = serde_json::from_str(raw)?;

    Ok(captions
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event
                .segs?
                .into_iter()
                .filter_map(|seg| seg.utf8)
                .collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            Some(TranscriptItem {
                text,
                offset: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect())
}
