use crate::{
    markdown::TITLE_PLACEHOLDER,
    types::{StructuredSummary, TranscriptItem},
};

pub const UNKNOWN_TITLE: &str = "Video Title Unknown";
pub const UNKNOWN_CREATOR: &str = "The Creator";
pub const NO_SECTIONS: &str = "No sections available";

/// Format seconds as MM:SS timestamp. Minutes are not wrapped into hours.
pub fn format_timestamp(seconds: f64) -> String {
    let mins = (seconds / 60.0) as u32;
    let secs = (seconds % 60.0) as u32;
    format!("{:02}:{:02}", mins, secs)
}

/// Format transcript items as `MM:SS - text` lines
pub fn transcript_to_text(transcript: &[TranscriptItem]) -> String {
    transcript
        .iter()
        .map(|item| format!("{} - {}", format_timestamp(item.offset), item.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a structured summary into the same markdown shape the free-text
/// prompt asks the model for.
///
/// The title line carries the placeholder rather than the literal title so that
/// substitution happens once, in [`crate::markdown::post_process`], for both
/// generation modes.
pub fn format_structured_summary(
    summary: &StructuredSummary,
    title: Option<&str>,
    creator: Option<&str>,
) -> String {
    let title = match title.filter(|t| !t.trim().is_empty()) {
        Some(_) => TITLE_PLACEHOLDER,
        None => UNKNOWN_TITLE,
    };
    let creator = creator
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(UNKNOWN_CREATOR);

    let mut output = String::new();

    output.push_str(&format!("🎬 **Title:** {}\n", title));
    output.push_str(&format!("👤 **Creator:** {}\n\n", creator));

    output.push_str("📄 **Summary:**\n");
    output.push_str(summary.summary.trim());
    output.push_str("\n\n");

    output.push_str("📝 **Smart Sections:**\n");
    if summary.smart_sections.is_empty() {
        output.push_str(NO_SECTIONS);
        output.push('\n');
    }
    for section in &summary.smart_sections {
        let marker = if section.is_ad { "[AD] " } else { "" };
        output.push_str(&format!(
            "{} - {} **{}{}**\n",
            section.timestamp.trim(),
            section.emoji.trim(),
            marker,
            section.title.trim()
        ));
    }

    output
}
