use crate::{
    format::{UNKNOWN_CREATOR, UNKNOWN_TITLE},
    markdown::TITLE_PLACEHOLDER,
    types::SummaryLength,
};

/// Instruction prompt for free-text generation. The transcript is not part of
/// it; see [`with_transcript`].
pub fn build_prompt(length: SummaryLength, title: Option<&str>, creator: Option<&str>) -> String {
    let (title, creator) = metadata_or_fallback(title, creator);

    format!(
        r#"You are summarizing a YouTube video transcript. 🎥📝
Keep a **neutral** tone and **never assume anything**: only summarize what is explicitly stated in the transcript. 🤖
Summarize the key points concisely, using **Smart Sections** with timestamps. ⏳
Avoid phrases like "This appears to be..." or "The speaker mentioned." State only facts from the transcript. 🚫
If there is an advertisement or sponsor section, label it clearly as **[AD]** with its timestamp. 📢
Refer to the main speaker as The Creator unless someone else is speaking. 👤
Whenever the summary needs the title of the video, write the placeholder "{placeholder}" instead of the title itself.

📄 **How to structure the summary:**
1. Start with a **short paragraph** covering the overall topic and key takeaways.
2. Only add a **Smart Section** when that part of the video has enough meaningful information.
3. For each **Smart Section**, give only a **title** unless a longer explanation is really needed.

**Metadata (for context only, do not copy the title into the summary):**
- **Title:** {title}
- **Creator:** {creator}

🔧 **Customization:**
- **Length:** {length} summary.
- **Clarity:** Use clear and engaging language.
- **Timestamps:** Only include timestamps for **major sections**, in MM:SS format.
- **Emojis:** Include at least one emoji per section.

⚠️ **MARKDOWN FORMATTING RULES:**
- For bullet lists, start each line with "- " (hyphen followed by a space)
- For numbered lists, use "1. " (number, period, space)
- Always put a blank line BEFORE any list
- Put each list item on its own line

📌 **Example format:**

🎬 **Title:** {placeholder}
👤 **Creator:** {creator}

📄 **Summary:**
[Short paragraph with the overall topic and key takeaways.]

📝 **Smart Sections:**
[MM:SS] - 🚀 **[Main Topic]**
[MM:SS] - 💡 **[Another Topic]**
[MM:SS] - 📢 **[AD] [Ad Topic]**

ℹ️ **Important:**
- Do not write detailed summaries inside Smart Sections, only titles.
- Group related points together instead of creating many small sections.
- Make sure the summary matches the requested length ("{length}") and stays concise."#,
        placeholder = TITLE_PLACEHOLDER,
        title = title,
        creator = creator,
        length = length,
    )
}

/// Append the normalized transcript to a free-text prompt.
pub fn with_transcript(prompt: &str, transcript_text: &str) -> String {
    format!("{prompt}\n\nTranscript:\n---\n{transcript_text}\n---\n")
}

/// Shorter variant for schema-constrained generation, transcript inline.
pub fn build_structured_prompt(
    length: SummaryLength,
    title: Option<&str>,
    creator: Option<&str>,
    transcript_text: &str,
) -> String {
    let (title, creator) = metadata_or_fallback(title, creator);

    format!(
        r#"Summarize the following YouTube video transcript as JSON matching the provided schema.
Keep a neutral tone and only state what the transcript explicitly says.
Refer to the main speaker as The Creator. When the title is needed in the summary, write "{placeholder}" instead of the title.

- "summary": a {length} overview paragraph of the topic and key takeaways.
- "smartSections": major sections in chronological order, each with a "timestamp" (MM:SS), a single "emoji" and a short "title".
- Set "isAd" to true for advertisement or sponsor sections and false otherwise.
- "metadata.summaryLength" must be "{length}".

Metadata (for context only):
- Title: {title}
- Creator: {creator}

Transcript:
---
{transcript_text}
---
"#,
        placeholder = TITLE_PLACEHOLDER,
        length = length,
        title = title,
        creator = creator,
        transcript_text = transcript_text,
    )
}

fn metadata_or_fallback<'a>(title: Option<&'a str>, creator: Option<&'a str>) -> (&'a str, &'a str) {
    let title = title.filter(|t| !t.trim().is_empty()).unwrap_or(UNKNOWN_TITLE);
    let creator = creator
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(UNKNOWN_CREATOR);
    (title, creator)
}
