use crate::{
    error::Result,
    format::{format_structured_summary, transcript_to_text},
    llm::{LanguageModel, schema::summary_schema},
    markdown::post_process,
    prompt::{build_prompt, build_structured_prompt, with_transcript},
    provider::resolve,
    types::{GenerationMode, SummaryRequest},
};

/// Generate the final markdown summary for a request.
///
/// Resolves the model id first, so an unsupported id fails before any prompt
/// is built or any provider is contacted. One provider call, no retries.
pub async fn generate_summary(
    model: &dyn LanguageModel,
    request: &SummaryRequest,
    mode: GenerationMode,
) -> Result<String> {
    let resolved = resolve(&request.model_id)?;
    let title = request.title();
    let creator = request.creator();
    let transcript_text = transcript_to_text(&request.transcript);

    tracing::debug!(
        model = %resolved.display(),
        length = %request.length,
        items = request.transcript.len(),
        ?mode,
        "Building summary request"
    );

    let markdown = match mode {
        GenerationMode::Text => {
            let prompt = with_transcript(
                &build_prompt(request.length, title, creator),
                &transcript_text,
            );
            model.generate_text(&resolved, &prompt).await?
        }
        GenerationMode::Structured => {
            let prompt = build_structured_prompt(request.length, title, creator, &transcript_text);
            let summary = model
                .generate_structured(&resolved, &prompt, &summary_schema())
                .await?;
            format_structured_summary(&summary, title, creator)
        }
    };

    Ok(post_process(&markdown, title))
}
