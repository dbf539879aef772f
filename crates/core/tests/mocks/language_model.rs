use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use yt_tldr_core::{LanguageModel, ResolvedModel, Result, StructuredSummary, SummaryError};

#[derive(Debug, Clone)]
pub struct Call {
    pub model: ResolvedModel,
    pub prompt: String,
    pub structured: bool,
}

#[derive(Clone, Default)]
pub struct MockLanguageModel {
    pub text: String,
    pub structured: Option<StructuredSummary>,
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail_with: Option<fn() -> SummaryError>,
}

impl MockLanguageModel {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn structured(summary: StructuredSummary) -> Self {
        Self {
            structured: Some(summary),
            ..Self::default()
        }
    }

    pub fn failing(error: fn() -> SummaryError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::default()
        }
    }

    fn record(&self, model: &ResolvedModel, prompt: &str, structured: bool) {
        self.calls.lock().unwrap().push(Call {
            model: model.clone(),
            prompt: prompt.to_string(),
            structured,
        });
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn generate_text(&self, model: &ResolvedModel, prompt: &str) -> Result<String> {
        self.record(model, prompt, false);
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        Ok(self.text.clone())
    }

    async fn generate_structured(
        &self,
        model: &ResolvedModel,
        prompt: &str,
        _schema: &Value,
    ) -> Result<StructuredSummary> {
        self.record(model, prompt, true);
        if let Some(error) = self.fail_with {
            return Err(error());
        }
        self.structured
            .clone()
            .ok_or_else(|| SummaryError::SchemaValidation("mock has no structured output".into()))
    }
}
