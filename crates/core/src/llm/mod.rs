pub mod gemini;
pub mod mistral;
pub mod ollama;
pub mod schema;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;

use crate::{
    error::{Result, SummaryError},
    provider::{ProviderFamily, ResolvedModel},
    types::StructuredSummary,
};

use self::{gemini::GeminiClient, mistral::MistralClient, ollama::OllamaClient};

pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationEvent {
    Started {
        provider: ProviderFamily,
        model: String,
    },
    Succeeded {
        provider: ProviderFamily,
        model: String,
    },
    Failed {
        provider: ProviderFamily,
        model: String,
        message: String,
    },
}

/// Receives dispatch progress. Presentation (spinners, colored lines) lives
/// behind this, never inside the dispatcher.
pub trait ProgressSink: Send + Sync {
    fn on_event(&self, event: GenerationEvent);
}

impl<F> ProgressSink for F
where
    F: Fn(GenerationEvent) + Send + Sync,
{
    fn on_event(&self, event: GenerationEvent) {
        self(event)
    }
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate_text(&self, model: &ResolvedModel, prompt: &str) -> Result<String>;

    async fn generate_structured(
        &self,
        model: &ResolvedModel,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredSummary>;
}

/// One variant per provider family.
pub enum Backend {
    Gemini(GeminiClient),
    Ollama(OllamaClient),
    Mistral(MistralClient),
}

impl Backend {
    pub fn family(&self) -> ProviderFamily {
        match self {
            Backend::Gemini(_) => ProviderFamily::Gemini,
            Backend::Ollama(_) => ProviderFamily::Ollama,
            Backend::Mistral(_) => ProviderFamily::Mistral,
        }
    }

    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        match self {
            Backend::Gemini(client) => client.generate(model, prompt, None).await,
            Backend::Ollama(client) => client.generate(model, prompt, None).await,
            Backend::Mistral(client) => client.generate(model, prompt, None).await,
        }
    }

    pub async fn generate_structured(
        &self,
        model: &str,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredSummary> {
        let raw = match self {
            Backend::Gemini(client) => client.generate(model, prompt, Some(schema)).await?,
            Backend::Ollama(client) => client.generate(model, prompt, Some(schema)).await?,
            Backend::Mistral(client) => client.generate(model, prompt, Some(schema)).await?,
        };
        schema::parse_structured(&raw)
    }
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub gemini_api_key: Option<String>,
    pub mistral_api_key: Option<String>,
    pub gemini_base_url: String,
    pub mistral_base_url: String,
    pub ollama_base_url: String,
    pub temperature: f32,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            mistral_api_key: None,
            gemini_base_url: gemini::DEFAULT_BASE_URL.to_string(),
            mistral_base_url: mistral::DEFAULT_BASE_URL.to_string(),
            ollama_base_url: DEFAULT_OLLAMA_HOST.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl ProviderSettings {
    pub fn from_env() -> Self {
        let env = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();
        Self {
            gemini_api_key: env("GEMINI_API_KEY"),
            mistral_api_key: env("MISTRAL_API_KEY"),
            ollama_base_url: env("OLLAMA_HOST").unwrap_or(defaults.ollama_base_url),
            ..defaults
        }
    }

    /// Configured API key for a family. Always `None` for Ollama.
    pub fn api_key(&self, family: ProviderFamily) -> Option<&str> {
        match family {
            ProviderFamily::Gemini => self.gemini_api_key.as_deref(),
            ProviderFamily::Mistral => self.mistral_api_key.as_deref(),
            ProviderFamily::Ollama => None,
        }
    }

    /// API key for a keyed family, or `MissingCredentials` naming its env var.
    pub fn require_api_key(&self, family: ProviderFamily) -> Result<String> {
        self.api_key(family)
            .map(str::to_string)
            .ok_or_else(|| missing_credentials(family))
    }
}

/// Routes a [`ResolvedModel`] to its backend. Holds no per-request state, so a
/// single instance can serve concurrent callers.
pub struct Dispatcher {
    http: reqwest::Client,
    settings: ProviderSettings,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl Dispatcher {
    pub fn new(settings: ProviderSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            settings,
            progress: None,
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = Some(sink);
        self
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub fn backend(&self, family: ProviderFamily) -> Result<Backend> {
        let temperature = self.settings.temperature;

        Ok(match family {
            ProviderFamily::Gemini => Backend::Gemini(
                GeminiClient::new(self.http.clone(), self.settings.require_api_key(family)?)
                    .with_base_url(&self.settings.gemini_base_url)
                    .with_temperature(temperature),
            ),
            ProviderFamily::Mistral => Backend::Mistral(
                MistralClient::new(self.http.clone(), self.settings.require_api_key(family)?)
                    .with_base_url(&self.settings.mistral_base_url)
                    .with_temperature(temperature),
            ),
            ProviderFamily::Ollama => Backend::Ollama(
                OllamaClient::new(self.http.clone(), &self.settings.ollama_base_url)
                    .with_temperature(temperature),
            ),
        })
    }

    fn emit(&self, event: GenerationEvent) {
        if let Some(sink) = &self.progress {
            sink.on_event(event);
        }
    }

    fn started(&self, model: &ResolvedModel) {
        tracing::info!(model = %model.display(), "Generating response");
        self.emit(GenerationEvent::Started {
            provider: model.family,
            model: model.model.clone(),
        });
    }

    fn finished<T>(&self, model: &ResolvedModel, result: &Result<T>) {
        match result {
            Ok(_) => {
                tracing::info!(model = %model.display(), "Generated response");
                self.emit(GenerationEvent::Succeeded {
                    provider: model.family,
                    model: model.model.clone(),
                });
            }
            Err(e) => {
                tracing::error!(model = %model.display(), error = %e, "Generation failed");
                self.emit(GenerationEvent::Failed {
                    provider: model.family,
                    model: model.model.clone(),
                    message: e.to_string(),
                });
            }
        }
    }
}

#[async_trait]
impl LanguageModel for Dispatcher {
    async fn generate_text(&self, model: &ResolvedModel, prompt: &str) -> Result<String> {
        self.started(model);
        let result = match self.backend(model.family) {
            Ok(backend) => backend.generate(&model.model, prompt).await,
            Err(e) => Err(e),
        };
        self.finished(model, &result);
        result
    }

    async fn generate_structured(
        &self,
        model: &ResolvedModel,
        prompt: &str,
        schema: &Value,
    ) -> Result<StructuredSummary> {
        self.started(model);
        let result = match self.backend(model.family) {
            Ok(backend) => backend.generate_structured(&model.model, prompt, schema).await,
            Err(e) => Err(e),
        };
        self.finished(model, &result);
        result
    }
}

/// Transport-level failure: unreachable endpoint vs anything else.
pub(crate) fn request_error(family: ProviderFamily, err: reqwest::Error) -> SummaryError {
    if err.is_connect() || err.is_timeout() {
        SummaryError::ProviderConnection {
            provider: family.name().to_string(),
            message: err.to_string(),
        }
    } else {
        SummaryError::GenerationFailed {
            provider: family.name().to_string(),
            message: err.to_string(),
        }
    }
}

pub(crate) fn missing_credentials(family: ProviderFamily) -> SummaryError {
    SummaryError::MissingCredentials {
        provider: family.name().to_string(),
        env_var: family.config().env_var.unwrap_or_default().to_string(),
    }
}

/// Non-success HTTP status from a provider.
///
/// Ollama reports an unknown model in the error body, sometimes with a
/// non-404 status, so only its body text is searched.
pub(crate) fn status_error(
    family: ProviderFamily,
    model: &str,
    status: StatusCode,
    body: String,
) -> SummaryError {
    let ollama_missing_model = family == ProviderFamily::Ollama && {
        let lowered = body.to_lowercase();
        lowered.contains("not found") || lowered.contains("no such model")
    };
    if status == StatusCode::NOT_FOUND || ollama_missing_model {
        return SummaryError::ModelNotFound {
            model: model.to_string(),
            message: body,
        };
    }
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        && family.config().env_var.is_some()
    {
        tracing::warn!(provider = %family, %status, %body, "Provider rejected the API key");
        return missing_credentials(family);
    }
    SummaryError::GenerationFailed {
        provider: family.name().to_string(),
        message: format!("{} - {}", status.as_u16(), body),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn missing_gemini_key_is_reported_by_env_var() {
        let settings = ProviderSettings::default();
        let err = settings.require_api_key(ProviderFamily::Gemini).unwrap_err();
        assert!(matches!(
            err,
            SummaryError::MissingCredentials { ref env_var, .. } if env_var == "GEMINI_API_KEY"
        ));
        assert_eq!(settings.api_key(ProviderFamily::Ollama), None);

        let keyed = ProviderSettings {
            mistral_api_key: Some("secret".into()),
            ..ProviderSettings::default()
        };
        assert_eq!(keyed.require_api_key(ProviderFamily::Mistral).unwrap(), "secret");
    }

    #[test]
    fn backend_matches_family() {
        let settings = ProviderSettings {
            gemini_api_key: Some("key".into()),
            ..ProviderSettings::default()
        };
        let dispatcher = Dispatcher::new(settings);

        for family in [ProviderFamily::Gemini, ProviderFamily::Ollama] {
            assert_eq!(dispatcher.backend(family).unwrap().family(), family);
        }
        assert_eq!(
            dispatcher
                .backend(ProviderFamily::Mistral)
                .err()
                .map(|e| e.kind()),
            Some(ErrorKind::MissingCredentials)
        );
    }

    #[tokio::test]
    async fn progress_reports_start_and_failure() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let recorded = events.clone();
        let sink = move |event: GenerationEvent| recorded.lock().unwrap().push(event);

        let dispatcher = Dispatcher::new(ProviderSettings::default()).with_progress(Arc::new(sink));
        let model = crate::provider::resolve("gemini").unwrap();

        let err = dispatcher.generate_text(&model, "prompt").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingCredentials);

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], GenerationEvent::Started { provider: ProviderFamily::Gemini, .. }));
        assert!(matches!(events[1], GenerationEvent::Failed { ref message, .. } if message.contains("GEMINI_API_KEY")));
    }

    #[test]
    fn not_found_status_maps_to_model_not_found() {
        let err = status_error(
            ProviderFamily::Ollama,
            "llama3.2:latest",
            StatusCode::NOT_FOUND,
            r#"{"error":"model 'llama3.2:latest' not found"}"#.into(),
        );
        assert_eq!(err.kind(), ErrorKind::ModelNotFound);

        let other = status_error(
            ProviderFamily::Gemini,
            "gemini-2.0-flash",
            StatusCode::INTERNAL_SERVER_ERROR,
            "overloaded".into(),
        );
        assert_eq!(other.kind(), ErrorKind::GenerationFailed);
        assert!(other.to_string().contains("500 - overloaded"));
    }

    #[test]
    fn body_text_means_missing_model_only_for_ollama() {
        let body = || r#"{"error":"model 'nope' not found, try pulling it first"}"#.to_string();
        let ollama = status_error(
            ProviderFamily::Ollama,
            "nope",
            StatusCode::INTERNAL_SERVER_ERROR,
            body(),
        );
        assert_eq!(ollama.kind(), ErrorKind::ModelNotFound);

        let mistral = status_error(
            ProviderFamily::Mistral,
            "mistral-small-latest",
            StatusCode::BAD_REQUEST,
            "Tool not found in request".into(),
        );
        assert_eq!(mistral.kind(), ErrorKind::GenerationFailed);
    }

    #[test]
    fn rejected_key_maps_to_missing_credentials() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = status_error(
                ProviderFamily::Mistral,
                "mistral-small-latest",
                status,
                "Unauthorized".into(),
            );
            assert!(matches!(
                err,
                SummaryError::MissingCredentials { ref env_var, .. } if env_var == "MISTRAL_API_KEY"
            ));
        }

        let ollama = status_error(
            ProviderFamily::Ollama,
            "llama3.2:latest",
            StatusCode::FORBIDDEN,
            "forbidden".into(),
        );
        assert_eq!(ollama.kind(), ErrorKind::GenerationFailed);
    }
}
