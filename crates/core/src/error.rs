use thiserror::Error;

#[derive(Error, Debug)]
pub enum SummaryError {
    #[error("No transcript available for {video_id}: {reason}")]
    NoTranscriptAvailable { video_id: String, reason: String },

    #[error("Invalid length specified: \"{0}\". Valid options are: short, long")]
    InvalidLength(String),

    #[error("Unsupported model: {model_id}")]
    UnsupportedModel { model_id: String },

    #[error("Model \"{model}\" not found: {message}")]
    ModelNotFound { model: String, message: String },

    #[error("Failed to connect to {provider}: {message}")]
    ProviderConnection { provider: String, message: String },

    #[error("Missing or rejected API key: check the {env_var} environment variable (required by {provider})")]
    MissingCredentials { provider: String, env_var: String },

    #[error("Structured output did not match the summary schema: {0}")]
    SchemaValidation(String),

    #[error("Generation with {provider} failed: {message}")]
    GenerationFailed { provider: String, message: String },
}

/// Payload-free mirror of [`SummaryError`] for adapters that only care about
/// the semantic kind of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoTranscriptAvailable,
    InvalidLength,
    UnsupportedModel,
    ModelNotFound,
    ProviderConnection,
    MissingCredentials,
    SchemaValidation,
    GenerationFailed,
}

impl SummaryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SummaryError::NoTranscriptAvailable { .. } => ErrorKind::NoTranscriptAvailable,
            SummaryError::InvalidLength(_) => ErrorKind::InvalidLength,
            SummaryError::UnsupportedModel { .. } => ErrorKind::UnsupportedModel,
            SummaryError::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            SummaryError::ProviderConnection { .. } => ErrorKind::ProviderConnection,
            SummaryError::MissingCredentials { .. } => ErrorKind::MissingCredentials,
            SummaryError::SchemaValidation(_) => ErrorKind::SchemaValidation,
            SummaryError::GenerationFailed { .. } => ErrorKind::GenerationFailed,
        }
    }

    /// Failures caused by the caller's input rather than by a provider.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::NoTranscriptAvailable | ErrorKind::InvalidLength | ErrorKind::UnsupportedModel
        )
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_input_problems_only() {
        assert!(SummaryError::InvalidLength("medium".into()).is_client_error());
        assert!(
            SummaryError::UnsupportedModel {
                model_id: "gpt-x".into()
            }
            .is_client_error()
        );
        assert!(
            !SummaryError::GenerationFailed {
                provider: "Gemini".into(),
                message: "boom".into()
            }
            .is_client_error()
        );
        assert!(
            !SummaryError::MissingCredentials {
                provider: "Gemini".into(),
                env_var: "GEMINI_API_KEY".into()
            }
            .is_client_error()
        );
    }

    #[test]
    fn messages_keep_provider_detail() {
        let err = SummaryError::ModelNotFound {
            model: "llama3.2:latest".into(),
            message: "model 'llama3.2:latest' not found".into(),
        };
        assert_eq!(err.kind(), ErrorKind::ModelNotFound);
        assert!(err.to_string().contains("model 'llama3.2:latest' not found"));
    }
}
