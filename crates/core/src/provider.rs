use std::fmt;

use crate::error::{Result, SummaryError};

pub const GEMINI_MODELS: [&str; 3] = [
    "gemini-2.0-flash",
    "gemini-2.0-flash-lite",
    "gemini-2.0-flash-exp",
];
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const GEMINI_ALIAS: &str = "gemini";

pub const MISTRAL_MODELS: [&str; 5] = [
    "mistral-large-latest",
    "mistral-medium-latest",
    "mistral-small-latest",
    "open-mistral-nemo",
    "ministral-8b-latest",
];

pub const OLLAMA_PREFIX: &str = "ollama:";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:latest";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProviderFamily {
    Gemini,
    Ollama,
    Mistral,
}

pub struct ProviderConfig {
    pub env_var: Option<&'static str>,
}

impl ProviderFamily {
    pub fn config(&self) -> ProviderConfig {
        match self {
            ProviderFamily::Gemini => ProviderConfig {
                env_var: Some("GEMINI_API_KEY"),
            },
            ProviderFamily::Ollama => ProviderConfig { env_var: None },
            ProviderFamily::Mistral => ProviderConfig {
                env_var: Some("MISTRAL_API_KEY"),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderFamily::Gemini => "Gemini",
            ProviderFamily::Ollama => "Ollama",
            ProviderFamily::Mistral => "Mistral",
        }
    }
}

impl fmt::Display for ProviderFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A model identifier mapped onto a concrete backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedModel {
    pub family: ProviderFamily,
    /// Model name as the provider knows it.
    pub model: String,
}

impl ResolvedModel {
    pub fn display(&self) -> String {
        format!("{}/{}", self.family.name().to_lowercase(), self.model)
    }
}

/// Map a caller-supplied model id onto a provider family.
///
/// Gemini names (and the `gemini` alias) win over Mistral names, which win
/// over Ollama ids. Ollama ids either carry the `ollama:` prefix or belong to
/// the `llama3` family that the CLI and extension use as their default.
pub fn resolve(model_id: &str) -> Result<ResolvedModel> {
    let id = model_id.trim();

    if id == GEMINI_ALIAS {
        return Ok(ResolvedModel {
            family: ProviderFamily::Gemini,
            model: DEFAULT_GEMINI_MODEL.to_string(),
        });
    }
    if GEMINI_MODELS.contains(&id) {
        return Ok(ResolvedModel {
            family: ProviderFamily::Gemini,
            model: id.to_string(),
        });
    }

    if MISTRAL_MODELS.contains(&id) {
        return Ok(ResolvedModel {
            family: ProviderFamily::Mistral,
            model: id.to_string(),
        });
    }

    let ollama_model = match id.strip_prefix(OLLAMA_PREFIX) {
        Some(rest) => Some(rest.trim()),
        None if is_llama3_family(id) => Some(id),
        None => None,
    };
    if let Some(model) = ollama_model.filter(|m| !m.is_empty()) {
        return Ok(ResolvedModel {
            family: ProviderFamily::Ollama,
            model: normalize_ollama_model(model),
        });
    }

    Err(SummaryError::UnsupportedModel {
        model_id: model_id.to_string(),
    })
}

fn is_llama3_family(id: &str) -> bool {
    let name = id.split(':').next().unwrap_or(id);
    name == "llama3" || name.starts_with("llama3.")
}

/// Untagged `llama3`/`llama3.2` get pinned to the default tag.
fn normalize_ollama_model(model: &str) -> String {
    match model {
        "llama3" | "llama3.2" => DEFAULT_OLLAMA_MODEL.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn gemini_alias_matches_default() {
        let alias = resolve("gemini").unwrap();
        let explicit = resolve("gemini-2.0-flash").unwrap();
        assert_eq!(alias, explicit);
        assert_eq!(alias.family, ProviderFamily::Gemini);
    }

    #[test]
    fn every_gemini_model_resolves() {
        for name in GEMINI_MODELS {
            let resolved = resolve(name).unwrap();
            assert_eq!(resolved.family, ProviderFamily::Gemini);
            assert_eq!(resolved.model, name);
        }
    }

    #[test]
    fn mistral_models_resolve() {
        let resolved = resolve("mistral-small-latest").unwrap();
        assert_eq!(resolved.family, ProviderFamily::Mistral);
        assert_eq!(resolved.model, "mistral-small-latest");
    }

    #[test]
    fn ollama_prefix_is_stripped() {
        let resolved = resolve("ollama:llama3.2:latest").unwrap();
        assert_eq!(resolved.family, ProviderFamily::Ollama);
        assert_eq!(resolved.model, "llama3.2:latest");

        let other = resolve("ollama:qwen2.5:7b").unwrap();
        assert_eq!(other.model, "qwen2.5:7b");
    }

    #[test]
    fn bare_llama_names_get_default_tag() {
        for id in ["llama3", "llama3.2", "ollama:llama3", "ollama:llama3.2"] {
            let resolved = resolve(id).unwrap();
            assert_eq!(resolved.family, ProviderFamily::Ollama, "{id}");
            assert_eq!(resolved.model, DEFAULT_OLLAMA_MODEL, "{id}");
        }
        assert_eq!(resolve("llama3.2:latest").unwrap().model, "llama3.2:latest");
        assert_eq!(resolve("llama3:8b").unwrap().model, "llama3:8b");
    }

    #[test]
    fn unknown_models_fail() {
        for id in ["unknown-model-xyz", "", "ollama:", "gemini-1.0-pro", "llama2"] {
            let err = resolve(id).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnsupportedModel, "{id:?}");
        }
    }

    #[test]
    fn display_names_family_and_model() {
        assert_eq!(resolve("gemini").unwrap().display(), "gemini/gemini-2.0-flash");
    }
}
