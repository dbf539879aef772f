use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::{Result, SummaryError},
    provider::ProviderFamily,
};

use super::{DEFAULT_TEMPERATURE, request_error, status_error};

const FAMILY: ProviderFamily = ProviderFamily::Ollama;

pub struct OllamaClient {
    client: Client,
    base_url: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl OllamaClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn request_body(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Value {
        let mut body = json!({
            "model": model,
            "prompt": prompt,
            "stream": false,
            "options": { "temperature": self.temperature },
        });
        if let Some(schema) = schema {
            body["format"] = schema.clone();
        }
        body
    }

    pub async fn generate(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url);
        tracing::debug!(%model, structured = schema.is_some(), "Sending Ollama request");

        let resp = self
            .client
            .post(url)
            .json(&self.request_body(model, prompt, schema))
            .send()
            .await
            .map_err(|e| match request_error(FAMILY, e) {
                SummaryError::ProviderConnection { provider, message } => {
                    SummaryError::ProviderConnection {
                        provider,
                        message: format!("{message}. Is Ollama running at {}?", self.base_url),
                    }
                }
                other => other,
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let raw = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&raw)
                .map(|b| b.error)
                .unwrap_or(raw);
            return Err(status_error(FAMILY, model, status, message));
        }

        let response = resp
            .json::<GenerateResponse>()
            .await
            .map_err(|e| request_error(FAMILY, e))?;

        response
            .response
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| SummaryError::GenerationFailed {
                provider: FAMILY.name().to_string(),
                message: "No content in response".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = OllamaClient::new(Client::new(), "http://localhost:11434/");
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn schema_goes_into_format() {
        let client = OllamaClient::new(Client::new(), "http://localhost:11434");
        let schema = json!({"type": "object"});

        let body = client.request_body("llama3.2:latest", "hi", Some(&schema));
        assert_eq!(body["format"], schema);
        assert_eq!(body["stream"], false);

        let plain = client.request_body("llama3.2:latest", "hi", None);
        assert!(plain.get("format").is_none());
    }
}
