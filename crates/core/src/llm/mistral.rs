use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::{Result, SummaryError},
    provider::ProviderFamily,
};

use super::{DEFAULT_TEMPERATURE, request_error, status_error};

pub const DEFAULT_BASE_URL: &str = "https://api.mistral.ai/v1";

const FAMILY: ProviderFamily = ProviderFamily::Mistral;

pub struct MistralClient {
    client: Client,
    api_key: String,
    base_url: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

impl MistralClient {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn request_body(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Value {
        let mut body = json!({
            "model": model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": self.temperature,
        });
        if let Some(schema) = schema {
            body["response_format"] = json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_summary",
                    "schema": schema,
                },
            });
        }
        body
    }

    pub async fn generate(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Result<String> {
        tracing::debug!(%model, structured = schema.is_some(), "Sending Mistral request");

        let resp = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(model, prompt, schema))
            .send()
            .await
            .map_err(|e| request_error(FAMILY, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().await.unwrap_or_default();
            return Err(status_error(FAMILY, model, status, message));
        }

        let response = resp
            .json::<CompletionResponse>()
            .await
            .map_err(|e| request_error(FAMILY, e))?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| SummaryError::GenerationFailed {
                provider: FAMILY.name().to_string(),
                message: "No content in response".into(),
            })
    }
}
