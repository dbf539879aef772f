use reqwest::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    error::{Result, SummaryError},
    provider::ProviderFamily,
};

use super::{DEFAULT_TEMPERATURE, request_error, schema::to_gemini_schema, status_error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const FAMILY: ProviderFamily = ProviderFamily::Gemini;

pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
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

    fn request_body(&self, prompt: &str, schema: Option<&Value>) -> Value {
        let mut generation_config = json!({
            "temperature": self.temperature,
            "topK": 40,
            "topP": 0.95,
            "maxOutputTokens": 8192,
        });
        if let Some(schema) = schema {
            generation_config["responseMimeType"] = json!("application/json");
            generation_config["responseSchema"] = to_gemini_schema(schema);
        }

        json!({
            "contents": [
                {
                    "role": "user",
                    "parts": [{ "text": prompt }]
                }
            ],
            "generationConfig": generation_config,
        })
    }

    /// Returns the concatenated text parts of the first candidate.
    pub async fn generate(&self, model: &str, prompt: &str, schema: Option<&Value>) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        tracing::debug!(%model, structured = schema.is_some(), "Sending Gemini request");

        let resp = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&self.request_body(prompt, schema))
            .send()
            .await
            .map_err(|e| request_error(FAMILY, e))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let message = resp.text().await.unwrap_or_default();
            return Err(status_error(FAMILY, model, status, message));
        }

        let response = resp
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| request_error(FAMILY, e))?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(SummaryError::GenerationFailed {
                provider: FAMILY.name().to_string(),
                message: "No content in response".into(),
            });
        }

        Ok(text)
    }
}
