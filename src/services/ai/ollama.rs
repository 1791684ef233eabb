use anyhow::Context;
use async_trait::async_trait;
use serde_json::json;

use super::{GenerationService, ResponseSchema};

pub struct OllamaProvider {
    url: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl GenerationService for OllamaProvider {
    async fn generate(
        &self,
        prompt: &str,
        schema: &ResponseSchema,
        model: &str,
    ) -> anyhow::Result<String> {
        let body = json!({
            "model": model,
            "messages": [{
                "role": "user",
                "content": prompt,
            }],
            "format": schema.to_json_schema(),
            "stream": false,
        });

        let resp = self
            .client
            .post(format!("{}/api/chat", self.url.trim_end_matches('/')))
            .json(&body)
            .send()
            .await
            .context("failed to call Ollama API")?
            .error_for_status()
            .context("Ollama API returned error")?;

        let data: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse Ollama response")?;

        data["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow::anyhow!("missing content in Ollama response"))
    }
}
