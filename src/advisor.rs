use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AlertError, Result};

/// Suggests a ticker for a free-text company description. Advisory only.
pub trait TickerAdvisor {
    fn suggest(&self, description: &str) -> Result<String>;
}

pub fn ticker_prompt(description: &str) -> String {
    format!(
        "What is the official stock ticker for {}? Reply with only the ticker and full company name.",
        description
    )
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<PartIn<'a>>,
}

#[derive(Debug, Serialize)]
struct PartIn<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartOut>,
}

#[derive(Debug, Deserialize)]
struct PartOut {
    #[serde(default)]
    text: String,
}

/// Gemini `generateContent`.
pub struct GeminiAdvisor {
    client: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiAdvisor {
    pub fn new(client: reqwest::blocking::Client, base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![PartIn { text: prompt }],
            }],
        };
        let resp = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()?;

        let status = resp.status();
        info!(status = status.as_u16(), model = %self.model, "gemini response");
        if !status.is_success() {
            return Err(AlertError::Status {
                service: "Gemini",
                status: status.as_u16(),
                message: resp.text().unwrap_or_default(),
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| AlertError::malformed("Gemini", e.to_string()))?;
        let content = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .ok_or_else(|| AlertError::malformed("Gemini", "no candidates in reply"))?;

        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        Ok(text.trim().to_string())
    }
}

impl TickerAdvisor for GeminiAdvisor {
    fn suggest(&self, description: &str) -> Result<String> {
        self.generate(&ticker_prompt(description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_asks_for_ticker_and_name_only() {
        assert_eq!(
            ticker_prompt("the maker of the iPhone"),
            "What is the official stock ticker for the maker of the iPhone? Reply with only the ticker and full company name."
        );
    }
}
