//! Text-generation adapter for the report narrative.
//!
//! The engine never calls this directly: the caller sends the prompt, then
//! hands the returned text to [`crate::narrative::merge_narrative`]. Timeouts
//! live here; there are no retries.

use crate::error::{Result, SkmError};
use crate::narrative::build_prompt;
use crate::types::ReportDataset;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Anything that can turn a prompt into generated text.
pub trait NarrativeClient {
    fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build the prompt for `dataset` and return the raw service text.
pub fn request_narrative(client: &dyn NarrativeClient, dataset: &ReportDataset) -> Result<String> {
    let prompt = build_prompt(dataset);
    debug!("Narrative prompt is {} bytes", prompt.len());
    client.generate(&prompt)
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SkmError::ExternalService(e.to_string()))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'a str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
    }
}

impl NarrativeClient for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .map_err(|e| SkmError::ExternalService(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("Gemini returned {}: {}", status, body);
            return Err(SkmError::ExternalService(format!("HTTP error! status: {}", status)));
        }

        let parsed: GenerateResponse = response
            .json()
            .map_err(|e| SkmError::ExternalService(e.to_string()))?;
        parsed
            .first_text()
            .ok_or_else(|| SkmError::ExternalService("empty or invalid AI response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::process;
    use crate::testutil::sample_workbook;
    use std::cell::RefCell;

    struct FakeClient {
        prompts: RefCell<Vec<String>>,
        reply: Result<String>,
    }

    impl NarrativeClient for FakeClient {
        fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.borrow_mut().push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(SkmError::ExternalService(e.to_string())),
            }
        }
    }

    #[test]
    fn request_sends_the_built_prompt() {
        let ds = process(&sample_workbook()).unwrap();
        let client = FakeClient {
            prompts: RefCell::new(Vec::new()),
            reply: Ok("{}".to_string()),
        };
        let text = request_narrative(&client, &ds).unwrap();
        assert_eq!(text, "{}");
        assert_eq!(client.prompts.borrow().as_slice(), &[build_prompt(&ds)]);
    }

    #[test]
    fn service_errors_are_passed_through() {
        let ds = process(&sample_workbook()).unwrap();
        let client = FakeClient {
            prompts: RefCell::new(Vec::new()),
            reply: Err(SkmError::ExternalService("HTTP error! status: 403".to_string())),
        };
        let err = request_narrative(&client, &ds).unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn response_text_is_taken_from_first_candidate() {
        let raw = r#"{"candidates":[{"content":{"parts":[{"text":"halo"}],"role":"model"}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("halo"));

        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_text(), None);
    }

    #[test]
    fn request_body_shape() {
        let body = GenerateRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: "p" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["role"], "user");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "p");
    }
}
