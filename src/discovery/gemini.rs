//! Gemini `generateContent` backend
//!
//! Sends the place prompt as a single user turn and reads the generated text
//! from `candidates[0].content.parts[0].text`.

use crate::discovery::decode::decode_places;
use crate::discovery::{build_prompt, PlaceDiscovery, PlaceSummary};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Gemini text generation backend
#[derive(Clone)]
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
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
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiBackend {
    /// Create a backend; a missing key only fails at request time
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Send a prompt and return the first candidate's text
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Service("No Gemini API key configured (api_keys.gemini or GEMINI_API_KEY)".into())
        })?;

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!("POST {}", self.endpoint());
        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Service(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::Service(format!(
                "Gemini returned status: {}",
                response.status()
            )));
        }

        let data: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("Failed to parse Gemini response: {}", e)))?;

        extract_text(data)
    }
}

fn extract_text(data: GenerateResponse) -> Result<String> {
    data.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .ok_or_else(|| Error::MalformedResponse("Gemini response has no candidate text".into()))
}

impl PlaceDiscovery for GeminiBackend {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn discover(&self, location: &str) -> Result<Vec<PlaceSummary>> {
        let text = self.generate(&build_prompt(location)).await?;
        let places = decode_places(&text)?;
        info!("Discovered {} places for '{}'", places.len(), location);
        Ok(places)
    }
}
