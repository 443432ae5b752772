// SPDX-License-Identifier: MIT

//! Body-composition photo analysis via the Gemini API.
//!
//! The image is fetched from its storage URL, inlined as base64, and sent to
//! the vision model with a prompt asking for a strict JSON verdict.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::services::nutrition::extract_json_object;

const MODEL: &str = "gemini-pro-vision";
const MAX_OUTPUT_TOKENS: u32 = 500;

const PROMPT: &str = "Analyze this body photo. Estimate the body fat percentage as a number. \
    Provide concise, actionable fitness advice based on the physique shown. \
    Format your response as a JSON object: \
    {\"body_fat_percentage\": number, \"advice\": \"string\"}. \
    If body fat cannot be estimated, use null. Keep the advice under 200 words.";

/// Advisory body-composition estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyCompositionEstimate {
    pub body_fat_percentage: Option<f64>,
    pub advice: String,
}

/// Gemini vision client.
#[derive(Clone)]
pub struct VisionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl VisionClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key,
        }
    }

    /// Override the API base URL (for tests).
    pub fn with_base_url(api_key: Option<String>, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// Analyze a body photo reachable at `image_url`.
    pub async fn analyze_body_photo(
        &self,
        image_url: &str,
    ) -> Result<BodyCompositionEstimate, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::AiApi("Gemini API key not configured".to_string()))?;

        // Fetch the image so the model gets inline data, not a URL it
        // cannot reach
        let image_response = self
            .http
            .get(image_url)
            .send()
            .await
            .map_err(|e| AppError::AiApi(format!("Failed to fetch image: {}", e)))?;
        if !image_response.status().is_success() {
            return Err(AppError::AiApi(format!(
                "Failed to fetch image: HTTP {}",
                image_response.status()
            )));
        }

        let mime_type = image_response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("image/jpeg")
            .to_string();
        let bytes = image_response
            .bytes()
            .await
            .map_err(|e| AppError::AiApi(format!("Failed to read image: {}", e)))?;
        let data = STANDARD.encode(&bytes);

        let body = serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [
                    { "text": PROMPT },
                    { "inline_data": { "mime_type": mime_type, "data": data } }
                ]
            }],
            "generationConfig": { "maxOutputTokens": MAX_OUTPUT_TOKENS },
        });

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, MODEL, api_key
        );
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AiApi(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiApi(format!("HTTP {}: {}", status, body)));
        }

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiApi(format!("JSON parse error: {}", e)))?;

        let text = reply
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default();

        let json = extract_json_object(text)
            .ok_or_else(|| AppError::AiApi("AI response contained no JSON object".to_string()))?;

        serde_json::from_str(json)
            .map_err(|e| AppError::AiApi(format!("AI response was not valid JSON: {}", e)))
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}
