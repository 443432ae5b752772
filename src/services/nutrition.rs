// SPDX-License-Identifier: MIT

//! Meal nutrition estimation via the Anthropic Messages API.
//!
//! Purely advisory: the caller feeds the estimate back into engine mutation
//! calls (or the meal record) as ordinary data.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-3-5-sonnet-20240620";
const MAX_TOKENS: u32 = 1000;

/// Structured nutrition estimate. Fields the model could not estimate are
/// null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionEstimate {
    pub calories: Option<f64>,
    pub protein_grams: Option<f64>,
    pub carbs_grams: Option<f64>,
    pub fat_grams: Option<f64>,
}

/// Anthropic Messages API client.
#[derive(Clone)]
pub struct NutritionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl NutritionClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.anthropic.com".to_string(),
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

    /// Estimate the macros of a meal described in free text.
    pub async fn estimate(&self, description: &str) -> Result<NutritionEstimate, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::AiApi("Anthropic API key not configured".to_string()))?;

        let prompt = format!(
            "Estimate the nutritional content of this meal: \"{}\". \
             Respond with only a JSON object of this exact shape: \
             {{\"calories\": number, \"protein_grams\": number, \
             \"carbs_grams\": number, \"fat_grams\": number}}. \
             Use null for any field you cannot estimate.",
            description
        );

        let body = serde_json::json!({
            "model": MODEL,
            "max_tokens": MAX_TOKENS,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .http
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::AiApi(format!("Anthropic request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::AiApi(format!("HTTP {}: {}", status, body)));
        }

        let message: MessagesResponse = response
            .json()
            .await
            .map_err(|e| AppError::AiApi(format!("JSON parse error: {}", e)))?;

        let text = message
            .content
            .first()
            .map(|block| block.text.as_str())
            .unwrap_or_default();

        let json = extract_json_object(text)
            .ok_or_else(|| AppError::AiApi("AI response contained no JSON object".to_string()))?;

        serde_json::from_str(json)
            .map_err(|e| AppError::AiApi(format!("AI response was not valid JSON: {}", e)))
    }
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// Pull the first balanced `{...}` object out of completion text, which may
/// wrap the JSON in prose or a code fence.
pub(crate) fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
