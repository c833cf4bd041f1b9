//! Trend summarization through the Gemini `generateContent` API.
//!
//! [`Summarizer::analyze`] never fails: a missing key, a transport error, or
//! an unparseable reply all produce [`Analysis::fallback`].

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use trendhunt_core::TrendRecord;

use crate::clients::normalize_base_url;
use crate::error::SignalError;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub summary: String,
    pub recommendation: String,
    pub risk_assessment: String,
}

impl Analysis {
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            summary: "AI Analysis unavailable. Signal propagation indicates a strong correlation \
                      between social discovery and search intent."
                .to_string(),
            recommendation: "Monitor local supply competitors closely.".to_string(),
            risk_assessment: "Moderate volatility detected.".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
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

/// `"TikTok: Intensity 95, Velocity 12; ..."` in platform order.
#[must_use]
pub fn signal_summary(record: &TrendRecord) -> String {
    record
        .signals
        .iter()
        .map(|s| {
            format!(
                "{}: Intensity {}, Velocity {}",
                s.platform, s.current_intensity, s.velocity
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn build_prompt(record: &TrendRecord) -> String {
    format!(
        "You are the analytics engine for a local food-trend tracker. \
         Analyze the following emerging food trend.\n\n\
         Food: {term}\n\
         Category: {category}\n\
         Region: {region} ({neighborhood})\n\n\
         Data signals: {signals}\n\n\
         Computed scores:\n\
         Supply density: {supply}/100\n\
         Demand intensity: {demand}/100\n\
         Unmet demand: {unmet}/100\n\n\
         Task:\n\
         1. Summarize concisely why this trend is happening now.\n\
         2. Recommend one specific action for a local restaurateur.\n\
         3. Assess the risk (fad or staple).",
        term = record.term,
        category = record.category,
        region = record.region,
        neighborhood = record.neighborhood,
        signals = signal_summary(record),
        supply = record.scores.supply_score,
        demand = record.scores.demand_score,
        unmet = record.scores.unmet_demand_score,
    )
}

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the HTTP client cannot be built.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, SignalError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`SignalError`] if the HTTP client cannot be built or the URL is blank.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, SignalError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: normalize_base_url(base_url)?,
        })
    }

    /// Ask the model for a structured analysis of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError`] on transport failure, non-2xx status, an empty
    /// reply, or a reply that is not the expected JSON object.
    pub async fn summarize(&self, record: &TrendRecord) -> Result<Analysis, SignalError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{"parts": [{"text": build_prompt(record)}]}],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": {"type": "STRING"},
                        "recommendation": {"type": "STRING"},
                        "riskAssessment": {"type": "STRING"}
                    },
                    "required": ["summary", "recommendation", "riskAssessment"]
                }
            }
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let generated: GenerateResponse = response.json().await?;

        let text = generated
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .ok_or_else(|| SignalError::Api {
                source_name: "Gemini",
                message: "no text in response".to_string(),
            })?;

        serde_json::from_str(&text).map_err(|e| SignalError::Deserialize {
            context: "gemini analysis".to_string(),
            source: e,
        })
    }
}

/// Summarization with a guaranteed result.
pub struct Summarizer {
    client: Option<GeminiClient>,
}

impl Summarizer {
    #[must_use]
    pub fn new(client: Option<GeminiClient>) -> Self {
        Self { client }
    }

    /// Build from configuration; no `GEMINI_API_KEY` means fallback-only.
    ///
    /// # Errors
    ///
    /// Returns [`SignalError::Http`] if the HTTP client cannot be built.
    pub fn from_app_config(config: &trendhunt_core::AppConfig) -> Result<Self, SignalError> {
        let client = config
            .gemini_api_key
            .as_deref()
            .map(|key| {
                GeminiClient::new(key, &config.gemini_model, config.adapter_timeout_secs * 2)
            })
            .transpose()?;
        Ok(Self::new(client))
    }

    pub async fn analyze(&self, record: &TrendRecord) -> Analysis {
        let Some(client) = &self.client else {
            return Analysis::fallback();
        };
        match client.summarize(record).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(term = %record.term, error = %e, "trend analysis failed; using fallback");
                Analysis::fallback()
            }
        }
    }
}
