//! AI summary of the contact list via the Gemini `generateContent` REST API.

use std::time::Duration;

use log::{debug, warn};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::json;

use crate::api::models::{AiInsight, Contact};
use crate::error::InsightError;
use crate::settings::Settings;

pub const DEFAULT_AI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_AI_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_AI_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InsightClient {
    http: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl InsightClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            timeout: DEFAULT_AI_TIMEOUT,
        }
    }

    /// A model call that has not finished after `limit` counts as failed.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = limit;
        self
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            &settings.ai_base_url,
            &settings.ai_model,
            settings.ai_api_key.clone(),
        )
        .with_timeout(settings.ai_timeout())
    }

    /// Summarize `contacts`. Always yields a displayable insight; failures
    /// are logged and replaced with [`AiInsight::degraded`].
    pub async fn analyze(&self, contacts: &[Contact]) -> AiInsight {
        if contacts.is_empty() {
            return AiInsight::nothing_to_analyze();
        }
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("insight: no API key configured, AI analysis unavailable");
            return AiInsight::missing_key();
        };
        match self.request(api_key, contacts).await {
            Ok(insight) => insight,
            Err(e) => {
                warn!("insight: analysis failed: {}", e);
                AiInsight::degraded()
            }
        }
    }

    async fn request(
        &self,
        api_key: &str,
        contacts: &[Contact],
    ) -> Result<AiInsight, InsightError> {
        let endpoint = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(contacts) }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": {
                    "type": "OBJECT",
                    "properties": {
                        "summary": { "type": "STRING" },
                        "suggestions": { "type": "ARRAY", "items": { "type": "STRING" } }
                    },
                    "required": ["summary", "suggestions"]
                }
            }
        });

        let resp = self
            .http
            .post(&endpoint)
            .header("x-goog-api-key", api_key)
            .timeout(self.timeout)
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(InsightError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: GenerateContentResponse = resp.json().await?;
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.trim().is_empty() {
            return Err(InsightError::EmptyResponse);
        }
        debug!("insight: model returned {} byte(s)", text.len());
        parse_insight(&text)
    }
}

/// One `Name: ..., Address: ...` line per contact.
pub fn describe_contacts(contacts: &[Contact]) -> String {
    contacts
        .iter()
        .map(|c| format!("Name: {}, Address: {}", c.name, c.address))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn build_prompt(contacts: &[Contact]) -> String {
    format!(
        "Analyze the following contact list and give a short summary (a single sentence) \
         about how the contacts are distributed or the quality of the data, plus 3 suggestions \
         for keeping better records:\n\n{}",
        describe_contacts(contacts)
    )
}

/// Parse model output into an [`AiInsight`]. The object must have exactly
/// `summary` (string) and `suggestions` (array of strings).
pub fn parse_insight(raw: &str) -> Result<AiInsight, InsightError> {
    let json_str = extract_json_object(raw)
        .ok_or_else(|| InsightError::Schema("no JSON object in response".to_string()))?;
    serde_json::from_str::<AiInsight>(json_str).map_err(|e| InsightError::Schema(e.to_string()))
}

/// Slice from the first `{` to the last `}`, dropping code fences or chatter.
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::ContactId;

    fn ana() -> Contact {
        Contact {
            id: ContactId::server("1"),
            name: "Ana".to_string(),
            address: "Str. A".to_string(),
            created_at: 100,
        }
    }

    #[test]
    fn parses_plain_and_fenced_objects() {
        let plain = r#"{"summary":"All in Cluj.","suggestions":["Add postcodes"]}"#;
        let insight = parse_insight(plain).unwrap();
        assert_eq!(insight.summary, "All in Cluj.");
        assert_eq!(insight.suggestions, vec!["Add postcodes"]);

        let fenced = format!("```json\n{plain}\n```");
        assert_eq!(parse_insight(&fenced).unwrap(), insight);
    }

    #[test]
    fn shape_violations_are_schema_errors() {
        for raw in [
            "not json at all",
            r#"{"summary":"s"}"#,
            r#"{"summary":"s","suggestions":"one"}"#,
            r#"{"summary":"s","suggestions":[1,2]}"#,
            r#"{"summary":"s","suggestions":[],"extra":true}"#,
            "} backwards {",
        ] {
            assert!(
                matches!(parse_insight(raw), Err(InsightError::Schema(_))),
                "accepted {raw:?}"
            );
        }
    }

    #[test]
    fn prompt_enumerates_every_contact() {
        let mut bogdan = ana();
        bogdan.name = "Bogdan".into();
        bogdan.address = "Str. B".into();
        assert_eq!(
            describe_contacts(&[ana(), bogdan.clone()]),
            "Name: Ana, Address: Str. A\nName: Bogdan, Address: Str. B"
        );
        assert!(build_prompt(&[ana()]).ends_with("\n\nName: Ana, Address: Str. A"));
    }

    #[tokio::test]
    async fn missing_key_short_circuits() {
        let client =
            InsightClient::new("http://127.0.0.1:1", DEFAULT_AI_MODEL, Some("  ".into()));
        assert_eq!(client.analyze(&[ana()]).await, AiInsight::missing_key());
        assert_eq!(client.analyze(&[]).await, AiInsight::nothing_to_analyze());
    }
}
