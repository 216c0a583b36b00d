use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::utils::now_millis;

const LOCAL_ID_PREFIX: &str = "local-";

/// Identifier of a contact, tagged with whoever issued it.
///
/// Serialized as a plain string. Locally generated tokens carry a `local-`
/// prefix so the tag survives a trip through the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContactId {
    ServerAssigned(String),
    LocallyGenerated(String),
}

impl ContactId {
    pub fn server(id: impl Into<String>) -> Self {
        Self::ServerAssigned(id.into())
    }

    pub fn generate_local() -> Self {
        Self::LocallyGenerated(Uuid::new_v4().to_string())
    }

    pub fn parse(raw: &str) -> Self {
        match raw.strip_prefix(LOCAL_ID_PREFIX) {
            Some(token) => Self::LocallyGenerated(token.to_string()),
            None => Self::ServerAssigned(raw.to_string()),
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::LocallyGenerated(_))
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServerAssigned(id) => f.write_str(id),
            Self::LocallyGenerated(token) => write!(f, "{LOCAL_ID_PREFIX}{token}"),
        }
    }
}

impl Serialize for ContactId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub address: String,
    /// Milliseconds since epoch; lists are ordered by this, newest first.
    pub created_at: i64,
}

impl Contact {
    /// Build an optimistic record for a contact no backend has confirmed.
    pub fn local(draft: NewContact) -> Self {
        Self {
            id: ContactId::generate_local(),
            created_at: draft.created_at.unwrap_or_else(now_millis),
            name: draft.name,
            address: draft.address,
        }
    }
}

/// Payload for creating a contact. Only constructible with trimmed,
/// non-empty fields.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    name: String,
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<i64>,
}

impl NewContact {
    pub fn new(name: &str, address: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        let address = address.trim();
        if name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        if address.is_empty() {
            return Err(ValidationError::MissingAddress);
        }
        Ok(Self {
            name: name.to_string(),
            address: address.to_string(),
            created_at: None,
        })
    }

    pub fn with_created_at(mut self, created_at: i64) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn created_at(&self) -> Option<i64> {
        self.created_at
    }
}

/// Short AI-generated summary of the contact list. Never persisted.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct AiInsight {
    pub summary: String,
    pub suggestions: Vec<String>,
}

impl AiInsight {
    pub fn nothing_to_analyze() -> Self {
        Self {
            summary: "There are no contacts to analyze.".to_string(),
            suggestions: Vec::new(),
        }
    }

    pub fn missing_key() -> Self {
        Self {
            summary: "AI analysis needs a valid API key configured.".to_string(),
            suggestions: vec![
                "Set API_KEY in the environment".to_string(),
                "Add ai_api_key to smartcontact.toml".to_string(),
            ],
        }
    }

    pub fn degraded() -> Self {
        Self {
            summary: "The AI analysis ran into a temporary error.".to_string(),
            suggestions: vec!["Try again later".to_string()],
        }
    }
}

/// Which backend is authoritative for the current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceMode {
    Remote,
    Local,
}

impl fmt::Display for PersistenceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote => f.write_str("remote"),
            Self::Local => f.write_str("local"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: String,
    pub database: String,
    pub mode: String,
    pub server_time: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DeleteAck {
    pub message: String,
}
