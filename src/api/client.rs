use std::time::Duration;

use log::debug;
use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use crate::api::models::{Contact, ContactId, DeleteAck, HealthReport, NewContact};
use crate::error::ApiError;
use crate::utils::normalize_url;

/// Deadline for a single create, delete or health call.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Thin client for the contacts collection service.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: String,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: normalize_url(base_url),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Every request gives up after `limit`, reported as [`ApiError::Timeout`].
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.request_timeout = limit;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    fn contact_url(&self, id: &ContactId) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.endpoint("contacts"))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Invalid(format!("{} cannot hold a path", self.base_url)))?
            .push(&id.to_string());
        Ok(url)
    }

    /// Turn a non-success response into the matching [`ApiError`], using the
    /// service's `{"error": ...}` body when present.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = match resp.json::<Value>().await {
            Ok(json) => json
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status)),
            Err(_) => format!("HTTP {}", status),
        };
        Err(ApiError::from_status(status.as_u16(), message))
    }

    /// Fetch the whole collection, newest first.
    pub async fn contacts(&self) -> Result<Vec<Contact>, ApiError> {
        let resp = self
            .http
            .get(self.endpoint("contacts"))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Like [`Self::contacts`], but gives up once `limit` has elapsed.
    pub async fn contacts_within(&self, limit: Duration) -> Result<Vec<Contact>, ApiError> {
        match tokio::time::timeout(limit, self.contacts()).await {
            Ok(res) => res,
            Err(_) => Err(ApiError::Timeout),
        }
    }

    pub async fn create_contact(&self, draft: &NewContact) -> Result<Contact, ApiError> {
        let resp = self
            .http
            .post(self.endpoint("contacts"))
            .timeout(self.request_timeout)
            .json(draft)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body = resp.bytes().await?;
        let contact: Contact = serde_json::from_slice(&body)?;
        debug!("api: created contact {}", contact.id);
        Ok(contact)
    }

    pub async fn delete_contact(&self, id: &ContactId) -> Result<DeleteAck, ApiError> {
        let resp = self
            .http
            .delete(self.contact_url(id)?)
            .timeout(self.request_timeout)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn health(&self) -> Result<HealthReport, ApiError> {
        let resp = self
            .http
            .get(self.endpoint("health"))
            .timeout(self.request_timeout)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_url_escapes_the_identifier() {
        let client = ApiClient::new("http://localhost:5000/api");
        let url = client.contact_url(&ContactId::server("a b/c")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/contacts/a%20b%2Fc");

        let local = ContactId::parse("local-123");
        let url = client.contact_url(&local).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/contacts/local-123");
    }
}
