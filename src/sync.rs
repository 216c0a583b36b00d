//! Persistence mode selection and mutation dispatch.
//!
//! [`SyncClient`] only talks to the network; it never touches session state.
//! Every call resolves to a value the [`crate::session::Session`] can apply,
//! so the UI always makes progress even when the service is gone.

use std::time::Duration;

use log::{info, warn};

use crate::api::client::ApiClient;
use crate::api::models::{Contact, ContactId, NewContact, PersistenceMode};
use crate::error::ApiError;
use crate::settings::Settings;

pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of the one-off startup probe.
#[derive(Debug)]
pub enum BootstrapProbe {
    /// The service answered with its collection; it becomes authoritative.
    Remote(Vec<Contact>),
    /// Unreachable, timed out, or answered garbage; work from the snapshot.
    Unreachable(ApiError),
}

impl BootstrapProbe {
    pub fn mode(&self) -> PersistenceMode {
        match self {
            Self::Remote(_) => PersistenceMode::Remote,
            Self::Unreachable(_) => PersistenceMode::Local,
        }
    }
}

/// How a delete was settled. The contact leaves the local view in every case.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// The service removed it.
    Confirmed,
    /// The service did not know the id; same as success from here.
    NotOnServer,
    /// Local mode, or an id the service never issued. No request was made.
    LocalOnly,
    /// The service could not be told. Client and server now disagree.
    Diverged(ApiError),
}

#[derive(Debug, Clone)]
pub struct SyncClient {
    api: ApiClient,
    bootstrap_timeout: Duration,
}

impl SyncClient {
    pub fn new(api: ApiClient, bootstrap_timeout: Duration) -> Self {
        Self {
            api,
            bootstrap_timeout,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            ApiClient::new(&settings.api_base_url).with_timeout(settings.request_timeout()),
            settings.bootstrap_timeout(),
        )
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch the collection once, bounded by the bootstrap timeout. No retry.
    pub async fn probe(&self) -> BootstrapProbe {
        match self.api.contacts_within(self.bootstrap_timeout).await {
            Ok(contacts) => {
                info!(
                    "bootstrap: {} reachable, {} contact(s)",
                    self.api.base_url(),
                    contacts.len()
                );
                BootstrapProbe::Remote(contacts)
            }
            Err(e) => {
                warn!("bootstrap: {} unreachable: {}", self.api.base_url(), e);
                BootstrapProbe::Unreachable(e)
            }
        }
    }

    /// Persist a new contact. Never fails: a remote error degrades to an
    /// optimistic local record.
    pub async fn add(&self, mode: PersistenceMode, draft: NewContact) -> Contact {
        if mode == PersistenceMode::Remote {
            match self.api.create_contact(&draft).await {
                Ok(contact) => return contact,
                Err(e) => warn!("add: remote create failed, keeping it locally: {}", e),
            }
        }
        Contact::local(draft)
    }

    /// Tell the service about a confirmed delete, if there is anyone to tell.
    pub async fn delete(&self, mode: PersistenceMode, id: &ContactId) -> DeleteOutcome {
        if mode == PersistenceMode::Local || id.is_local() {
            return DeleteOutcome::LocalOnly;
        }
        match self.api.delete_contact(id).await {
            Ok(_) => DeleteOutcome::Confirmed,
            Err(ApiError::NotFound(_)) => DeleteOutcome::NotOnServer,
            Err(e) => {
                warn!("delete: {} removed locally but the service failed: {}", id, e);
                DeleteOutcome::Diverged(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A client aimed at a port that was just released, so connects are refused.
    fn offline_client() -> SyncClient {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        SyncClient::new(
            ApiClient::new(&format!("http://{addr}")),
            Duration::from_millis(500),
        )
    }

    #[tokio::test]
    async fn probe_against_closed_port_selects_local() {
        let probe = offline_client().probe().await;
        assert_eq!(probe.mode(), PersistenceMode::Local);
    }

    #[tokio::test]
    async fn remote_add_failure_falls_back_to_local_record() {
        let draft = NewContact::new("Ana", "Str. A").unwrap();
        let contact = offline_client().add(PersistenceMode::Remote, draft).await;
        assert!(contact.id.is_local());
        assert_eq!(contact.name, "Ana");
        assert_eq!(contact.address, "Str. A");
    }

    #[tokio::test]
    async fn local_ids_are_never_sent() {
        let client = offline_client();
        let id = ContactId::generate_local();
        assert!(matches!(
            client.delete(PersistenceMode::Remote, &id).await,
            DeleteOutcome::LocalOnly
        ));
        assert!(matches!(
            client.delete(PersistenceMode::Local, &ContactId::server("1")).await,
            DeleteOutcome::LocalOnly
        ));
    }

    #[tokio::test]
    async fn remote_delete_failure_is_reported_as_divergence() {
        let outcome = offline_client()
            .delete(PersistenceMode::Remote, &ContactId::server("1"))
            .await;
        assert!(matches!(outcome, DeleteOutcome::Diverged(_)));
    }
}
