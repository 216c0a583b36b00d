//! The single owned state container behind the UI.
//!
//! A [`Session`] holds the contact list, the persistence mode chosen at
//! bootstrap, the add form, the deletion gate, the search query and the AI
//! insight panel. Network work happens elsewhere ([`crate::sync`],
//! [`crate::insight`]); results are applied here on the UI thread.

use log::{debug, info, warn};

use crate::api::models::{AiInsight, Contact, ContactId, NewContact, PersistenceMode};
use crate::error::SessionError;
use crate::search::filter_contacts;
use crate::storage::SnapshotStore;
use crate::sync::BootstrapProbe;

/// Contact staged for deletion, waiting for the user to confirm.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DeleteGate {
    #[default]
    Idle,
    Armed(Contact),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub name: String,
    pub address: String,
    pub visible: bool,
}

impl AddForm {
    pub fn draft(&self) -> Result<NewContact, SessionError> {
        Ok(NewContact::new(&self.name, &self.address)?)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub struct Session {
    /// `None` until bootstrap resolves.
    mode: Option<PersistenceMode>,
    contacts: Vec<Contact>,
    snapshot: Option<SnapshotStore>,
    gate: DeleteGate,
    pub form: AddForm,
    query: String,
    /// An add or delete has been dispatched and not yet applied.
    mutating: bool,
    analyzing: bool,
    insight: Option<AiInsight>,
}

impl Session {
    pub fn new(snapshot: Option<SnapshotStore>) -> Self {
        Self {
            mode: None,
            contacts: Vec::new(),
            snapshot,
            gate: DeleteGate::Idle,
            form: AddForm::default(),
            query: String::new(),
            mutating: false,
            analyzing: false,
            insight: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.mode.is_none()
    }

    /// Whether add and delete controls should accept input. False while
    /// loading and while an add or delete is in flight.
    pub fn accepts_changes(&self) -> bool {
        !self.is_loading() && !self.mutating
    }

    pub fn mode(&self) -> Option<PersistenceMode> {
        self.mode
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }

    fn ensure_ready(&self) -> Result<PersistenceMode, SessionError> {
        self.mode.ok_or(SessionError::NotReady)
    }

    /// Apply the startup probe. Only the first call counts; the mode is
    /// fixed for the rest of the session.
    pub fn finish_bootstrap(&mut self, probe: BootstrapProbe) -> PersistenceMode {
        if let Some(mode) = self.mode {
            warn!("session: bootstrap already resolved to {mode}, ignoring probe");
            return mode;
        }
        let mode = probe.mode();
        self.contacts = match probe {
            BootstrapProbe::Remote(contacts) => contacts,
            BootstrapProbe::Unreachable(_) => self
                .snapshot
                .as_ref()
                .map(SnapshotStore::load_or_empty)
                .unwrap_or_default(),
        };
        self.mode = Some(mode);
        info!(
            "session: {} mode, {} contact(s) loaded",
            mode,
            self.contacts.len()
        );
        self.persist();
        mode
    }

    /// Validate the add form and hand back what the dispatcher needs. The
    /// session stays busy until [`Self::apply_added`].
    pub fn begin_add(&mut self) -> Result<(PersistenceMode, NewContact), SessionError> {
        let mode = self.ensure_ready()?;
        if self.mutating {
            return Err(SessionError::Busy);
        }
        let draft = self.form.draft()?;
        self.mutating = true;
        Ok((mode, draft))
    }

    /// Put a freshly persisted contact at the front, then clear and hide the form.
    pub fn apply_added(&mut self, contact: Contact) -> Result<(), SessionError> {
        self.mutating = false;
        self.ensure_ready()?;
        self.contacts.retain(|c| c.id != contact.id);
        debug!("session: added {}", contact.id);
        self.contacts.insert(0, contact);
        self.form.reset();
        self.persist();
        Ok(())
    }

    /// Drop a contact from the view. Unknown ids are a no-op.
    pub fn apply_removed(&mut self, id: &ContactId) -> bool {
        self.mutating = false;
        let before = self.contacts.len();
        self.contacts.retain(|c| &c.id != id);
        let removed = self.contacts.len() != before;
        if removed {
            debug!("session: removed {id}");
            self.persist();
        }
        removed
    }

    /// Stage a contact for deletion. Replaces whatever was staged before.
    /// Refused while another change is in flight.
    pub fn request_delete(&mut self, id: &ContactId) -> Option<&Contact> {
        self.ensure_ready().ok()?;
        if self.mutating {
            return None;
        }
        let contact = self.contacts.iter().find(|c| &c.id == id)?.clone();
        self.gate = DeleteGate::Armed(contact);
        self.staged()
    }

    pub fn staged(&self) -> Option<&Contact> {
        match &self.gate {
            DeleteGate::Armed(contact) => Some(contact),
            DeleteGate::Idle => None,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.gate = DeleteGate::Idle;
    }

    /// Disarm the gate and return the staged contact for the dispatcher.
    /// The session stays busy until [`Self::apply_removed`].
    pub fn confirm_delete(&mut self) -> Option<Contact> {
        match std::mem::take(&mut self.gate) {
            DeleteGate::Armed(contact) => {
                self.mutating = true;
                Some(contact)
            }
            DeleteGate::Idle => None,
        }
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn visible_contacts(&self) -> Vec<&Contact> {
        filter_contacts(&self.contacts, &self.query)
    }

    /// Start an AI analysis. `None` while one is already running.
    pub fn begin_analysis(&mut self) -> Option<Vec<Contact>> {
        if self.analyzing || self.is_loading() {
            return None;
        }
        self.analyzing = true;
        Some(self.contacts.clone())
    }

    pub fn finish_analysis(&mut self, insight: AiInsight) {
        self.analyzing = false;
        self.insight = Some(insight);
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    /// Whether the analysis trigger should accept clicks.
    pub fn can_analyze(&self) -> bool {
        !self.analyzing && !self.is_loading() && !self.contacts.is_empty()
    }

    pub fn insight(&self) -> Option<&AiInsight> {
        self.insight.as_ref()
    }

    pub fn dismiss_insight(&mut self) {
        self.insight = None;
    }

    /// Overwrite the snapshot with the full list. Skipped while loading so an
    /// empty list never clobbers a good snapshot.
    fn persist(&self) {
        if self.is_loading() {
            return;
        }
        if let Some(store) = &self.snapshot {
            if let Err(e) = store.save(&self.contacts) {
                warn!("snapshot: write to {} failed: {}", store.path().display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ValidationError};

    fn contact(id: &str, name: &str, created_at: i64) -> Contact {
        Contact {
            id: ContactId::server(id),
            name: name.to_string(),
            address: format!("Str. {name}"),
            created_at,
        }
    }

    fn ana_and_bogdan() -> Vec<Contact> {
        vec![contact("2", "Bogdan", 200), contact("1", "Ana", 100)]
    }

    fn remote_session(contacts: Vec<Contact>) -> Session {
        let mut session = Session::new(None);
        session.finish_bootstrap(BootstrapProbe::Remote(contacts));
        session
    }

    #[test]
    fn mutations_wait_for_bootstrap() {
        let mut session = Session::new(None);
        assert!(session.is_loading());
        session.form.name = "Ana".into();
        session.form.address = "Str. A".into();
        assert_eq!(session.begin_add(), Err(SessionError::NotReady));
        assert_eq!(
            session.apply_added(contact("1", "Ana", 1)),
            Err(SessionError::NotReady)
        );
        assert!(session.begin_analysis().is_none());
        assert!(session.contacts().is_empty());
    }

    #[test]
    fn bootstrap_is_decided_once() {
        let mut session = remote_session(vec![contact("1", "Ana", 100)]);
        assert_eq!(session.mode(), Some(PersistenceMode::Remote));
        let mode =
            session.finish_bootstrap(BootstrapProbe::Unreachable(ApiError::Timeout));
        assert_eq!(mode, PersistenceMode::Remote);
        assert_eq!(session.contacts().len(), 1);
    }

    #[test]
    fn add_prepends_and_clears_form() {
        let mut session = remote_session(vec![contact("1", "Ana", 100)]);
        session.form.visible = true;
        session.form.name = " Bogdan ".into();
        session.form.address = "Str. B".into();

        let (mode, draft) = session.begin_add().unwrap();
        assert_eq!(mode, PersistenceMode::Remote);
        assert_eq!(draft.name(), "Bogdan");

        session.apply_added(Contact::local(draft)).unwrap();
        assert_eq!(session.contacts().len(), 2);
        assert_eq!(session.contacts()[0].name, "Bogdan");
        assert_eq!(session.form, AddForm::default());
    }

    #[test]
    fn invalid_form_is_rejected_before_dispatch() {
        let mut session = remote_session(Vec::new());
        session.form.name = "Ana".into();
        assert_eq!(
            session.begin_add(),
            Err(SessionError::Validation(ValidationError::MissingAddress))
        );
    }

    #[test]
    fn confirm_removes_and_cancel_keeps() {
        let mut session = remote_session(ana_and_bogdan());
        let id = ContactId::server("1");

        assert_eq!(
            session.request_delete(&id).map(|c| c.name.clone()),
            Some("Ana".into())
        );
        session.cancel_delete();
        assert!(session.staged().is_none());
        assert_eq!(session.contacts().len(), 2);

        session.request_delete(&id);
        let staged = session.confirm_delete().unwrap();
        assert!(session.staged().is_none());
        assert!(session.apply_removed(&staged.id));
        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].name, "Bogdan");
    }

    #[test]
    fn gate_holds_one_contact() {
        let mut session = remote_session(ana_and_bogdan());
        session.request_delete(&ContactId::server("1"));
        session.request_delete(&ContactId::server("2"));
        assert_eq!(session.confirm_delete().unwrap().name, "Bogdan");
        assert!(session.confirm_delete().is_none());
    }

    #[test]
    fn unknown_ids_are_noops() {
        let mut session = remote_session(vec![contact("1", "Ana", 100)]);
        assert!(session.request_delete(&ContactId::server("9")).is_none());
        assert!(session.staged().is_none());
        assert!(!session.apply_removed(&ContactId::server("9")));
        assert_eq!(session.contacts().len(), 1);
    }

    #[test]
    fn visible_contacts_follow_query() {
        let mut session = remote_session(ana_and_bogdan());
        session.set_query("ana");
        let names: Vec<&str> = session
            .visible_contacts()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ana"]);
        session.set_query("");
        assert_eq!(session.visible_contacts().len(), 2);
    }

    #[test]
    fn analysis_cannot_overlap() {
        let mut session = remote_session(vec![contact("1", "Ana", 100)]);
        assert!(session.can_analyze());
        assert_eq!(session.begin_analysis().map(|c| c.len()), Some(1));
        assert!(!session.can_analyze());
        assert!(session.begin_analysis().is_none());

        session.finish_analysis(AiInsight::degraded());
        assert!(session.can_analyze());
        assert_eq!(session.insight(), Some(&AiInsight::degraded()));
        session.dismiss_insight();
        assert!(session.insight().is_none());
    }

    #[test]
    fn snapshot_tracks_every_change_after_bootstrap() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snap.sqlite"));
        store.save(&[contact("1", "Ana", 100)]).unwrap();

        // Loading must not clobber the stored list.
        let mut session = Session::new(Some(store.clone()));
        assert!(!session.apply_removed(&ContactId::server("1")));
        assert_eq!(store.load_or_empty().len(), 1);

        session.finish_bootstrap(BootstrapProbe::Unreachable(ApiError::Timeout));
        assert_eq!(session.mode(), Some(PersistenceMode::Local));
        assert_eq!(session.contacts(), &[contact("1", "Ana", 100)]);

        session.apply_added(contact("2", "Bogdan", 200)).unwrap();
        assert_eq!(store.load_or_empty(), session.contacts().to_vec());

        session.apply_removed(&ContactId::server("1"));
        assert_eq!(store.load_or_empty(), vec![contact("2", "Bogdan", 200)]);
    }

    #[test]
    fn pending_delete_blocks_further_changes() {
        let mut session = remote_session(ana_and_bogdan());
        let ana = ContactId::server("1");
        session.request_delete(&ana);
        let staged = session.confirm_delete().unwrap();
        assert!(!session.accepts_changes());

        // The row is still listed while the request is out; a second click is refused.
        assert!(session.request_delete(&ana).is_none());
        assert!(session.staged().is_none());
        assert!(session.confirm_delete().is_none());
        session.form.name = "Cezar".into();
        session.form.address = "Str. C".into();
        assert_eq!(session.begin_add(), Err(SessionError::Busy));

        assert!(session.apply_removed(&staged.id));
        assert!(session.accepts_changes());
        assert!(session.request_delete(&ContactId::server("2")).is_some());
    }

    #[test]
    fn pending_add_blocks_deletes_until_applied() {
        let mut session = remote_session(ana_and_bogdan());
        session.form.name = "Cezar".into();
        session.form.address = "Str. C".into();
        let (_, draft) = session.begin_add().unwrap();
        assert!(!session.accepts_changes());
        assert_eq!(session.begin_add(), Err(SessionError::Busy));
        assert!(session.request_delete(&ContactId::server("1")).is_none());

        session.apply_added(Contact::local(draft)).unwrap();
        assert!(session.accepts_changes());
        assert!(session.request_delete(&ContactId::server("1")).is_some());
    }

    #[test]
    fn rejected_form_does_not_leave_session_busy() {
        let mut session = remote_session(Vec::new());
        session.form.name = "Ana".into();
        assert!(session.begin_add().is_err());
        assert!(session.accepts_changes());
    }
}
