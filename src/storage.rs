use crate::api::models::Contact;
use crate::error::StoreError;
use crate::utils::now_millis;
use directories::ProjectDirs;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::fs;
use std::path::{Path, PathBuf};

/// Key of the single snapshot entry holding the full contact list.
pub const CONTACTS_KEY: &str = "contacts";

pub fn default_snapshot_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("com", "example", "SmartContact")?;
    Some(proj.data_dir().join("snapshot.sqlite"))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// On-device key-value store keeping the last known contact list for
/// offline sessions. Every write replaces the whole entry.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn open_default() -> Option<Self> {
        default_snapshot_path().map(Self::new)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open_conn(&self) -> Result<Connection, StoreError> {
        ensure_dir(&self.path)?;
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(conn)
    }

    pub fn save(&self, contacts: &[Contact]) -> Result<(), StoreError> {
        let json = serde_json::to_string(contacts)?;
        let conn = self.open_conn()?;
        conn.execute(
            r#"
            INSERT INTO snapshots (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value=excluded.value,
                updated_at=excluded.updated_at
            "#,
            params![CONTACTS_KEY, json, now_millis()],
        )?;
        Ok(())
    }

    /// Read the snapshot. `Ok(None)` when nothing was ever saved.
    pub fn load(&self) -> Result<Option<Vec<Contact>>, StoreError> {
        let conn = self.open_conn()?;
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                params![CONTACTS_KEY],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Read the snapshot, treating a missing or corrupt entry as empty.
    pub fn load_or_empty(&self) -> Vec<Contact> {
        match self.load() {
            Ok(Some(contacts)) => contacts,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!("snapshot: unreadable at {}: {}", self.path.display(), e);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::{ContactId, NewContact};

    fn sample() -> Vec<Contact> {
        vec![
            Contact::local(NewContact::new("Bogdan", "Str. B").unwrap().with_created_at(200)),
            Contact {
                id: ContactId::server("1"),
                name: "Ana".to_string(),
                address: "Str. A".to_string(),
                created_at: 100,
            },
        ]
    }

    #[test]
    fn save_then_load_reproduces_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snap.sqlite"));
        let contacts = sample();
        store.save(&contacts).unwrap();
        assert_eq!(store.load().unwrap(), Some(contacts));
    }

    #[test]
    fn save_overwrites_wholesale() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snap.sqlite"));
        store.save(&sample()).unwrap();
        store.save(&sample()[1..]).unwrap();
        assert_eq!(store.load_or_empty(), sample()[1..].to_vec());
    }

    #[test]
    fn missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("deep").join("snap.sqlite"));
        assert_eq!(store.load().unwrap(), None);
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn corrupt_snapshot_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("snap.sqlite"));
        let conn = store.open_conn().unwrap();
        conn.execute(
            "INSERT INTO snapshots (key, value, updated_at) VALUES (?1, ?2, 0)",
            params![CONTACTS_KEY, "{not json"],
        )
        .unwrap();
        assert!(matches!(store.load(), Err(StoreError::Json(_))));
        assert!(store.load_or_empty().is_empty());
    }

    #[test]
    fn unopenable_path_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the database file should be.
        let store = SnapshotStore::new(dir.path());
        assert!(store.load().is_err());
        assert!(store.load_or_empty().is_empty());
    }
}
