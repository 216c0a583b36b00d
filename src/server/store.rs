//! SQLite-backed contacts collection.

use std::path::Path;

use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::api::models::{Contact, ContactId, NewContact};
use crate::error::StoreError;
use crate::utils::now_millis;

pub struct ContactStore {
    conn: Connection,
}

impl ContactStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            r#"
            PRAGMA journal_mode = WAL;
            CREATE TABLE IF NOT EXISTS contacts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS contacts_created_at ON contacts (created_at DESC);
            "#,
        )?;
        Ok(Self { conn })
    }

    /// Every contact, newest first.
    pub fn list(&self) -> Result<Vec<Contact>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, address, created_at FROM contacts
             ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Contact {
                id: ContactId::server(row.get::<_, String>(0)?),
                name: row.get(1)?,
                address: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Store a validated contact under a fresh server id.
    pub fn insert(&self, draft: &NewContact) -> Result<Contact, StoreError> {
        let contact = Contact {
            id: ContactId::server(Uuid::new_v4().simple().to_string()),
            name: draft.name().to_string(),
            address: draft.address().to_string(),
            created_at: draft.created_at().unwrap_or_else(now_millis),
        };
        self.conn.execute(
            "INSERT INTO contacts (id, name, address, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                contact.id.to_string(),
                contact.name,
                contact.address,
                contact.created_at
            ],
        )?;
        Ok(contact)
    }

    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
