//! SQLite-backed person store.
//!
//! Persons own their phone numbers, email addresses and addresses; deleting
//! a person or a group cascades through foreign keys. The store knows
//! nothing about the name index: [`crate::ContactBook`] pairs every person
//! write here with the matching index update.

pub mod details;
pub mod groups;
pub mod models;
pub mod persons;
pub mod schema;

pub use models::*;

use crate::error::{ContactBookError, ObjectKind, Result};
use crate::index::sync::ProjectionSource;
use crate::index::types::{PersonId, PersonProjection};
use rusqlite::{Connection, OptionalExtension, Row};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_millis(5_000);

pub struct ContactStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl fmt::Debug for ContactStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContactStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl ContactStore {
    /// Open (creating if needed) a database file and migrate its schema
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        tracing::debug!(
            target: "contactbook.store",
            path = %path.display(),
            "opening contact database"
        );

        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| {
            row.get::<_, String>(0)
        })?;
        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Private database that disappears with the store; used by tests
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(mut conn: Connection, path: Option<PathBuf>) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        schema::apply_migrations(&mut conn)?;
        Ok(Self { conn, path })
    }

    /// Database file, or `None` for an in-memory store
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn schema_version(&self) -> Result<i64> {
        schema::current_version(&self.conn)
    }

    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

const PROJECTION_COLUMNS: &str = "id, title, first_name, middle_name, last_name, suffix";

fn projection_from_row(row: &Row<'_>) -> rusqlite::Result<PersonProjection> {
    Ok(PersonProjection {
        id: row.get(0)?,
        title: row.get(1)?,
        first_name: row.get(2)?,
        middle_name: row.get(3)?,
        last_name: row.get(4)?,
        suffix: row.get(5)?,
    })
}

impl ProjectionSource for ContactStore {
    fn enumerate_all_projections(&self) -> Result<Vec<PersonProjection>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {PROJECTION_COLUMNS} FROM persons ORDER BY id"))?;
        let projections = stmt
            .query_map([], projection_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(projections)
    }

    fn load_projection_by_id(&self, id: PersonId) -> Result<PersonProjection> {
        self.conn
            .query_row(
                &format!("SELECT {PROJECTION_COLUMNS} FROM persons WHERE id = ?1"),
                [id],
                projection_from_row,
            )
            .optional()?
            .ok_or_else(|| ContactBookError::not_found(ObjectKind::Person, id))
    }
}

/// Narrow a freshly assigned rowid to a person id
fn person_id_from_rowid(rowid: i64) -> Result<PersonId> {
    PersonId::try_from(rowid).map_err(|_| ContactBookError::IdOutOfRange(rowid))
}

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE ... ESCAPE '\'`
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("abc"), "abc");
        assert_eq!(escape_like("a_b%c\\"), "a\\_b\\%c\\\\");
    }

    #[test]
    fn test_rowid_range() {
        assert_eq!(person_id_from_rowid(42).unwrap(), 42);
        assert!(matches!(
            person_id_from_rowid(i64::from(u32::MAX) + 1),
            Err(ContactBookError::IdOutOfRange(_))
        ));
    }

    #[test]
    fn test_open_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("contacts.db");
        let store = ContactStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert!(path.exists());
        assert!(store.enumerate_all_projections().unwrap().is_empty());
        assert_eq!(store.schema_version().unwrap(), schema::SCHEMA_VERSION);
    }

    #[test]
    fn test_load_missing_projection() {
        let store = ContactStore::open_in_memory().unwrap();
        let err = store.load_projection_by_id(5).unwrap_err();
        assert!(err.is_not_found());
    }
}
