use crate::error::Result;
use rusqlite::{Connection, params};
use std::time::{SystemTime, UNIX_EPOCH};

pub const SCHEMA_VERSION: i64 = 2;

struct Migration {
    version: i64,
    statements: &'static [&'static str],
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        statements: &[
            "CREATE TABLE IF NOT EXISTS persons (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                title TEXT,\
                first_name TEXT,\
                middle_name TEXT,\
                last_name TEXT,\
                suffix TEXT\
            );",
            "CREATE TABLE IF NOT EXISTS contact_groups (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                name TEXT NOT NULL\
            );",
            "CREATE TABLE IF NOT EXISTS person_groups (\
                person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,\
                group_id INTEGER NOT NULL REFERENCES contact_groups(id) ON DELETE CASCADE,\
                PRIMARY KEY(person_id, group_id)\
            );",
            "CREATE TABLE IF NOT EXISTS phone_numbers (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,\
                label TEXT,\
                phone TEXT NOT NULL\
            );",
            "CREATE TABLE IF NOT EXISTS email_addresses (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,\
                label TEXT,\
                email TEXT NOT NULL\
            );",
            "CREATE TABLE IF NOT EXISTS addresses (\
                id INTEGER PRIMARY KEY AUTOINCREMENT,\
                person_id INTEGER NOT NULL REFERENCES persons(id) ON DELETE CASCADE,\
                label TEXT,\
                house_number TEXT,\
                street_name TEXT,\
                address_line_1 TEXT,\
                address_line_2 TEXT,\
                city TEXT,\
                postal_code TEXT,\
                country TEXT\
            );",
        ],
    },
    Migration {
        version: 2,
        statements: &[
            "CREATE INDEX IF NOT EXISTS idx_person_groups_group ON person_groups(group_id);",
            "CREATE INDEX IF NOT EXISTS idx_phone_numbers_person ON phone_numbers(person_id);",
            "CREATE INDEX IF NOT EXISTS idx_email_addresses_person ON email_addresses(person_id);",
            "CREATE INDEX IF NOT EXISTS idx_addresses_person ON addresses(person_id);",
        ],
    },
];

/// Bring the database schema up to [`SCHEMA_VERSION`].
///
/// Each migration runs in its own transaction together with its
/// `schema_version` row, so a failed migration is retried on next open.
pub fn apply_migrations(conn: &mut Connection) -> Result<i64> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (\
            version INTEGER PRIMARY KEY,\
            applied_at INTEGER NOT NULL\
        );",
    )?;

    let current = current_version(conn)?;
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.transaction()?;
        for statement in migration.statements {
            tx.execute_batch(statement)?;
        }
        tx.execute(
            "INSERT INTO schema_version (version, applied_at) VALUES (?1, ?2)",
            params![migration.version, unix_timestamp()],
        )?;
        tx.commit()?;

        tracing::debug!(
            target: "contactbook.store",
            op = "migrate",
            version = migration.version,
            "schema migration applied"
        );
    }

    current_version(conn)
}

pub fn current_version(conn: &Connection) -> Result<i64> {
    let version = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )?;
    Ok(version)
}

fn unix_timestamp() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_reach_latest_version() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(apply_migrations(&mut conn).unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(apply_migrations(&mut conn).unwrap(), SCHEMA_VERSION);

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, SCHEMA_VERSION);
    }
}
