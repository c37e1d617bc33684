use super::details::{addresses_for, email_addresses_for, phone_numbers_for};
use super::groups::{group_exists, groups_for};
use super::models::{NewPerson, Person, RecordId};
use super::{ContactStore, escape_like, person_id_from_rowid, projection_from_row};
use crate::error::{ContactBookError, ObjectKind, Result};
use crate::index::types::{PersonId, PersonProjection};
use rusqlite::{Connection, OptionalExtension, params};

impl ContactStore {
    /// Insert a person with its optional first phone number, email address
    /// and group, all in one transaction. A missing group aborts the whole
    /// insert.
    pub fn insert_person(&mut self, new: &NewPerson) -> Result<Person> {
        let tx = self.connection_mut().transaction()?;

        if let Some(group_id) = new.group_id {
            if !group_exists(&tx, group_id)? {
                return Err(ContactBookError::not_found(ObjectKind::Group, group_id));
            }
        }

        tx.execute(
            "INSERT INTO persons (title, first_name, middle_name, last_name, suffix) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                new.title,
                new.first_name,
                new.middle_name,
                new.last_name,
                new.suffix
            ],
        )?;
        let id = person_id_from_rowid(tx.last_insert_rowid())?;

        if let Some(phone) = new.phone_number.as_deref().filter(|p| !p.is_empty()) {
            tx.execute(
                "INSERT INTO phone_numbers (person_id, label, phone) VALUES (?1, ?2, ?3)",
                params![id, new.phone_label, phone],
            )?;
        }
        if let Some(email) = new.email_address.as_deref().filter(|e| !e.is_empty()) {
            tx.execute(
                "INSERT INTO email_addresses (person_id, label, email) VALUES (?1, ?2, ?3)",
                params![id, new.email_label, email],
            )?;
        }
        if let Some(group_id) = new.group_id {
            tx.execute(
                "INSERT INTO person_groups (person_id, group_id) VALUES (?1, ?2)",
                params![id, group_id],
            )?;
        }

        tx.commit()?;

        tracing::debug!(
            target: "contactbook.store",
            op = "insert_person",
            person_id = id,
            "person stored"
        );

        self.get_person(id)
    }

    pub fn get_person(&self, id: PersonId) -> Result<Person> {
        load_person(self.connection(), id)
    }

    /// All persons in id order, optionally only members of one group
    pub fn list_persons(&self, group_id: Option<RecordId>) -> Result<Vec<Person>> {
        let conn = self.connection();
        let ids: Vec<PersonId> = match group_id {
            Some(group_id) => {
                let mut stmt = conn.prepare(
                    "SELECT p.id FROM persons p \
                     JOIN person_groups pg ON pg.person_id = p.id \
                     WHERE pg.group_id = ?1 ORDER BY p.id",
                )?;
                stmt.query_map([group_id], |row| row.get(0))?
                    .collect::<rusqlite::Result<_>>()?
            }
            None => {
                let mut stmt = conn.prepare("SELECT id FROM persons ORDER BY id")?;
                stmt.query_map([], |row| row.get(0))?
                    .collect::<rusqlite::Result<_>>()?
            }
        };

        ids.into_iter().map(|id| load_person(conn, id)).collect()
    }

    /// Persons having an email address that starts with `prefix`.
    /// Case-insensitive for ASCII, like SQLite's `LIKE`.
    pub fn persons_by_email(&self, prefix: &str) -> Result<Vec<Person>> {
        let conn = self.connection();
        let pattern = format!("{}%", escape_like(prefix));
        let mut stmt = conn.prepare(
            "SELECT DISTINCT person_id FROM email_addresses \
             WHERE email LIKE ?1 ESCAPE '\\' ORDER BY person_id",
        )?;
        let ids: Vec<PersonId> = stmt
            .query_map([pattern], |row| row.get(0))?
            .collect::<rusqlite::Result<_>>()?;

        ids.into_iter().map(|id| load_person(conn, id)).collect()
    }

    /// Overwrite the name attributes of an existing person
    pub fn update_person_names(&mut self, projection: &PersonProjection) -> Result<()> {
        let updated = self.connection().execute(
            "UPDATE persons SET title = ?1, first_name = ?2, middle_name = ?3, \
             last_name = ?4, suffix = ?5 WHERE id = ?6",
            params![
                projection.title,
                projection.first_name,
                projection.middle_name,
                projection.last_name,
                projection.suffix,
                projection.id
            ],
        )?;
        if updated == 0 {
            return Err(ContactBookError::not_found(ObjectKind::Person, projection.id));
        }

        tracing::debug!(
            target: "contactbook.store",
            op = "update_person",
            person_id = projection.id,
            "person names updated"
        );
        Ok(())
    }

    /// Delete a person; details and group memberships go with it
    pub fn delete_person(&mut self, id: PersonId) -> Result<()> {
        let deleted = self
            .connection()
            .execute("DELETE FROM persons WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(ContactBookError::not_found(ObjectKind::Person, id));
        }

        tracing::debug!(
            target: "contactbook.store",
            op = "delete_person",
            person_id = id,
            "person deleted"
        );
        Ok(())
    }

    pub fn count_persons(&self) -> Result<usize> {
        let count: i64 = self
            .connection()
            .query_row("SELECT COUNT(*) FROM persons", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

pub(crate) fn person_exists(conn: &Connection, id: PersonId) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM persons WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

fn load_person(conn: &Connection, id: PersonId) -> Result<Person> {
    let projection = conn
        .query_row(
            "SELECT id, title, first_name, middle_name, last_name, suffix \
             FROM persons WHERE id = ?1",
            [id],
            projection_from_row,
        )
        .optional()?
        .ok_or_else(|| ContactBookError::not_found(ObjectKind::Person, id))?;

    Ok(Person {
        id: projection.id,
        title: projection.title,
        first_name: projection.first_name,
        middle_name: projection.middle_name,
        last_name: projection.last_name,
        suffix: projection.suffix,
        phone_numbers: phone_numbers_for(conn, id)?,
        email_addresses: email_addresses_for(conn, id)?,
        addresses: addresses_for(conn, id)?,
        groups: groups_for(conn, id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sync::ProjectionSource;

    fn store() -> ContactStore {
        ContactStore::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_and_get_person() {
        let mut store = store();
        let new = NewPerson {
            phone_number: Some("+31600012345".into()),
            phone_label: Some("Mobile".into()),
            email_address: Some("abc@example.com".into()),
            email_label: Some("Personal".into()),
            ..NewPerson::named("Tuv", "Xyz")
        };
        let person = store.insert_person(&new).unwrap();

        assert_eq!(person.first_name.as_deref(), Some("Tuv"));
        assert_eq!(person.middle_name, None);
        assert_eq!(person.phone_numbers.len(), 1);
        assert_eq!(person.phone_numbers[0].label.as_deref(), Some("Mobile"));
        assert_eq!(person.email_addresses[0].email, "abc@example.com");
        assert!(person.addresses.is_empty());
        assert!(person.groups.is_empty());
        assert_eq!(store.get_person(person.id).unwrap(), person);
    }

    #[test]
    fn test_insert_with_missing_group_writes_nothing() {
        let mut store = store();
        let new = NewPerson {
            group_id: Some(42),
            ..NewPerson::named("Tuv", "Xyz")
        };
        let err = store.insert_person(&new).unwrap_err();
        assert!(matches!(
            err,
            ContactBookError::NotFound { kind: ObjectKind::Group, id: 42 }
        ));
        assert_eq!(store.count_persons().unwrap(), 0);
    }

    #[test]
    fn test_update_and_delete() {
        let mut store = store();
        let person = store.insert_person(&NewPerson::named("Abc", "Def")).unwrap();

        let mut projection = person.projection();
        projection.first_name = Some("Xyz".into());
        store.update_person_names(&projection).unwrap();
        assert_eq!(store.load_projection_by_id(person.id).unwrap(), projection);

        store.delete_person(person.id).unwrap();
        assert!(store.get_person(person.id).unwrap_err().is_not_found());
        assert!(store.delete_person(person.id).unwrap_err().is_not_found());
        assert!(store.update_person_names(&projection).unwrap_err().is_not_found());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let mut store = store();
        let first = store.insert_person(&NewPerson::named("A", "B")).unwrap();
        store.delete_person(first.id).unwrap();
        let second = store.insert_person(&NewPerson::named("A", "B")).unwrap();
        assert!(second.id > first.id);
    }

    #[test]
    fn test_persons_by_email_prefix() {
        let mut store = store();
        let mk = |email: &str| NewPerson {
            email_address: Some(email.to_string()),
            ..NewPerson::named("P1", "X")
        };
        let p1 = store.insert_person(&mk("abc@example.com")).unwrap();
        let _p2 = store.insert_person(&mk("xyz@example.com")).unwrap();
        let p3 = store.insert_person(&mk("abc@badexample.com")).unwrap();
        let p4 = store.insert_person(&mk("a_c@example.com")).unwrap();

        let ids = |people: Vec<Person>| people.into_iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids(store.persons_by_email("abc@example.com").unwrap()), vec![p1.id]);
        assert_eq!(ids(store.persons_by_email("abc").unwrap()), vec![p1.id, p3.id]);
        assert_eq!(ids(store.persons_by_email("a_").unwrap()), vec![p4.id]);
        assert!(store.persons_by_email("nobody").unwrap().is_empty());
    }
}
