use super::ContactStore;
use super::models::{Group, RecordId};
use super::persons::person_exists;
use crate::error::{ContactBookError, ObjectKind, Result};
use crate::index::types::PersonId;
use rusqlite::{Connection, OptionalExtension, params};

impl ContactStore {
    pub fn insert_group(&mut self, name: &str) -> Result<Group> {
        let conn = self.connection();
        conn.execute("INSERT INTO contact_groups (name) VALUES (?1)", [name])?;
        let group = Group {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        };

        tracing::debug!(
            target: "contactbook.store",
            op = "insert_group",
            group_id = group.id,
            "group stored"
        );
        Ok(group)
    }

    pub fn get_group(&self, id: RecordId) -> Result<Group> {
        self.connection()
            .query_row(
                "SELECT id, name FROM contact_groups WHERE id = ?1",
                [id],
                |row| {
                    Ok(Group {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?
            .ok_or_else(|| ContactBookError::not_found(ObjectKind::Group, id))
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let mut stmt = self
            .connection()
            .prepare("SELECT id, name FROM contact_groups ORDER BY id")?;
        let groups = stmt
            .query_map([], |row| {
                Ok(Group {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
    }

    pub fn rename_group(&mut self, id: RecordId, name: &str) -> Result<Group> {
        let updated = self.connection().execute(
            "UPDATE contact_groups SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if updated == 0 {
            return Err(ContactBookError::not_found(ObjectKind::Group, id));
        }
        self.get_group(id)
    }

    /// Delete a group; its members stay, only the memberships go
    pub fn delete_group(&mut self, id: RecordId) -> Result<()> {
        let deleted = self
            .connection()
            .execute("DELETE FROM contact_groups WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(ContactBookError::not_found(ObjectKind::Group, id));
        }

        tracing::debug!(
            target: "contactbook.store",
            op = "delete_group",
            group_id = id,
            "group deleted"
        );
        Ok(())
    }

    /// Make a person a member of a group. Adding an existing membership is
    /// a no-op.
    pub fn add_person_to_group(&mut self, person_id: PersonId, group_id: RecordId) -> Result<()> {
        let conn = self.connection();
        if !person_exists(conn, person_id)? {
            return Err(ContactBookError::not_found(ObjectKind::Person, person_id));
        }
        if !group_exists(conn, group_id)? {
            return Err(ContactBookError::not_found(ObjectKind::Group, group_id));
        }

        conn.execute(
            "INSERT OR IGNORE INTO person_groups (person_id, group_id) VALUES (?1, ?2)",
            params![person_id, group_id],
        )?;
        Ok(())
    }

    /// Drop a membership; returns whether the person was a member
    pub fn remove_person_from_group(
        &mut self,
        person_id: PersonId,
        group_id: RecordId,
    ) -> Result<bool> {
        let conn = self.connection();
        if !person_exists(conn, person_id)? {
            return Err(ContactBookError::not_found(ObjectKind::Person, person_id));
        }
        if !group_exists(conn, group_id)? {
            return Err(ContactBookError::not_found(ObjectKind::Group, group_id));
        }

        let removed = conn.execute(
            "DELETE FROM person_groups WHERE person_id = ?1 AND group_id = ?2",
            params![person_id, group_id],
        )?;
        Ok(removed > 0)
    }
}

pub(crate) fn group_exists(conn: &Connection, id: RecordId) -> Result<bool> {
    let found = conn
        .query_row("SELECT 1 FROM contact_groups WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Groups of one person, in the order they were joined
pub(crate) fn groups_for(conn: &Connection, person_id: PersonId) -> Result<Vec<Group>> {
    let mut stmt = conn.prepare(
        "SELECT g.id, g.name FROM person_groups pg \
         JOIN contact_groups g ON g.id = pg.group_id \
         WHERE pg.person_id = ?1 ORDER BY pg.rowid",
    )?;
    let groups = stmt
        .query_map([person_id], |row| {
            Ok(Group {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NewPerson;

    #[test]
    fn test_memberships_keep_join_order() {
        let mut store = ContactStore::open_in_memory().unwrap();
        let g1 = store.insert_group("G1").unwrap();
        let g2 = store.insert_group("G2").unwrap();
        let person = store
            .insert_person(&NewPerson {
                group_id: Some(g2.id),
                ..NewPerson::named("P6", "X")
            })
            .unwrap();
        store.add_person_to_group(person.id, g1.id).unwrap();
        store.add_person_to_group(person.id, g1.id).unwrap();

        let groups = store.get_person(person.id).unwrap().groups;
        assert_eq!(groups, vec![g2.clone(), g1.clone()]);

        assert!(store.remove_person_from_group(person.id, g2.id).unwrap());
        assert!(!store.remove_person_from_group(person.id, g2.id).unwrap());
        assert_eq!(store.get_person(person.id).unwrap().groups, vec![g1]);
    }

    #[test]
    fn test_delete_group_keeps_members() {
        let mut store = ContactStore::open_in_memory().unwrap();
        let group = store.insert_group("Friends").unwrap();
        let person = store
            .insert_person(&NewPerson {
                group_id: Some(group.id),
                ..NewPerson::named("A", "B")
            })
            .unwrap();

        store.delete_group(group.id).unwrap();
        assert!(store.get_group(group.id).unwrap_err().is_not_found());
        assert!(store.get_person(person.id).unwrap().groups.is_empty());
        assert!(store.list_persons(Some(group.id)).unwrap().is_empty());
    }

    #[test]
    fn test_rename_group() {
        let mut store = ContactStore::open_in_memory().unwrap();
        let group = store.insert_group("Old").unwrap();
        assert_eq!(store.rename_group(group.id, "New").unwrap().name, "New");
        assert!(store.rename_group(group.id + 1, "X").unwrap_err().is_not_found());
    }

    #[test]
    fn test_membership_requires_both_sides() {
        let mut store = ContactStore::open_in_memory().unwrap();
        let group = store.insert_group("G").unwrap();
        let err = store.add_person_to_group(9, group.id).unwrap_err();
        assert!(matches!(err, ContactBookError::NotFound { kind: ObjectKind::Person, .. }));
    }
}
