//! Phone numbers, email addresses and postal addresses of a person.

use super::ContactStore;
use super::models::{Address, AddressFields, EmailAddress, PhoneNumber, RecordId};
use super::persons::person_exists;
use crate::error::{ContactBookError, ObjectKind, Result};
use crate::index::types::PersonId;
use rusqlite::{Connection, OptionalExtension, Row, params};

const ADDRESS_COLUMNS: &str = "id, person_id, label, house_number, street_name, \
    address_line_1, address_line_2, city, postal_code, country";

impl ContactStore {
    pub fn insert_phone_number(
        &mut self,
        person_id: PersonId,
        phone: &str,
        label: Option<&str>,
    ) -> Result<PhoneNumber> {
        let conn = self.connection();
        ensure_person(conn, person_id)?;
        conn.execute(
            "INSERT INTO phone_numbers (person_id, label, phone) VALUES (?1, ?2, ?3)",
            params![person_id, label, phone],
        )?;
        Ok(PhoneNumber {
            id: conn.last_insert_rowid(),
            person_id,
            label: label.map(str::to_string),
            phone: phone.to_string(),
        })
    }

    pub fn update_phone_number(&mut self, phone: &PhoneNumber) -> Result<()> {
        let updated = self.connection().execute(
            "UPDATE phone_numbers SET label = ?1, phone = ?2 WHERE id = ?3",
            params![phone.label, phone.phone, phone.id],
        )?;
        expect_row(updated, ObjectKind::PhoneNumber, phone.id)
    }

    pub fn delete_phone_number(&mut self, id: RecordId) -> Result<()> {
        let deleted = self
            .connection()
            .execute("DELETE FROM phone_numbers WHERE id = ?1", [id])?;
        expect_row(deleted, ObjectKind::PhoneNumber, id)
    }

    pub fn insert_email_address(
        &mut self,
        person_id: PersonId,
        email: &str,
        label: Option<&str>,
    ) -> Result<EmailAddress> {
        let conn = self.connection();
        ensure_person(conn, person_id)?;
        conn.execute(
            "INSERT INTO email_addresses (person_id, label, email) VALUES (?1, ?2, ?3)",
            params![person_id, label, email],
        )?;
        Ok(EmailAddress {
            id: conn.last_insert_rowid(),
            person_id,
            label: label.map(str::to_string),
            email: email.to_string(),
        })
    }

    pub fn update_email_address(&mut self, email: &EmailAddress) -> Result<()> {
        let updated = self.connection().execute(
            "UPDATE email_addresses SET label = ?1, email = ?2 WHERE id = ?3",
            params![email.label, email.email, email.id],
        )?;
        expect_row(updated, ObjectKind::EmailAddress, email.id)
    }

    pub fn delete_email_address(&mut self, id: RecordId) -> Result<()> {
        let deleted = self
            .connection()
            .execute("DELETE FROM email_addresses WHERE id = ?1", [id])?;
        expect_row(deleted, ObjectKind::EmailAddress, id)
    }

    pub fn insert_address(&mut self, person_id: PersonId, fields: &AddressFields) -> Result<Address> {
        let conn = self.connection();
        ensure_person(conn, person_id)?;
        conn.execute(
            "INSERT INTO addresses (person_id, label, house_number, street_name, \
             address_line_1, address_line_2, city, postal_code, country) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                person_id,
                fields.label,
                fields.house_number,
                fields.street_name,
                fields.address_line_1,
                fields.address_line_2,
                fields.city,
                fields.postal_code,
                fields.country
            ],
        )?;
        self.get_address(self.connection().last_insert_rowid())
    }

    pub fn get_address(&self, id: RecordId) -> Result<Address> {
        self.connection()
            .query_row(
                &format!("SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = ?1"),
                [id],
                address_from_row,
            )
            .optional()?
            .ok_or_else(|| ContactBookError::not_found(ObjectKind::Address, id))
    }

    pub fn update_address(&mut self, id: RecordId, fields: &AddressFields) -> Result<Address> {
        let updated = self.connection().execute(
            "UPDATE addresses SET label = ?1, house_number = ?2, street_name = ?3, \
             address_line_1 = ?4, address_line_2 = ?5, city = ?6, postal_code = ?7, \
             country = ?8 WHERE id = ?9",
            params![
                fields.label,
                fields.house_number,
                fields.street_name,
                fields.address_line_1,
                fields.address_line_2,
                fields.city,
                fields.postal_code,
                fields.country,
                id
            ],
        )?;
        expect_row(updated, ObjectKind::Address, id)?;
        self.get_address(id)
    }

    pub fn delete_address(&mut self, id: RecordId) -> Result<()> {
        let deleted = self
            .connection()
            .execute("DELETE FROM addresses WHERE id = ?1", [id])?;
        expect_row(deleted, ObjectKind::Address, id)
    }
}

fn ensure_person(conn: &Connection, person_id: PersonId) -> Result<()> {
    if person_exists(conn, person_id)? {
        Ok(())
    } else {
        Err(ContactBookError::not_found(ObjectKind::Person, person_id))
    }
}

fn expect_row(changed: usize, kind: ObjectKind, id: RecordId) -> Result<()> {
    if changed == 0 {
        Err(ContactBookError::not_found(kind, id))
    } else {
        Ok(())
    }
}

fn address_from_row(row: &Row<'_>) -> rusqlite::Result<Address> {
    Ok(Address {
        id: row.get(0)?,
        person_id: row.get(1)?,
        label: row.get(2)?,
        house_number: row.get(3)?,
        street_name: row.get(4)?,
        address_line_1: row.get(5)?,
        address_line_2: row.get(6)?,
        city: row.get(7)?,
        postal_code: row.get(8)?,
        country: row.get(9)?,
    })
}

pub(crate) fn phone_numbers_for(conn: &Connection, person_id: PersonId) -> Result<Vec<PhoneNumber>> {
    let mut stmt = conn.prepare(
        "SELECT id, person_id, label, phone FROM phone_numbers WHERE person_id = ?1 ORDER BY id",
    )?;
    let phones = stmt
        .query_map([person_id], |row| {
            Ok(PhoneNumber {
                id: row.get(0)?,
                person_id: row.get(1)?,
                label: row.get(2)?,
                phone: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(phones)
}

pub(crate) fn email_addresses_for(
    conn: &Connection,
    person_id: PersonId,
) -> Result<Vec<EmailAddress>> {
    let mut stmt = conn.prepare(
        "SELECT id, person_id, label, email FROM email_addresses WHERE person_id = ?1 ORDER BY id",
    )?;
    let emails = stmt
        .query_map([person_id], |row| {
            Ok(EmailAddress {
                id: row.get(0)?,
                person_id: row.get(1)?,
                label: row.get(2)?,
                email: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(emails)
}

pub(crate) fn addresses_for(conn: &Connection, person_id: PersonId) -> Result<Vec<Address>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE person_id = ?1 ORDER BY id"
    ))?;
    let addresses = stmt
        .query_map([person_id], address_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::NewPerson;

    fn store_with_person() -> (ContactStore, PersonId) {
        let mut store = ContactStore::open_in_memory().unwrap();
        let person = store.insert_person(&NewPerson::named("P", "L")).unwrap();
        (store, person.id)
    }

    #[test]
    fn test_phone_lifecycle() {
        let (mut store, id) = store_with_person();
        let mut phone = store.insert_phone_number(id, "+31600012346", Some("Work")).unwrap();
        phone.phone = "+31600099999".to_string();
        store.update_phone_number(&phone).unwrap();
        assert_eq!(store.get_person(id).unwrap().phone_numbers, vec![phone.clone()]);

        store.delete_phone_number(phone.id).unwrap();
        assert!(store.get_person(id).unwrap().phone_numbers.is_empty());
        assert!(store.delete_phone_number(phone.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_email_requires_person() {
        let (mut store, id) = store_with_person();
        let err = store.insert_email_address(id + 1, "a@b.c", None).unwrap_err();
        assert!(matches!(err, ContactBookError::NotFound { kind: ObjectKind::Person, .. }));
    }

    #[test]
    fn test_address_update() {
        let (mut store, id) = store_with_person();
        let fields = AddressFields {
            house_number: Some("100".into()),
            street_name: Some("Welington".into()),
            ..Default::default()
        };
        let address = store.insert_address(id, &fields).unwrap();
        assert_eq!(address.street_name.as_deref(), Some("Welington"));

        let mut changed = address.fields();
        changed.city = Some("Auckland".into());
        let updated = store.update_address(address.id, &changed).unwrap();
        assert_eq!(updated.city.as_deref(), Some("Auckland"));
        assert_eq!(updated.house_number.as_deref(), Some("100"));
    }

    #[test]
    fn test_details_cascade_with_person() {
        let (mut store, id) = store_with_person();
        let phone = store.insert_phone_number(id, "1", None).unwrap();
        let address = store
            .insert_address(id, &AddressFields { city: Some("X".into()), ..Default::default() })
            .unwrap();
        store.delete_person(id).unwrap();

        assert!(store.delete_phone_number(phone.id).unwrap_err().is_not_found());
        assert!(store.get_address(address.id).unwrap_err().is_not_found());
    }
}
