//! The contact book: a person store paired with its in-memory name index.
//!
//! Every person write goes to the store first and is mirrored into the
//! index only after the store has committed. Methods that touch the index
//! take `&mut self`, which makes the store write and the index update one
//! critical section.

use crate::error::{ContactBookError, Result};
use crate::index::sync::{NameIndex, ProjectionSource};
use crate::index::types::{IndexStats, LookupEntry, PersonId};
use crate::query::NameQueryExecutor;
use crate::store::{
    Address, AddressFields, ContactStore, EmailAddress, Group, NewPerson, Person, PhoneNumber,
    RecordId,
};
use crate::utils::app_data::AppConfig;
use std::path::Path;

#[derive(Debug)]
pub struct ContactBook {
    store: ContactStore,
    names: NameIndex,
}

impl ContactBook {
    /// Open a database file and build the name index from its contents
    pub fn open(path: &Path) -> Result<Self> {
        Self::with_store(ContactStore::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_store(ContactStore::open_in_memory()?)
    }

    /// Open the database named by the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let path = config.effective_database_path()?;
        Self::open(&path)
    }

    fn with_store(store: ContactStore) -> Result<Self> {
        let mut names = NameIndex::new();
        names.warm_start(&store)?;
        Ok(Self { store, names })
    }

    pub fn store(&self) -> &ContactStore {
        &self.store
    }

    // Persons

    pub fn create_person(&mut self, new: NewPerson) -> Result<Person> {
        if !new.has_name() {
            return Err(ContactBookError::InvalidInput(
                "a person needs at least a first, middle or last name".to_string(),
            ));
        }

        let person = self.store.insert_person(&new)?;
        self.names.on_person_created(&person.projection());

        tracing::info!(
            target: "contactbook.book",
            op = "create_person",
            person_id = person.id,
            "person created"
        );
        Ok(person)
    }

    pub fn get_person_by_id(&self, id: PersonId) -> Result<Person> {
        self.store.get_person(id)
    }

    /// Every person, or only the members of `group_id`
    pub fn get_all_persons(&self, group_id: Option<RecordId>) -> Result<Vec<Person>> {
        if let Some(group_id) = group_id {
            self.store.get_group(group_id)?;
        }
        self.store.list_persons(group_id)
    }

    pub fn get_persons_by_email(&self, prefix: &str) -> Result<Vec<Person>> {
        if prefix.is_empty() {
            return Err(ContactBookError::InvalidInput(
                "email search needs a non-empty prefix".to_string(),
            ));
        }
        self.store.persons_by_email(prefix)
    }

    /// Store the name attributes of `person` and re-index it.
    ///
    /// The indexed state is read back from the store before writing, so the
    /// caller's copy of the person never stands in for the old names.
    pub fn update_person(&mut self, person: &Person) -> Result<Person> {
        let new = person.projection();
        if !new.has_name() {
            return Err(ContactBookError::InvalidInput(
                "a person needs at least a first, middle or last name".to_string(),
            ));
        }

        let old = self.store.load_projection_by_id(person.id)?;
        self.store.update_person_names(&new)?;
        let reindexed = self.names.on_person_mutated(&old, &new);
        self.after_commit("update_person", person.id, reindexed)?;

        tracing::info!(
            target: "contactbook.book",
            op = "update_person",
            person_id = person.id,
            "person updated"
        );
        self.store.get_person(person.id)
    }

    pub fn delete_person(&mut self, id: PersonId) -> Result<()> {
        let old = self.store.load_projection_by_id(id)?;
        self.store.delete_person(id)?;
        let removed = self.names.on_person_deleted(&old);
        self.after_commit("delete_person", id, removed)?;

        tracing::info!(
            target: "contactbook.book",
            op = "delete_person",
            person_id = id,
            "person deleted"
        );
        Ok(())
    }

    /// People whose names match every word of `text` by prefix, ordered by
    /// full name
    pub fn find_person_details_by_name(&self, text: &str) -> Vec<LookupEntry> {
        NameQueryExecutor::new(self.names.prefix_index()).find_by_name(text)
    }

    /// Throw the name index away and rebuild it from the store
    pub fn reindex(&mut self) -> Result<usize> {
        self.names.warm_start(&self.store)
    }

    pub fn index_stats(&self) -> IndexStats {
        self.names.stats()
    }

    /// Report an index step that followed a committed store write. Drift
    /// here means store and index disagree until the next warm start.
    fn after_commit(&self, op: &'static str, id: PersonId, step: Result<()>) -> Result<()> {
        if let Err(err @ ContactBookError::IndexDrift { .. }) = &step {
            tracing::error!(
                target: "contactbook.book",
                op,
                person_id = id,
                error = %err,
                "name index drifted from store; warm start will repair"
            );
        }
        step
    }

    // Groups

    pub fn create_group(&mut self, name: &str) -> Result<Group> {
        let name = non_empty(name, "group name")?;
        self.store.insert_group(name)
    }

    pub fn get_group_by_id(&self, id: RecordId) -> Result<Group> {
        self.store.get_group(id)
    }

    pub fn get_all_groups(&self) -> Result<Vec<Group>> {
        self.store.list_groups()
    }

    pub fn rename_group(&mut self, id: RecordId, name: &str) -> Result<Group> {
        let name = non_empty(name, "group name")?;
        self.store.rename_group(id, name)
    }

    pub fn delete_group(&mut self, id: RecordId) -> Result<()> {
        self.store.delete_group(id)
    }

    pub fn add_group_to_person(&mut self, person_id: PersonId, group_id: RecordId) -> Result<()> {
        self.store.add_person_to_group(person_id, group_id)
    }

    pub fn remove_group_from_person(
        &mut self,
        person_id: PersonId,
        group_id: RecordId,
    ) -> Result<bool> {
        self.store.remove_person_from_group(person_id, group_id)
    }

    // Contact details

    pub fn add_phone_number(
        &mut self,
        person_id: PersonId,
        phone: &str,
        label: Option<&str>,
    ) -> Result<PhoneNumber> {
        let phone = non_empty(phone, "phone number")?;
        self.store.insert_phone_number(person_id, phone, label)
    }

    pub fn update_phone_number(&mut self, phone: &PhoneNumber) -> Result<()> {
        non_empty(&phone.phone, "phone number")?;
        self.store.update_phone_number(phone)
    }

    pub fn delete_phone_number(&mut self, id: RecordId) -> Result<()> {
        self.store.delete_phone_number(id)
    }

    pub fn add_email_address(
        &mut self,
        person_id: PersonId,
        email: &str,
        label: Option<&str>,
    ) -> Result<EmailAddress> {
        let email = non_empty(email, "email address")?;
        self.store.insert_email_address(person_id, email, label)
    }

    pub fn update_email_address(&mut self, email: &EmailAddress) -> Result<()> {
        non_empty(&email.email, "email address")?;
        self.store.update_email_address(email)
    }

    pub fn delete_email_address(&mut self, id: RecordId) -> Result<()> {
        self.store.delete_email_address(id)
    }

    pub fn add_address(&mut self, person_id: PersonId, fields: &AddressFields) -> Result<Address> {
        require_address(fields)?;
        self.store.insert_address(person_id, fields)
    }

    pub fn update_address(&mut self, id: RecordId, fields: &AddressFields) -> Result<Address> {
        require_address(fields)?;
        self.store.update_address(id, fields)
    }

    pub fn delete_address(&mut self, id: RecordId) -> Result<()> {
        self.store.delete_address(id)
    }
}

fn non_empty<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(ContactBookError::InvalidInput(format!("{what} must not be empty")))
    } else {
        Ok(value)
    }
}

fn require_address(fields: &AddressFields) -> Result<()> {
    if fields.has_any() {
        Ok(())
    } else {
        Err(ContactBookError::InvalidInput(
            "an address needs at least one address field".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(entries: &[LookupEntry]) -> Vec<PersonId> {
        entries.iter().map(LookupEntry::identity_key).collect()
    }

    #[test]
    fn test_create_person_requires_a_name() {
        let mut book = ContactBook::open_in_memory().unwrap();
        let err = book.create_person(NewPerson::default()).unwrap_err();
        assert!(matches!(err, ContactBookError::InvalidInput(_)));
        assert_eq!(book.index_stats(), IndexStats::default());
    }

    #[test]
    fn test_create_update_delete_track_index() {
        let mut book = ContactBook::open_in_memory().unwrap();
        let mut person = book.create_person(NewPerson::named("Abcd", "Spoon")).unwrap();
        assert_eq!(ids(&book.find_person_details_by_name("ab")), vec![person.id]);

        person.first_name = Some("Xyzzy".to_string());
        let updated = book.update_person(&person).unwrap();
        assert_eq!(updated.full_name(), "Xyzzy Spoon");
        assert!(book.find_person_details_by_name("ab").is_empty());
        assert_eq!(
            book.find_person_details_by_name("sp")[0].full_name,
            "Xyzzy Spoon"
        );

        book.delete_person(person.id).unwrap();
        assert!(book.find_person_details_by_name("").is_empty());
        assert_eq!(book.index_stats(), IndexStats::default());
    }

    #[test]
    fn test_update_missing_person_writes_nothing() {
        let mut book = ContactBook::open_in_memory().unwrap();
        let mut ghost = book.create_person(NewPerson::named("Abc", "Def")).unwrap();
        book.delete_person(ghost.id).unwrap();

        ghost.first_name = Some("Xyz".to_string());
        assert!(book.update_person(&ghost).unwrap_err().is_not_found());
        assert!(book.find_person_details_by_name("xyz").is_empty());
    }

    #[test]
    fn test_out_of_band_write_reports_drift() {
        let mut book = ContactBook::open_in_memory().unwrap();
        let mut person = book.create_person(NewPerson::named("Abc", "Def")).unwrap();

        // names change in the store without the index hearing about it
        person.first_name = Some("Ghi".to_string());
        book.store.update_person_names(&person.projection()).unwrap();

        person.first_name = Some("Jkl".to_string());
        let err = book.update_person(&person).unwrap_err();
        assert!(matches!(err, ContactBookError::IndexDrift { .. }));

        assert_eq!(book.reindex().unwrap(), 1);
        assert_eq!(ids(&book.find_person_details_by_name("jkl")), vec![person.id]);
        assert!(book.find_person_details_by_name("abc").is_empty());
    }

    #[test]
    fn test_detail_validation() {
        let mut book = ContactBook::open_in_memory().unwrap();
        let person = book.create_person(NewPerson::named("P", "L")).unwrap();

        assert!(book.add_phone_number(person.id, " ", None).is_err());
        assert!(book.add_email_address(person.id, "", None).is_err());
        let label_only = AddressFields {
            label: Some("Home".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            book.add_address(person.id, &label_only),
            Err(ContactBookError::InvalidInput(_))
        ));
        assert!(book.create_group("").is_err());
    }

    #[test]
    fn test_group_filter_requires_existing_group() {
        let book = ContactBook::open_in_memory().unwrap();
        assert!(book.get_all_persons(Some(3)).unwrap_err().is_not_found());
        assert!(book.get_all_persons(None).unwrap().is_empty());
    }
}
