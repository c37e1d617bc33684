use crate::index::types::{PersonId, PersonProjection, full_name, has_name};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Row id of a group, phone number, email address or address
pub type RecordId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub id: RecordId,
    pub person_id: PersonId,
    pub label: Option<String>,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub id: RecordId,
    pub person_id: PersonId,
    pub label: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub id: RecordId,
    pub person_id: PersonId,
    pub label: Option<String>,
    pub house_number: Option<String>,
    pub street_name: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl Address {
    pub fn fields(&self) -> AddressFields {
        AddressFields {
            label: self.label.clone(),
            house_number: self.house_number.clone(),
            street_name: self.street_name.clone(),
            address_line_1: self.address_line_1.clone(),
            address_line_2: self.address_line_2.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            country: self.country.clone(),
        }
    }

    /// Populated address parts, comma separated, street first
    pub fn summary(&self) -> String {
        [
            &self.street_name,
            &self.house_number,
            &self.address_line_1,
            &self.address_line_2,
            &self.postal_code,
            &self.city,
            &self.country,
        ]
        .into_iter()
        .filter_map(|p| p.as_deref())
        .collect::<Vec<_>>()
        .join(", ")
    }
}

/// A stored person with all contact details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub phone_numbers: Vec<PhoneNumber>,
    pub email_addresses: Vec<EmailAddress>,
    pub addresses: Vec<Address>,
    pub groups: Vec<Group>,
}

impl Person {
    pub fn full_name(&self) -> String {
        full_name(
            self.title.as_deref(),
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
            self.suffix.as_deref(),
        )
    }

    /// Snapshot of the id and name attributes as they are right now
    pub fn projection(&self) -> PersonProjection {
        PersonProjection {
            id: self.id,
            title: self.title.clone(),
            first_name: self.first_name.clone(),
            middle_name: self.middle_name.clone(),
            last_name: self.last_name.clone(),
            suffix: self.suffix.clone(),
        }
    }
}

/// Parameters for creating a person, optionally with a first phone number,
/// email address and group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPerson {
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
    pub phone_number: Option<String>,
    pub phone_label: Option<String>,
    pub email_address: Option<String>,
    pub email_label: Option<String>,
    pub group_id: Option<RecordId>,
}

impl NewPerson {
    pub fn named(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            ..Default::default()
        }
    }

    /// At least one of first, middle or last name must be given
    pub fn has_name(&self) -> bool {
        has_name(
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

/// Address columns, used both to add and to update an address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressFields {
    pub label: Option<String>,
    pub house_number: Option<String>,
    pub street_name: Option<String>,
    pub address_line_1: Option<String>,
    pub address_line_2: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl AddressFields {
    /// Whether any address column (the label aside) is set
    pub fn has_any(&self) -> bool {
        [
            &self.house_number,
            &self.street_name,
            &self.address_line_1,
            &self.address_line_2,
            &self.city,
            &self.postal_code,
            &self.country,
        ]
        .into_iter()
        .any(|f| f.as_deref().is_some_and(|f| !f.is_empty()))
    }
}

fn label_or_default(label: &Option<String>) -> &str {
    label.as_deref().unwrap_or("No label")
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<Person> {}", self.full_name())?;
        f.write_str("Phone numbers: ")?;
        write_list(f, &self.phone_numbers)?;
        f.write_str("\nEmail addresses: ")?;
        write_list(f, &self.email_addresses)?;
        f.write_str("\nAddresses: ")?;
        write_list(f, &self.addresses)?;
        f.write_str("\nGroups: ")?;
        write_list(f, &self.groups)
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Group> {}", self.name)
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<PhoneNumber> {}: {}", label_or_default(&self.label), self.phone)
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<EmailAddress> {}: {}", label_or_default(&self.label), self.email)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Address> {}: {}", label_or_default(&self.label), self.summary())
    }
}
