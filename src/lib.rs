//! # contactbook - Contact book with instant name search
//!
//! People, their groups and contact details live in SQLite. Next to the
//! database sits an in-memory prefix index over every name attribute, so
//! typing the first letters of any part of a name finds the person.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`book`] - The [`ContactBook`] facade keeping store and index in step
//! - [`store`] - SQLite persistence (persons, groups, phone numbers, emails, addresses)
//! - [`index`] - Prefix trie over name tokens and its synchronizer
//! - [`query`] - Multi-word name query parsing and execution
//! - [`output`] - Terminal rendering of results
//! - [`utils`] - Configuration and token folding
//!
//! ## Quick Start
//!
//! ```
//! use contactbook::{ContactBook, NewPerson};
//!
//! let mut book = ContactBook::open_in_memory().unwrap();
//! book.create_person(NewPerson::named("Abcd", "Hijk")).unwrap();
//! book.create_person(NewPerson::named("Abef", "Hijk")).unwrap();
//!
//! // every word must prefix-match some name attribute
//! let found = book.find_person_details_by_name("abe hi");
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].full_name, "Abef Hijk");
//! ```
//!
//! ## Index
//!
//! The name index is never persisted. Opening a book rebuilds it from the
//! store (a warm start); afterwards every person create, update and delete
//! is mirrored into it once the store write has committed.

pub mod book;
pub mod error;
pub mod index;
pub mod logging;
pub mod output;
pub mod query;
pub mod store;
pub mod utils;

pub use book::ContactBook;
pub use error::{ContactBookError, ObjectKind, Result};
pub use index::{IndexStats, LookupEntry, PersonId, PersonProjection};
pub use store::{Address, AddressFields, EmailAddress, Group, NewPerson, Person, PhoneNumber, RecordId};
