use crate::utils::is_indexable;
use serde::{Deserialize, Serialize};

/// Store-assigned person identifier. Never reused once deleted.
pub type PersonId = u32;

/// Read-only snapshot of a person's identity and name attributes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersonProjection {
    pub id: PersonId,
    pub title: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub suffix: Option<String>,
}

impl PersonProjection {
    /// Display name derived from the current attribute values.
    ///
    /// Title, first, middle and last name joined by spaces, then `", suffix"`.
    pub fn full_name(&self) -> String {
        full_name(
            self.title.as_deref(),
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
            self.suffix.as_deref(),
        )
    }

    /// Populated name attributes, in title/first/middle/last/suffix order
    pub fn name_attributes(&self) -> impl Iterator<Item = &str> {
        [
            self.title.as_deref(),
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .filter(|v| is_indexable(*v))
        .flatten()
    }

    /// Whether a first, middle or last name is set
    pub fn has_name(&self) -> bool {
        has_name(
            self.first_name.as_deref(),
            self.middle_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

pub(crate) fn has_name(first: Option<&str>, middle: Option<&str>, last: Option<&str>) -> bool {
    [first, middle, last].into_iter().any(|n| is_indexable(n))
}

pub(crate) fn full_name(
    title: Option<&str>,
    first_name: Option<&str>,
    middle_name: Option<&str>,
    last_name: Option<&str>,
    suffix: Option<&str>,
) -> String {
    let mut name = [title, first_name, middle_name, last_name]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(suffix) = suffix.filter(|s| !s.is_empty()) {
        name.push_str(", ");
        name.push_str(suffix);
    }

    name
}

/// One name-lookup result.
///
/// Two entries describe the same person when their [`identity_key`]s match;
/// the cached `full_name` never takes part in deduplication or intersection.
///
/// [`identity_key`]: LookupEntry::identity_key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub id: PersonId,
    pub full_name: String,
}

impl LookupEntry {
    pub fn new(id: PersonId, full_name: impl Into<String>) -> Self {
        Self {
            id,
            full_name: full_name.into(),
        }
    }

    #[inline]
    pub fn identity_key(&self) -> PersonId {
        self.id
    }
}

/// Index statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub people: usize,
    pub tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(first: &str, last: &str) -> PersonProjection {
        PersonProjection {
            id: 1,
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_name_first_last() {
        assert_eq!(projection("Abcd", "Abxy").full_name(), "Abcd Abxy");
    }

    #[test]
    fn test_full_name_with_title_and_suffix() {
        let p = PersonProjection {
            id: 2,
            title: Some("Dr.".to_string()),
            first_name: Some("Xyz".to_string()),
            middle_name: Some("Abcd".to_string()),
            last_name: Some("Def".to_string()),
            suffix: Some("Jr.".to_string()),
        };
        assert_eq!(p.full_name(), "Dr. Xyz Abcd Def, Jr.");
    }

    #[test]
    fn test_name_attributes_skip_empty() {
        let mut p = projection("Abc", "Def");
        p.middle_name = Some(String::new());
        let attrs: Vec<_> = p.name_attributes().collect();
        assert_eq!(attrs, vec!["Abc", "Def"]);
    }

    #[test]
    fn test_has_name_ignores_title_and_suffix() {
        let mut p = PersonProjection {
            title: Some("Dr.".to_string()),
            suffix: Some("Jr.".to_string()),
            ..Default::default()
        };
        assert!(!p.has_name());
        p.middle_name = Some("M".to_string());
        assert!(p.has_name());
    }

    #[test]
    fn test_identity_key_ignores_name() {
        let a = LookupEntry::new(4, "Abc");
        let b = LookupEntry::new(4, "Xyz");
        assert_eq!(a.identity_key(), b.identity_key());
        assert_ne!(a, b);
    }
}
