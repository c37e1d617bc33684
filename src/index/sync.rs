//! Keeps the name index in step with person create/delete/update events.

use crate::error::{ContactBookError, Result};
use crate::index::trie::PrefixIndex;
use crate::index::types::{IndexStats, PersonId, PersonProjection};
use crate::utils::fold_token;
use std::collections::BTreeSet;

/// Read access the synchronizer needs from the person store
pub trait ProjectionSource {
    /// Every person currently stored
    fn enumerate_all_projections(&self) -> Result<Vec<PersonProjection>>;

    /// A fresh read of one person, independent of any copy the caller holds
    fn load_projection_by_id(&self, id: PersonId) -> Result<PersonProjection>;
}

/// Name index plus the rules for updating it.
///
/// The index is a derived cache: it is never persisted and is rebuilt with
/// [`NameIndex::warm_start`] whenever a store is opened.
#[derive(Debug, Default)]
pub struct NameIndex {
    index: PrefixIndex,
}

impl NameIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix_index(&self) -> &PrefixIndex {
        &self.index
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            people: self.index.len(),
            tokens: self.index.token_count(),
        }
    }

    /// Index every populated name attribute of a newly stored person
    pub fn on_person_created(&mut self, projection: &PersonProjection) {
        let full_name = projection.full_name();
        let tokens = person_tokens(projection);
        for token in &tokens {
            self.index.insert(token, projection.id, &full_name);
        }

        tracing::debug!(
            target: "contactbook.index",
            op = "add",
            person_id = projection.id,
            tokens = tokens.len(),
            "person indexed"
        );
    }

    /// Drop every token of `projection`, which must be the person as it was
    /// before deletion.
    ///
    /// All removals are checked up front, so either every token goes or the
    /// index is left unchanged and `IndexDrift` is returned.
    pub fn on_person_deleted(&mut self, projection: &PersonProjection) -> Result<()> {
        let tokens = person_tokens(projection);
        if let Some(missing) = tokens
            .iter()
            .find(|token| !self.index.contains(token, projection.id))
        {
            return Err(ContactBookError::IndexDrift {
                token: missing.clone(),
                id: projection.id,
            });
        }
        for token in &tokens {
            self.index.remove(token, projection.id)?;
        }

        tracing::debug!(
            target: "contactbook.index",
            op = "remove",
            person_id = projection.id,
            "person removed from index"
        );
        Ok(())
    }

    /// Re-index a person whose name attributes may have changed.
    ///
    /// `old` must have been read before the store write. All old tokens are
    /// removed and all new ones added, changed or not.
    pub fn on_person_mutated(
        &mut self,
        old: &PersonProjection,
        new: &PersonProjection,
    ) -> Result<()> {
        if old.id != new.id {
            return Err(ContactBookError::InvalidInput(format!(
                "cannot re-index person {} as person {}",
                old.id, new.id
            )));
        }

        self.on_person_deleted(old)?;
        self.on_person_created(new);
        Ok(())
    }

    /// Rebuild from scratch out of the store's full enumeration.
    ///
    /// The enumeration happens before the index is cleared, so a failing
    /// store leaves the previous index in place. Returns the number of
    /// people indexed.
    pub fn warm_start<S: ProjectionSource + ?Sized>(&mut self, source: &S) -> Result<usize> {
        let projections = source.enumerate_all_projections()?;

        self.index.clear();
        for projection in &projections {
            self.on_person_created(projection);
        }

        tracing::info!(
            target: "contactbook.index",
            op = "warm_start",
            people = projections.len(),
            tokens = self.index.token_count(),
            "name index rebuilt"
        );
        Ok(projections.len())
    }
}

/// Distinct folded tokens of a person; "Abc" as both first and last name
/// is one token.
fn person_tokens(projection: &PersonProjection) -> BTreeSet<String> {
    projection.name_attributes().map(fold_token).collect()
}
