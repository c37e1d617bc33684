//! Case-insensitive prefix trie over name tokens.
//!
//! Every node on the path of a stored token may carry an entry: the people
//! whose name attribute folds to exactly that token, with their display name
//! as it was when the entry was written. A prefix lookup walks to the node
//! for the prefix and then collects every entry below it, so its cost grows
//! with the prefix length and the number of matches, not the vocabulary size.

use crate::error::{ContactBookError, Result};
use crate::index::types::PersonId;
use crate::utils::fold_token;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    /// person id -> full name; empty means no token ends here
    entry: HashMap<PersonId, String>,
}

impl TrieNode {
    fn is_prunable(&self) -> bool {
        self.entry.is_empty() && self.children.is_empty()
    }
}

/// In-memory prefix index from folded tokens to people
#[derive(Debug, Default)]
pub struct PrefixIndex {
    root: TrieNode,
    /// Number of tokens each person currently appears under
    memberships: HashMap<PersonId, usize>,
    token_count: usize,
}

impl PrefixIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map `id -> full_name` under `token`, replacing any previous name for `id`
    pub fn insert(&mut self, token: &str, id: PersonId, full_name: &str) {
        let key = fold_token(token);
        let mut node = &mut self.root;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }

        if node.entry.is_empty() {
            self.token_count += 1;
        }
        if node.entry.insert(id, full_name.to_string()).is_none() {
            *self.memberships.entry(id).or_insert(0) += 1;
        }
    }

    /// Whether `id` is currently mapped under `token`
    pub fn contains(&self, token: &str, id: PersonId) -> bool {
        self.find_node(&fold_token(token))
            .is_some_and(|node| node.entry.contains_key(&id))
    }

    /// Drop `id` from the entry for `token`, pruning nodes left empty.
    ///
    /// Removing a mapping that was never inserted means the index no longer
    /// mirrors the store; the index is left as it was and `IndexDrift` is
    /// returned.
    pub fn remove(&mut self, token: &str, id: PersonId) -> Result<()> {
        let key = fold_token(token);
        let is_present = self
            .find_node(&key)
            .is_some_and(|node| node.entry.contains_key(&id));
        if !is_present {
            return Err(ContactBookError::IndexDrift { token: key, id });
        }

        let path: Vec<char> = key.chars().collect();
        let emptied = remove_path(&mut self.root, &path, id);
        if emptied {
            self.token_count -= 1;
        }

        if let Some(count) = self.memberships.get_mut(&id) {
            *count -= 1;
            if *count == 0 {
                self.memberships.remove(&id);
            }
        }

        Ok(())
    }

    /// Every `(id, full_name)` stored under a token starting with `prefix`.
    ///
    /// Entries are merged by id, so a person reachable through several
    /// tokens appears once. An empty prefix returns everyone.
    pub fn query_prefix(&self, prefix: &str) -> HashMap<PersonId, String> {
        let mut merged = HashMap::new();
        let Some(start) = self.find_node(&fold_token(prefix)) else {
            return merged;
        };

        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            for (&id, name) in &node.entry {
                merged.insert(id, name.clone());
            }
            stack.extend(node.children.values());
        }

        merged
    }

    /// Number of distinct people in the index
    pub fn len(&self) -> usize {
        self.memberships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memberships.is_empty()
    }

    /// Number of distinct tokens with at least one person
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.memberships.clear();
        self.token_count = 0;
    }

    fn find_node(&self, key: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for ch in key.chars() {
            node = node.children.get(&ch)?;
        }
        Some(node)
    }
}

/// Remove `id` at the end of `path`; returns true when the token's entry
/// became empty. Childless empty nodes are unlinked on the way back up.
fn remove_path(node: &mut TrieNode, path: &[char], id: PersonId) -> bool {
    match path.split_first() {
        None => {
            node.entry.remove(&id);
            node.entry.is_empty()
        }
        Some((ch, rest)) => {
            let Some(child) = node.children.get_mut(ch) else {
                return false;
            };
            let emptied = remove_path(child, rest, id);
            if child.is_prunable() {
                node.children.remove(ch);
            }
            emptied
        }
    }
}
