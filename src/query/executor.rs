use crate::index::trie::PrefixIndex;
use crate::index::types::{LookupEntry, PersonId};
use crate::query::parser::{NameQuery, parse_name_query};
use roaring::RoaringBitmap;
use std::collections::HashMap;

/// Answers name lookups straight from the prefix index
pub struct NameQueryExecutor<'a> {
    index: &'a PrefixIndex,
}

impl<'a> NameQueryExecutor<'a> {
    pub fn new(index: &'a PrefixIndex) -> Self {
        Self { index }
    }

    /// People whose name attributes start with every word of `text`
    pub fn find_by_name(&self, text: &str) -> Vec<LookupEntry> {
        self.execute(&parse_name_query(text))
    }

    /// Execute a parsed query.
    ///
    /// One word (or none) is a single prefix lookup. Several words are
    /// looked up independently and intersected on person id, so each word
    /// may match a different attribute of the same person. Results are
    /// sorted by full name, then id.
    pub fn execute(&self, query: &NameQuery) -> Vec<LookupEntry> {
        let matches = match query.words.as_slice() {
            [] => self.index.query_prefix(""),
            [word] => self.index.query_prefix(word),
            words => self.intersect_words(words),
        };

        let mut results: Vec<LookupEntry> = matches
            .into_iter()
            .map(|(id, full_name)| LookupEntry::new(id, full_name))
            .collect();
        results.sort_by(|a, b| {
            a.full_name
                .cmp(&b.full_name)
                .then_with(|| a.identity_key().cmp(&b.identity_key()))
        });
        results
    }

    fn intersect_words(&self, words: &[String]) -> HashMap<PersonId, String> {
        let mut per_word: Vec<HashMap<PersonId, String>> = Vec::with_capacity(words.len());
        for word in words {
            let matches = self.index.query_prefix(word);
            if matches.is_empty() {
                return HashMap::new();
            }
            per_word.push(matches);
        }

        // Smallest match set first keeps the running intersection small
        per_word.sort_by_key(|m| m.len());

        let mut survivors = id_set(&per_word[0]);
        for matches in &per_word[1..] {
            survivors &= id_set(matches);
            if survivors.is_empty() {
                return HashMap::new();
            }
        }

        let mut seed = per_word.swap_remove(0);
        seed.retain(|id, _| survivors.contains(*id));
        seed
    }
}

fn id_set(matches: &HashMap<PersonId, String>) -> RoaringBitmap {
    matches.keys().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(index: &mut PrefixIndex, id: PersonId, names: &[&str]) {
        let full_name = names.join(" ");
        for name in names {
            index.insert(name, id, &full_name);
        }
    }

    fn ids(results: &[LookupEntry]) -> Vec<PersonId> {
        let mut ids: Vec<_> = results.iter().map(LookupEntry::identity_key).collect();
        ids.sort_unstable();
        ids
    }

    fn hijk_fixture() -> PrefixIndex {
        let mut index = PrefixIndex::new();
        add(&mut index, 1, &["Abcd", "Hijk"]);
        add(&mut index, 2, &["Cdef", "Abc"]);
        add(&mut index, 3, &["Abef", "Hijk"]);
        index
    }

    #[test]
    fn test_multi_word_conjunction() {
        let index = hijk_fixture();
        let executor = NameQueryExecutor::new(&index);

        assert_eq!(ids(&executor.find_by_name("ab hi")), vec![1, 3]);
        assert_eq!(ids(&executor.find_by_name("abe hi")), vec![3]);
        assert!(executor.find_by_name("ab hi c").is_empty());
    }

    #[test]
    fn test_single_word_prefixes() {
        let index = hijk_fixture();
        let executor = NameQueryExecutor::new(&index);

        assert_eq!(ids(&executor.find_by_name("ab")), vec![1, 2, 3]);
        assert_eq!(ids(&executor.find_by_name("abc")), vec![1, 2]);
        assert_eq!(ids(&executor.find_by_name("abcd")), vec![1]);
        assert_eq!(ids(&executor.find_by_name("")), vec![1, 2, 3]);
        assert!(executor.find_by_name("bc").is_empty());
    }

    #[test]
    fn test_word_order_independent() {
        let index = hijk_fixture();
        let executor = NameQueryExecutor::new(&index);
        assert_eq!(executor.find_by_name("ab hi"), executor.find_by_name("HI AB"));
    }

    #[test]
    fn test_middle_name_match() {
        let mut index = PrefixIndex::new();
        add(&mut index, 1, &["Abcd", "Abxy"]);
        add(&mut index, 2, &["Xyz", "Abcd", "Def"]);
        let executor = NameQueryExecutor::new(&index);

        let results = executor.find_by_name("Abcd");
        assert_eq!(
            results,
            vec![
                LookupEntry::new(1, "Abcd Abxy"),
                LookupEntry::new(2, "Xyz Abcd Def"),
            ]
        );
    }

    #[test]
    fn test_two_words_same_attribute_prefix() {
        let mut index = PrefixIndex::new();
        add(&mut index, 4, &["Pqrs", "Pqr"]);
        add(&mut index, 5, &["Xy", "Pqr"]);
        let executor = NameQueryExecutor::new(&index);

        assert_eq!(ids(&executor.find_by_name("pq")), vec![4, 5]);
        assert_eq!(ids(&executor.find_by_name("pq pqrs")), vec![4]);
        assert_eq!(ids(&executor.find_by_name("pqr x")), vec![5]);
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let index = PrefixIndex::new();
        let executor = NameQueryExecutor::new(&index);
        assert!(executor.find_by_name("anything").is_empty());
        assert!(executor.find_by_name("").is_empty());
    }
}
