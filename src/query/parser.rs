use crate::utils::{fold_token, split_words};

/// Parsed name query: case-folded words, each matched as a token prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameQuery {
    pub words: Vec<String>,
}

impl NameQuery {
    /// Whether the query matches everyone (no words at all)
    pub fn is_match_all(&self) -> bool {
        self.words.is_empty()
    }
}

/// Parse free text typed into an autocomplete box.
///
/// Words are split on whitespace and folded. Repeated words are kept once,
/// since intersecting a word's matches with themselves changes nothing.
pub fn parse_name_query(input: &str) -> NameQuery {
    let mut words: Vec<String> = Vec::new();
    for word in split_words(input) {
        let folded = fold_token(word);
        if !words.contains(&folded) {
            words.push(folded);
        }
    }
    NameQuery { words }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_query() {
        assert!(parse_name_query("").is_match_all());
        assert!(parse_name_query(" \t ").is_match_all());
    }

    #[test]
    fn test_single_word() {
        assert_eq!(parse_name_query("Abcd").words, vec!["abcd"]);
    }

    #[test]
    fn test_multi_word_folded() {
        assert_eq!(parse_name_query("Ab  HI c").words, vec!["ab", "hi", "c"]);
    }

    #[test]
    fn test_repeated_word_kept_once() {
        assert_eq!(parse_name_query("ab AB ab").words, vec!["ab"]);
    }
}
