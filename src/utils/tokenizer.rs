/// Case-fold a name attribute or query word into its index key.
///
/// Full Unicode lower-casing, so "Ölund" and "öLUND" share a token.
pub fn fold_token(text: &str) -> String {
    if text.is_ascii() {
        text.to_ascii_lowercase()
    } else {
        text.to_lowercase()
    }
}

/// Split free text into query words on any Unicode whitespace.
/// Empty or all-whitespace input yields no words.
pub fn split_words(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Whether an optional attribute contributes a token at all
pub fn is_indexable(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}
