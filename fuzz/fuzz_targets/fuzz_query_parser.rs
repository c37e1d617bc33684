#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parsed words are folded, non-empty and free of whitespace
    let query = contactbook::query::parse_name_query(data);
    for word in &query.words {
        assert!(!word.is_empty());
        assert!(!word.chars().any(char::is_whitespace));
    }
});
