#![no_main]

use arbitrary::Arbitrary;
use contactbook::index::{IndexStats, NameIndex, PersonProjection};
use contactbook::query::NameQueryExecutor;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    people: Vec<(Option<String>, Option<String>, Option<String>)>,
    query: String,
}

fuzz_target!(|input: Input| {
    let mut index = NameIndex::new();
    let people: Vec<PersonProjection> = input
        .people
        .into_iter()
        .take(64)
        .enumerate()
        .map(|(i, (first, middle, last))| PersonProjection {
            id: i as u32 + 1,
            first_name: first,
            middle_name: middle,
            last_name: last,
            ..Default::default()
        })
        .collect();

    for person in &people {
        index.on_person_created(person);
    }

    let results = NameQueryExecutor::new(index.prefix_index()).find_by_name(&input.query);
    let mut ids: Vec<_> = results.iter().map(|e| e.id).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), results.len());

    // Deleting everyone must leave an empty index
    for person in &people {
        index.on_person_deleted(person).unwrap();
    }
    assert_eq!(index.stats(), IndexStats::default());
});
