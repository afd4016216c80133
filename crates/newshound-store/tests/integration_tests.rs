//! Integration tests for the SQLite store: history invariants, upsert
//! semantics, and counter persistence across reopen.

use newshound_store::SqliteStore;
use newshound_domain::traits::ProfileStore;
use newshound_domain::{ArticleRecord, Field, FieldSet, CANDIDATE_CAP};
use std::collections::BTreeMap;

fn one(field: Field, expression: &str) -> BTreeMap<Field, String> {
    let mut map = BTreeMap::new();
    map.insert(field, expression.to_string());
    map
}

#[test]
fn history_never_exceeds_cap_and_holds_no_duplicates() {
    let mut store = SqliteStore::open(":memory:").unwrap();

    for i in 0..12 {
        // Repeat every third expression so dedup gets exercised too.
        let expr = format!("div.story-v{}", i % 9);
        store
            .record_validated("example.com", &one(Field::Content, &expr), 0)
            .unwrap();

        let profile = store.lookup("example.com").unwrap().unwrap();
        let entries: Vec<&str> = profile.selectors.content.iter().collect();
        assert!(entries.len() <= CANDIDATE_CAP);
        let mut sorted = entries.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), entries.len());
    }

    // Oldest evicted first: after 9 distinct expressions the survivors are
    // the five most recent, in insertion order.
    let profile = store.lookup("example.com").unwrap().unwrap();
    let entries: Vec<&str> = profile.selectors.content.iter().collect();
    assert_eq!(
        entries,
        vec![
            "div.story-v4",
            "div.story-v5",
            "div.story-v6",
            "div.story-v7",
            "div.story-v8"
        ]
    );
}

#[test]
fn absent_field_keeps_its_history_unchanged() {
    let mut store = SqliteStore::open(":memory:").unwrap();

    store
        .record_validated("example.com", &one(Field::Author, "span.byline"), 0)
        .unwrap();
    store
        .record_validated("example.com", &one(Field::Title, "h1"), 1)
        .unwrap();

    let profile = store.lookup("example.com").unwrap().unwrap();
    let authors: Vec<&str> = profile.selectors.author.iter().collect();
    assert_eq!(authors, vec!["span.byline"]);
    let titles: Vec<&str> = profile.selectors.title.iter().collect();
    assert_eq!(titles, vec!["h1"]);
    assert_eq!(profile.total_failures, 1);
}

#[test]
fn concurrent_writers_on_one_database_all_commit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newshound.db");
    // Create the schema before the writers race.
    SqliteStore::open(&path).unwrap();

    let writers: Vec<_> = (0..2)
        .map(|w| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut store = SqliteStore::open(&path).unwrap();
                for i in 0..25 {
                    let expr = format!("div.story-w{w}-v{i}");
                    store
                        .record_validated("example.com", &one(Field::Content, &expr), 1)
                        .unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    // Every append committed: no writer errored out, and the failure
    // counter saw all fifty increments.
    let store = SqliteStore::open(&path).unwrap();
    let profile = store.lookup("example.com").unwrap().unwrap();
    assert_eq!(profile.total_failures, 50);
    assert_eq!(profile.selectors.content.len(), CANDIDATE_CAP);
}

#[test]
fn article_upsert_is_idempotent_and_replacing() {
    let mut store = SqliteStore::open(":memory:").unwrap();

    let mut values: FieldSet<String> = FieldSet::default();
    values.set(Field::Title, "A headline long enough".to_string());
    values.set(Field::Author, "Jane Doe".to_string());
    let record = ArticleRecord::from_values("example.com", "https://example.com/a", &values);

    store.upsert_article(&record).unwrap();
    store.upsert_article(&record).unwrap();
    let stored = store
        .get_article("example.com", "https://example.com/a")
        .unwrap()
        .unwrap();
    assert_eq!(stored, record);

    // A second write with the same key fully replaces the prior record.
    values.set(Field::Author, "John Roe".to_string());
    let replacement = ArticleRecord::from_values("example.com", "https://example.com/a", &values);
    store.upsert_article(&replacement).unwrap();
    let stored = store
        .get_article("example.com", "https://example.com/a")
        .unwrap()
        .unwrap();
    assert_eq!(stored.author, "John Roe");
}

#[test]
fn generation_call_counter_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newshound.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        store.count_generation_call().unwrap();
        store.count_generation_call().unwrap();
        store.count_generation_call().unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.generation_calls().unwrap(), 3);
}

#[test]
fn profile_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newshound.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        let initial = FieldSet::from_fn(|f| format!("[itemprop='{}']", f.as_str()));
        store.create("example.com", &initial).unwrap();
        store
            .record_validated("example.com", &one(Field::Date, "time[datetime]"), 2)
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    let profile = store.lookup("example.com").unwrap().unwrap();
    assert_eq!(profile.total_failures, 2);
    assert_eq!(profile.selectors.date.len(), 2);
    assert_eq!(profile.selectors.date.newest(), Some("time[datetime]"));
}
