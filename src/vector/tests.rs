//! Unit tests for the vector store.

use super::*;

fn store() -> VectorStore {
    VectorStore::with_hashing_embedder()
}

fn meta(key: &str, value: &str) -> Properties {
    let mut map = Properties::new();
    map.insert(key.to_string(), value.into());
    map
}

#[test]
fn identical_text_ranks_first_with_top_score() {
    let store = store();
    store
        .add_document("fn parse(input: &str) -> Ast", Properties::new())
        .unwrap();
    store
        .add_document("SELECT * FROM users WHERE id = 1", Properties::new())
        .unwrap();
    store
        .add_document("the quick brown fox jumps", Properties::new())
        .unwrap();

    let results = store
        .search("fn parse(input: &str) -> Ast", &SearchOptions::default())
        .unwrap();
    assert_eq!(results[0].content, "fn parse(input: &str) -> Ast");
    assert_eq!(results[0].score, 1.0);
    for other in &results[1..] {
        assert!(other.score <= results[0].score);
    }
}

#[test]
fn empty_store_returns_empty_not_error() {
    let store = store();
    let results = store.search("anything", &SearchOptions::default()).unwrap();
    assert!(results.is_empty());
}

#[test]
fn top_k_limits_results() {
    let store = store();
    for i in 0..5 {
        store
            .add_document(&format!("document number {i}"), Properties::new())
            .unwrap();
    }
    let results = store
        .search("document number", &SearchOptions::default().with_top_k(2))
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[test]
fn threshold_discards_low_scores() {
    let store = store();
    store.add_document("alpha beta gamma", Properties::new()).unwrap();
    store
        .add_document("zzz completely unrelated words qqq", Properties::new())
        .unwrap();

    let results = store
        .search(
            "alpha beta gamma",
            &SearchOptions::default().with_threshold(0.9),
        )
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].content, "alpha beta gamma");
}

#[test]
fn metadata_filter_applies_before_ranking() {
    let store = store();
    store
        .add_document("login handler", meta("lang", "rust"))
        .unwrap();
    store
        .add_document("login handler", meta("lang", "python"))
        .unwrap();

    let results = store
        .search(
            "login handler",
            &SearchOptions::default().with_filter("lang", "python"),
        )
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].metadata["lang"], "python");
}

#[test]
fn scores_are_stable_across_calls() {
    let store = store();
    store.add_document("error handling in rust", Properties::new()).unwrap();
    let first = store.search("rust errors", &SearchOptions::default()).unwrap();
    let second = store.search("rust errors", &SearchOptions::default()).unwrap();
    assert_eq!(first[0].score, second[0].score);
}

#[test]
fn get_similar_excludes_the_seed() {
    let store = store();
    let seed = store
        .add_document("graph traversal in rust", Properties::new())
        .unwrap();
    store
        .add_document("graph traversal in rust", Properties::new())
        .unwrap();
    store
        .add_document("unrelated cooking recipe", Properties::new())
        .unwrap();

    let results = store.get_similar(&seed, 10).unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.id != seed));
    // the duplicate text scores 1.0 and ranks first
    assert_eq!(results[0].score, 1.0);
}

#[test]
fn get_similar_unknown_id_is_not_found() {
    let store = store();
    assert!(matches!(
        store.get_similar("missing", 5),
        Err(crate::error::IndexError::NotFound(_))
    ));
}

#[test]
fn get_document_round_trips() {
    let store = store();
    let id = store.add_document("hello", meta("k", "v")).unwrap();
    let doc = store.get_document(&id).unwrap();
    assert_eq!(doc.content, "hello");
    assert_eq!(doc.metadata["k"], "v");
    assert_eq!(doc.embedding.len(), DEFAULT_EMBEDDING_DIMENSION);

    assert!(matches!(
        store.get_document("nope"),
        Err(crate::error::IndexError::NotFound(_))
    ));
}

#[test]
fn ties_keep_insertion_order() {
    let store = store();
    let first = store.add_document("same text", Properties::new()).unwrap();
    let second = store.add_document("same text", Properties::new()).unwrap();

    let results = store.search("same text", &SearchOptions::default()).unwrap();
    assert_eq!(results[0].id, first);
    assert_eq!(results[1].id, second);
}

#[test]
fn stats_report_count_and_dimension() {
    let store = store();
    store.add_document("a", Properties::new()).unwrap();
    let stats = store.get_stats();
    assert_eq!(stats.documents, 1);
    assert_eq!(stats.dimension, DEFAULT_EMBEDDING_DIMENSION);
    assert_eq!(stats.provider, "hashing");

    store.clear();
    assert_eq!(store.get_stats().documents, 0);
}
