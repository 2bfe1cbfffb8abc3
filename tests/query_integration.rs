//! End-to-end query tests against a synthetic people index

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use chrono::Utc;
use sidonia::query::{PrefixQuery, Query, QueryBuilder, RegexTermQuery, TermQuery};
use sidonia::{IndexError, Segment, SegmentConfig, SimpleDocument, Value};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn hash(s: &str) -> String {
    let mut hasher = DefaultHasher::new();
    s.hash(&mut hasher);
    hasher.finish().to_string()
}

/// 500 docs; names rotate every 100 docs, doc 101 is "kevin manning"
/// and doc 102 has last_name "smith".
fn people_docs() -> Vec<SimpleDocument> {
    let now = Utc::now();
    (0..500)
        .map(|i| {
            let mut fields: HashMap<String, Value> = HashMap::new();
            fields.insert("doc_id".into(), i.to_string().into());
            fields.insert("userid".into(), hash(&i.to_string()).into());

            let first_name = match i % 100 {
                0 => Some("eric"),
                1 => Some("kevin"),
                2 => Some("angela"),
                3 => Some("jon"),
                4 => Some("john"),
                5 => Some("james"),
                _ => None,
            };
            if let Some(name) = first_name {
                fields.insert("first_name".into(), name.into());
            }

            if i == 101 {
                fields.insert("first_name".into(), "kevin".into());
                fields.insert("last_name".into(), "manning".into());
            }
            if i == 102 {
                fields.insert("last_name".into(), "smith".into());
            }

            SimpleDocument::with_timestamp(format!("doc_number:{i}"), fields, now)
        })
        .collect()
}

fn people_segment() -> Segment {
    init_tracing();
    let mut segment = Segment::new();
    segment.index_documents(&people_docs()).unwrap();
    segment
}

#[test]
fn test_and_regex_query_kevin_manning() {
    let segment = people_segment();

    let results = QueryBuilder::new(&segment)
        .and([
            RegexTermQuery::new("first_name", "kev.*").into_ref(),
            RegexTermQuery::new("last_name", "manning").into_ref(),
        ])
        .run()
        .unwrap();

    assert_eq!(
        results.len(),
        1,
        "expected only one doc to match `kevin manning`"
    );
    assert_eq!(results.external_doc_ids, vec!["doc_number:101"]);
}

#[test]
fn test_single_regex_returns_every_kevin() {
    let segment = people_segment();

    let results = QueryBuilder::new(&segment)
        .and([RegexTermQuery::new("first_name", "kev.*").into_ref()])
        .run()
        .unwrap();

    assert_eq!(
        results.external_doc_ids,
        vec![
            "doc_number:1",
            "doc_number:101",
            "doc_number:201",
            "doc_number:301",
            "doc_number:401"
        ]
    );
}

#[test]
fn test_and_matches_set_intersection() {
    let segment = people_segment();

    let q1 = RegexTermQuery::new("first_name", "jo.*");
    let q2 = RegexTermQuery::new("doc_id", "[0-9]*3");

    let only = |q: &RegexTermQuery| {
        QueryBuilder::new(&segment)
            .and([q.clone().into_ref()])
            .run()
            .unwrap()
            .external_doc_ids
    };
    let first = only(&q1);
    let second = only(&q2);
    let expected: Vec<String> = first
        .iter()
        .filter(|id| second.contains(id))
        .cloned()
        .collect();

    let both = QueryBuilder::new(&segment)
        .and([q1.into_ref(), q2.into_ref()])
        .run()
        .unwrap();

    // jon sits at i % 100 == 3, which always ends in 3
    assert_eq!(expected.len(), 5);
    assert_eq!(both.external_doc_ids, expected);
}

#[test]
fn test_mixed_leaf_kinds() {
    let segment = people_segment();

    let results = QueryBuilder::new(&segment)
        .and([
            PrefixQuery::new("first_name", "ke").into_ref(),
            TermQuery::new("doc_id", "201").into_ref(),
        ])
        .run()
        .unwrap();

    assert_eq!(results.external_doc_ids, vec!["doc_number:201"]);
}

#[test]
fn test_unknown_field_fails_the_query() {
    let segment = people_segment();

    let err = QueryBuilder::new(&segment)
        .and([RegexTermQuery::new("name", "kev.*").into_ref()])
        .run()
        .unwrap_err();

    assert!(matches!(err, IndexError::UnknownField(_)));
    assert_eq!(err.to_string(), "no field-id found for field: name");
}

#[test]
fn test_invalid_pattern_fails_the_query() {
    let segment = people_segment();

    let err = QueryBuilder::new(&segment)
        .and([RegexTermQuery::new("first_name", "kev(").into_ref()])
        .run()
        .unwrap_err();

    assert!(err.is_user_error());
    assert!(matches!(err, IndexError::InvalidPattern { .. }));
}

#[test]
fn test_oversized_pattern_is_rejected_before_dictionary_access() {
    let config = SegmentConfig::default().with_regex_size_limit(1 << 16);
    let mut segment = Segment::with_config(config).unwrap();
    segment
        .index_documents(
            ["ab", "ba", "aab", "bba", "abab"]
                .iter()
                .enumerate()
                .map(|(i, term)| SimpleDocument::new(format!("d{i}")).with_field("f", *term)),
        )
        .unwrap();

    let started = Instant::now();
    let err = QueryBuilder::new(&segment)
        .and([RegexTermQuery::new("f", "[ab]*a[ab]{20}").into_ref()])
        .run()
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(err, IndexError::InvalidPattern { .. }));
    assert!(!segment.dictionary("f").unwrap().is_loaded());

    // Small expansions of the same shape still run
    let results = QueryBuilder::new(&segment)
        .and([RegexTermQuery::new("f", "[ab]*a[ab]{1}").into_ref()])
        .run()
        .unwrap();
    assert_eq!(results.external_doc_ids, vec!["d0", "d2", "d4"]);
}

#[test]
fn test_concurrent_first_queries_share_one_dictionary_load() {
    let segment = people_segment();
    assert!(!segment.dictionary("last_name").unwrap().is_loaded());

    let results: Vec<Vec<String>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    QueryBuilder::new(&segment)
                        .and([RegexTermQuery::new("last_name", "(manning|smith)").into_ref()])
                        .run()
                        .unwrap()
                        .external_doc_ids
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for ids in &results {
        assert_eq!(ids, &vec!["doc_number:101", "doc_number:102"]);
    }
    assert!(segment.dictionary("last_name").unwrap().is_loaded());
}
