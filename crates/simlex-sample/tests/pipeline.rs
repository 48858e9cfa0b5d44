use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use simlex_sample::{EvalError, SampleError, WordNetOntology, evaluate, run};
use wordnet_db::WordNet;
use wordnet_morphy::Morphy;
use wordnet_types::Pos;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("wordnet-db")
        .join("tests")
        .join("fixtures")
        .join("wn")
}

fn load() -> (WordNet, Morphy) {
    let dir = fixture_dir();
    let wn = WordNet::load(&dir).expect("load fixtures");
    let morphy = Morphy::load(&dir).expect("load exceptions");
    (wn, morphy)
}

const HIGH_ROWS: &[&str] = &[
    "inform;notify;V;9.25",
    "vanish;disappear;v;9.8",
    "cow;cattle;n;9.52;extra;fields",
    "student;pupil;n;9.35",
    "quick;rapid;a;9.7",
];

const LOW_ROWS: &[&str] = &[
    "get;put;v;1.98",
    "forget;know;v;0.92",
    "multiply;divide;v;1.75",
    "modest;flexible;a;0.98",
    "container;mouse;n;0.3",
];

const SKIPPED_ROWS: &[&str] = &[
    "cow;mouse;n;5.0",
    "new;ancient;a;0.5",
    "unicorn;cow;n;9.9",
    "cow;cattle;z;9.9",
];

fn write_input(dir: &Path, high: &[&str], low: &[&str]) -> PathBuf {
    let mut text = String::from("word1;word2;POS;SimLex999\n");
    for row in high.iter().chain(SKIPPED_ROWS).chain(low) {
        text.push_str(row);
        text.push('\n');
    }
    let path = dir.join("input_file.csv");
    fs::write(&path, text).unwrap();
    path
}

#[test]
fn writes_low_then_high_rows() {
    let (wn, morphy) = load();
    let ontology = WordNetOntology::new(&wn, &morphy);
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), HIGH_ROWS, LOW_ROWS);
    let output = dir.path().join("table.csv");

    let pairs = run(&ontology, &input, &output, 0).unwrap();
    assert_eq!(pairs.len(), 10);

    let written = fs::read_to_string(&output).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 11);
    assert_eq!(lines[0], "mot 1;mot 2;simlex;path;LCH;WUP");

    let low: HashSet<&str> = lines[1..6].iter().copied().collect();
    let expected_low: HashSet<&str> = [
        "get; put; 1.98; 0.25; 0.41; 0.40",
        "forget; know; 0.92; 0.33; 0.69; 0.50",
        "multiply; divide; 1.75; 0.33; 0.69; 0.33",
        "modest; flexible; 0.98; 0.33; -0.41; 0.50",
        "container; mouse; 0.3; 0.25; 1.50; 0.80",
    ]
    .into_iter()
    .collect();
    assert_eq!(low, expected_low);

    let high: HashSet<&str> = lines[6..].iter().copied().collect();
    let expected_high: HashSet<&str> = [
        "inform; notify; 9.25; 0.50; 1.10; 0.80",
        "vanish; disappear; 9.8; 1.00; 1.79; 1.00",
        "cow; cattle; 9.52; 1.00; 2.89; 1.00",
        "student; pupil; 9.35; 1.00; 2.89; 1.00",
        "quick; rapid; 9.7; 0.33; -0.41; 0.50",
    ]
    .into_iter()
    .collect();
    assert_eq!(high, expected_high);
}

#[test]
fn same_seed_writes_the_same_table() {
    let (wn, morphy) = load();
    let ontology = WordNetOntology::new(&wn, &morphy);
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), HIGH_ROWS, LOW_ROWS);
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    let a = run(&ontology, &input, &first, 11).unwrap();
    let b = run(&ontology, &input, &second, 11).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        fs::read_to_string(first).unwrap(),
        fs::read_to_string(second).unwrap()
    );
}

#[test]
fn insufficient_pairs_leave_no_output() {
    let (wn, morphy) = load();
    let ontology = WordNetOntology::new(&wn, &morphy);
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path(), &HIGH_ROWS[..4], LOW_ROWS);
    let output = dir.path().join("table.csv");

    let err = run(&ontology, &input, &output, 0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SampleError>(),
        Some(SampleError::InsufficientData { high: 4, low: 5, .. })
    ));
    assert!(!output.exists());
}

#[test]
fn short_rows_are_fatal() {
    let (wn, morphy) = load();
    let ontology = WordNetOntology::new(&wn, &morphy);
    let dir = tempfile::tempdir().unwrap();
    let mut rows = HIGH_ROWS.to_vec();
    rows.push("cow;cattle");
    let input = write_input(dir.path(), &rows, LOW_ROWS);
    let output = dir.path().join("table.csv");

    let err = run(&ontology, &input, &output, 0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SampleError>(),
        Some(SampleError::Malformed { line: 7, fields: 2, .. })
    ));
    assert!(!output.exists());
}

#[test]
fn inflected_words_resolve_through_morphy() {
    let (wn, morphy) = load();
    let ontology = WordNetOntology::new(&wn, &morphy);

    let pair = evaluate(&ontology, "mice", "container", Pos::Noun, 1.0).unwrap();
    assert_eq!(pair.word1, "mice");
    assert_eq!(pair.path, 0.25);
    assert!((pair.wup - 0.8).abs() < 1e-9);

    let pair = evaluate(&ontology, "cows", "kine", Pos::Noun, 9.5).unwrap();
    assert_eq!(pair.path, 1.0);
}

#[test]
fn head_adjectives_never_pair_with_satellites() {
    let (wn, morphy) = load();
    let ontology = WordNetOntology::new(&wn, &morphy);
    let err = evaluate(&ontology, "new", "ancient", Pos::Adj, 0.5).unwrap_err();
    assert!(matches!(err, EvalError::NoMatchingSense { .. }));
}
