use std::path::PathBuf;

use wordnet_db::WordNet;
use wordnet_morphy::{CandidateSource, Morphy};
use wordnet_types::Pos;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("wordnet-db")
        .join("tests")
        .join("fixtures")
        .join("wn")
}

#[test]
fn reduces_inflections_against_fixture_dictionary() {
    let dir = fixture_dir();
    let wn = WordNet::load(&dir).expect("load wordnet");
    let morph = Morphy::load(&dir).expect("load morph");
    assert_eq!(morph.exception_count(), 7);
    let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);

    let mice = morph.lemmas_for(Pos::Noun, "mice", &exists);
    assert_eq!(mice.len(), 1);
    assert_eq!(mice[0].lemma, "mouse");
    assert_eq!(mice[0].source, CandidateSource::Exception);

    let cows = morph.lemmas_for(Pos::Noun, "cows", &exists);
    assert_eq!(cows.len(), 1);
    assert_eq!(cows[0].lemma, "cow");

    let knew = morph.lemmas_for(Pos::Verb, "knew", &exists);
    assert_eq!(knew[0].lemma, "know");

    // "modest" ends in a superlative suffix but is itself a lemma.
    let modest = morph.lemmas_for(Pos::Adj, "modest", &exists);
    assert_eq!(modest.len(), 1);
    assert_eq!(modest[0].source, CandidateSource::Surface);

    assert!(morph.lemmas_for(Pos::Noun, "unicorns", &exists).is_empty());
}
