use std::fs;
use std::path::Path;

use wordnet_db::{LoadMode, WordNet};
use wordnet_similarity::Taxonomy;
use wordnet_types::{Pos, SynsetId};

const ALPHA: u32 = 100;
const BETA: u32 = 200;
const GAMMA: u32 = 300;
const DELTA: u32 = 400;

/// Verb dictionary where alpha and beta are each other's hypernym and
/// beta also climbs gamma -> delta.
fn write_cyclic_dictionary(dir: &Path) {
    for pos in ["noun", "adj", "adv"] {
        fs::write(dir.join(format!("data.{pos}")), "").expect("write data");
        fs::write(dir.join(format!("index.{pos}")), "").expect("write index");
    }
    let data = [
        "00000100 29 v 01 alpha 0 001 @ 00000200 v 0000 00 | first",
        "00000200 29 v 01 beta 0 002 @ 00000100 v 0000 @ 00000300 v 0000 00 | second",
        "00000300 29 v 01 gamma 0 001 @ 00000400 v 0000 00 | third",
        "00000400 29 v 01 delta 0 000 00 | top",
    ];
    fs::write(dir.join("data.verb"), data.join("\n") + "\n").expect("write data.verb");
    let index = [
        "alpha v 1 1 @ 1 0 00000100",
        "beta v 1 1 @ 1 0 00000200",
        "delta v 1 0 1 0 00000400",
        "gamma v 1 1 @ 1 0 00000300",
    ];
    fs::write(dir.join("index.verb"), index.join("\n") + "\n").expect("write index.verb");
}

fn verb(offset: u32) -> SynsetId {
    SynsetId {
        pos: Pos::Verb,
        offset,
    }
}

#[test]
fn max_depth_does_not_depend_on_query_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cyclic_dictionary(dir.path());
    let wn = WordNet::load_with_mode(dir.path(), LoadMode::Owned).expect("load cyclic dictionary");

    let alpha_first = Taxonomy::new(&wn);
    assert_eq!(alpha_first.max_depth(verb(ALPHA)), 3);
    assert_eq!(alpha_first.max_depth(verb(BETA)), 2);

    let beta_first = Taxonomy::new(&wn);
    assert_eq!(beta_first.max_depth(verb(BETA)), 2);
    assert_eq!(beta_first.max_depth(verb(ALPHA)), 3);
    assert_eq!(beta_first.max_depth(verb(GAMMA)), 1);
    assert_eq!(beta_first.max_depth(verb(DELTA)), 0);
}

#[test]
fn taxonomy_depth_and_lch_are_stable_across_warmups() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_cyclic_dictionary(dir.path());
    let wn = WordNet::load_with_mode(dir.path(), LoadMode::Owned).expect("load cyclic dictionary");

    let cold = Taxonomy::new(&wn);
    let cold_lch = cold.lch_similarity(verb(ALPHA), verb(DELTA)).expect("lch");

    let warm = Taxonomy::new(&wn);
    for offset in [BETA, GAMMA, ALPHA] {
        warm.max_depth(verb(offset));
    }
    let warm_lch = warm.lch_similarity(verb(ALPHA), verb(DELTA)).expect("lch");

    assert_eq!(cold.taxonomy_depth(Pos::Verb, false), 3);
    assert_eq!(warm.taxonomy_depth(Pos::Verb, false), 3);
    assert_eq!(cold_lch, warm_lch);
    assert!((cold_lch - 2f64.ln()).abs() < 1e-9, "lch {cold_lch}");
}
