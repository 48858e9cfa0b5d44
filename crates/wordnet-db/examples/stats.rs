use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use wordnet_db::{LoadMode, WordNet};
use wordnet_types::{Pos, SynsetType};

fn main() -> Result<()> {
    let dict_dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: cargo run -p wordnet-db --example stats -- <path-to-wordnet-dir>")?;

    let wn = WordNet::load_with_mode(&dict_dir, LoadMode::Mmap)
        .with_context(|| format!("loading WordNet from {}", dict_dir.display()))?;

    println!("Dictionary: {}", dict_dir.display());
    println!("Index entries: {}", wn.index_count());
    println!("Synsets      : {}", wn.synset_count());

    for pos in Pos::ALL {
        let mut synsets = 0usize;
        let mut tops = 0usize;
        let mut hypernym_edges = 0usize;
        let mut satellites = 0usize;
        for id in wn.synset_ids(pos) {
            synsets += 1;
            let edges = wn.hypernyms(id).count();
            hypernym_edges += edges;
            if edges == 0 {
                tops += 1;
            }
            if wn.synset_type(id) == Some(SynsetType::AdjSatellite) {
                satellites += 1;
            }
        }
        println!(
            "{:<5} synsets {:>6}  taxonomy tops {:>6}  hypernym edges {:>6}  satellites {:>6}",
            pos, synsets, tops, hypernym_edges, satellites
        );
    }

    // Spot-check a couple of lemmas to confirm lookup and naming.
    for (pos, lemma) in [(Pos::Noun, "dog"), (Pos::Verb, "run")] {
        let names: Vec<String> = wn
            .synsets_for_lemma(pos, lemma)
            .iter()
            .filter_map(|id| wn.synset_name(*id))
            .collect();
        println!("Lemma '{}' ({:?}): {}", lemma, pos, names.join(", "));
    }

    Ok(())
}
