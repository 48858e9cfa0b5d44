use std::collections::{HashMap, HashSet};

use wordnet_similarity::SimilarityError;
use wordnet_types::{Pos, SynsetType};

use crate::ontology::LexicalOntology;

/// In-memory ontology whose LCH score is `10 * a + b` and WUP score `1 / (a + b)`,
/// so tests can tell which sense pair was measured.
#[derive(Default)]
pub(crate) struct FakeOntology {
    senses: HashMap<String, Vec<u32>>,
    types: HashMap<u32, SynsetType>,
    paths: HashMap<(u32, u32), f64>,
    default_path: Option<f64>,
    broken_lch: HashSet<u32>,
}

impl FakeOntology {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn word(mut self, word: &str, senses: &[(u32, SynsetType)]) -> Self {
        for &(sense, ty) in senses {
            self.types.insert(sense, ty);
        }
        self.senses
            .insert(word.to_string(), senses.iter().map(|(s, _)| *s).collect());
        self
    }

    pub(crate) fn path(mut self, a: u32, b: u32, score: f64) -> Self {
        self.paths.insert((a, b), score);
        self
    }

    pub(crate) fn default_path(mut self, score: f64) -> Self {
        self.default_path = Some(score);
        self
    }

    pub(crate) fn broken_lch(mut self, sense: u32) -> Self {
        self.broken_lch.insert(sense);
        self
    }

    /// Ontology where every listed word is a single noun sense and every pair scores 0.5.
    pub(crate) fn nouns(words: &[&str]) -> Self {
        words
            .iter()
            .enumerate()
            .fold(Self::new().default_path(0.5), |ontology, (i, word)| {
                ontology.word(word, &[(i as u32 + 1, SynsetType::Noun)])
            })
    }
}

impl LexicalOntology for FakeOntology {
    type Sense = u32;

    fn senses(&self, word: &str, _pos: Pos) -> Vec<u32> {
        self.senses.get(word).cloned().unwrap_or_default()
    }

    fn sense_type(&self, sense: u32) -> Option<SynsetType> {
        self.types.get(&sense).copied()
    }

    fn path_similarity(&self, a: u32, b: u32) -> Option<f64> {
        self.paths.get(&(a, b)).copied().or(self.default_path)
    }

    fn lch_similarity(&self, a: u32, b: u32) -> Result<f64, SimilarityError> {
        if self.broken_lch.contains(&a) || self.broken_lch.contains(&b) {
            return Err(SimilarityError::Disconnected);
        }
        Ok(f64::from(10 * a + b))
    }

    fn wup_similarity(&self, a: u32, b: u32) -> Result<f64, SimilarityError> {
        Ok(1.0 / f64::from(a + b))
    }
}
