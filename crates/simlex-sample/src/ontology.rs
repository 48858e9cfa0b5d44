use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

use wordnet_db::WordNet;
use wordnet_morphy::Morphy;
use wordnet_similarity::{SimilarityError, Taxonomy};
use wordnet_types::{Pos, SynsetId, SynsetType};

/// Read-only lexical database the pair evaluator queries.
///
/// Implementations must be deterministic: the same word and POS always yield
/// the same senses in the same order.
pub trait LexicalOntology {
    type Sense: Copy + Eq + Hash + fmt::Debug;

    /// Sense candidates for `word` restricted to `pos`, in the ontology's sense order.
    fn senses(&self, word: &str, pos: Pos) -> Vec<Self::Sense>;

    /// The sense's own part of speech (satellites are distinct from head adjectives).
    fn sense_type(&self, sense: Self::Sense) -> Option<SynsetType>;

    /// Path similarity in `(0, 1]`, `None` when the senses are unrelated.
    fn path_similarity(&self, a: Self::Sense, b: Self::Sense) -> Option<f64>;

    fn lch_similarity(&self, a: Self::Sense, b: Self::Sense) -> Result<f64, SimilarityError>;

    fn wup_similarity(&self, a: Self::Sense, b: Self::Sense) -> Result<f64, SimilarityError>;

    /// Human-readable sense label for logs.
    fn sense_label(&self, sense: Self::Sense) -> String {
        format!("{sense:?}")
    }
}

/// [`LexicalOntology`] backed by a loaded WordNet and its morphy exception lists.
pub struct WordNetOntology<'wn> {
    morphy: &'wn Morphy,
    taxonomy: Taxonomy<'wn>,
}

impl<'wn> WordNetOntology<'wn> {
    pub fn new(wordnet: &'wn WordNet, morphy: &'wn Morphy) -> Self {
        Self {
            morphy,
            taxonomy: Taxonomy::new(wordnet),
        }
    }
}

impl LexicalOntology for WordNetOntology<'_> {
    type Sense = SynsetId;

    /// Base forms come from morphy; each form contributes its synsets in index order.
    fn senses(&self, word: &str, pos: Pos) -> Vec<SynsetId> {
        let wn = self.taxonomy.wordnet();
        let exists = |p, lemma: &str| wn.lemma_exists(p, lemma);
        let mut seen = HashSet::new();
        self.morphy
            .lemmas_for(pos, word, exists)
            .iter()
            .flat_map(|cand| wn.synsets_for_lemma(pos, &cand.lemma).iter().copied())
            .filter(|id| seen.insert(*id))
            .collect()
    }

    fn sense_type(&self, sense: SynsetId) -> Option<SynsetType> {
        self.taxonomy.wordnet().synset_type(sense)
    }

    fn path_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        self.taxonomy.path_similarity(a, b)
    }

    fn lch_similarity(&self, a: SynsetId, b: SynsetId) -> Result<f64, SimilarityError> {
        self.taxonomy.lch_similarity(a, b)
    }

    fn wup_similarity(&self, a: SynsetId, b: SynsetId) -> Result<f64, SimilarityError> {
        self.taxonomy.wup_similarity(a, b)
    }

    fn sense_label(&self, sense: SynsetId) -> String {
        self.taxonomy.node_name(sense.into())
    }
}
