use std::fmt;

use thiserror::Error;
use tracing::debug;
use wordnet_similarity::SimilarityError;
use wordnet_types::Pos;

use crate::ontology::LexicalOntology;

/// A word pair scored against the ontology.
///
/// `path`, `lch` and `wup` all come from the same sense pair: the one with
/// the highest path similarity.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPair {
    pub word1: String,
    pub word2: String,
    pub pos: Pos,
    pub simlex: f64,
    pub path: f64,
    pub lch: f64,
    pub wup: f64,
}

/// Per-pair failures. The sampler logs these and moves on to the next row.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("no sense pair with a shared part of speech for {word1}-{word2}")]
    NoMatchingSense { word1: String, word2: String },
    #[error("could not compute similarity for {word1}-{word2}: {source}")]
    Computation {
        word1: String,
        word2: String,
        #[source]
        source: SimilarityError,
    },
    #[error("unknown part of speech {tag:?} for {word1}-{word2}")]
    UnknownPartOfSpeech {
        word1: String,
        word2: String,
        tag: String,
    },
}

/// Parse an input POS tag (`n`, `v`, `a`, `s`, `r`; case-insensitive).
pub fn parse_pos(word1: &str, word2: &str, tag: &str) -> Result<Pos, EvalError> {
    let trimmed = tag.trim();
    let mut chars = trimmed.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Pos::from_char(c.to_ascii_lowercase()),
        _ => None,
    }
    .ok_or_else(|| EvalError::UnknownPartOfSpeech {
        word1: word1.to_string(),
        word2: word2.to_string(),
        tag: trimmed.to_string(),
    })
}

/// Score `word1`/`word2` under `pos`.
///
/// Sense pairs are scanned with `word1` in the outer loop, both in ontology
/// order. Only pairs whose senses have the same type qualify; the first pair
/// with the strictly highest path similarity is kept.
pub fn evaluate<O: LexicalOntology>(
    ontology: &O,
    word1: &str,
    word2: &str,
    pos: Pos,
    simlex: f64,
) -> Result<WordPair, EvalError> {
    let senses1 = ontology.senses(word1, pos);
    let senses2 = ontology.senses(word2, pos);

    let Some((best1, best2, path)) = best_pair(ontology, &senses1, &senses2) else {
        return Err(EvalError::NoMatchingSense {
            word1: word1.to_string(),
            word2: word2.to_string(),
        });
    };
    debug!(
        "{word1}-{word2}: best senses {} / {} (path {path})",
        ontology.sense_label(best1),
        ontology.sense_label(best2)
    );

    let computation = |source| EvalError::Computation {
        word1: word1.to_string(),
        word2: word2.to_string(),
        source,
    };
    let lch = ontology
        .lch_similarity(best1, best2)
        .map_err(computation)?;
    let wup = ontology
        .wup_similarity(best1, best2)
        .map_err(computation)?;

    Ok(WordPair {
        word1: word1.to_string(),
        word2: word2.to_string(),
        pos,
        simlex,
        path,
        lch,
        wup,
    })
}

fn best_pair<O: LexicalOntology>(
    ontology: &O,
    senses1: &[O::Sense],
    senses2: &[O::Sense],
) -> Option<(O::Sense, O::Sense, f64)> {
    let mut best: Option<(O::Sense, O::Sense, f64)> = None;
    for &a in senses1 {
        let Some(type_a) = ontology.sense_type(a) else {
            continue;
        };
        for &b in senses2 {
            if ontology.sense_type(b) != Some(type_a) {
                continue;
            }
            let Some(score) = ontology.path_similarity(a, b) else {
                continue;
            };
            let threshold = best.map_or(0.0, |(_, _, top)| top);
            if score > threshold {
                best = Some((a, b, score));
            }
        }
    }
    best
}

impl fmt::Display for WordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "The pair {}-{} ({}) has:", self.word1, self.word2, self.pos)?;
        writeln!(f, "  - a SimLex score of {:?},", self.simlex)?;
        writeln!(f, "  - a path similarity of {},", self.path)?;
        writeln!(f, "  - a Leacock-Chodorow similarity of {}, and", self.lch)?;
        write!(f, "  - a Wu-Palmer similarity of {}.", self.wup)
    }
}
