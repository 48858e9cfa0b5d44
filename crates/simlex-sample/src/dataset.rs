//! SimLex input parsing and stratified sampling.
//!
//! The input is a `;`-separated file whose first line is a header. Each row
//! carries `word1;word2;pos;simlex[;...]`; trailing fields are ignored. Pairs
//! scoring above [`HIGH_SIMILARITY`] or below [`LOW_SIMILARITY`] are kept and
//! [`SAMPLE_PER_BUCKET`] pairs are drawn from each bucket.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::evaluator::{WordPair, evaluate, parse_pos};
use crate::ontology::LexicalOntology;

/// Pairs scoring strictly above this land in the high bucket.
pub const HIGH_SIMILARITY: f64 = 9.0;
/// Pairs scoring strictly below this land in the low bucket.
pub const LOW_SIMILARITY: f64 = 2.0;
pub const SAMPLE_PER_BUCKET: usize = 5;

const DELIMITER: char = ';';
const MIN_FIELDS: usize = 4;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error(
        "line {line}: expected at least {min} fields, found {fields}: {content:?}",
        min = MIN_FIELDS
    )]
    Malformed {
        line: usize,
        fields: usize,
        content: String,
    },
    #[error("line {line}: invalid simlex score {value:?}")]
    InvalidScore { line: usize, value: String },
    #[error("not enough qualifying pairs: {high} above 9, {low} below 2, need {needed} of each")]
    InsufficientData {
        high: usize,
        low: usize,
        needed: usize,
    },
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
}

/// Which sampling bucket a pair fell into.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Bucket {
    High,
    Low,
}

impl Bucket {
    pub fn for_score(simlex: f64) -> Option<Self> {
        if simlex > HIGH_SIMILARITY {
            Some(Bucket::High)
        } else if simlex < LOW_SIMILARITY {
            Some(Bucket::Low)
        } else {
            None
        }
    }
}

/// Evaluated pairs split by SimLex score, in input order.
#[derive(Debug, Default)]
pub struct Dataset {
    high: Vec<WordPair>,
    low: Vec<WordPair>,
}

struct Row<'a> {
    word1: &'a str,
    word2: &'a str,
    tag: &'a str,
    simlex: f64,
}

impl Dataset {
    /// Read and evaluate every row of the file at `path`.
    pub fn load<O: LexicalOntology>(ontology: &O, path: &Path) -> Result<Self, SampleError> {
        let file = File::open(path)?;
        Self::from_reader(ontology, BufReader::new(file))
    }

    /// Read and evaluate every row from `reader`. The first line is always skipped.
    ///
    /// Rows that fail to evaluate are logged and dropped. Structural problems
    /// (too few fields, unparseable score) abort the whole read.
    pub fn from_reader<O, R>(ontology: &O, reader: R) -> Result<Self, SampleError>
    where
        O: LexicalOntology,
        R: BufRead,
    {
        let mut dataset = Dataset::default();
        let mut rows = 0usize;
        let mut skipped = 0usize;
        for (idx, line) in reader.lines().enumerate().skip(1) {
            let line = line?;
            let row = parse_row(idx + 1, &line)?;
            rows += 1;

            let pair = parse_pos(row.word1, row.word2, row.tag)
                .and_then(|pos| evaluate(ontology, row.word1, row.word2, pos, row.simlex));
            match pair {
                Ok(pair) => {
                    if dataset.push(pair).is_none() {
                        debug!("line {}: score outside both buckets", idx + 1);
                    }
                }
                Err(err) => {
                    warn!("line {}: skipping pair: {err}", idx + 1);
                    skipped += 1;
                }
            }
        }
        info!(
            "Evaluated {} of {} rows: {} high, {} low",
            rows - skipped,
            rows,
            dataset.high.len(),
            dataset.low.len()
        );
        Ok(dataset)
    }

    /// File `pair` into its bucket; mid-range pairs are discarded.
    pub fn push(&mut self, pair: WordPair) -> Option<Bucket> {
        let bucket = Bucket::for_score(pair.simlex)?;
        match bucket {
            Bucket::High => self.high.push(pair),
            Bucket::Low => self.low.push(pair),
        }
        Some(bucket)
    }

    pub fn high(&self) -> &[WordPair] {
        &self.high
    }

    pub fn low(&self) -> &[WordPair] {
        &self.low
    }

    /// Draw [`SAMPLE_PER_BUCKET`] pairs from each bucket without replacement.
    ///
    /// The low sample comes first, then the high sample; within each the
    /// pairs keep the order they were drawn in. The same seed over the same
    /// dataset always yields the same result.
    pub fn sample(self, seed: u64) -> Result<Vec<WordPair>, SampleError> {
        if self.high.len() < SAMPLE_PER_BUCKET || self.low.len() < SAMPLE_PER_BUCKET {
            return Err(SampleError::InsufficientData {
                high: self.high.len(),
                low: self.low.len(),
                needed: SAMPLE_PER_BUCKET,
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let mut picked = draw(&mut rng, self.low);
        picked.extend(draw(&mut rng, self.high));
        debug!("Sampled {} pairs with seed {seed}", picked.len());
        Ok(picked)
    }
}

/// Load, evaluate and sample the SimLex file at `path`.
pub fn load_and_sample<O: LexicalOntology>(
    ontology: &O,
    path: &Path,
    seed: u64,
) -> Result<Vec<WordPair>, SampleError> {
    Dataset::load(ontology, path)?.sample(seed)
}

fn parse_row(line_no: usize, line: &str) -> Result<Row<'_>, SampleError> {
    let fields: Vec<&str> = line.split(DELIMITER).collect();
    if fields.len() < MIN_FIELDS {
        return Err(SampleError::Malformed {
            line: line_no,
            fields: fields.len(),
            content: line.to_string(),
        });
    }
    let simlex = fields[3]
        .trim()
        .parse::<f64>()
        .map_err(|_| SampleError::InvalidScore {
            line: line_no,
            value: fields[3].to_string(),
        })?;
    Ok(Row {
        word1: fields[0],
        word2: fields[1],
        tag: fields[2],
        simlex,
    })
}

fn draw<R: Rng>(rng: &mut R, bucket: Vec<WordPair>) -> Vec<WordPair> {
    let indices = rand::seq::index::sample(rng, bucket.len(), SAMPLE_PER_BUCKET);
    let mut slots: Vec<Option<WordPair>> = bucket.into_iter().map(Some).collect();
    indices.iter().filter_map(|i| slots[i].take()).collect()
}
