use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::dataset::load_and_sample;
use crate::evaluator::WordPair;
use crate::ontology::LexicalOntology;
use crate::report;

/// Sample `input`, write the table to `output` and return the sampled pairs.
///
/// Nothing is written unless sampling succeeds.
pub fn run<O: LexicalOntology>(
    ontology: &O,
    input: &Path,
    output: &Path,
    seed: u64,
) -> Result<Vec<WordPair>> {
    let pairs = load_and_sample(ontology, input, seed)
        .with_context(|| format!("sampling {}", input.display()))?;
    report::write_file(output, &pairs)?;
    info!("wrote {} pairs to {}", pairs.len(), output.display());
    Ok(pairs)
}
