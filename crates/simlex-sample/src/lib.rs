pub mod dataset;
pub mod evaluator;
pub mod ontology;
pub mod pipeline;
pub mod report;

#[cfg(test)]
pub(crate) mod test_support;

pub use dataset::{Dataset, SampleError, load_and_sample};
pub use evaluator::{EvalError, WordPair, evaluate, parse_pos};
pub use ontology::{LexicalOntology, WordNetOntology};
pub use pipeline::run;
