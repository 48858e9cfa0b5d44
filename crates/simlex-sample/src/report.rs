//! Rendering of sampled pairs.
//!
//! The file form is `;`-separated with a `; ` separator between row fields;
//! the console form is tab-separated. Similarity scores are printed with two
//! decimals, SimLex scores in their shortest round-trip form.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::evaluator::WordPair;

pub const FILE_HEADER: &str = "mot 1;mot 2;simlex;path;LCH;WUP";
pub const CONSOLE_HEADER: &str = "mot 1\tmot 2\tSimLex\tpath\tLCH\tWUP";

/// The output file contents, header included.
pub fn render_file(pairs: &[WordPair]) -> String {
    render(FILE_HEADER, "; ", pairs)
}

/// The console table, header included.
pub fn render_console(pairs: &[WordPair]) -> String {
    render(CONSOLE_HEADER, "\t", pairs)
}

/// Render the whole file in memory, then write it in one go.
pub fn write_file(path: &Path, pairs: &[WordPair]) -> Result<()> {
    let contents = render_file(pairs);
    fs::write(path, contents).with_context(|| format!("write {}", path.display()))
}

fn render(header: &str, sep: &str, pairs: &[WordPair]) -> String {
    let mut out = String::with_capacity(header.len() + 1 + pairs.len() * 48);
    out.push_str(header);
    out.push('\n');
    for pair in pairs {
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{w1}{sep}{w2}{sep}{simlex:?}{sep}{path:.2}{sep}{lch:.2}{sep}{wup:.2}",
            w1 = pair.word1,
            w2 = pair.word2,
            simlex = pair.simlex,
            path = pair.path,
            lch = pair.lch,
            wup = pair.wup,
        );
    }
    out
}
