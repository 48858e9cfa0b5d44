//! WordNet-style morphological processing (morphy).
//!
//! Follows the classic morphy algorithm: check exceptions, apply suffix
//! rules, and verify candidates via a caller-provided lemma existence
//! predicate. The crate is decoupled from any particular loader; it only
//! depends on `Pos` and the callback you supply.
//!
//! # How it works
//! 1. If the surface form has an exception entry (`*.exc`), the candidates are
//!    the surface form followed by its listed base forms.
//! 2. Otherwise, the candidates are the surface form followed by one pass of
//!    the POS-specific suffix rules.
//! 3. Only candidates the predicate accepts are kept, deduplicated in order.
//! 4. If step 2 found nothing, the rules are applied again to the generated
//!    forms until something matches or no rule applies.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_morphy::Morphy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dict = "/path/to/wordnet";
//! let wn = WordNet::load_with_mode(dict, LoadMode::Mmap)?;
//! let morph = Morphy::load(dict)?;
//! let exists = |pos, lemma: &str| wn.lemma_exists(pos, lemma);
//!
//! for cand in morph.lemmas_for(Pos::Noun, "mice", exists) {
//!     println!("{:?}: {}", cand.source, cand.lemma);
//! }
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use wordnet_types::Pos;

/// Where a candidate lemma originated.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CandidateSource {
    Surface,
    Exception,
    Rule {
        suffix: &'static str,
        replacement: &'static str,
    },
}

/// A lemma candidate paired with its POS and provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LemmaCandidate<'a> {
    pub pos: Pos,
    pub lemma: Cow<'a, str>,
    pub source: CandidateSource,
}

/// Morphy parameterised by caller-provided existence checks.
#[derive(Default)]
pub struct Morphy {
    exceptions: HashMap<Pos, HashMap<String, Vec<String>>>,
}

impl Morphy {
    /// Load morphy exception lists (`*.exc`) from a WordNet dict directory.
    ///
    /// Files are optional; missing ones are treated as empty.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dict_dir.as_ref();
        let mut exceptions = HashMap::new();
        for pos in Pos::ALL {
            exceptions.insert(pos, load_exc(dir.join(format!("{}.exc", pos.file_suffix())))?);
        }
        Ok(Self { exceptions })
    }

    /// Morphy with no exception lists; only suffix rules apply.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of exception entries across all parts of speech.
    pub fn exception_count(&self) -> usize {
        self.exceptions.values().map(HashMap::len).sum()
    }

    /// Generate base forms for a surface form, with provenance.
    ///
    /// The callback `lemma_exists` typically delegates to `WordNet::lemma_exists`
    /// so this crate stays ignorant of any concrete database layout.
    pub fn lemmas_for<'a, F>(
        &'a self,
        pos: Pos,
        surface: &str,
        lemma_exists: F,
    ) -> Vec<LemmaCandidate<'a>>
    where
        F: Fn(Pos, &str) -> bool,
    {
        let norm_surface = normalize(surface);
        let surface_candidate = LemmaCandidate {
            pos,
            lemma: Cow::Owned(norm_surface.clone()),
            source: CandidateSource::Surface,
        };

        if let Some(entries) = self
            .exceptions
            .get(&pos)
            .and_then(|exc_map| exc_map.get(&norm_surface))
        {
            let listed = entries.iter().map(|lemma| LemmaCandidate {
                pos,
                lemma: Cow::Borrowed(lemma.as_str()),
                source: CandidateSource::Exception,
            });
            return filter_existing(
                std::iter::once(surface_candidate).chain(listed),
                &lemma_exists,
            );
        }

        let mut forms = apply_rules(pos, std::slice::from_ref(&surface_candidate));
        let found = filter_existing(
            std::iter::once(surface_candidate).chain(forms.iter().cloned()),
            &lemma_exists,
        );
        if !found.is_empty() {
            return found;
        }

        while !forms.is_empty() {
            forms = apply_rules(pos, &forms);
            let found = filter_existing(forms.iter().cloned(), &lemma_exists);
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }
}

fn load_exc(path: PathBuf) -> Result<HashMap<String, Vec<String>>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }
    let file =
        File::open(&path).with_context(|| format!("open exception file {}", path.display()))?;
    let reader = BufReader::new(file);
    let mut map = HashMap::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line =
            line.with_context(|| format!("read line {} in {}", lineno + 1, path.display()))?;
        let mut parts = line.split_whitespace();
        let surface = match parts.next() {
            Some(s) => normalize(s),
            None => continue,
        };
        let lemmas: Vec<String> = parts.map(normalize).collect();
        if !lemmas.is_empty() {
            map.insert(surface, lemmas);
        }
    }
    Ok(map)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase().replace(' ', "_")
}

fn filter_existing<'a, I, F>(candidates: I, lemma_exists: &F) -> Vec<LemmaCandidate<'a>>
where
    I: IntoIterator<Item = LemmaCandidate<'a>>,
    F: Fn(Pos, &str) -> bool,
{
    let mut seen: HashSet<Cow<'a, str>> = HashSet::new();
    candidates
        .into_iter()
        .filter(|cand| lemma_exists(cand.pos, &cand.lemma))
        .filter(|cand| seen.insert(cand.lemma.clone()))
        .collect()
}

fn apply_rules<'a>(pos: Pos, forms: &[LemmaCandidate<'a>]) -> Vec<LemmaCandidate<'a>> {
    let mut out = Vec::new();
    for form in forms {
        for &(suffix, replacement) in rules_for(pos) {
            if let Some(stem) = form.lemma.strip_suffix(suffix) {
                out.push(LemmaCandidate {
                    pos,
                    lemma: Cow::Owned(format!("{stem}{replacement}")),
                    source: CandidateSource::Rule {
                        suffix,
                        replacement,
                    },
                });
            }
        }
    }
    out
}

fn rules_for(pos: Pos) -> &'static [(&'static str, &'static str)] {
    match pos {
        Pos::Noun => &[
            ("s", ""),
            ("ses", "s"),
            ("ves", "f"),
            ("xes", "x"),
            ("zes", "z"),
            ("ches", "ch"),
            ("shes", "sh"),
            ("men", "man"),
            ("ies", "y"),
        ],
        Pos::Verb => &[
            ("s", ""),
            ("ies", "y"),
            ("es", "e"),
            ("es", ""),
            ("ed", "e"),
            ("ed", ""),
            ("ing", "e"),
            ("ing", ""),
        ],
        Pos::Adj => &[("er", ""), ("est", ""), ("er", "e"), ("est", "e")],
        Pos::Adv => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_exists(targets: &[(&str, Pos)]) -> impl Fn(Pos, &str) -> bool {
        let set: HashSet<(Pos, String)> = targets
            .iter()
            .map(|(lemma, pos)| (*pos, normalize(lemma)))
            .collect();
        move |pos, lemma| set.contains(&(pos, normalize(lemma)))
    }

    #[test]
    fn exceptions_short_circuit_rules() {
        let mut morph = Morphy::empty();
        morph.exceptions.insert(
            Pos::Noun,
            HashMap::from([("mice".into(), vec!["mouse".into()])]),
        );

        let candidates = morph.lemmas_for(
            Pos::Noun,
            "Mice",
            fake_exists(&[("mouse", Pos::Noun), ("mic", Pos::Noun)]),
        );
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].source, CandidateSource::Exception);
        assert_eq!(candidates[0].lemma, "mouse");
    }

    #[test]
    fn surface_comes_before_rule_hits() {
        let morph = Morphy::empty();
        let candidates = morph.lemmas_for(
            Pos::Verb,
            "axes",
            fake_exists(&[("axes", Pos::Verb), ("axe", Pos::Verb), ("ax", Pos::Verb)]),
        );
        let lemmas: Vec<&str> = candidates.iter().map(|c| c.lemma.as_ref()).collect();
        assert_eq!(lemmas, vec!["axes", "axe", "ax"]);
        assert_eq!(candidates[0].source, CandidateSource::Surface);
        assert_eq!(
            candidates[1].source,
            CandidateSource::Rule {
                suffix: "s",
                replacement: ""
            }
        );
    }

    #[test]
    fn rules_reapply_until_a_form_exists() {
        let morph = Morphy::empty();
        // "wolveses" -> "wolves" -> "wolf" takes two passes.
        let candidates =
            morph.lemmas_for(Pos::Noun, "wolveses", fake_exists(&[("wolf", Pos::Noun)]));
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lemma, "wolf");
    }

    #[test]
    fn adverbs_have_no_rules() {
        let morph = Morphy::empty();
        let candidates = morph.lemmas_for(Pos::Adv, "quickly", fake_exists(&[("quick", Pos::Adv)]));
        assert!(candidates.is_empty());
    }
}
