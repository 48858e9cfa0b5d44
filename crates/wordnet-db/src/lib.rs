//! Load WordNet dictionaries for taxonomy queries with zero-copy text.
//!
//! This crate ingests the canonical `data.*`/`index.*` files, keeps the fields
//! similarity measures depend on (`ss_type`, pointer kinds and targets, sense
//! order from the index) and exposes borrowed `&str` slices for all text.
//! Callers choose between memory-mapped files or owned buffers at runtime via
//! [`LoadMode`].
//!
//! Public access is read-only (no `pub` fields), leaving room to evolve
//! internal storage while keeping a stable API surface.
//!
//! # Features
//! - Zero-copy text: lemmas and pointer symbols borrow from the original bytes.
//! - Sense order: [`WordNet::synsets_for_lemma`] returns synsets in the order
//!   the index lists them, which is the order sense numbers are assigned in.
//! - Taxonomy edges: [`WordNet::hypernyms`] walks `@`/`@i` pointers without
//!   materialising synset views.
//! - Stable iteration: [`WordNet::synset_ids`] yields ids in offset order.
//! - Canonical names: [`WordNet::synset_name`] renders `dog.n.01` style ids.
//!
//! # Example
//! ```no_run
//! use wordnet_db::{LoadMode, WordNet};
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load_with_mode("/path/to/wordnet", LoadMode::Mmap)?;
//! for sid in wn.synsets_for_lemma(Pos::Noun, "dog") {
//!     let parents: Vec<_> = wn.hypernyms(*sid).filter_map(|h| wn.synset_name(h)).collect();
//!     println!("{:?} -> {:?}", wn.synset_name(*sid), parents);
//! }
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p wordnet-db --example stats -- <dict>`.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use memmap2::Mmap;
use tracing::debug;
use wordnet_types::{Pointer, PointerKind, Pos, Synset, SynsetId, SynsetType, strip_adj_marker};

/// Strategy for loading dictionary files.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadMode {
    /// Memory-map each WordNet file (fast, zero-copy).
    Mmap,
    /// Read each file into an owned buffer (portable fallback).
    Owned,
}

enum Buffer {
    Mmap(Mmap),
    Owned(Vec<u8>),
}

impl Buffer {
    fn as_slice(&self) -> &[u8] {
        match self {
            Buffer::Mmap(m) => m.as_ref(),
            Buffer::Owned(v) => v.as_slice(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum FileKind {
    Data(Pos),
    Index(Pos),
}

#[derive(Clone, Copy)]
struct TextRef {
    file: FileKind,
    start: usize,
    len: usize,
}

struct DictFiles {
    data: [Buffer; 4],
    index: [Buffer; 4],
}

impl DictFiles {
    fn load(dict_dir: &Path, mode: LoadMode) -> Result<Self> {
        let load = |prefix: &str, pos: Pos| {
            load_file(dict_dir.join(format!("{prefix}.{}", pos.file_suffix())), mode)
        };
        Ok(Self {
            data: [
                load("data", Pos::Noun)?,
                load("data", Pos::Verb)?,
                load("data", Pos::Adj)?,
                load("data", Pos::Adv)?,
            ],
            index: [
                load("index", Pos::Noun)?,
                load("index", Pos::Verb)?,
                load("index", Pos::Adj)?,
                load("index", Pos::Adv)?,
            ],
        })
    }

    fn bytes(&self, file: FileKind) -> &[u8] {
        match file {
            FileKind::Data(pos) => self.data[pos.index()].as_slice(),
            FileKind::Index(pos) => self.index[pos.index()].as_slice(),
        }
    }

    fn text(&self, r: TextRef) -> &str {
        let bytes = self.bytes(r.file);
        let slice = &bytes[r.start..r.start + r.len];
        std::str::from_utf8(slice).expect("wordnet text is valid utf8")
    }
}

struct PointerData {
    symbol: TextRef,
    kind: PointerKind,
    target: SynsetId,
}

struct SynsetData {
    id: SynsetId,
    synset_type: SynsetType,
    words: Vec<TextRef>,
    pointers: Vec<PointerData>,
}

/// In-memory view of a WordNet dictionary backed by mmap or owned buffers.
pub struct WordNet {
    files: DictFiles,
    synsets: HashMap<SynsetId, SynsetData>,
    ids_by_pos: [Vec<SynsetId>; 4],
    lemma_to_synsets: HashMap<(Pos, String), Vec<SynsetId>>,
}

impl WordNet {
    /// Load WordNet from a directory containing `data.*` and `index.*` files.
    ///
    /// Defaults to memory-mapping the source files. Use [`WordNet::load_with_mode`]
    /// to force owned buffers instead.
    pub fn load(dict_dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_with_mode(dict_dir, LoadMode::Mmap)
    }

    /// Load WordNet choosing between mmap and owned buffers at runtime.
    pub fn load_with_mode(dict_dir: impl AsRef<Path>, mode: LoadMode) -> Result<Self> {
        let dir = dict_dir.as_ref();
        for prefix in ["data", "index"] {
            for pos in Pos::ALL {
                let path = dir.join(format!("{prefix}.{}", pos.file_suffix()));
                if !path.exists() {
                    anyhow::bail!("missing required WordNet file: {}", path.display());
                }
            }
        }

        let files = DictFiles::load(dir, mode)?;

        let mut lemma_to_synsets = HashMap::new();
        let mut synsets = HashMap::new();
        for pos in Pos::ALL {
            parse_index(
                files.bytes(FileKind::Index(pos)),
                FileKind::Index(pos),
                pos,
                &mut lemma_to_synsets,
            )?;
            parse_data(
                files.bytes(FileKind::Data(pos)),
                FileKind::Data(pos),
                pos,
                &mut synsets,
            )?;
        }
        debug!(
            "parsed {} index entries and {} synsets from {}",
            lemma_to_synsets.len(),
            synsets.len(),
            dir.display()
        );

        let mut ids_by_pos: [Vec<SynsetId>; 4] = Default::default();
        for id in synsets.keys() {
            ids_by_pos[id.pos.index()].push(*id);
        }
        for ids in &mut ids_by_pos {
            ids.sort_unstable();
        }

        Ok(Self {
            files,
            synsets,
            ids_by_pos,
            lemma_to_synsets,
        })
    }

    /// Check whether a lemma exists for the given POS according to index files.
    pub fn lemma_exists(&self, pos: Pos, lemma: &str) -> bool {
        let key = (pos, normalize_lemma(lemma));
        self.lemma_to_synsets.contains_key(&key)
    }

    /// Return the synsets associated with a lemma in sense order, or an empty slice.
    pub fn synsets_for_lemma(&self, pos: Pos, lemma: &str) -> &[SynsetId] {
        static EMPTY: [SynsetId; 0] = [];
        let key = (pos, normalize_lemma(lemma));
        self.lemma_to_synsets
            .get(&key)
            .map(|v| v.as_slice())
            .unwrap_or(&EMPTY)
    }

    /// Fetch a `Synset` by id if loaded.
    pub fn get_synset(&self, id: SynsetId) -> Option<Synset<'_>> {
        self.synsets.get(&id).map(|syn| self.make_synset_view(syn))
    }

    /// The `ss_type` of a loaded synset; distinguishes satellites from head adjectives.
    pub fn synset_type(&self, id: SynsetId) -> Option<SynsetType> {
        self.synsets.get(&id).map(|s| s.synset_type)
    }

    /// Hypernym and instance-hypernym targets of a synset, in pointer order.
    ///
    /// Unknown ids yield nothing.
    pub fn hypernyms(&self, id: SynsetId) -> impl Iterator<Item = SynsetId> + '_ {
        self.synsets
            .get(&id)
            .into_iter()
            .flat_map(|s| s.pointers.iter())
            .filter(|p| p.kind.is_hypernym())
            .map(|p| p.target)
    }

    /// Ids of every synset stored in `data.<pos>` in offset order, satellites
    /// included for adjectives.
    pub fn synset_ids(&self, pos: Pos) -> impl Iterator<Item = SynsetId> + '_ {
        self.ids_by_pos[pos.index()].iter().copied()
    }

    /// Canonical `lemma.t.NN` name of a synset.
    ///
    /// `lemma` is the synset's first word, lowercased and without adjective
    /// markers; `t` is the `ss_type` character; `NN` is the 1-based position
    /// of the synset in that lemma's index entry. Falls back to the offset
    /// when the lemma is missing from the index.
    pub fn synset_name(&self, id: SynsetId) -> Option<String> {
        let data = self.synsets.get(&id)?;
        let first = data.words.first()?;
        let lemma = strip_adj_marker(self.files.text(*first)).to_ascii_lowercase();
        let ss_type = data.synset_type.to_char();
        let sense = self
            .synsets_for_lemma(id.pos, &lemma)
            .iter()
            .position(|sid| *sid == id);
        Some(match sense {
            Some(n) => format!("{lemma}.{ss_type}.{:02}", n + 1),
            None => format!("{lemma}.{ss_type}.{:08}", id.offset),
        })
    }

    /// Number of index entries.
    pub fn index_count(&self) -> usize {
        self.lemma_to_synsets.len()
    }

    /// Number of synsets.
    pub fn synset_count(&self) -> usize {
        self.synsets.len()
    }

    fn make_synset_view<'a>(&'a self, data: &'a SynsetData) -> Synset<'a> {
        let words = data.words.iter().map(|w| self.files.text(*w)).collect();
        let pointers = data
            .pointers
            .iter()
            .map(|p| Pointer {
                symbol: self.files.text(p.symbol),
                kind: p.kind,
                target: p.target,
            })
            .collect();

        Synset {
            id: data.id,
            synset_type: data.synset_type,
            words,
            pointers,
        }
    }
}

fn load_file(path: PathBuf, mode: LoadMode) -> Result<Buffer> {
    match mode {
        LoadMode::Mmap => {
            let file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            unsafe { Mmap::map(&file) }
                .map(Buffer::Mmap)
                .with_context(|| format!("mmap {}", path.display()))
        }
        LoadMode::Owned => {
            let mut file = File::open(&path).with_context(|| format!("open {}", path.display()))?;
            let mut buf = Vec::new();
            file.read_to_end(&mut buf)
                .with_context(|| format!("read {}", path.display()))?;
            Ok(Buffer::Owned(buf))
        }
    }
}

fn parse_index(
    bytes: &[u8],
    file: FileKind,
    pos: Pos,
    lemma_to_synsets: &mut HashMap<(Pos, String), Vec<SynsetId>>,
) -> Result<()> {
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        // License header lines start with whitespace.
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)?;
        let tokens: Vec<&str> = line_str.split_ascii_whitespace().collect();
        if tokens.len() < 6 {
            anyhow::bail!(
                "{:?}:{} malformed index line (too few tokens)",
                file,
                lineno + 1
            );
        }

        let lemma_key = normalize_lemma(tokens[0]);

        let synset_cnt: usize = tokens[2]
            .parse()
            .with_context(|| format!("index {:?}:{} synset_cnt", file, lineno + 1))?;
        let p_cnt: usize = tokens[3]
            .parse()
            .with_context(|| format!("index {:?}:{} p_cnt", file, lineno + 1))?;

        // Pointer symbols, sense_cnt and tagsense_cnt precede the offsets.
        let idx = 4 + p_cnt + 2;
        if tokens.len() < idx {
            anyhow::bail!("{:?}:{} pointer count mismatch", file, lineno + 1);
        }

        let offsets: Vec<u32> = tokens[idx..]
            .iter()
            .map(|t| {
                t.parse::<u32>()
                    .with_context(|| format!("index {:?}:{} synset_offsets", file, lineno + 1))
            })
            .collect::<Result<_>>()?;
        if offsets.len() != synset_cnt {
            anyhow::bail!(
                "{:?}:{} synset_cnt mismatch (expected {}, got {})",
                file,
                lineno + 1,
                synset_cnt,
                offsets.len()
            );
        }

        lemma_to_synsets.insert(
            (pos, lemma_key),
            offsets
                .into_iter()
                .map(|offset| SynsetId { pos, offset })
                .collect(),
        );
    }

    Ok(())
}

fn parse_data(
    bytes: &[u8],
    file: FileKind,
    pos: Pos,
    synsets: &mut HashMap<SynsetId, SynsetData>,
) -> Result<()> {
    for (lineno, raw_line) in bytes.split(|b| *b == b'\n').enumerate() {
        let line = strip_cr(raw_line);
        if line.is_empty() || matches!(line.first(), Some(b' ' | b'\t')) {
            continue;
        }
        let line_str = std::str::from_utf8(line)?;
        // The gloss after `|` is not needed for taxonomy queries.
        let left = line_str.split_once('|').map_or(line_str, |(l, _)| l).trim();

        let tokens: Vec<&str> = left.split_ascii_whitespace().collect();
        if tokens.len() < 4 {
            anyhow::bail!("{:?}:{} malformed data line", file, lineno + 1);
        }

        let offset: u32 = tokens[0]
            .parse()
            .with_context(|| format!("{:?}:{} offset", file, lineno + 1))?;
        let ss_type_char = tokens[2]
            .chars()
            .next()
            .ok_or_else(|| anyhow::anyhow!("{:?}:{} missing ss_type", file, lineno + 1))?;
        let synset_type = SynsetType::from_char(ss_type_char).ok_or_else(|| {
            anyhow::anyhow!("{:?}:{} invalid ss_type {}", file, lineno + 1, ss_type_char)
        })?;
        if synset_type.pos() != pos {
            anyhow::bail!(
                "{:?}:{} ss_type {} does not belong in this file",
                file,
                lineno + 1,
                ss_type_char
            );
        }
        let w_cnt: usize = usize::from_str_radix(tokens[3], 16)
            .with_context(|| format!("{:?}:{} w_cnt", file, lineno + 1))?;

        let mut idx = 4;
        if tokens.len() < idx + (w_cnt * 2) {
            anyhow::bail!("{:?}:{} not enough word/lex_id pairs", file, lineno + 1);
        }
        // Each word is followed by its lex_id.
        let words: Vec<TextRef> = tokens[idx..idx + w_cnt * 2]
            .iter()
            .step_by(2)
            .map(|word| text_ref_str(file, bytes, word))
            .collect();
        idx += w_cnt * 2;

        if tokens.len() <= idx {
            anyhow::bail!("{:?}:{} missing pointer count", file, lineno + 1);
        }
        let p_cnt: usize = tokens[idx]
            .parse()
            .with_context(|| format!("{:?}:{} p_cnt", file, lineno + 1))?;
        idx += 1;

        let mut pointers = Vec::with_capacity(p_cnt);
        for _ in 0..p_cnt {
            if tokens.len() < idx + 4 {
                anyhow::bail!("{:?}:{} incomplete pointer block", file, lineno + 1);
            }
            let symbol = tokens[idx];
            let target_offset: u32 = tokens[idx + 1]
                .parse()
                .with_context(|| format!("{:?}:{} pointer target offset", file, lineno + 1))?;
            let target_pos = tokens[idx + 2]
                .chars()
                .next()
                .and_then(Pos::from_char)
                .ok_or_else(|| anyhow::anyhow!("{:?}:{} pointer target pos", file, lineno + 1))?;
            pointers.push(PointerData {
                symbol: text_ref_str(file, bytes, symbol),
                kind: PointerKind::from_symbol(symbol),
                target: SynsetId {
                    pos: target_pos,
                    offset: target_offset,
                },
            });
            // tokens[idx + 3] is the source/target word field; lexical
            // pointers are not followed by the taxonomy walk.
            idx += 4;
        }

        let id = SynsetId { pos, offset };
        synsets.insert(
            id,
            SynsetData {
                id,
                synset_type,
                words,
                pointers,
            },
        );
    }

    Ok(())
}

fn text_ref_str(file: FileKind, root: &[u8], token: &str) -> TextRef {
    let start = token.as_ptr() as usize - root.as_ptr() as usize;
    TextRef {
        file,
        start,
        len: token.len(),
    }
}

fn strip_cr(line: &[u8]) -> &[u8] {
    if line.ends_with(b"\r") {
        &line[..line.len() - 1]
    } else {
        line
    }
}

fn normalize_lemma(text: &str) -> String {
    let mut s = text.trim().to_string();
    s.make_ascii_lowercase();
    s.replace(' ', "_")
}
