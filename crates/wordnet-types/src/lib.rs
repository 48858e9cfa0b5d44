//! Shared types that mirror WordNet's dictionary format.
//!
//! Text fields borrow from a backing buffer (`&str`). Pointer symbols are
//! additionally classified into a [`PointerKind`] so taxonomy walks do not
//! have to compare strings.
//!
//! Use [`Pos`] and [`SynsetId`] to key into a database, [`Synset`] to inspect
//! parsed records, and [`SynsetType`] to tell head adjectives from satellites.
//!
//! ```rust
//! use wordnet_types::{PointerKind, Pos, SynsetId, SynsetType};
//!
//! let pos = Pos::from_char('n').unwrap();
//! let id = SynsetId { pos, offset: 1740 };
//! assert_eq!(id.pos, Pos::Noun);
//! assert_eq!(SynsetType::from_char('s').unwrap().pos(), Pos::Adj);
//! assert!(PointerKind::from_symbol("@i").is_hypernym());
//! ```

use std::fmt;

/// Part-of-speech marker as used by WordNet files (`n`, `v`, `a`/`s`, `r`).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Pos {
    Noun,
    Verb,
    Adj,
    Adv,
}

impl Pos {
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adj, Pos::Adv];

    /// Parse a WordNet POS character into an enum.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(Pos::Noun),
            'v' => Some(Pos::Verb),
            'a' | 's' => Some(Pos::Adj),
            'r' => Some(Pos::Adv),
            _ => None,
        }
    }

    /// Emit the POS character used in `index.*`/`data.*`.
    pub fn to_char(self) -> char {
        match self {
            Pos::Noun => 'n',
            Pos::Verb => 'v',
            Pos::Adj => 'a',
            Pos::Adv => 'r',
        }
    }

    /// Stable slot for per-POS tables.
    pub fn index(self) -> usize {
        match self {
            Pos::Noun => 0,
            Pos::Verb => 1,
            Pos::Adj => 2,
            Pos::Adv => 3,
        }
    }

    /// File suffix used by `index.<suffix>` / `data.<suffix>` / `<suffix>.exc`.
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adj => "adj",
            Pos::Adv => "adv",
        })
    }
}

/// `(offset, pos)` pair uniquely identifying a synset within the WordNet files.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct SynsetId {
    pub pos: Pos,
    pub offset: u32,
}

/// Raw `ss_type` marker from `data.*`, including adjective satellites.
///
/// Two synsets only share a part of speech for similarity purposes when their
/// `SynsetType`s are equal; a satellite never matches a head adjective.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SynsetType {
    Noun,
    Verb,
    Adj,
    Adv,
    AdjSatellite,
}

impl SynsetType {
    /// Parse the `ss_type` character from a data line.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'n' => Some(SynsetType::Noun),
            'v' => Some(SynsetType::Verb),
            'a' => Some(SynsetType::Adj),
            's' => Some(SynsetType::AdjSatellite),
            'r' => Some(SynsetType::Adv),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            SynsetType::Noun => 'n',
            SynsetType::Verb => 'v',
            SynsetType::Adj => 'a',
            SynsetType::AdjSatellite => 's',
            SynsetType::Adv => 'r',
        }
    }

    /// The data file a synset of this type lives in.
    pub fn pos(self) -> Pos {
        match self {
            SynsetType::Noun => Pos::Noun,
            SynsetType::Verb => Pos::Verb,
            SynsetType::Adj | SynsetType::AdjSatellite => Pos::Adj,
            SynsetType::Adv => Pos::Adv,
        }
    }
}

impl fmt::Display for SynsetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Classified pointer symbol.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum PointerKind {
    Hypernym,
    InstanceHypernym,
    Hyponym,
    InstanceHyponym,
    Antonym,
    SimilarTo,
    Other,
}

impl PointerKind {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "@" => PointerKind::Hypernym,
            "@i" => PointerKind::InstanceHypernym,
            "~" => PointerKind::Hyponym,
            "~i" => PointerKind::InstanceHyponym,
            "!" => PointerKind::Antonym,
            "&" => PointerKind::SimilarTo,
            _ => PointerKind::Other,
        }
    }

    /// Whether the pointer climbs the taxonomy (`@` or `@i`).
    pub fn is_hypernym(self) -> bool {
        matches!(self, PointerKind::Hypernym | PointerKind::InstanceHypernym)
    }
}

/// Pointer metadata from the `p_cnt` section.
#[derive(Clone, Debug)]
pub struct Pointer<'a> {
    pub symbol: &'a str,
    pub kind: PointerKind,
    pub target: SynsetId,
}

/// Synset record with the fields similarity work needs.
#[derive(Clone, Debug)]
pub struct Synset<'a> {
    pub id: SynsetId,
    pub synset_type: SynsetType,
    pub words: Vec<&'a str>,
    pub pointers: Vec<Pointer<'a>>,
}

/// Strip a syntactic marker (`(a)`, `(p)`, `(ip)`) from an adjective lemma.
pub fn strip_adj_marker(text: &str) -> &str {
    match text.find('(') {
        Some(idx) if text.ends_with(')') => &text[..idx],
        _ => text,
    }
}
