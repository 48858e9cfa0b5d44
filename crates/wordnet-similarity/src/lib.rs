//! Taxonomy-based similarity measures over a loaded WordNet.
//!
//! The taxonomy is the graph formed by hypernym (`@`) and instance hypernym
//! (`@i`) pointers. Nouns share a single top (`entity`), but verbs,
//! adjectives and adverbs have many tops, so for those a virtual
//! [`Node::Root`] is placed one step above the deepest ancestor of each
//! synset to keep every pair connected.
//!
//! Measures:
//! - [`Taxonomy::path_similarity`]: `1 / (d + 1)` for shortest path length `d`.
//! - [`Taxonomy::lch_similarity`]: Leacock-Chodorow, `-ln((d + 1) / 2D)` where
//!   `D` is the deepest taxonomy depth for the part of speech.
//! - [`Taxonomy::wup_similarity`]: Wu-Palmer, based on the depth of the lowest
//!   common subsumer.
//!
//! Depths are memoised for the lifetime of the [`Taxonomy`]; the cache uses
//! `RefCell`, so a `Taxonomy` is meant for single-threaded use.
//!
//! # Example
//! ```no_run
//! use wordnet_db::WordNet;
//! use wordnet_similarity::Taxonomy;
//! use wordnet_types::Pos;
//!
//! # fn main() -> anyhow::Result<()> {
//! let wn = WordNet::load("/path/to/wordnet")?;
//! let taxonomy = Taxonomy::new(&wn);
//! let dog = wn.synsets_for_lemma(Pos::Noun, "dog")[0];
//! let cat = wn.synsets_for_lemma(Pos::Noun, "cat")[0];
//! println!("path {:?}", taxonomy.path_similarity(dog, cat));
//! println!("lch  {}", taxonomy.lch_similarity(dog, cat)?);
//! println!("wup  {}", taxonomy.wup_similarity(dog, cat)?);
//! # Ok(()) }
//! ```

use std::cell::{OnceCell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

use thiserror::Error;
use tracing::debug;
use wordnet_db::WordNet;
use wordnet_types::{Pos, SynsetId, SynsetType};

/// Name used for the virtual root when sorting subsumers.
pub const ROOT_NAME: &str = "*ROOT*";

/// A vertex of the taxonomy graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Node {
    Synset(SynsetId),
    /// Virtual top joining every taxonomy top of a part of speech.
    Root,
}

impl From<SynsetId> for Node {
    fn from(id: SynsetId) -> Self {
        Node::Synset(id)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimilarityError {
    #[error("synset {0:?} is not in the loaded dictionary")]
    UnknownSynset(SynsetId),
    #[error("synset types differ ({0} vs {1})")]
    PosMismatch(SynsetType, SynsetType),
    #[error("no taxonomy path connects the two synsets")]
    Disconnected,
    #[error("{0} taxonomy has zero depth")]
    ZeroDepth(Pos),
    #[error("the two synsets have no common subsumer")]
    NoCommonSubsumer,
}

/// Similarity engine borrowing a loaded [`WordNet`].
pub struct Taxonomy<'wn> {
    wn: &'wn WordNet,
    max_depths: RefCell<HashMap<SynsetId, u32>>,
    pos_depths: [OnceCell<u32>; 4],
}

impl<'wn> Taxonomy<'wn> {
    pub fn new(wn: &'wn WordNet) -> Self {
        Self {
            wn,
            max_depths: RefCell::new(HashMap::new()),
            pos_depths: Default::default(),
        }
    }

    pub fn wordnet(&self) -> &'wn WordNet {
        self.wn
    }

    /// Whether measures involving this synset use the virtual root.
    ///
    /// Only the noun taxonomy has a unique beginner.
    pub fn needs_root(id: SynsetId) -> bool {
        id.pos != Pos::Noun
    }

    /// Path similarity, `None` when the synsets are not connected.
    pub fn path_similarity(&self, a: SynsetId, b: SynsetId) -> Option<f64> {
        let simulate_root = Self::needs_root(a) || Self::needs_root(b);
        self.shortest_path_distance(a.into(), b.into(), simulate_root)
            .map(|distance| 1.0 / (distance as f64 + 1.0))
    }

    /// Leacock-Chodorow similarity. Both synsets must have the same `ss_type`.
    pub fn lch_similarity(&self, a: SynsetId, b: SynsetId) -> Result<f64, SimilarityError> {
        let type_a = self.synset_type(a)?;
        let type_b = self.synset_type(b)?;
        if type_a != type_b {
            return Err(SimilarityError::PosMismatch(type_a, type_b));
        }
        let simulate_root = Self::needs_root(a);
        let depth = self.taxonomy_depth(a.pos, simulate_root);
        let distance = self
            .shortest_path_distance(a.into(), b.into(), simulate_root)
            .ok_or(SimilarityError::Disconnected)?;
        if depth == 0 {
            return Err(SimilarityError::ZeroDepth(a.pos));
        }
        Ok(-((distance as f64 + 1.0) / (2.0 * depth as f64)).ln())
    }

    /// Wu-Palmer similarity.
    ///
    /// The subsumer is `a` itself when it is one of the lowest common
    /// hypernyms, otherwise the first of them by canonical name.
    pub fn wup_similarity(&self, a: SynsetId, b: SynsetId) -> Result<f64, SimilarityError> {
        self.synset_type(a)?;
        self.synset_type(b)?;
        let simulate_root = Self::needs_root(a) || Self::needs_root(b);
        let subsumers = self.lowest_common_hypernyms(a, b, simulate_root);
        let subsumer = if subsumers.contains(&Node::Synset(a)) {
            Node::Synset(a)
        } else {
            *subsumers.first().ok_or(SimilarityError::NoCommonSubsumer)?
        };

        let depth = self.node_max_depth(subsumer) + 1;
        let len_a = self
            .shortest_path_distance(a.into(), subsumer, simulate_root)
            .ok_or(SimilarityError::Disconnected)?;
        let len_b = self
            .shortest_path_distance(b.into(), subsumer, simulate_root)
            .ok_or(SimilarityError::Disconnected)?;
        Ok(2.0 * depth as f64 / (len_a + len_b + 2 * depth) as f64)
    }

    /// Length of the shortest path between two nodes through common ancestors.
    pub fn shortest_path_distance(&self, a: Node, b: Node, simulate_root: bool) -> Option<u32> {
        if a == b {
            return Some(0);
        }
        let from_a = self.hypernym_distances(a, simulate_root);
        let from_b = self.hypernym_distances(b, simulate_root);
        from_a
            .iter()
            .filter_map(|(node, da)| from_b.get(node).map(|db| da + db))
            .min()
    }

    /// Breadth-first distances from `node` to itself and every ancestor.
    ///
    /// With `simulate_root`, the virtual root is added one step above the
    /// farthest ancestor.
    pub fn hypernym_distances(&self, node: Node, simulate_root: bool) -> HashMap<Node, u32> {
        let start = match node {
            Node::Root => return HashMap::from([(Node::Root, 0)]),
            Node::Synset(id) => id,
        };

        let mut distances = HashMap::new();
        let mut queue = VecDeque::from([(start, 0u32)]);
        while let Some((id, depth)) = queue.pop_front() {
            if distances.contains_key(&Node::Synset(id)) {
                continue;
            }
            distances.insert(Node::Synset(id), depth);
            queue.extend(self.wn.hypernyms(id).map(|h| (h, depth + 1)));
        }

        if simulate_root {
            let farthest = distances.values().copied().max().unwrap_or(0);
            distances.insert(Node::Root, farthest + 1);
        }
        distances
    }

    /// Common ancestors of `a` and `b` with the greatest minimum depth, sorted by name.
    pub fn lowest_common_hypernyms(&self, a: SynsetId, b: SynsetId, simulate_root: bool) -> Vec<Node> {
        let ancestors_b: HashSet<Node> = self.hypernym_distances(b.into(), false).into_keys().collect();
        let mut common: Vec<Node> = self
            .hypernym_distances(a.into(), false)
            .into_keys()
            .filter(|node| ancestors_b.contains(node))
            .collect();
        if simulate_root {
            common.push(Node::Root);
        }

        let with_depth: Vec<(Node, u32)> = common
            .into_iter()
            .map(|node| (node, self.node_min_depth(node)))
            .collect();
        let Some(deepest) = with_depth.iter().map(|(_, depth)| *depth).max() else {
            return Vec::new();
        };

        let mut lowest: Vec<(String, Node)> = with_depth
            .into_iter()
            .filter(|(_, depth)| *depth == deepest)
            .map(|(node, _)| (self.node_name(node), node))
            .collect();
        lowest.sort();
        lowest.into_iter().map(|(_, node)| node).collect()
    }

    /// Length of the longest hypernym chain from `id` to a taxonomy top.
    pub fn max_depth(&self, id: SynsetId) -> u32 {
        let mut visiting = HashSet::new();
        self.max_depth_memo(id, &mut visiting).0
    }

    /// Length of the shortest hypernym chain from `id` to a taxonomy top.
    pub fn min_depth(&self, id: SynsetId) -> u32 {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([(id, 0u32)]);
        let mut deepest = 0;
        while let Some((current, depth)) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            deepest = depth;
            let mut parents = self.wn.hypernyms(current).peekable();
            if parents.peek().is_none() {
                return depth;
            }
            queue.extend(parents.map(|h| (h, depth + 1)));
        }
        // Only reachable when every path loops back on itself.
        deepest
    }

    /// Deepest `max_depth` over all synsets of `pos`, plus one when the root is simulated.
    pub fn taxonomy_depth(&self, pos: Pos, simulate_root: bool) -> u32 {
        let depth = *self.pos_depths[pos.index()].get_or_init(|| {
            let depth = self
                .wn
                .synset_ids(pos)
                .map(|id| self.max_depth(id))
                .max()
                .unwrap_or(0);
            debug!("{pos} taxonomy depth is {depth}");
            depth
        });
        if simulate_root { depth + 1 } else { depth }
    }

    /// Canonical name of a node, `*ROOT*` for the virtual root.
    pub fn node_name(&self, node: Node) -> String {
        match node {
            Node::Root => ROOT_NAME.to_string(),
            Node::Synset(id) => self
                .wn
                .synset_name(id)
                .unwrap_or_else(|| format!("?.{}.{:08}", id.pos.to_char(), id.offset)),
        }
    }

    fn synset_type(&self, id: SynsetId) -> Result<SynsetType, SimilarityError> {
        self.wn
            .synset_type(id)
            .ok_or(SimilarityError::UnknownSynset(id))
    }

    fn node_max_depth(&self, node: Node) -> u32 {
        match node {
            Node::Root => 0,
            Node::Synset(id) => self.max_depth(id),
        }
    }

    fn node_min_depth(&self, node: Node) -> u32 {
        match node {
            Node::Root => 0,
            Node::Synset(id) => self.min_depth(id),
        }
    }

    /// Returns the depth and whether a cycle cut the walk short.
    ///
    /// Cut-short depths depend on which synsets are on the current walk, so
    /// only complete ones are cached.
    fn max_depth_memo(&self, id: SynsetId, visiting: &mut HashSet<SynsetId>) -> (u32, bool) {
        let cached = self.max_depths.borrow().get(&id).copied();
        if let Some(depth) = cached {
            return (depth, false);
        }
        // A hypernym cycle contributes nothing past the repeated synset.
        if !visiting.insert(id) {
            return (0, true);
        }
        let parents: Vec<SynsetId> = self.wn.hypernyms(id).collect();
        let mut depth = 0;
        let mut cut = false;
        for parent in parents {
            let (parent_depth, parent_cut) = self.max_depth_memo(parent, visiting);
            depth = depth.max(parent_depth + 1);
            cut |= parent_cut;
        }
        visiting.remove(&id);
        if !cut {
            self.max_depths.borrow_mut().insert(id, depth);
        }
        (depth, cut)
    }
}
