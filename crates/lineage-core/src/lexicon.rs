//! Word arena using petgraph::StableDiGraph with generational WordIds
//!
//! Every word and every lineage edge lives here. Families only hold ids, so
//! parent/child back-references never form ownership cycles. A single edge
//! record serves as both the parent's child entry and the child's parent
//! entry, which keeps the two sides symmetric by construction.

use crate::error::{LineageError, LineageResult};
use crate::model::*;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// The word arena — a directed graph with stable, generation-checked indices.
pub struct Lexicon {
    inner: StableDiGraph<Word, Lineage>,
    /// Current generation of every slot ever allocated.
    generations: Vec<u32>,
    next_sequence: u64,
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("word_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl Lexicon {
    pub fn new() -> Self {
        Lexicon {
            inner: StableDiGraph::new(),
            generations: Vec::new(),
            next_sequence: 0,
        }
    }

    /// Create a word with no lineage. Returns its id.
    pub fn insert(&mut self, label: impl Into<String>) -> WordId {
        let idx = self.inner.add_node(Word {
            id: WordId::default(),
            label: label.into(),
        });
        let slot = idx.index();
        if slot >= self.generations.len() {
            self.generations.resize(slot + 1, 0);
        }
        let id = WordId::new(slot as u32, self.generations[slot]);
        if let Some(word) = self.inner.node_weight_mut(idx) {
            word.id = id;
        }
        debug!(word = %id, "inserted word");
        id
    }

    /// Discard a word, severing all of its lineage first.
    pub fn remove(&mut self, id: WordId) -> LineageResult<Word> {
        self.disconnect_all(id)?;
        let idx = self.resolve(id)?;
        let word = self
            .inner
            .remove_node(idx)
            .ok_or(LineageError::unknown_word(id))?;
        if let Some(generation) = self.generations.get_mut(idx.index()) {
            *generation = generation.wrapping_add(1);
        }
        debug!(word = %id, "discarded word");
        Ok(word)
    }

    fn resolve(&self, id: WordId) -> LineageResult<NodeIndex> {
        let idx = NodeIndex::new(id.index() as usize);
        let live = self.generations.get(idx.index()) == Some(&id.generation())
            && self.inner.contains_node(idx);
        if live {
            Ok(idx)
        } else {
            Err(LineageError::unknown_word(id))
        }
    }

    /// Does this id refer to a live word?
    pub fn contains(&self, id: WordId) -> bool {
        self.resolve(id).is_ok()
    }

    /// The live id occupying an arena slot, if any.
    pub fn id_at(&self, index: u32) -> Option<WordId> {
        let generation = *self.generations.get(index as usize)?;
        let id = WordId::new(index, generation);
        self.contains(id).then_some(id)
    }

    /// Get a word by ID.
    pub fn word(&self, id: WordId) -> Option<&Word> {
        let idx = self.resolve(id).ok()?;
        self.inner.node_weight(idx)
    }

    pub fn label(&self, id: WordId) -> Option<&str> {
        self.word(id).map(|w| w.label.as_str())
    }

    /// Total number of live words.
    pub fn len(&self) -> usize {
        self.inner.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.node_count() == 0
    }

    /// Total number of lineage edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all words in slot order.
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
    }

    /// All edges, oldest first.
    pub fn lineage(&self) -> Vec<Lineage> {
        let mut edges: Vec<Lineage> = self
            .inner
            .edge_indices()
            .filter_map(|idx| self.inner.edge_weight(idx).copied())
            .collect();
        // Adjacency lists are newest first, a single descending run.
        edges.sort_by_key(|l| l.sequence);
        edges
    }

    /// Find a word by label (first match in slot order).
    pub fn find_by_label(&self, label: &str) -> Option<WordId> {
        self.words().find(|w| w.label == label).map(|w| w.id)
    }

    /// Record the edge `parent → child`.
    ///
    /// A self edge or an edge that is already recorded is a no-op, reported
    /// through the returned [`Link`] rather than as an error.
    pub fn connect(&mut self, parent: WordId, child: WordId) -> LineageResult<Link> {
        let from = self.resolve(parent)?;
        let to = self.resolve(child)?;
        if from == to {
            return Ok(Link::SelfLink);
        }
        if self.inner.find_edge(from, to).is_some() {
            return Ok(Link::AlreadyLinked);
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.inner.add_edge(
            from,
            to,
            Lineage {
                parent,
                child,
                sequence,
            },
        );
        debug!(%parent, %child, "connected");
        Ok(Link::Created)
    }

    /// Connect `parent` to each child in turn. Returns how many edges were new.
    ///
    /// Stops at the first unknown id; edges created before it are kept.
    pub fn connect_many(
        &mut self,
        parent: WordId,
        children: impl IntoIterator<Item = WordId>,
    ) -> LineageResult<usize> {
        let mut created = 0;
        for child in children {
            if self.connect(parent, child)?.is_created() {
                created += 1;
            }
        }
        Ok(created)
    }

    /// Remove the edges between `a` and `b`, whichever direction they run.
    ///
    /// Each direction is checked on its own and every matching record is
    /// dropped. Returns the number of edges removed.
    pub fn disconnect(&mut self, a: WordId, b: WordId) -> LineageResult<usize> {
        let a_idx = self.resolve(a)?;
        let b_idx = self.resolve(b)?;
        let mut removed = 0;
        for (from, to) in [(a_idx, b_idx), (b_idx, a_idx)] {
            while let Some(edge) = self.inner.find_edge(from, to) {
                self.inner.remove_edge(edge);
                removed += 1;
            }
        }
        if removed > 0 {
            debug!(%a, %b, removed, "disconnected");
        }
        Ok(removed)
    }

    /// Remove every edge touching `id`, in both directions.
    pub fn disconnect_all(&mut self, id: WordId) -> LineageResult<usize> {
        let idx = self.resolve(id)?;
        // Collect first: removing while walking the adjacency list skips entries.
        let incident: Vec<EdgeIndex> = self
            .inner
            .edges_directed(idx, Direction::Outgoing)
            .chain(self.inner.edges_directed(idx, Direction::Incoming))
            .map(|e| e.id())
            .collect();
        let removed = incident
            .into_iter()
            .filter_map(|edge| self.inner.remove_edge(edge))
            .count();
        if removed > 0 {
            debug!(word = %id, removed, "disconnected all");
        }
        Ok(removed)
    }

    /// Words with an edge into `id`, oldest edge first.
    pub fn parents(&self, id: WordId) -> LineageResult<Vec<WordId>> {
        self.neighbors(id, Direction::Incoming)
    }

    /// Words `id` points to, oldest edge first.
    pub fn children(&self, id: WordId) -> LineageResult<Vec<WordId>> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Parents of `id` in adjacency order, without allocating.
    pub(crate) fn parents_unordered(
        &self,
        id: WordId,
    ) -> LineageResult<impl Iterator<Item = WordId> + '_> {
        let idx = self.resolve(id)?;
        Ok(self
            .inner
            .edges_directed(idx, Direction::Incoming)
            .map(|e| e.weight().parent))
    }

    fn neighbors(&self, id: WordId, direction: Direction) -> LineageResult<Vec<WordId>> {
        let idx = self.resolve(id)?;
        let mut edges: Vec<&Lineage> = self
            .inner
            .edges_directed(idx, direction)
            .map(|e| e.weight())
            .collect();
        // Adjacency lists are newest first, a single descending run.
        edges.sort_by_key(|l| l.sequence);
        Ok(edges
            .into_iter()
            .map(|l| match direction {
                Direction::Outgoing => l.child,
                Direction::Incoming => l.parent,
            })
            .collect())
    }

    /// Is the edge `parent → child` recorded? Unknown ids have no edges.
    pub fn has_edge(&self, parent: WordId, child: WordId) -> bool {
        match (self.resolve(parent), self.resolve(child)) {
            (Ok(from), Ok(to)) => self.inner.find_edge(from, to).is_some(),
            _ => false,
        }
    }

    pub fn in_degree(&self, id: WordId) -> Option<usize> {
        let idx = self.resolve(id).ok()?;
        Some(self.inner.edges_directed(idx, Direction::Incoming).count())
    }

    pub fn out_degree(&self, id: WordId) -> Option<usize> {
        let idx = self.resolve(id).ok()?;
        Some(self.inner.edges_directed(idx, Direction::Outgoing).count())
    }

    /// Every word `id` descends from, transitively.
    pub fn ancestors(&self, id: WordId) -> LineageResult<HashSet<WordId>> {
        let mut ancestors = HashSet::new();
        let mut to_visit = VecDeque::from(self.parents(id)?);

        while let Some(current) = to_visit.pop_front() {
            if current == id || !ancestors.insert(current) {
                continue;
            }
            to_visit.extend(self.parents(current)?);
        }

        Ok(ancestors)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}
