//! Core data structures for the word lineage graph

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable identifier for a word.
///
/// Pairs an arena slot with the generation of that slot. Slots are reused
/// after a word is discarded, but the generation is bumped, so an old id
/// never resolves to a newer word.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct WordId {
    index: u32,
    generation: u32,
}

impl WordId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        WordId { index, generation }
    }

    /// Arena slot of this word.
    pub fn index(&self) -> u32 {
        self.index
    }

    /// How many times the slot had been vacated before this word took it.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}.{}", self.index, self.generation)
        }
    }
}

/// A single word in the lexicon. Labels are display text only and need not be unique.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Word {
    pub id: WordId,
    pub label: String,
}

/// A directed parent → child edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Lineage {
    pub parent: WordId,
    pub child: WordId,
    /// Creation order across the whole lexicon; neighbors are reported in this order.
    pub sequence: u64,
}

/// What `connect` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// A new edge was recorded on both sides.
    Created,
    /// The edge already existed; nothing changed.
    AlreadyLinked,
    /// Parent and child are the same word; nothing changed.
    SelfLink,
}

impl Link {
    pub fn is_created(self) -> bool {
        self == Link::Created
    }
}
