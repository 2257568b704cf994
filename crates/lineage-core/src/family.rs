//! Family: an ordered, duplicate-free membership view over a lexicon
//!
//! The family does not own words. It holds ids, keeps their order, and
//! publishes every add, remove, rename and reorder on its event channel.

use crate::error::{LineageError, LineageResult};
use crate::events::{DEFAULT_EVENT_CAPACITY, EventChannel, FamilyChange, FamilyReceiver};
use crate::lexicon::Lexicon;
use crate::model::WordId;
use crate::sort::topological_sort;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct Family {
    name: String,
    order: Vec<WordId>,
    events: EventChannel,
}

impl std::fmt::Debug for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Family")
            .field("name", &self.name)
            .field("order", &self.order)
            .field("events", &self.events)
            .finish()
    }
}

impl Family {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_event_capacity(name, DEFAULT_EVENT_CAPACITY)
    }

    /// Create a family whose subscribers may fall `capacity` events behind.
    pub fn with_event_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Family {
            name: name.into(),
            order: Vec::new(),
            events: EventChannel::new(capacity),
        }
    }

    /// Rebuild a family from stored parts without emitting events.
    /// Duplicate ids keep their first position.
    pub(crate) fn from_order(
        name: impl Into<String>,
        order: impl IntoIterator<Item = WordId>,
        capacity: usize,
    ) -> Self {
        let mut family = Self::with_event_capacity(name, capacity);
        for word in order {
            if !family.order.contains(&word) {
                family.order.push(word);
            }
        }
        family
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        let name = name.into();
        if name == self.name {
            return;
        }
        debug!(from = %self.name, to = %name, "renamed family");
        self.name = name.clone();
        self.events.emit(FamilyChange::Renamed { name });
    }

    /// Current order: topological right after a successful sort, otherwise
    /// the last sorted order with later additions appended.
    pub fn order(&self) -> &[WordId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, word: WordId) -> bool {
        self.order.contains(&word)
    }

    pub fn position(&self, word: WordId) -> Option<usize> {
        self.order.iter().position(|&w| w == word)
    }

    /// Receive every subsequent change to this family.
    pub fn subscribe(&self) -> FamilyReceiver {
        self.events.subscribe()
    }

    /// Sequence number of the last published change.
    pub fn sequence(&self) -> u64 {
        self.events.sequence()
    }

    /// Append a word if it is not already a member. Returns whether it was added.
    pub fn add_word(&mut self, lexicon: &Lexicon, word: WordId) -> LineageResult<bool> {
        if !lexicon.contains(word) {
            return Err(LineageError::unknown_word(word));
        }
        if self.contains(word) {
            return Ok(false);
        }

        let index = self.order.len();
        self.order.push(word);
        debug!(family = %self.name, %word, index, "added word");
        self.events.emit(FamilyChange::Added { word, index });
        Ok(true)
    }

    /// Add each word in turn. Returns how many were new.
    pub fn add_words(
        &mut self,
        lexicon: &Lexicon,
        words: impl IntoIterator<Item = WordId>,
    ) -> LineageResult<usize> {
        let mut added = 0;
        for word in words {
            if self.add_word(lexicon, word)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Sever all of a member's lineage, then drop it from the family.
    ///
    /// A non-member is left alone, edges included, and `false` is returned.
    /// A member whose word was already discarded from the lexicon is simply
    /// dropped.
    pub fn remove_word(&mut self, lexicon: &mut Lexicon, word: WordId) -> LineageResult<bool> {
        let Some(index) = self.position(word) else {
            return Ok(false);
        };
        if lexicon.contains(word) {
            lexicon.disconnect_all(word)?;
        }

        self.order.remove(index);
        debug!(family = %self.name, %word, index, "removed word");
        self.events.emit(FamilyChange::Removed { word, index });
        Ok(true)
    }

    /// Remove each word in turn. Returns how many were members.
    pub fn remove_words(
        &mut self,
        lexicon: &mut Lexicon,
        words: impl IntoIterator<Item = WordId>,
    ) -> LineageResult<usize> {
        let mut removed = 0;
        for word in words {
            if self.remove_word(lexicon, word)? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Topologically sort the members.
    ///
    /// On success the stored order is replaced (and a reorder published if it
    /// changed). On failure the order is untouched and the error carries the
    /// diagnosis; see [`topological_sort`].
    pub fn sort(&mut self, lexicon: &Lexicon) -> LineageResult<()> {
        let sorted = match topological_sort(lexicon, &self.order) {
            Ok(sorted) => sorted,
            Err(err) => {
                if let Some(problem_words) = err.problem_words() {
                    warn!(
                        family = %self.name,
                        problems = problem_words.len(),
                        "cycle detected, order left unchanged"
                    );
                }
                return Err(err);
            }
        };

        info!(family = %self.name, words = sorted.len(), "sorted family");
        if sorted != self.order {
            self.order = sorted.clone();
            self.events.emit(FamilyChange::Reordered { order: sorted });
        }
        Ok(())
    }

    /// Members with no member parents, in family order.
    pub fn roots(&self, lexicon: &Lexicon) -> LineageResult<Vec<WordId>> {
        self.members_where(|word| lexicon.parents(word))
    }

    /// Members with no member children, in family order.
    pub fn leaves(&self, lexicon: &Lexicon) -> LineageResult<Vec<WordId>> {
        self.members_where(|word| lexicon.children(word))
    }

    fn members_where(
        &self,
        neighbors: impl Fn(WordId) -> LineageResult<Vec<WordId>>,
    ) -> LineageResult<Vec<WordId>> {
        let members: HashSet<WordId> = self.order.iter().copied().collect();
        let mut found = Vec::new();
        for &word in &self.order {
            if !neighbors(word)?.iter().any(|n| members.contains(n)) {
                found.push(word);
            }
        }
        Ok(found)
    }
}
