//! Test utilities for Lineage

use crate::events::{FamilyChange, FamilyReceiver};
use crate::family::Family;
use crate::lexicon::Lexicon;
use crate::model::WordId;

/// Create a lexicon holding one word per label, ids in label order
pub fn lexicon_with(labels: &[&str]) -> (Lexicon, Vec<WordId>) {
    let mut lexicon = Lexicon::new();
    let ids = labels.iter().map(|label| lexicon.insert(*label)).collect();
    (lexicon, ids)
}

/// Create a lexicon plus a family containing every word, in label order
pub fn family_with(name: &str, labels: &[&str]) -> (Lexicon, Family, Vec<WordId>) {
    let (lexicon, ids) = lexicon_with(labels);
    let mut family = Family::new(name);
    family.add_words(&lexicon, ids.iter().copied()).unwrap();
    (lexicon, family, ids)
}

/// Panic unless every child entry has a matching parent entry and vice versa
pub fn assert_symmetric(lexicon: &Lexicon) {
    let ids: Vec<WordId> = lexicon.words().map(|w| w.id).collect();
    for &a in &ids {
        let children = lexicon.children(a).unwrap();
        let parents = lexicon.parents(a).unwrap();
        assert!(!children.contains(&a), "{a} is its own child");
        assert!(!parents.contains(&a), "{a} is its own parent");

        for &b in &ids {
            let forward = children.contains(&b);
            let backward = lexicon.parents(b).unwrap().contains(&a);
            assert_eq!(forward, backward, "edge {a} -> {b} is one-sided");
        }
    }
}

/// Collect every change already waiting on a receiver
pub fn drain_changes(rx: &mut FamilyReceiver) -> Vec<FamilyChange> {
    let mut changes = Vec::new();
    while let Ok(event) = rx.try_recv() {
        changes.push(event.change);
    }
    changes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_with() {
        let (lexicon, family, ids) = family_with("kin", &["a", "b"]);
        assert_eq!(family.order(), ids.as_slice());
        assert_eq!(lexicon.label(ids[1]), Some("b"));
        assert_symmetric(&lexicon);
    }
}
