//! Kahn's algorithm over a family's members
//!
//! Stateless: reads the lexicon, never mutates it. Ties between words that
//! become ready together are broken first by the family's current order (for
//! the initial roots) and then by FIFO discovery, walking each word's children
//! oldest edge first.

use crate::error::{LineageError, LineageResult};
use crate::lexicon::Lexicon;
use crate::model::WordId;
use std::collections::{HashMap, HashSet, VecDeque};

/// Order `members` so that every parent precedes its children.
///
/// Only edges between members count. On a cycle, returns
/// [`LineageError::CycleDetected`] listing every member whose in-degree never
/// reached zero, in `members` order. That set covers the cycle itself and
/// anything downstream of it; it is not a minimal cycle.
pub fn topological_sort(lexicon: &Lexicon, members: &[WordId]) -> LineageResult<Vec<WordId>> {
    if members.is_empty() {
        return Ok(Vec::new());
    }

    let member_set: HashSet<WordId> = members.iter().copied().collect();
    let mut in_degrees: HashMap<WordId, usize> = HashMap::with_capacity(members.len());
    for &word in members {
        let degree = lexicon
            .parents_unordered(word)?
            .filter(|parent| member_set.contains(parent))
            .count();
        in_degrees.insert(word, degree);
    }

    let mut queue: VecDeque<WordId> = members
        .iter()
        .copied()
        .filter(|word| in_degrees.get(word) == Some(&0))
        .collect();
    let mut sorted = Vec::with_capacity(members.len());

    while let Some(word) = queue.pop_front() {
        sorted.push(word);

        for child in lexicon.children(word)? {
            if let Some(degree) = in_degrees.get_mut(&child) {
                if *degree == 0 {
                    continue;
                }
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(child);
                }
            }
        }
    }

    if sorted.len() == members.len() {
        Ok(sorted)
    } else {
        let problem_words = members
            .iter()
            .copied()
            .filter(|word| in_degrees.get(word).is_some_and(|degree| *degree > 0))
            .collect();
        Err(LineageError::cycle(problem_words))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::lexicon_with;

    #[test]
    fn test_empty_members() {
        let lexicon = Lexicon::new();
        assert_eq!(topological_sort(&lexicon, &[]).unwrap(), Vec::<WordId>::new());
    }

    #[test]
    fn test_diamond_breaks_ties_by_discovery() {
        let (mut lexicon, ids) = lexicon_with(&["a", "b", "c", "d"]);
        let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
        lexicon.connect_many(a, [b, c]).unwrap();
        lexicon.connect(b, d).unwrap();
        lexicon.connect(c, d).unwrap();

        assert_eq!(topological_sort(&lexicon, &ids).unwrap(), vec![a, b, c, d]);
    }

    #[test]
    fn test_children_follow_edge_creation_order() {
        let (mut lexicon, ids) = lexicon_with(&["root", "x", "y"]);
        let [root, x, y] = [ids[0], ids[1], ids[2]];
        // y linked first, so it is discovered first
        lexicon.connect(root, y).unwrap();
        lexicon.connect(root, x).unwrap();

        assert_eq!(topological_sort(&lexicon, &ids).unwrap(), vec![root, y, x]);
    }

    #[test]
    fn test_roots_keep_member_order() {
        let (lexicon, ids) = lexicon_with(&["a", "b", "c"]);
        let members = vec![ids[2], ids[0], ids[1]];
        assert_eq!(topological_sort(&lexicon, &members).unwrap(), members);
    }

    #[test]
    fn test_cycle_reports_blocked_members_only() {
        let (mut lexicon, ids) = lexicon_with(&["a", "b", "c", "d"]);
        let [a, b, c, d] = [ids[0], ids[1], ids[2], ids[3]];
        lexicon.connect(a, b).unwrap();
        lexicon.connect(b, a).unwrap();
        // d hangs off the cycle, c is independent
        lexicon.connect(b, d).unwrap();

        let err = topological_sort(&lexicon, &ids).unwrap_err();
        assert_eq!(err.problem_words(), Some([a, b, d].as_slice()));
        assert!(!err.problem_words().unwrap().contains(&c));
    }

    #[test]
    fn test_edges_to_non_members_are_ignored() {
        let (mut lexicon, ids) = lexicon_with(&["outsider", "a", "b"]);
        let [outsider, a, b] = [ids[0], ids[1], ids[2]];
        lexicon.connect(outsider, a).unwrap();
        lexicon.connect(a, b).unwrap();
        lexicon.connect(b, outsider).unwrap();

        assert_eq!(topological_sort(&lexicon, &[b, a]).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_stale_member_is_an_error() {
        let (mut lexicon, ids) = lexicon_with(&["a", "b"]);
        lexicon.remove(ids[1]).unwrap();

        let err = topological_sort(&lexicon, &ids).unwrap_err();
        assert!(matches!(err, LineageError::UnknownWord { word } if word == ids[1]));
    }
}
