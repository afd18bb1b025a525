//! Inverted index over the interaction store.
//!
//! The similarity engine needs, for every counterpart, the set of entities
//! that interacted with it. Walking that reverse mapping visits only the
//! pairs that actually co-occur, O(Σ|S(c)|²), instead of scanning all
//! entity pairs.

use std::collections::{HashMap, HashSet};

/// Build the reverse mapping counterpart → set of entities.
///
/// `interactions` is entity → (counterpart → score) in either orientation:
/// users over items for user-based CF, items over users for item-based CF.
/// Only strictly positive scores count as an interaction; a counterpart with
/// no positive interaction does not appear at all. Pure function of the
/// input, an empty map yields an empty index.
pub fn inverted_index(
    interactions: &HashMap<u32, HashMap<u32, f32>>,
) -> HashMap<u32, HashSet<u32>> {
    let mut index: HashMap<u32, HashSet<u32>> = HashMap::new();

    for (&entity, counterparts) in interactions {
        for (&counterpart, &score) in counterparts {
            if score > 0.0 {
                index.entry(counterpart).or_default().insert(entity);
            }
        }
    }

    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interactions(rows: &[(u32, &[(u32, f32)])]) -> HashMap<u32, HashMap<u32, f32>> {
        rows.iter()
            .map(|&(entity, pairs)| (entity, pairs.iter().copied().collect()))
            .collect()
    }

    #[test]
    fn test_empty_input_yields_empty_index() {
        let index = inverted_index(&HashMap::new());
        assert!(index.is_empty());
    }

    #[test]
    fn test_reverse_mapping() {
        let input = interactions(&[
            (1, &[(10, 4.0), (11, 3.0)]),
            (2, &[(10, 5.0)]),
        ]);

        let index = inverted_index(&input);

        assert_eq!(index.len(), 2);
        assert_eq!(index[&10], HashSet::from([1, 2]));
        assert_eq!(index[&11], HashSet::from([1]));
    }

    #[test]
    fn test_non_positive_scores_are_ignored() {
        let input = interactions(&[
            (1, &[(10, 0.0), (11, 2.0)]),
            (2, &[(10, -1.0)]),
        ]);

        let index = inverted_index(&input);

        // Counterpart 10 has no positive interaction, so it is absent
        assert!(!index.contains_key(&10));
        assert_eq!(index[&11], HashSet::from([1]));
    }
}
