//! Co-occurrence similarity engine.
//!
//! Computes pairwise similarity between entities (users or items) from the
//! counterparts they share:
//! "Users who rated the same items are similar" - and, transposed,
//! "items rated by the same users are similar."
//!
//! ## Algorithm
//! 1. Build the inverted index counterpart → interacting entities
//! 2. For each counterpart group, every ordered pair (u, v), u ≠ v,
//!    accumulates a co-occurrence weight; every member accumulates its
//!    interaction degree N[u]
//! 3. Final similarity: `sim(u, v) = C[u][v] / sqrt(N[u] * N[v])`, the
//!    cosine similarity of the binary interaction vectors
//!
//! The group pass weights each co-occurrence by a function of the group
//! size: a constant 1 for the plain variant, or `1 / ln(1 + |group|)` to
//! penalize hugely popular counterparts that carry little discriminating
//! signal (the IDF idea from text retrieval).
//!
//! Groups are processed on a rayon worker pool: each worker folds local
//! (co-occurrence, degree) maps and the partial sums are merged additively,
//! which is valid because both counters are commutative.

use crate::inverted::inverted_index;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Co-occurrence weighting variant used by the similarity engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Weighting {
    /// Every co-occurrence counts 1
    Uniform,
    /// A co-occurrence through a counterpart shared by `s` entities counts
    /// `1 / ln(1 + s)`, down-weighting popular counterparts
    InverseLogFrequency,
}

impl Weighting {
    /// Contribution of one co-occurrence through a group of `group_size`
    /// entities
    pub fn weight(&self, group_size: usize) -> f64 {
        match self {
            Weighting::Uniform => 1.0,
            Weighting::InverseLogFrequency => 1.0 / (1.0 + group_size as f64).ln(),
        }
    }
}

/// Pairwise similarity between entities, sparse and never self-referential.
///
/// Symmetric in exact arithmetic; both directions are stored so lookups
/// never have to probe the mirrored key. Built once per run and read-only
/// afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimilarityMatrix {
    entries: HashMap<u32, HashMap<u32, f64>>,
}

impl SimilarityMatrix {
    /// Similarity of a pair, 0.0 for unknown entities or non-co-occurring
    /// pairs
    pub fn get(&self, a: u32, b: u32) -> f64 {
        self.entries
            .get(&a)
            .and_then(|row| row.get(&b))
            .copied()
            .unwrap_or(0.0)
    }

    /// All neighbors of an entity with their similarities
    pub fn neighbors(&self, entity: u32) -> Option<&HashMap<u32, f64>> {
        self.entries.get(&entity)
    }

    /// True if the entity has at least one neighbor
    pub fn contains(&self, entity: u32) -> bool {
        self.entries.contains_key(&entity)
    }

    /// Number of entities with at least one neighbor
    pub fn entity_count(&self) -> usize {
        self.entries.len()
    }

    /// The `k` most similar entities, descending by similarity.
    ///
    /// Ties are broken by ascending entity id so rankings are reproducible.
    /// An unknown entity or `k == 0` yields an empty list.
    pub fn top_k(&self, entity: u32, k: usize) -> Vec<(u32, f64)> {
        if k == 0 {
            return Vec::new();
        }

        let Some(row) = self.entries.get(&entity) else {
            return Vec::new();
        };

        let mut neighbors: Vec<(u32, f64)> = row.iter().map(|(&id, &sim)| (id, sim)).collect();
        neighbors.sort_unstable_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        neighbors.truncate(k);
        neighbors
    }
}

/// Compute the similarity matrix for one orientation of the interaction
/// store.
///
/// `interactions` maps entity → (counterpart → score): pass the user
/// orientation for user-user similarity, the item orientation for item-item
/// similarity. An entity with no positive interactions has degree 0 and ends
/// up with no row; any pair involving it reads as similarity 0 via
/// [`SimilarityMatrix::get`]. Zero denominators are guarded, never a
/// division fault.
pub fn similarity_matrix(
    interactions: &HashMap<u32, HashMap<u32, f32>>,
    weighting: Weighting,
) -> SimilarityMatrix {
    let index = inverted_index(interactions);

    debug!(
        "Computing similarities over {} counterpart groups ({:?} weighting)",
        index.len(),
        weighting
    );

    let (cooccurrence, degrees) = accumulate_cooccurrence(&index, weighting);

    // Co-occurrence matrix -> similarity matrix
    let mut entries: HashMap<u32, HashMap<u32, f64>> = HashMap::with_capacity(cooccurrence.len());
    for (u, related) in cooccurrence {
        let degree_u = degrees.get(&u).copied().unwrap_or(0);

        let mut row: HashMap<u32, f64> = HashMap::with_capacity(related.len());
        for (v, cuv) in related {
            let degree_v = degrees.get(&v).copied().unwrap_or(0);
            let denominator = ((degree_u as f64) * (degree_v as f64)).sqrt();
            let similarity = if denominator > 0.0 { cuv / denominator } else { 0.0 };
            row.insert(v, similarity);
        }

        entries.insert(u, row);
    }

    debug!("Similarity matrix covers {} entities", entries.len());
    SimilarityMatrix { entries }
}

type CooccurrenceCounts = HashMap<u32, HashMap<u32, f64>>;
type Degrees = HashMap<u32, u32>;

/// One pass over the counterpart groups, producing the weighted
/// co-occurrence counts C and the per-entity degrees N.
///
/// Each worker folds into local maps; the reduce merges them additively.
fn accumulate_cooccurrence(
    index: &HashMap<u32, HashSet<u32>>,
    weighting: Weighting,
) -> (CooccurrenceCounts, Degrees) {
    index
        .par_iter()
        .fold(
            || (CooccurrenceCounts::new(), Degrees::new()),
            |(mut counts, mut degrees), (_, group)| {
                let weight = weighting.weight(group.len());
                for &u in group {
                    *degrees.entry(u).or_insert(0) += 1;
                    for &v in group {
                        if u == v {
                            continue;
                        }
                        *counts.entry(u).or_default().entry(v).or_insert(0.0) += weight;
                    }
                }
                (counts, degrees)
            },
        )
        .reduce(
            || (CooccurrenceCounts::new(), Degrees::new()),
            |(mut counts, mut degrees), (local_counts, local_degrees)| {
                for (u, related) in local_counts {
                    let row = counts.entry(u).or_default();
                    for (v, weight) in related {
                        *row.entry(v).or_insert(0.0) += weight;
                    }
                }
                for (u, degree) in local_degrees {
                    *degrees.entry(u).or_insert(0) += degree;
                }
                (counts, degrees)
            },
        )
}
