//! Persistent similarity-matrix cache.
//!
//! Recomputing the similarity matrix is the expensive step of a run, so it
//! can be persisted to a JSON document and reloaded on the next run. The
//! document is keyed by a fingerprint of the interaction store: a cache
//! written for different data is ignored and rebuilt, never served stale.
//! The cache is owned by the caller; the similarity engine itself stays a
//! pure function.

use crate::similarity::SimilarityMatrix;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Serialize, Deserialize)]
struct CacheDocument {
    /// Fingerprint of the interaction store the matrix was computed from
    fingerprint: u64,
    matrix: SimilarityMatrix,
}

/// Load-if-present / compute-and-store cache for a similarity matrix
pub struct SimilarityCache {
    path: PathBuf,
}

impl SimilarityCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load a cached matrix if the file exists and matches the fingerprint.
    ///
    /// A missing file or a fingerprint mismatch yields `Ok(None)`; only an
    /// unreadable or corrupt file is an error.
    pub fn load(&self, fingerprint: u64) -> Result<Option<SimilarityMatrix>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read similarity cache {}", self.path.display()))?;
        let document: CacheDocument = serde_json::from_str(&content)
            .with_context(|| format!("Corrupt similarity cache {}", self.path.display()))?;

        if document.fingerprint != fingerprint {
            debug!(
                "Similarity cache {} is stale (fingerprint mismatch), recomputing",
                self.path.display()
            );
            return Ok(None);
        }

        Ok(Some(document.matrix))
    }

    /// Persist a matrix together with the fingerprint of its source data
    pub fn store(&self, fingerprint: u64, matrix: &SimilarityMatrix) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create cache directory {}", parent.display())
                })?;
            }
        }

        let document = CacheDocument {
            fingerprint,
            matrix: matrix.clone(),
        };
        let content = serde_json::to_string(&document).context("Failed to encode similarity cache")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write similarity cache {}", self.path.display()))?;

        Ok(())
    }

    /// Load the cached matrix, or compute it and persist the result.
    pub fn load_or_compute<F>(&self, fingerprint: u64, compute: F) -> Result<SimilarityMatrix>
    where
        F: FnOnce() -> SimilarityMatrix,
    {
        if let Some(matrix) = self.load(fingerprint)? {
            info!("Loaded similarity matrix from {}", self.path.display());
            return Ok(matrix);
        }

        let matrix = compute();
        self.store(fingerprint, &matrix)?;
        info!("Stored similarity matrix to {}", self.path.display());
        Ok(matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::{Weighting, similarity_matrix};
    use std::collections::HashMap;

    fn sample_matrix() -> SimilarityMatrix {
        let interactions: HashMap<u32, HashMap<u32, f32>> = [
            (1, [(10, 4.0_f32), (11, 3.0)].into_iter().collect()),
            (2, [(10, 5.0_f32)].into_iter().collect()),
        ]
        .into_iter()
        .collect();
        similarity_matrix(&interactions, Weighting::Uniform)
    }

    fn temp_cache_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cf-sim-cache-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_is_a_cache_miss() {
        let cache = SimilarityCache::new(temp_cache_path("missing"));
        assert!(cache.load(42).unwrap().is_none());
    }

    #[test]
    fn test_round_trip() {
        let path = temp_cache_path("round-trip");
        let cache = SimilarityCache::new(&path);
        let matrix = sample_matrix();

        cache.store(42, &matrix).unwrap();
        let loaded = cache.load(42).unwrap().expect("cache hit expected");

        assert_eq!(loaded.entity_count(), matrix.entity_count());
        assert!((loaded.get(1, 2) - matrix.get(1, 2)).abs() < 1e-12);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_stale_fingerprint_is_a_cache_miss() {
        let path = temp_cache_path("stale");
        let cache = SimilarityCache::new(&path);

        cache.store(1, &sample_matrix()).unwrap();
        assert!(cache.load(2).unwrap().is_none());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_or_compute_persists() {
        let path = temp_cache_path("load-or-compute");
        let cache = SimilarityCache::new(&path);

        let computed = cache.load_or_compute(7, sample_matrix).unwrap();
        assert!(computed.get(1, 2) > 0.0);

        // Second call must be served from the file
        let reloaded = cache
            .load_or_compute(7, || panic!("compute must not run on a cache hit"))
            .unwrap();
        assert!((reloaded.get(1, 2) - computed.get(1, 2)).abs() < 1e-12);

        let _ = fs::remove_file(path);
    }
}
