//! Precomputed coloration storage.
//!
//! For large vertex counts and ambient dimensions the coloration space is
//! too big to walk per graph, so the engine consults a store of precomputed
//! lists keyed by `(vertex count, n)` and the graph's canonical code. The
//! trait keeps the engine independent of where the lists come from; the
//! in-memory implementation backs the tests and small interactive runs.

use std::collections::HashMap;

use log::info;
use parking_lot::RwLock;

use abel_core::errors::{AbelError, Result};

use crate::colorations::{Coloration, DirectColorations};
use crate::graph::StableGraph;

/// Provider of precomputed coloration lists.
pub trait ColorationStore: Sync {
    /// Whether the lists for `(num_vertices, n)` are already present.
    fn has(&self, num_vertices: usize, n: usize) -> bool;

    /// Acquires the lists for `(num_vertices, n)`, returning `true` when
    /// they are available afterwards.
    fn fetch(&self, num_vertices: usize, n: usize) -> Result<bool>;

    /// Drops everything the store holds.
    fn purge(&self) -> Result<()>;

    /// The coloration list for the graph with canonical `code`.
    fn load(&self, num_vertices: usize, n: usize, code: &str) -> Result<Vec<Coloration>>;
}

type StoreKey = (usize, usize);

/// Coloration store held entirely in memory, filled graph by graph.
#[derive(Default)]
pub struct MemoryColorationStore {
    lists: RwLock<HashMap<StoreKey, HashMap<String, Vec<Coloration>>>>,
}

impl MemoryColorationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an explicit list for a graph code.
    pub fn insert(&self, num_vertices: usize, n: usize, code: &str, list: Vec<Coloration>) {
        self.lists
            .write()
            .entry((num_vertices, n))
            .or_default()
            .insert(code.to_string(), list);
    }

    /// Computes and stores the coloration list of one graph. Idempotent.
    pub fn populate_from(&self, graph: &StableGraph, n: usize) -> Result<()> {
        let key = (graph.num_vertices(), n);
        if self
            .lists
            .read()
            .get(&key)
            .map_or(false, |codes| codes.contains_key(graph.code()))
        {
            return Ok(());
        }
        let list: Vec<Coloration> = DirectColorations::new(graph, n).collect();
        info!(
            "stored {} colorations for graph {} at n = {}",
            list.len(),
            graph.code(),
            n
        );
        self.lists
            .write()
            .entry(key)
            .or_default()
            .insert(graph.code().to_string(), list);
        Ok(())
    }
}

impl ColorationStore for MemoryColorationStore {
    fn has(&self, num_vertices: usize, n: usize) -> bool {
        self.lists.read().contains_key(&(num_vertices, n))
    }

    fn fetch(&self, num_vertices: usize, n: usize) -> Result<bool> {
        // Nothing to acquire from: the in-memory store only holds what was
        // populated into it.
        if self.has(num_vertices, n) {
            Ok(true)
        } else {
            Err(AbelError::DataUnavailable {
                vertices: num_vertices,
                n,
                reason: "in-memory store has no source to fetch from".to_string(),
            })
        }
    }

    fn purge(&self) -> Result<()> {
        self.lists.write().clear();
        Ok(())
    }

    fn load(&self, num_vertices: usize, n: usize, code: &str) -> Result<Vec<Coloration>> {
        self.lists
            .read()
            .get(&(num_vertices, n))
            .and_then(|codes| codes.get(code))
            .cloned()
            .ok_or_else(|| AbelError::DataUnavailable {
                vertices: num_vertices,
                n,
                reason: format!("no stored coloration list for graph {}", code),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enumerate::enumerate_graphs;

    #[test]
    fn test_populate_and_load() {
        let graphs = enumerate_graphs(2, 0).unwrap();
        let store = MemoryColorationStore::new();
        for g in &graphs {
            store.populate_from(g, 1).unwrap();
        }
        for g in &graphs {
            let list = store.load(g.num_vertices(), 1, g.code()).unwrap();
            assert!(!list.is_empty());
        }
    }

    #[test]
    fn test_purge_empties_the_store() {
        let graphs = enumerate_graphs(1, 0).unwrap();
        let store = MemoryColorationStore::new();
        store.populate_from(&graphs[0], 1).unwrap();
        assert!(store.has(2, 1));
        store.purge().unwrap();
        assert!(!store.has(2, 1));
        assert!(store.load(2, 1, graphs[0].code()).is_err());
    }

    #[test]
    fn test_fetch_without_source_fails() {
        let store = MemoryColorationStore::new();
        assert!(store.fetch(5, 3).is_err());
    }
}
