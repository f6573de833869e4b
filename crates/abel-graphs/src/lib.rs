//! # abel-graphs
//!
//! Combinatorial layer of the ABEL localization engine: the decorated trees
//! indexing torus fixed loci, their enumeration up to isomorphism, and the
//! proper colorations that pin each tree to the fixed points of projective
//! space.
//!
//! The pipeline feeds the engine crate:
//!
//! ```text
//! enumerate_graphs(d, m) ──▶ [StableGraph] ──▶ colorations_for(graph, n)
//! ```

pub mod colorations;
pub mod enumerate;
pub mod graph;
pub mod store;

// Re-export commonly used items
pub use colorations::{
    coloration_count, colorations_for, Coloration, ColorationSource, DirectColorations,
    DIRECT_ENUMERATION_LIMIT,
};
pub use enumerate::enumerate_graphs;
pub use graph::{Edge, StableGraph};
pub use store::{ColorationStore, MemoryColorationStore};
