//! netroute - batch shortest paths over weighted street networks
//!
//! This library answers large batches of origin/destination routing queries
//! over an immutable directed graph. Every origin gets one Dijkstra run on a
//! pluggable decrease-key priority queue, and the resulting shortest-path tree
//! is turned into a distance row, explicit paths, aggregated edge flows,
//! distance-decay dispersal or a gravity-style interaction row.
//!
//! Origins are partitioned into contiguous ranges and processed on a rayon
//! worker pool. The graph is shared read-only; queues and scratch buffers are
//! owned by each worker.

pub mod algorithm;
pub mod config;
pub mod data_structures;
pub mod graph;
pub mod router;

pub use algorithm::{
    dijkstra::ShortestPathEngine,
    dispatch::{CancellationToken, Dispatcher},
    ShortestPathTree,
};
pub use config::{RouterConfig, UnknownVertexPolicy};
pub use data_structures::{HeapType, PriorityQueue};
/// Re-export main types for convenient use
pub use graph::{DirectedGraph, EdgeList, Graph, Matrix, VertexMap};
pub use router::Router;

/// Sentinel distance for vertices that were never reached
pub const UNREACHABLE: f64 = f64::INFINITY;

/// Error types for the library
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Graph construction failed: {0}")]
    GraphConstruction(String),

    #[error("Unknown heap type: {0}")]
    UnknownHeapType(String),

    #[error("Unknown vertex: {0}")]
    UnknownVertex(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Result inconsistency: {0}")]
    ResultInconsistency(String),

    #[error("Batch cancelled")]
    Cancelled,

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for the library
pub type Result<T> = std::result::Result<T, Error>;
