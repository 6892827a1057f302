use serde::{Deserialize, Serialize};

use crate::data_structures::HeapType;
use crate::{Error, Result};

/// What a batch does with a query id that is missing from the vertex map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownVertexPolicy {
    /// Fail the whole batch before any routing starts
    #[default]
    Fail,
    /// Leave the query's output slot at its unreachable sentinel and carry on
    Skip,
}

fn default_chunk_size() -> usize {
    32
}

/// Settings shared by every batch a router runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Priority queue used by every worker
    #[serde(default)]
    pub heap: HeapType,

    /// Worker count; `None` uses the available hardware parallelism
    #[serde(default)]
    pub threads: Option<usize>,

    /// Number of consecutive origins handled as one unit of work
    ///
    /// Results depend on this value only through floating-point summation
    /// order of edge flows; they never depend on the worker count.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Handling of query ids absent from the vertex map
    #[serde(default)]
    pub unknown_vertex: UnknownVertexPolicy,
}

impl Default for RouterConfig {
    fn default() -> Self {
        RouterConfig {
            heap: HeapType::default(),
            threads: None,
            chunk_size: default_chunk_size(),
            unknown_vertex: UnknownVertexPolicy::default(),
        }
    }
}

impl RouterConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON document; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            Error::InvalidParameter(format!("invalid router config: {}", e))
        };
        let value: serde_json::Value = serde_json::from_str(json).map_err(invalid)?;
        // a misspelt heap name is reported as such, not as a generic parse failure
        if let Some(name) = value.get("heap").and_then(|h| h.as_str()) {
            name.parse::<HeapType>()?;
        }
        let config: RouterConfig = serde_json::from_value(value).map_err(invalid)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the priority queue implementation
    pub fn with_heap(mut self, heap: HeapType) -> Self {
        self.heap = heap;
        self
    }

    /// Set the priority queue implementation by name
    pub fn with_heap_name(self, name: &str) -> Result<Self> {
        Ok(self.with_heap(name.parse()?))
    }

    /// Set the number of worker threads
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Set the number of origins per unit of work
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set the handling of unknown query ids
    pub fn with_unknown_vertex_policy(mut self, policy: UnknownVertexPolicy) -> Self {
        self.unknown_vertex = policy;
        self
    }

    /// Checks values serde cannot reject on its own
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidParameter("chunk_size must be positive".into()));
        }
        if self.threads == Some(0) {
            return Err(Error::InvalidParameter("threads must be positive".into()));
        }
        Ok(())
    }
}
