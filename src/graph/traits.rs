use std::fmt::Debug;

/// One outgoing edge as seen by the shortest-path engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRef {
    /// Position of the edge in the edge list the graph was built from
    pub index: usize,

    /// Head vertex of the edge
    pub target: usize,

    /// Routing weight, the cost being minimised
    pub weight: f64,

    /// Physical length of the edge
    pub distance: f64,
}

/// Trait representing an immutable weighted directed graph
///
/// Implementations must not offer interior mutability: a single instance is
/// read concurrently by every worker of a batch.
pub trait Graph: Debug + Sync {
    /// Iterator over the outgoing edges of one vertex
    type Edges<'a>: Iterator<Item = EdgeRef> + 'a
    where
        Self: 'a;

    /// Returns the number of vertices in the graph
    fn vertex_count(&self) -> usize;

    /// Returns the number of edges in the graph
    fn edge_count(&self) -> usize;

    /// Returns the outgoing edges of a vertex in construction order
    fn outgoing_edges(&self, vertex: usize) -> Self::Edges<'_>;

    /// Returns the tail vertex of the edge at `edge` in the original edge list
    fn edge_source(&self, edge: usize) -> usize;

    /// Returns true if the vertex exists in the graph
    fn has_vertex(&self, vertex: usize) -> bool {
        vertex < self.vertex_count()
    }
}
