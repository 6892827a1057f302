use crate::graph::traits::{EdgeRef, Graph};
use crate::{Error, Result};
use log::debug;
use std::fmt::Debug;

/// A directed graph stored as compressed adjacency lists
///
/// Outgoing edges of vertex `v` live in `edges[offsets[v]..offsets[v + 1]]`,
/// in the order they appeared in the edge list. The graph exposes no mutation
/// after construction.
#[derive(Debug, Clone)]
pub struct DirectedGraph {
    /// Number of vertices in the graph
    vertex_count: usize,

    /// Start of each vertex's edge block; length is `vertex_count + 1`
    offsets: Vec<usize>,

    /// Edges grouped by tail vertex
    edges: Vec<EdgeRef>,

    /// Tail vertex of each edge, indexed by original edge position
    sources: Vec<usize>,
}

impl DirectedGraph {
    /// Builds a graph over `vertex_count` dense vertices from parallel edge columns
    ///
    /// `distance` defaults to `weight` when absent. Fails if the columns differ
    /// in length, an index is out of range, or a weight is negative or not finite.
    pub fn from_indices(
        vertex_count: usize,
        from: &[usize],
        to: &[usize],
        weight: &[f64],
        distance: Option<&[f64]>,
    ) -> Result<Self> {
        let m = from.len();
        if to.len() != m || weight.len() != m {
            return Err(Error::GraphConstruction(format!(
                "edge columns differ in length: from={}, to={}, weight={}",
                m,
                to.len(),
                weight.len()
            )));
        }
        let distance = distance.unwrap_or(weight);
        if distance.len() != m {
            return Err(Error::GraphConstruction(format!(
                "distance column has {} entries, expected {}",
                distance.len(),
                m
            )));
        }

        for e in 0..m {
            if from[e] >= vertex_count || to[e] >= vertex_count {
                return Err(Error::GraphConstruction(format!(
                    "edge {} references vertex ({} -> {}) outside 0..{}",
                    e, from[e], to[e], vertex_count
                )));
            }
            check_weight("weight", e, weight[e])?;
            check_weight("distance", e, distance[e])?;
        }

        // Stable counting sort by tail vertex keeps construction order per vertex
        let mut offsets = vec![0usize; vertex_count + 1];
        for &u in from {
            offsets[u + 1] += 1;
        }
        for v in 0..vertex_count {
            offsets[v + 1] += offsets[v];
        }

        let mut cursor = offsets.clone();
        let placeholder = EdgeRef {
            index: 0,
            target: 0,
            weight: 0.0,
            distance: 0.0,
        };
        let mut edges = vec![placeholder; m];
        for e in 0..m {
            let slot = cursor[from[e]];
            edges[slot] = EdgeRef {
                index: e,
                target: to[e],
                weight: weight[e],
                distance: distance[e],
            };
            cursor[from[e]] += 1;
        }

        debug!("built graph with {} vertices and {} edges", vertex_count, m);

        Ok(DirectedGraph {
            vertex_count,
            offsets,
            edges,
            sources: from.to_vec(),
        })
    }
}

fn check_weight(column: &str, edge: usize, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::GraphConstruction(format!(
            "edge {} has invalid {} {}; weights must be finite and non-negative",
            edge, column, value
        )));
    }
    Ok(())
}

impl Graph for DirectedGraph {
    type Edges<'a> = std::iter::Copied<std::slice::Iter<'a, EdgeRef>>;

    fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn outgoing_edges(&self, vertex: usize) -> Self::Edges<'_> {
        self.edges[self.offsets[vertex]..self.offsets[vertex + 1]]
            .iter()
            .copied()
    }

    fn edge_source(&self, edge: usize) -> usize {
        self.sources[edge]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outgoing_edges_keep_construction_order() {
        let g = DirectedGraph::from_indices(
            3,
            &[1, 0, 1, 0],
            &[2, 1, 0, 2],
            &[1.0, 2.0, 3.0, 4.0],
            None,
        )
        .unwrap();

        let from_zero: Vec<(usize, usize)> =
            g.outgoing_edges(0).map(|e| (e.index, e.target)).collect();
        assert_eq!(from_zero, vec![(1, 1), (3, 2)]);

        let from_one: Vec<(usize, usize)> =
            g.outgoing_edges(1).map(|e| (e.index, e.target)).collect();
        assert_eq!(from_one, vec![(0, 2), (2, 0)]);

        assert_eq!(g.outgoing_edges(2).count(), 0);
        assert_eq!(g.edge_source(2), 1);
    }

    #[test]
    fn test_distance_defaults_to_weight() {
        let g = DirectedGraph::from_indices(2, &[0], &[1], &[7.5], None).unwrap();
        let e = g.outgoing_edges(0).next().unwrap();
        assert_eq!(e.distance, 7.5);
    }

    #[test]
    fn test_rejects_malformed_edges() {
        assert!(matches!(
            DirectedGraph::from_indices(2, &[0, 1], &[1], &[1.0, 1.0], None),
            Err(Error::GraphConstruction(_))
        ));
        assert!(matches!(
            DirectedGraph::from_indices(2, &[0], &[2], &[1.0], None),
            Err(Error::GraphConstruction(_))
        ));
        assert!(matches!(
            DirectedGraph::from_indices(2, &[0], &[1], &[-1.0], None),
            Err(Error::GraphConstruction(_))
        ));
        assert!(matches!(
            DirectedGraph::from_indices(2, &[0], &[1], &[1.0], Some(&[f64::NAN])),
            Err(Error::GraphConstruction(_))
        ));
    }
}
