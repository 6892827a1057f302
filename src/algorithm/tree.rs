use crate::{Error, Result, UNREACHABLE};

/// Shortest-path tree from one source, stored as flat arrays indexed by vertex
#[derive(Debug, Clone)]
pub struct ShortestPathTree {
    /// Source vertex ID
    pub source: usize,

    /// Minimised routing cost to each vertex, `UNREACHABLE` if not reached
    pub weights: Vec<f64>,

    /// Physical length of the tree path to each vertex, `UNREACHABLE` if not reached
    pub distances: Vec<f64>,

    /// Predecessor vertices in the shortest path tree
    pub predecessors: Vec<Option<usize>>,

    /// Edge (by edge-list position) leading into each vertex
    pub predecessor_edges: Vec<Option<usize>>,

    /// Vertices in the order they were finalised
    pub settle_order: Vec<usize>,
}

impl ShortestPathTree {
    /// Creates a tree over `n` vertices with nothing reached
    pub fn empty(n: usize) -> Self {
        ShortestPathTree {
            source: 0,
            weights: vec![UNREACHABLE; n],
            distances: vec![UNREACHABLE; n],
            predecessors: vec![None; n],
            predecessor_edges: vec![None; n],
            settle_order: Vec::new(),
        }
    }

    /// Returns the number of vertices the tree spans
    pub fn vertex_count(&self) -> usize {
        self.weights.len()
    }

    /// Returns true if the vertex has a finite cost from the source
    pub fn is_reached(&self, vertex: usize) -> bool {
        self.weights[vertex] < UNREACHABLE
    }

    /// Get the shortest path from source to target as a sequence of vertices
    ///
    /// An unreached target yields an empty path. A predecessor chain that
    /// loops or breaks before the source is reported as `ResultInconsistency`.
    pub fn path_to(&self, target: usize) -> Result<Vec<usize>> {
        let mut path = Vec::new();
        self.walk_back(target, |vertex, _| path.push(vertex))?;
        path.reverse();
        Ok(path)
    }

    /// Edge-list positions of the edges on the path from source to target
    pub fn path_edges_to(&self, target: usize) -> Result<Vec<usize>> {
        let mut edges = Vec::new();
        self.walk_back(target, |_, edge| {
            if let Some(e) = edge {
                edges.push(e);
            }
        })?;
        edges.reverse();
        Ok(edges)
    }

    /// Visits target, its predecessor, ... down to the source, with the edge into each
    fn walk_back<F>(&self, target: usize, mut visit: F) -> Result<()>
    where
        F: FnMut(usize, Option<usize>),
    {
        if target >= self.vertex_count() {
            return Err(Error::UnknownVertex(format!("index {}", target)));
        }
        if !self.is_reached(target) {
            return Ok(());
        }

        let mut current = target;
        let mut steps = 0;
        while current != self.source {
            steps += 1;
            if steps > self.vertex_count() {
                return Err(Error::ResultInconsistency(format!(
                    "predecessor cycle on the path from {} to {}",
                    self.source, target
                )));
            }
            let edge = self.predecessor_edges[current];
            visit(current, edge);
            current = self.predecessors[current].ok_or_else(|| {
                Error::ResultInconsistency(format!(
                    "reached vertex {} has no predecessor",
                    current
                ))
            })?;
        }
        visit(self.source, None);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> ShortestPathTree {
        let mut tree = ShortestPathTree::empty(4);
        tree.source = 0;
        tree.weights = vec![0.0, 1.0, 2.0, UNREACHABLE];
        tree.predecessors = vec![None, Some(0), Some(1), None];
        tree.predecessor_edges = vec![None, Some(5), Some(7), None];
        tree
    }

    #[test]
    fn test_path_reconstruction() {
        let tree = chain();
        assert_eq!(tree.path_to(2).unwrap(), vec![0, 1, 2]);
        assert_eq!(tree.path_edges_to(2).unwrap(), vec![5, 7]);
        assert_eq!(tree.path_to(0).unwrap(), vec![0]);
        assert!(tree.path_to(3).unwrap().is_empty());
    }

    #[test]
    fn test_cycle_is_inconsistent() {
        let mut tree = chain();
        tree.predecessors[1] = Some(2);
        assert!(matches!(tree.path_to(2), Err(Error::ResultInconsistency(_))));
    }

    #[test]
    fn test_broken_chain_is_inconsistent() {
        let mut tree = chain();
        tree.predecessors[1] = None;
        assert!(matches!(tree.path_to(2), Err(Error::ResultInconsistency(_))));
    }
}
