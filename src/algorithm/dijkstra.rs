use std::fmt::Debug;

use crate::algorithm::ShortestPathTree;
use crate::data_structures::{HeapType, PriorityQueue};
use crate::graph::Graph;
use crate::{Error, Result, UNREACHABLE};

/// Dijkstra's algorithm over a shared graph with privately owned scratch
///
/// One engine serves many queries in sequence. Between queries only the
/// vertices touched by the previous run are reset, so buffers are allocated
/// once per engine rather than once per query.
#[derive(Debug)]
pub struct ShortestPathEngine<'g, G: Graph> {
    graph: &'g G,
    queue: Box<dyn PriorityQueue>,
    tree: ShortestPathTree,
    settled: Vec<bool>,
    is_target: Vec<bool>,
    /// Vertices whose entries in `tree` differ from the empty state
    touched: Vec<usize>,
    /// Per-vertex workspace for consumers of the tree; all zero between uses
    scratch: Vec<f64>,
}

impl<'g, G: Graph> ShortestPathEngine<'g, G> {
    /// Creates an engine with its own queue of the given type
    pub fn new(graph: &'g G, heap: HeapType) -> Self {
        let n = graph.vertex_count();
        ShortestPathEngine {
            graph,
            queue: heap.create(n),
            tree: ShortestPathTree::empty(n),
            settled: vec![false; n],
            is_target: vec![false; n],
            touched: Vec::new(),
            scratch: vec![0.0; n],
        }
    }

    /// The graph this engine runs on
    pub fn graph(&self) -> &'g G {
        self.graph
    }

    /// Tree produced by the most recent run
    pub fn tree(&self) -> &ShortestPathTree {
        &self.tree
    }

    /// Tree of the most recent run together with the zeroed per-vertex workspace
    ///
    /// Callers must leave every workspace entry at zero when they are done.
    pub fn tree_and_scratch(&mut self) -> (&ShortestPathTree, &mut [f64]) {
        (&self.tree, &mut self.scratch)
    }

    /// Computes the full shortest-path tree from `source`
    pub fn run(&mut self, source: usize) -> Result<&ShortestPathTree> {
        self.search(source, 0)?;
        Ok(&self.tree)
    }

    /// Stops as soon as `target` has been finalised
    pub fn run_to(&mut self, source: usize, target: usize) -> Result<&ShortestPathTree> {
        self.run_to_all(source, std::slice::from_ref(&target))
    }

    /// Stops as soon as every vertex in `targets` has been finalised
    ///
    /// Vertices outside `targets` may be left with provisional or unreached
    /// entries. An empty target list runs to completion.
    pub fn run_to_all(&mut self, source: usize, targets: &[usize]) -> Result<&ShortestPathTree> {
        let n = self.graph.vertex_count();
        let mut remaining = 0;
        for &t in targets {
            if t >= n {
                self.clear_targets(targets);
                return Err(Error::UnknownVertex(format!("index {}", t)));
            }
            if !self.is_target[t] {
                self.is_target[t] = true;
                remaining += 1;
            }
        }
        let outcome = self.search(source, remaining);
        self.clear_targets(targets);
        outcome?;
        Ok(&self.tree)
    }

    fn clear_targets(&mut self, targets: &[usize]) {
        for &t in targets {
            if let Some(flag) = self.is_target.get_mut(t) {
                *flag = false;
            }
        }
    }

    fn reset(&mut self) {
        for &v in &self.touched {
            self.tree.weights[v] = UNREACHABLE;
            self.tree.distances[v] = UNREACHABLE;
            self.tree.predecessors[v] = None;
            self.tree.predecessor_edges[v] = None;
            self.settled[v] = false;
        }
        self.touched.clear();
        self.tree.settle_order.clear();
        self.queue.clear();
    }

    /// Runs until the queue drains or `targets` flagged vertices are settled
    ///
    /// `targets == 0` means no early exit.
    fn search(&mut self, source: usize, mut targets: usize) -> Result<()> {
        if !self.graph.has_vertex(source) {
            return Err(Error::UnknownVertex(format!("index {}", source)));
        }
        self.reset();

        let early_exit = targets > 0;
        let tree = &mut self.tree;
        tree.source = source;
        tree.weights[source] = 0.0;
        tree.distances[source] = 0.0;
        self.touched.push(source);
        self.queue.insert(source, 0.0);

        while let Some((u, key)) = self.queue.pop_min() {
            // stale entry from a queue that does not support true decrease-key
            if self.settled[u] || key > tree.weights[u] {
                continue;
            }
            self.settled[u] = true;
            tree.settle_order.push(u);

            if early_exit && self.is_target[u] {
                targets -= 1;
                if targets == 0 {
                    break;
                }
            }

            let (wu, du) = (tree.weights[u], tree.distances[u]);
            for edge in self.graph.outgoing_edges(u) {
                let v = edge.target;
                if self.settled[v] {
                    continue;
                }
                let weight = wu + edge.weight;
                let distance = du + edge.distance;
                let best = tree.weights[v];

                let improves = weight < best;
                // equal cost: prefer the shorter path, then the lower edge index
                let better_tie = weight == best
                    && (distance < tree.distances[v]
                        || (distance == tree.distances[v]
                            && tree.predecessor_edges[v].map_or(true, |e| edge.index < e)));
                if !improves && !better_tie {
                    continue;
                }

                if improves {
                    if best == UNREACHABLE {
                        self.touched.push(v);
                        self.queue.insert(v, weight);
                    } else {
                        self.queue.decrease_key(v, weight);
                    }
                }
                tree.weights[v] = weight;
                tree.distances[v] = distance;
                tree.predecessors[v] = Some(u);
                tree.predecessor_edges[v] = Some(edge.index);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DirectedGraph;

    fn diamond() -> DirectedGraph {
        // 0 -> 1 -> 3 and 0 -> 2 -> 3 cost the same; the lower route is shorter
        DirectedGraph::from_indices(
            5,
            &[0, 1, 0, 2],
            &[1, 3, 2, 3],
            &[1.0, 1.0, 1.0, 1.0],
            Some(&[5.0, 5.0, 2.0, 2.0]),
        )
        .unwrap()
    }

    #[test]
    fn test_equal_cost_prefers_shorter_distance() {
        let g = diamond();
        for heap in HeapType::ALL {
            let mut engine = ShortestPathEngine::new(&g, heap);
            let tree = engine.run(0).unwrap();
            assert_eq!(tree.weights[3], 2.0);
            assert_eq!(tree.distances[3], 4.0, "{}", heap);
            assert_eq!(tree.path_to(3).unwrap(), vec![0, 2, 3], "{}", heap);
            assert!(!tree.is_reached(4));
        }
    }

    #[test]
    fn test_scratch_is_reset_between_queries() {
        let g = diamond();
        let mut engine = ShortestPathEngine::new(&g, HeapType::Binary);
        engine.run(0).unwrap();
        let tree = engine.run(2).unwrap();
        assert_eq!(tree.source, 2);
        assert_eq!(tree.weights[2], 0.0);
        assert_eq!(tree.weights[3], 1.0);
        assert!(!tree.is_reached(0));
        assert!(!tree.is_reached(1));
        assert_eq!(tree.predecessors[1], None);
        assert_eq!(tree.settle_order, vec![2, 3]);
    }

    #[test]
    fn test_early_exit_stops_at_target() {
        let g = DirectedGraph::from_indices(
            4,
            &[0, 1, 2],
            &[1, 2, 3],
            &[1.0, 1.0, 1.0],
            None,
        )
        .unwrap();
        let mut engine = ShortestPathEngine::new(&g, HeapType::Fibonacci);
        let tree = engine.run_to(0, 1).unwrap();
        assert_eq!(tree.weights[1], 1.0);
        assert_eq!(tree.settle_order, vec![0, 1]);
        assert!(!tree.is_reached(3));

        let tree = engine.run_to_all(0, &[2, 1, 2]).unwrap();
        assert_eq!(tree.settle_order, vec![0, 1, 2]);
        let tree = engine.run(0).unwrap();
        assert_eq!(tree.weights[3], 3.0);
    }

    #[test]
    fn test_out_of_range_source_or_target() {
        let g = diamond();
        let mut engine = ShortestPathEngine::new(&g, HeapType::Binary);
        assert!(matches!(engine.run(9), Err(Error::UnknownVertex(_))));
        assert!(matches!(engine.run_to(0, 9), Err(Error::UnknownVertex(_))));
        // a failed call leaves no target flags behind
        assert_eq!(engine.run_to(0, 1).unwrap().weights[1], 1.0);
    }
}
