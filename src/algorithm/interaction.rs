use log::debug;

use crate::algorithm::flows::check_decay;
use crate::algorithm::{Dispatcher, ShortestPathEngine, ShortestPathTree};
use crate::data_structures::HeapType;
use crate::graph::{Graph, Matrix};
use crate::{Error, Result};

fn check_density(nodes: &[usize], density: &[f64]) -> Result<()> {
    if density.len() != nodes.len() {
        return Err(Error::InvalidParameter(format!(
            "{} density values for {} nodes",
            density.len(),
            nodes.len()
        )));
    }
    if let Some(i) = density.iter().position(|d| !d.is_finite()) {
        return Err(Error::InvalidParameter(format!(
            "density at position {} is not finite",
            i
        )));
    }
    Ok(())
}

/// `density[j] * exp(-k * distance)` from the tree's source to every node
///
/// Unreached nodes get zero. A node's interaction with itself is its own density.
pub fn interaction_row(tree: &ShortestPathTree, nodes: &[usize], density: &[f64], k: f64) -> Vec<f64> {
    nodes
        .iter()
        .zip(density)
        .map(|(&j, &mass)| {
            if tree.is_reached(j) {
                mass * (-k * tree.distances[j]).exp()
            } else {
                0.0
            }
        })
        .collect()
}

/// Gravity-style interaction between every ordered pair of `nodes`
///
/// Entry (i, j) is `density[j] * exp(-k * d(nodes[i], nodes[j]))`, with `d` the
/// physical length of the minimum-weight path.
pub fn spatial_interaction<G: Graph>(
    dispatcher: &Dispatcher,
    graph: &G,
    nodes: &[usize],
    density: &[f64],
    k: f64,
) -> Result<Matrix> {
    check_decay(k)?;
    check_density(nodes, density)?;
    debug!("spatial interaction over {} nodes, k = {}", nodes.len(), k);

    let rows = dispatcher.map_origins(graph, nodes, |engine, _, origin| {
        let tree = engine.run_to_all(origin, nodes)?;
        Ok(interaction_row(tree, nodes, density, k))
    })?;
    Matrix::from_rows(rows)
}

/// Row `i` of the interaction matrix, computed on the calling thread
pub fn one_spatial_interaction<G: Graph>(
    graph: &G,
    heap: HeapType,
    nodes: &[usize],
    density: &[f64],
    k: f64,
    i: usize,
) -> Result<Vec<f64>> {
    check_decay(k)?;
    check_density(nodes, density)?;
    let origin = *nodes.get(i).ok_or_else(|| {
        Error::InvalidParameter(format!("row {} out of range for {} nodes", i, nodes.len()))
    })?;
    let mut engine = ShortestPathEngine::new(graph, heap);
    let tree = engine.run_to_all(origin, nodes)?;
    Ok(interaction_row(tree, nodes, density, k))
}
