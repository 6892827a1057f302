//! Edge flows derived from shortest-path trees
//!
//! Both operations first place a flow value on tree vertices and then push it
//! towards the source in reverse settle order: a vertex is finalised after its
//! predecessor, so by the time a vertex is processed every descendant has
//! already handed its flow up. Each edge on the path to a vertex therefore
//! receives exactly that vertex's flow, as if every path were walked.

use log::debug;

use crate::algorithm::{Dispatcher, ShortestPathTree};
use crate::graph::{Graph, Matrix};
use crate::{Error, Result};

/// Moves vertex flows onto tree edges, leaving `vertex_flow` all zero
pub fn propagate_to_edges(
    tree: &ShortestPathTree,
    vertex_flow: &mut [f64],
    edge_flow: &mut [f64],
) -> Result<()> {
    for &v in tree.settle_order.iter().rev() {
        let flow = vertex_flow[v];
        if flow == 0.0 {
            continue;
        }
        vertex_flow[v] = 0.0;
        if v == tree.source {
            continue;
        }
        match (tree.predecessors[v], tree.predecessor_edges[v]) {
            (Some(pred), Some(edge)) => {
                edge_flow[edge] += flow;
                vertex_flow[pred] += flow;
            }
            _ => {
                return Err(Error::ResultInconsistency(format!(
                    "settled vertex {} has no tree edge",
                    v
                )))
            }
        }
    }
    Ok(())
}

fn check_non_negative(what: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|x| !x.is_finite() || *x < 0.0) {
        Some(i) => Err(Error::InvalidParameter(format!(
            "{} value {} at position {} must be finite and non-negative",
            what, values[i], i
        ))),
        None => Ok(()),
    }
}

/// Validates an exponential decay rate
pub fn check_decay(k: f64) -> Result<()> {
    if k.is_finite() && k > 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter(format!(
            "decay parameter must be positive and finite, got {}",
            k
        )))
    }
}

/// Sums origin-destination demand over the edges of each shortest path
///
/// `flows` is origins x destinations. Returns one value per edge, in edge-list
/// order. Pairs without a path contribute nothing.
pub fn aggregate_flows<G: Graph>(
    dispatcher: &Dispatcher,
    graph: &G,
    origins: &[usize],
    destinations: &[usize],
    flows: &Matrix,
) -> Result<Vec<f64>> {
    if flows.rows() != origins.len() || flows.cols() != destinations.len() {
        return Err(Error::InvalidParameter(format!(
            "flow matrix is {}x{} but there are {} origins and {} destinations",
            flows.rows(),
            flows.cols(),
            origins.len(),
            destinations.len()
        )));
    }
    check_non_negative("flow", flows.as_slice())?;
    debug!(
        "aggregating flows for {} origins and {} destinations",
        origins.len(),
        destinations.len()
    );

    dispatcher.fold_origins(graph, origins, graph.edge_count(), |engine, i, origin, acc| {
        let row = flows.row(i);
        let targets: Vec<usize> = destinations
            .iter()
            .zip(row)
            .filter(|&(_, &f)| f > 0.0)
            .map(|(&d, _)| d)
            .collect();
        if targets.is_empty() {
            return Ok(());
        }

        engine.run_to_all(origin, &targets)?;
        let (tree, vertex_flow) = engine.tree_and_scratch();
        for (&dest, &f) in destinations.iter().zip(row) {
            if f > 0.0 && dest != origin && tree.is_reached(dest) {
                vertex_flow[dest] += f;
            }
        }
        propagate_to_edges(tree, vertex_flow, acc)
    })
}

/// Normalised exp(-k * distance) weights of every vertex reached from the source
///
/// The source itself is excluded. Weights sum to one unless nothing besides the
/// source was reached, in which case the result is empty.
pub fn dispersal_weights(tree: &ShortestPathTree, k: f64) -> Vec<(usize, f64)> {
    let reached: Vec<usize> = tree
        .settle_order
        .iter()
        .copied()
        .filter(|&v| v != tree.source)
        .collect();
    let Some(nearest) = reached
        .iter()
        .map(|&v| tree.distances[v])
        .min_by(|a, b| a.total_cmp(b))
    else {
        return Vec::new();
    };

    // shifting by the nearest distance keeps the largest term at exp(0)
    let raw: Vec<f64> = reached
        .iter()
        .map(|&v| (-k * (tree.distances[v] - nearest)).exp())
        .collect();
    let total: f64 = raw.iter().sum();
    reached
        .into_iter()
        .zip(raw)
        .map(|(v, w)| (v, w / total))
        .collect()
}

/// Spreads each origin's injected flow over every reachable vertex with distance decay
///
/// `injected[i]` is the flow leaving `origins[i]`. Every edge on the tree path
/// to a vertex carries that vertex's share. Returns one value per edge.
pub fn disperse_flows<G: Graph>(
    dispatcher: &Dispatcher,
    graph: &G,
    origins: &[usize],
    injected: &[f64],
    k: f64,
) -> Result<Vec<f64>> {
    check_decay(k)?;
    if injected.len() != origins.len() {
        return Err(Error::InvalidParameter(format!(
            "{} injected flows for {} origins",
            injected.len(),
            origins.len()
        )));
    }
    check_non_negative("injected flow", injected)?;

    dispatcher.fold_origins(graph, origins, graph.edge_count(), |engine, i, origin, acc| {
        let amount = injected[i];
        if amount == 0.0 {
            return Ok(());
        }
        engine.run(origin)?;
        let (tree, vertex_flow) = engine.tree_and_scratch();
        for (v, share) in dispersal_weights(tree, k) {
            vertex_flow[v] += amount * share;
        }
        propagate_to_edges(tree, vertex_flow, acc)
    })
}
