use crate::algorithm::{Dispatcher, ShortestPathEngine, ShortestPathTree};
use crate::graph::{Graph, Matrix};
use crate::{Result, UNREACHABLE};

/// Which per-vertex cost a distance matrix reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Physical length along the minimum-weight path
    Distance,
    /// The minimised routing weight itself
    Weight,
}

impl Metric {
    fn of(self, tree: &ShortestPathTree, vertex: usize) -> f64 {
        match self {
            Metric::Distance => tree.distances[vertex],
            Metric::Weight => tree.weights[vertex],
        }
    }
}

/// Runs only as far as the requested destinations need
fn run_for<'t, G: Graph>(
    engine: &'t mut ShortestPathEngine<'_, G>,
    origin: usize,
    destinations: &[usize],
) -> Result<&'t ShortestPathTree> {
    match destinations {
        [] => engine.run(origin),
        [target] => engine.run_to(origin, *target),
        targets => engine.run_to_all(origin, targets),
    }
}

/// Origins x destinations matrix of shortest-path costs
///
/// Unreachable pairs hold `UNREACHABLE`.
pub fn distance_matrix<G: Graph>(
    dispatcher: &Dispatcher,
    graph: &G,
    origins: &[usize],
    destinations: &[usize],
    metric: Metric,
) -> Result<Matrix> {
    let rows = dispatcher.map_origins(graph, origins, |engine, _, origin| {
        let tree = run_for(engine, origin, destinations)?;
        Ok(destinations
            .iter()
            .map(|&d| {
                if tree.is_reached(d) {
                    metric.of(tree, d)
                } else {
                    UNREACHABLE
                }
            })
            .collect::<Vec<f64>>())
    })?;

    let mut data = Vec::with_capacity(origins.len() * destinations.len());
    for row in rows {
        data.extend(row);
    }
    Matrix::from_vec(origins.len(), destinations.len(), data)
}

/// Vertex sequences for every (origin, destination) pair, indexed `[origin][destination]`
///
/// Unreachable pairs get an empty path.
pub fn paths<G: Graph>(
    dispatcher: &Dispatcher,
    graph: &G,
    origins: &[usize],
    destinations: &[usize],
) -> Result<Vec<Vec<Vec<usize>>>> {
    dispatcher.map_origins(graph, origins, |engine, _, origin| {
        let tree = run_for(engine, origin, destinations)?;
        destinations.iter().map(|&d| tree.path_to(d)).collect()
    })
}
