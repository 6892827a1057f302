use log::{debug, info, warn};
use std::fmt::Debug;
use std::hash::Hash;

use crate::algorithm::{batch, flows, interaction, CancellationToken, Dispatcher, Metric};
use crate::config::{RouterConfig, UnknownVertexPolicy};
use crate::graph::{DirectedGraph, EdgeList, Graph, Matrix, VertexMap};
use crate::{Error, Result, UNREACHABLE};

/// Query ids that made it through the vertex map
struct Resolved {
    /// Position of each kept id in the caller's list
    positions: Vec<usize>,
    /// Dense index of each kept id
    indices: Vec<usize>,
}

impl Resolved {
    fn is_complete(&self, requested: usize) -> bool {
        self.positions.len() == requested
    }
}

/// Batch routing over one immutable network keyed by external vertex ids
///
/// The vertex map, graph and worker pool are built once; every query method
/// translates ids, fans origins out over the pool and translates the result
/// back into caller order.
///
/// # Example
///
/// ```
/// use netroute::{EdgeList, Router, RouterConfig};
///
/// let edges = EdgeList::new(
///     vec!["a", "b", "c", "a"],
///     vec!["b", "c", "d", "d"],
///     vec![1.0, 1.0, 1.0, 10.0],
/// );
/// let router = Router::new(edges, RouterConfig::new().with_threads(2))?;
///
/// let m = router.distance_matrix(&["a"], &["d"])?;
/// assert_eq!(m.get(0, 0), 3.0);
/// assert_eq!(router.paths(&["a"], &["d"])?[0][0], vec!["a", "b", "c", "d"]);
/// # Ok::<(), netroute::Error>(())
/// ```
#[derive(Debug)]
pub struct Router<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    vertices: VertexMap<Id>,
    graph: DirectedGraph,
    dispatcher: Dispatcher,
    config: RouterConfig,
}

impl<Id> Router<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    /// Builds the vertex map, the graph and the worker pool
    pub fn new(edges: EdgeList<Id>, config: RouterConfig) -> Result<Self> {
        if edges.to.len() != edges.from.len() {
            return Err(Error::GraphConstruction(format!(
                "edge list has {} tails but {} heads",
                edges.from.len(),
                edges.to.len()
            )));
        }
        let vertices = VertexMap::from_edges(&edges);
        let (from, to) = vertices.edge_indices(&edges)?;
        let graph = DirectedGraph::from_indices(
            vertices.len(),
            &from,
            &to,
            &edges.weight,
            edges.distance.as_deref(),
        )?;
        let dispatcher = Dispatcher::new(&config)?;
        info!(
            "router ready: {} vertices, {} edges, heap {}, {} workers",
            graph.vertex_count(),
            graph.edge_count(),
            config.heap,
            dispatcher.threads()
        );
        Ok(Router {
            vertices,
            graph,
            dispatcher,
            config,
        })
    }

    /// Replaces the cancellation token checked by subsequent batches
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.dispatcher.set_cancellation(token);
        self
    }

    pub fn set_cancellation(&mut self, token: CancellationToken) {
        self.dispatcher.set_cancellation(token);
    }

    /// Token that cancels batches run by this router
    pub fn cancellation_token(&self) -> &CancellationToken {
        self.dispatcher.cancellation_token()
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn graph(&self) -> &DirectedGraph {
        &self.graph
    }

    pub fn vertices(&self) -> &VertexMap<Id> {
        &self.vertices
    }

    fn resolve(&self, role: &str, ids: &[Id]) -> Result<Resolved> {
        let mut resolved = Resolved {
            positions: Vec::with_capacity(ids.len()),
            indices: Vec::with_capacity(ids.len()),
        };
        for (position, id) in ids.iter().enumerate() {
            match self.vertices.index_of(id) {
                Some(index) => {
                    resolved.positions.push(position);
                    resolved.indices.push(index);
                }
                None => match self.config.unknown_vertex {
                    UnknownVertexPolicy::Fail => {
                        return Err(Error::UnknownVertex(format!("{} {:?}", role, id)))
                    }
                    UnknownVertexPolicy::Skip => warn!("skipping unknown {} {:?}", role, id),
                },
            }
        }
        Ok(resolved)
    }

    /// Physical length of the minimum-weight path for every origin/destination pair
    pub fn distance_matrix(&self, origins: &[Id], destinations: &[Id]) -> Result<Matrix> {
        self.cost_matrix(origins, destinations, Metric::Distance)
    }

    /// Minimised routing weight for every origin/destination pair
    pub fn weight_matrix(&self, origins: &[Id], destinations: &[Id]) -> Result<Matrix> {
        self.cost_matrix(origins, destinations, Metric::Weight)
    }

    fn cost_matrix(&self, origins: &[Id], destinations: &[Id], metric: Metric) -> Result<Matrix> {
        let rows = self.resolve("origin", origins)?;
        let cols = self.resolve("destination", destinations)?;
        let known = batch::distance_matrix(
            &self.dispatcher,
            &self.graph,
            &rows.indices,
            &cols.indices,
            metric,
        )?;
        if rows.is_complete(origins.len()) && cols.is_complete(destinations.len()) {
            return Ok(known);
        }
        Ok(scatter(
            &known,
            &rows,
            &cols,
            origins.len(),
            destinations.len(),
            UNREACHABLE,
        ))
    }

    /// Vertex id sequence of every shortest path, indexed `[origin][destination]`
    ///
    /// Unreachable or skipped pairs yield an empty path; a path from a vertex to
    /// itself is that single vertex.
    pub fn paths(&self, origins: &[Id], destinations: &[Id]) -> Result<Vec<Vec<Vec<Id>>>> {
        let rows = self.resolve("origin", origins)?;
        let cols = self.resolve("destination", destinations)?;
        let known = batch::paths(&self.dispatcher, &self.graph, &rows.indices, &cols.indices)?;

        let mut out = vec![vec![Vec::new(); destinations.len()]; origins.len()];
        for (&r, row) in rows.positions.iter().zip(known) {
            for (&c, path) in cols.positions.iter().zip(row) {
                out[r][c] = path
                    .into_iter()
                    .map(|v| self.id(v))
                    .collect::<Result<Vec<Id>>>()?;
            }
        }
        Ok(out)
    }

    fn id(&self, index: usize) -> Result<Id> {
        self.vertices.id_of(index).cloned().ok_or_else(|| {
            Error::ResultInconsistency(format!("path visits index {} outside the vertex map", index))
        })
    }

    /// Origin/destination demand summed over the edges of each shortest path
    ///
    /// `flows` is origins x destinations. Returns one value per edge in the
    /// order of the edge list the router was built from.
    pub fn flows_aggregate(
        &self,
        origins: &[Id],
        destinations: &[Id],
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
        let rows = self.resolve("origin", origins)?;
        let cols = self.resolve("destination", destinations)?;
        let demand = if rows.is_complete(origins.len()) && cols.is_complete(destinations.len()) {
            flows.clone()
        } else {
            gather(flows, &rows, &cols)?
        };
        flows::aggregate_flows(
            &self.dispatcher,
            &self.graph,
            &rows.indices,
            &cols.indices,
            &demand,
        )
    }

    /// Spreads each origin's injected flow over the network with decay rate `k`
    ///
    /// Returns one value per edge in edge-list order.
    pub fn flows_disperse(&self, origins: &[Id], injected: &[f64], k: f64) -> Result<Vec<f64>> {
        flows::check_decay(k)?;
        if injected.len() != origins.len() {
            return Err(Error::InvalidParameter(format!(
                "{} injected flows for {} origins",
                injected.len(),
                origins.len()
            )));
        }
        let rows = self.resolve("origin", origins)?;
        let amounts: Vec<f64> = rows.positions.iter().map(|&p| injected[p]).collect();
        flows::disperse_flows(&self.dispatcher, &self.graph, &rows.indices, &amounts, k)
    }

    /// Gravity-style interaction between every ordered pair of `nodes`
    ///
    /// Entry (i, j) is `density[j] * exp(-k * distance(i, j))`; unreachable and
    /// skipped pairs are zero.
    pub fn spatial_interaction(&self, nodes: &[Id], density: &[f64], k: f64) -> Result<Matrix> {
        let resolved = self.resolve_with_density(nodes, density)?;
        let known_density: Vec<f64> = resolved.positions.iter().map(|&p| density[p]).collect();
        let known = interaction::spatial_interaction(
            &self.dispatcher,
            &self.graph,
            &resolved.indices,
            &known_density,
            k,
        )?;
        if resolved.is_complete(nodes.len()) {
            return Ok(known);
        }
        Ok(scatter(&known, &resolved, &resolved, nodes.len(), nodes.len(), 0.0))
    }

    /// Row `i` of `spatial_interaction`, computed without the worker pool
    pub fn one_spatial_interaction(
        &self,
        nodes: &[Id],
        density: &[f64],
        k: f64,
        i: usize,
    ) -> Result<Vec<f64>> {
        if i >= nodes.len() {
            return Err(Error::InvalidParameter(format!(
                "row {} out of range for {} nodes",
                i,
                nodes.len()
            )));
        }
        let resolved = self.resolve_with_density(nodes, density)?;
        self.cancellation_token().check()?;

        let mut row = vec![0.0; nodes.len()];
        let Some(local) = resolved.positions.iter().position(|&p| p == i) else {
            debug!("interaction row {} belongs to a skipped node", i);
            return Ok(row);
        };
        let known_density: Vec<f64> = resolved.positions.iter().map(|&p| density[p]).collect();
        let known = interaction::one_spatial_interaction(
            &self.graph,
            self.config.heap,
            &resolved.indices,
            &known_density,
            k,
            local,
        )?;
        for (&p, value) in resolved.positions.iter().zip(known) {
            row[p] = value;
        }
        Ok(row)
    }

    fn resolve_with_density(&self, nodes: &[Id], density: &[f64]) -> Result<Resolved> {
        if density.len() != nodes.len() {
            return Err(Error::InvalidParameter(format!(
                "{} density values for {} nodes",
                density.len(),
                nodes.len()
            )));
        }
        self.resolve("node", nodes)
    }
}

/// Places a matrix over kept ids into a full-size matrix filled with `fill`
fn scatter(
    known: &Matrix,
    rows: &Resolved,
    cols: &Resolved,
    row_count: usize,
    col_count: usize,
    fill: f64,
) -> Matrix {
    let mut full = Matrix::filled(row_count, col_count, fill);
    for (i, &r) in rows.positions.iter().enumerate() {
        for (j, &c) in cols.positions.iter().enumerate() {
            full.set(r, c, known.get(i, j));
        }
    }
    full
}

/// Sub-matrix of the kept rows and columns
fn gather(full: &Matrix, rows: &Resolved, cols: &Resolved) -> Result<Matrix> {
    let mut data = Vec::with_capacity(rows.positions.len() * cols.positions.len());
    for &r in &rows.positions {
        let row = full.row(r);
        data.extend(cols.positions.iter().map(|&c| row[c]));
    }
    Matrix::from_vec(rows.positions.len(), cols.positions.len(), data)
}
