use crate::graph::{DirectedGraph, EdgeList};
use crate::Result;
use rand::prelude::*;
use rand::rngs::StdRng;

/// Synthetic network whose vertex ids are already dense indices
#[derive(Debug, Clone)]
pub struct GeneratedNetwork {
    pub vertex_count: usize,
    pub edges: EdgeList<usize>,
}

impl GeneratedNetwork {
    /// Builds the graph store directly, skipping the vertex map
    pub fn graph(&self) -> Result<DirectedGraph> {
        DirectedGraph::from_indices(
            self.vertex_count,
            &self.edges.from,
            &self.edges.to,
            &self.edges.weight,
            self.edges.distance.as_deref(),
        )
    }
}

/// Generates a random directed graph with n vertices and about m edges
///
/// Self-loops are skipped. Physical lengths are drawn independently of the
/// routing weights, so the two columns disagree on which path is shortest.
pub fn generate_random(n: usize, m: usize, seed: u64) -> GeneratedNetwork {
    assert!(n > 1, "n must be at least 2");

    let mut rng = StdRng::seed_from_u64(seed);
    let mut from = Vec::with_capacity(m);
    let mut to = Vec::with_capacity(m);
    let mut weight = Vec::with_capacity(m);
    let mut distance = Vec::with_capacity(m);

    for _ in 0..m {
        let u = rng.gen_range(0..n);
        let v = rng.gen_range(0..n);
        if u == v {
            continue;
        }
        from.push(u);
        to.push(v);
        weight.push(rng.gen_range(1.0..100.0));
        distance.push(rng.gen_range(1.0..100.0));
    }

    GeneratedNetwork {
        vertex_count: n,
        edges: EdgeList::new(from, to, weight).with_distances(distance),
    }
}

/// Generates a two-way street grid of width*height intersections
///
/// Each block has a random length in [50, 150) metres and a random speed
/// factor, so the routing weight is travel time rather than length.
pub fn generate_street_grid(width: usize, height: usize, seed: u64) -> GeneratedNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut from = Vec::new();
    let mut to = Vec::new();
    let mut weight = Vec::new();
    let mut distance = Vec::new();

    let index = |x: usize, y: usize| -> usize { y * width + x };

    let mut add_street = |a: usize, b: usize, rng: &mut StdRng| {
        let length: f64 = rng.gen_range(50.0..150.0);
        let factor: f64 = rng.gen_range(0.5..2.0);
        for (u, v) in [(a, b), (b, a)] {
            from.push(u);
            to.push(v);
            distance.push(length);
            weight.push(length * factor);
        }
    };

    for y in 0..height {
        for x in 0..width {
            if x + 1 < width {
                add_street(index(x, y), index(x + 1, y), &mut rng);
            }
            if y + 1 < height {
                add_street(index(x, y), index(x, y + 1), &mut rng);
            }
        }
    }

    GeneratedNetwork {
        vertex_count: width * height,
        edges: EdgeList::new(from, to, weight).with_distances(distance),
    }
}

/// Generates a random geometric graph in the unit square
///
/// Vertices closer than `r` are joined in both directions with weight equal
/// to their Euclidean distance.
pub fn generate_geometric(n: usize, r: f64, seed: u64) -> GeneratedNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0)))
        .collect();

    let mut from = Vec::new();
    let mut to = Vec::new();
    let mut weight = Vec::new();

    for i in 0..n {
        for j in 0..n {
            if i == j {
                continue;
            }
            let (x1, y1) = points[i];
            let (x2, y2) = points[j];
            let dist = ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt();
            if dist <= r {
                from.push(i);
                to.push(j);
                weight.push(dist);
            }
        }
    }

    GeneratedNetwork {
        vertex_count: n,
        edges: EdgeList::new(from, to, weight),
    }
}
