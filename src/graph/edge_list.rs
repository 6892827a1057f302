use num_traits::ToPrimitive;
use std::fmt::Debug;

use crate::{Error, Result};

/// Flat edge list keyed by external vertex identifiers
///
/// Columns are parallel: edge `e` runs from `from[e]` to `to[e]` with routing
/// weight `weight[e]` and physical length `distance[e]`. Without a distance
/// column the routing weight doubles as length.
#[derive(Debug, Clone)]
pub struct EdgeList<Id> {
    pub from: Vec<Id>,
    pub to: Vec<Id>,
    pub weight: Vec<f64>,
    pub distance: Option<Vec<f64>>,
}

impl<Id: Clone + Debug> EdgeList<Id> {
    /// Creates an edge list whose physical lengths equal the routing weights
    pub fn new(from: Vec<Id>, to: Vec<Id>, weight: Vec<f64>) -> Self {
        EdgeList {
            from,
            to,
            weight,
            distance: None,
        }
    }

    /// Attaches a physical length column
    pub fn with_distances(mut self, distance: Vec<f64>) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Builds an edge list from numeric columns of any primitive type
    ///
    /// Integer travel times, `f32` lengths and the like are widened to `f64`.
    pub fn from_columns<W: ToPrimitive>(
        from: Vec<Id>,
        to: Vec<Id>,
        weight: &[W],
        distance: Option<&[W]>,
    ) -> Result<Self> {
        let weight = to_f64_column("weight", weight)?;
        let distance = match distance {
            Some(d) => Some(to_f64_column("distance", d)?),
            None => None,
        };
        Ok(EdgeList {
            from,
            to,
            weight,
            distance,
        })
    }

    /// Returns the number of edges
    pub fn len(&self) -> usize {
        self.from.len()
    }

    /// Returns true if the list holds no edges
    pub fn is_empty(&self) -> bool {
        self.from.is_empty()
    }

    /// Physical length column, falling back to routing weight
    pub fn distances(&self) -> &[f64] {
        self.distance.as_deref().unwrap_or(&self.weight)
    }

    /// Appends every edge reversed, turning a one-way list into an undirected network
    ///
    /// Reversed edges follow the originals, so edge `e + len()` is the mirror of `e`.
    pub fn with_reverse_edges(&self) -> Self {
        let mut from = self.from.clone();
        from.extend(self.to.iter().cloned());
        let mut to = self.to.clone();
        to.extend(self.from.iter().cloned());
        let mut weight = self.weight.clone();
        weight.extend_from_slice(&self.weight);
        let distance = self.distance.as_ref().map(|d| {
            let mut both = d.clone();
            both.extend_from_slice(d);
            both
        });
        EdgeList {
            from,
            to,
            weight,
            distance,
        }
    }
}

fn to_f64_column<W: ToPrimitive>(column: &str, values: &[W]) -> Result<Vec<f64>> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            v.to_f64().ok_or_else(|| {
                Error::GraphConstruction(format!("{} {} is not representable as f64", column, i))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_integer_columns() {
        let edges =
            EdgeList::from_columns(vec!["a", "b"], vec!["b", "c"], &[3u32, 4u32], None).unwrap();
        assert_eq!(edges.weight, vec![3.0, 4.0]);
        assert_eq!(edges.distances(), &[3.0, 4.0]);
    }

    #[test]
    fn test_reverse_edges_are_appended() {
        let edges = EdgeList::new(vec![1, 2], vec![2, 3], vec![1.0, 2.0])
            .with_distances(vec![10.0, 20.0])
            .with_reverse_edges();
        assert_eq!(edges.len(), 4);
        assert_eq!(edges.from, vec![1, 2, 2, 3]);
        assert_eq!(edges.to, vec![2, 3, 1, 2]);
        assert_eq!(edges.distances(), &[10.0, 20.0, 10.0, 20.0]);
    }
}
