use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::graph::EdgeList;
use crate::{Error, Result};

/// Bijection between external vertex identifiers and dense indices
#[derive(Debug, Clone)]
pub struct VertexMap<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    /// External id of each dense index
    ids: Vec<Id>,

    /// Dense index of each external id
    index: HashMap<Id, usize>,
}

impl<Id> VertexMap<Id>
where
    Id: Eq + Hash + Clone + Debug,
{
    /// Collects every endpoint of an edge list, numbering them in first-appearance order
    ///
    /// Endpoints are visited as `from[0], to[0], from[1], to[1], ...`.
    pub fn from_edges(edges: &EdgeList<Id>) -> Self {
        let mut map = VertexMap {
            ids: Vec::new(),
            index: HashMap::with_capacity(edges.len()),
        };
        for (u, v) in edges.from.iter().zip(edges.to.iter()) {
            map.insert(u);
            map.insert(v);
        }
        map
    }

    fn insert(&mut self, id: &Id) {
        if !self.index.contains_key(id) {
            self.index.insert(id.clone(), self.ids.len());
            self.ids.push(id.clone());
        }
    }

    /// Returns the number of vertices
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the map holds no vertices
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Dense index of an external id, if known
    pub fn index_of(&self, id: &Id) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// External id of a dense index, if in range
    pub fn id_of(&self, index: usize) -> Option<&Id> {
        self.ids.get(index)
    }

    /// Dense index of an external id, failing with `UnknownVertex`
    pub fn lookup(&self, id: &Id) -> Result<usize> {
        self.index_of(id)
            .ok_or_else(|| Error::UnknownVertex(format!("{:?}", id)))
    }

    /// Converts a batch of external ids, failing on the first unknown one
    pub fn indices_of(&self, ids: &[Id]) -> Result<Vec<usize>> {
        ids.iter().map(|id| self.lookup(id)).collect()
    }

    /// All external ids in index order
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Dense endpoints of every edge, in edge-list order
    pub fn edge_indices(&self, edges: &EdgeList<Id>) -> Result<(Vec<usize>, Vec<usize>)> {
        Ok((self.indices_of(&edges.from)?, self.indices_of(&edges.to)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let edges = EdgeList::new(
            vec!["x".to_string(), "y".to_string(), "x".to_string()],
            vec!["y".to_string(), "z".to_string(), "w".to_string()],
            vec![1.0, 1.0, 1.0],
        );
        let map = VertexMap::from_edges(&edges);
        assert_eq!(map.len(), 4);
        assert_eq!(map.ids(), &["x", "y", "z", "w"]);
        assert_eq!(map.index_of(&"z".to_string()), Some(2));
        assert_eq!(map.id_of(3).map(String::as_str), Some("w"));
    }

    #[test]
    fn test_unknown_id_is_reported() {
        let edges = EdgeList::new(vec![10u64], vec![20u64], vec![1.0]);
        let map = VertexMap::from_edges(&edges);
        match map.indices_of(&[10, 99]) {
            Err(Error::UnknownVertex(id)) => assert_eq!(id, "99"),
            other => panic!("expected UnknownVertex, got {:?}", other),
        }
    }
}
