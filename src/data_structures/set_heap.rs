use ordered_float::OrderedFloat;
use std::collections::BTreeSet;
use std::fmt::Debug;

use crate::data_structures::PriorityQueue;

/// Priority queue backed by an ordered set of (key, vertex) pairs
///
/// Decrease-key is a remove followed by a reinsert.
#[derive(Debug, Default)]
pub struct SetHeap {
    entries: BTreeSet<(OrderedFloat<f64>, usize)>,
    /// Current key of each queued vertex
    keys: Vec<Option<OrderedFloat<f64>>>,
}

impl SetHeap {
    /// Creates an empty set heap for vertices `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        SetHeap {
            entries: BTreeSet::new(),
            keys: vec![None; capacity],
        }
    }

    fn ensure_slot(&mut self, vertex: usize) {
        if vertex >= self.keys.len() {
            self.keys.resize(vertex + 1, None);
        }
    }
}

impl PriorityQueue for SetHeap {
    fn insert(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        if self.keys[vertex].is_some() {
            self.decrease_key(vertex, key);
            return;
        }
        let key = OrderedFloat(key);
        self.keys[vertex] = Some(key);
        self.entries.insert((key, vertex));
    }

    fn decrease_key(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        let Some(old) = self.keys[vertex] else {
            self.insert(vertex, key);
            return;
        };
        let key = OrderedFloat(key);
        if key >= old {
            return;
        }
        self.entries.remove(&(old, vertex));
        self.entries.insert((key, vertex));
        self.keys[vertex] = Some(key);
    }

    fn pop_min(&mut self) -> Option<(usize, f64)> {
        let (key, vertex) = self.entries.pop_first()?;
        self.keys[vertex] = None;
        Some((vertex, key.into_inner()))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn clear(&mut self) {
        for &(_, vertex) in &self.entries {
            self.keys[vertex] = None;
        }
        self.entries.clear();
    }
}
