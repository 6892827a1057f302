use std::fmt::Debug;

use crate::data_structures::PriorityQueue;

const ABSENT: usize = usize::MAX;

/// Unsorted array queue: O(1) insert and decrease-key, O(n) extraction
///
/// Competitive on small graphs and as a worst-case baseline for the others.
#[derive(Debug, Default)]
pub struct LinearHeap {
    items: Vec<(usize, f64)>,
    position: Vec<usize>,
}

impl LinearHeap {
    /// Creates an empty queue for vertices `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        LinearHeap {
            items: Vec::with_capacity(capacity),
            position: vec![ABSENT; capacity],
        }
    }

    fn ensure_slot(&mut self, vertex: usize) {
        if vertex >= self.position.len() {
            self.position.resize(vertex + 1, ABSENT);
        }
    }
}

impl PriorityQueue for LinearHeap {
    fn insert(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        if self.position[vertex] != ABSENT {
            self.decrease_key(vertex, key);
            return;
        }
        self.position[vertex] = self.items.len();
        self.items.push((vertex, key));
    }

    fn decrease_key(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        match self.position[vertex] {
            ABSENT => self.insert(vertex, key),
            slot => {
                if key < self.items[slot].1 {
                    self.items[slot].1 = key;
                }
            }
        }
    }

    fn pop_min(&mut self) -> Option<(usize, f64)> {
        let mut best = 0;
        for (i, &(v, k)) in self.items.iter().enumerate().skip(1) {
            let (bv, bk) = self.items[best];
            if k < bk || (k == bk && v < bv) {
                best = i;
            }
        }
        if best >= self.items.len() {
            return None;
        }
        let (vertex, key) = self.items.swap_remove(best);
        if let Some(&(moved, _)) = self.items.get(best) {
            self.position[moved] = best;
        }
        self.position[vertex] = ABSENT;
        Some((vertex, key))
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        for &(vertex, _) in &self.items {
            self.position[vertex] = ABSENT;
        }
        self.items.clear();
    }
}
