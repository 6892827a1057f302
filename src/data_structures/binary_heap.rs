use std::fmt::Debug;

use crate::data_structures::PriorityQueue;

const ABSENT: usize = usize::MAX;

/// Binary min-heap with a position index for O(log n) decrease-key
///
/// Ties on key are broken by vertex index, so the pop order is fully
/// determined by the inserted (vertex, key) pairs.
#[derive(Debug, Default)]
pub struct IndexedBinaryHeap {
    /// Heap-ordered (key, vertex) entries
    heap: Vec<(f64, usize)>,

    /// Slot of each vertex in `heap`, or ABSENT
    position: Vec<usize>,
}

impl IndexedBinaryHeap {
    /// Creates a new empty priority queue for vertices `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        IndexedBinaryHeap {
            heap: Vec::with_capacity(capacity),
            position: vec![ABSENT; capacity],
        }
    }

    fn less(a: (f64, usize), b: (f64, usize)) -> bool {
        a.0 < b.0 || (a.0 == b.0 && a.1 < b.1)
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.position[self.heap[i].1] = i;
        self.position[self.heap[j].1] = j;
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !Self::less(self.heap[i], self.heap[parent]) {
                break;
            }
            self.swap(i, parent);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.heap.len();
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < n && Self::less(self.heap[left], self.heap[smallest]) {
                smallest = left;
            }
            if right < n && Self::less(self.heap[right], self.heap[smallest]) {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }

    fn ensure_slot(&mut self, vertex: usize) {
        if vertex >= self.position.len() {
            self.position.resize(vertex + 1, ABSENT);
        }
    }
}

impl PriorityQueue for IndexedBinaryHeap {
    fn insert(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        if self.position[vertex] != ABSENT {
            self.decrease_key(vertex, key);
            return;
        }
        let slot = self.heap.len();
        self.heap.push((key, vertex));
        self.position[vertex] = slot;
        self.sift_up(slot);
    }

    fn decrease_key(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        let slot = self.position[vertex];
        if slot == ABSENT {
            self.insert(vertex, key);
            return;
        }
        if key >= self.heap[slot].0 {
            return;
        }
        self.heap[slot].0 = key;
        self.sift_up(slot);
    }

    fn pop_min(&mut self) -> Option<(usize, f64)> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let (key, vertex) = self.heap.pop()?;
        self.position[vertex] = ABSENT;
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some((vertex, key))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }

    fn clear(&mut self) {
        for &(_, vertex) in &self.heap {
            self.position[vertex] = ABSENT;
        }
        self.heap.clear();
    }
}
