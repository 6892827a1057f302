use std::fmt::Debug;

use crate::data_structures::PriorityQueue;

const BUCKETS: usize = 65;
const ABSENT: (u8, usize) = (u8::MAX, usize::MAX);

/// Radix heap over the IEEE-754 bit patterns of non-negative keys
///
/// For non-negative doubles the bit pattern orders the same way as the value,
/// so keys are bucketed by the highest bit in which they differ from the last
/// extracted key. The queue is monotone: every inserted or decreased key must
/// be at least the last key returned by `pop_min`, which Dijkstra guarantees.
#[derive(Debug)]
pub struct RadixHeap {
    buckets: Vec<Vec<(u64, usize)>>,
    /// (bucket, slot) of each queued vertex
    location: Vec<(u8, usize)>,
    last: u64,
    len: usize,
}

fn key_bits(key: f64) -> u64 {
    debug_assert!(key >= 0.0, "radix heap keys must be non-negative");
    // -0.0 would otherwise sort above every positive key
    if key == 0.0 {
        0
    } else {
        key.to_bits()
    }
}

impl RadixHeap {
    /// Creates an empty radix heap for vertices `0..capacity`
    pub fn with_capacity(capacity: usize) -> Self {
        RadixHeap {
            buckets: vec![Vec::new(); BUCKETS],
            location: vec![ABSENT; capacity],
            last: 0,
            len: 0,
        }
    }

    fn bucket_of(&self, bits: u64) -> usize {
        if bits == self.last {
            0
        } else {
            64 - (bits ^ self.last).leading_zeros() as usize
        }
    }

    fn place(&mut self, vertex: usize, bits: u64) {
        let b = self.bucket_of(bits);
        self.location[vertex] = (b as u8, self.buckets[b].len());
        self.buckets[b].push((bits, vertex));
    }

    fn remove(&mut self, vertex: usize) {
        let (b, slot) = self.location[vertex];
        let bucket = &mut self.buckets[b as usize];
        bucket.swap_remove(slot);
        if let Some(&(_, moved)) = bucket.get(slot) {
            self.location[moved] = (b, slot);
        }
        self.location[vertex] = ABSENT;
    }

    fn ensure_slot(&mut self, vertex: usize) {
        if vertex >= self.location.len() {
            self.location.resize(vertex + 1, ABSENT);
        }
    }

    /// Pulls the smallest key of the first non-empty bucket into bucket 0
    fn redistribute(&mut self) {
        let Some(b) = (1..BUCKETS).find(|&b| !self.buckets[b].is_empty()) else {
            return;
        };
        let entries = std::mem::take(&mut self.buckets[b]);
        self.last = entries.iter().map(|&(bits, _)| bits).min().unwrap_or(self.last);
        for &(bits, vertex) in &entries {
            self.place(vertex, bits);
        }
        // hand the allocation back to the emptied bucket
        let mut entries = entries;
        entries.clear();
        if self.buckets[b].is_empty() {
            self.buckets[b] = entries;
        }
    }
}

impl PriorityQueue for RadixHeap {
    fn insert(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        if self.location[vertex] != ABSENT {
            self.decrease_key(vertex, key);
            return;
        }
        self.place(vertex, key_bits(key));
        self.len += 1;
    }

    fn decrease_key(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        let (b, slot) = self.location[vertex];
        if (b, slot) == ABSENT {
            self.insert(vertex, key);
            return;
        }
        let bits = key_bits(key);
        if bits >= self.buckets[b as usize][slot].0 {
            return;
        }
        self.remove(vertex);
        self.place(vertex, bits);
    }

    fn pop_min(&mut self) -> Option<(usize, f64)> {
        if self.len == 0 {
            return None;
        }
        if self.buckets[0].is_empty() {
            self.redistribute();
        }
        // every entry of bucket 0 carries the same key; equal keys leave by vertex
        let (bits, vertex) = self.buckets[0]
            .iter()
            .copied()
            .min_by_key(|&(_, vertex)| vertex)?;
        self.remove(vertex);
        self.len -= 1;
        Some((vertex, f64::from_bits(bits)))
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        for bucket in &mut self.buckets {
            for &(_, vertex) in bucket.iter() {
                self.location[vertex] = ABSENT;
            }
            bucket.clear();
        }
        self.last = 0;
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_zero_holds_last_key() {
        let mut heap = RadixHeap::with_capacity(4);
        heap.insert(0, 3.0);
        heap.insert(1, 3.0);
        heap.insert(2, 12.0);
        let (_, k) = heap.pop_min().unwrap();
        assert_eq!(k, 3.0);
        // the twin key was moved into bucket 0 by the redistribution
        assert_eq!(heap.buckets[0].len(), 1);
        heap.insert(3, 3.0);
        assert_eq!(heap.pop_min().unwrap().1, 3.0);
        assert_eq!(heap.pop_min().unwrap().1, 3.0);
        assert_eq!(heap.pop_min(), Some((2, 12.0)));
    }

    #[test]
    fn test_equal_keys_pop_by_vertex() {
        let mut heap = RadixHeap::with_capacity(8);
        for v in [5, 2, 7, 3] {
            heap.insert(v, 4.0);
        }
        heap.insert(6, 1.0);
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop_min()).map(|(v, _)| v).collect();
        assert_eq!(order, vec![6, 2, 3, 5, 7]);
    }

    #[test]
    fn test_negative_zero_is_smallest() {
        let mut heap = RadixHeap::with_capacity(2);
        heap.insert(0, 1.0);
        heap.insert(1, -0.0);
        assert_eq!(heap.pop_min().map(|(v, _)| v), Some(1));
    }
}
