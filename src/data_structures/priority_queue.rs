use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::data_structures::binary_heap::IndexedBinaryHeap;
use crate::data_structures::forest_heap::{ForestHeap, LinkPolicy};
use crate::data_structures::linear_heap::LinearHeap;
use crate::data_structures::radix_heap::RadixHeap;
use crate::data_structures::set_heap::SetHeap;
use crate::Error;

/// Decrease-key priority queue over dense vertex indices
///
/// Each vertex is held at most once. Keys are tentative shortest-path costs and
/// are never negative. `decrease_key` must only be called with a strictly
/// smaller key for a vertex that is currently queued; a non-improving key is
/// ignored.
pub trait PriorityQueue: Debug + Send {
    /// Adds a vertex that is not currently queued
    fn insert(&mut self, vertex: usize, key: f64);

    /// Lowers the key of a queued vertex
    fn decrease_key(&mut self, vertex: usize, key: f64);

    /// Removes and returns the vertex with the smallest key
    fn pop_min(&mut self) -> Option<(usize, f64)>;

    /// Returns the number of queued vertices
    fn len(&self) -> usize;

    /// Returns true if no vertex is queued
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every queued vertex, keeping allocations for reuse
    fn clear(&mut self);
}

/// Selector for the concrete queue used by every worker of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HeapType {
    /// Indexed binary heap, the reference implementation
    #[default]
    Binary,
    /// Fibonacci heap with cascading cuts
    Fibonacci,
    /// 2-3 heap: forest linking two or three trees of equal rank
    TwoThree,
    /// Trinomial heap: forest linking three trees of equal rank
    Trinomial,
    /// Radix heap over monotone non-negative keys
    Radix,
    /// Ordered set of (key, vertex) pairs
    Set,
    /// Unsorted array with linear-scan extraction
    Linear,
}

impl HeapType {
    /// Every available implementation
    pub const ALL: [HeapType; 7] = [
        HeapType::Binary,
        HeapType::Fibonacci,
        HeapType::TwoThree,
        HeapType::Trinomial,
        HeapType::Radix,
        HeapType::Set,
        HeapType::Linear,
    ];

    /// Canonical selector name
    pub fn name(self) -> &'static str {
        match self {
            HeapType::Binary => "BHeap",
            HeapType::Fibonacci => "FHeap",
            HeapType::TwoThree => "Heap23",
            HeapType::Trinomial => "TriHeap",
            HeapType::Radix => "Radix",
            HeapType::Set => "Set",
            HeapType::Linear => "Linear",
        }
    }

    /// Creates an empty queue able to hold vertices `0..capacity`
    pub fn create(self, capacity: usize) -> Box<dyn PriorityQueue> {
        match self {
            HeapType::Binary => Box::new(IndexedBinaryHeap::with_capacity(capacity)),
            HeapType::Fibonacci => Box::new(ForestHeap::new(LinkPolicy::Fibonacci, capacity)),
            HeapType::TwoThree => Box::new(ForestHeap::new(LinkPolicy::TwoThree, capacity)),
            HeapType::Trinomial => Box::new(ForestHeap::new(LinkPolicy::Trinomial, capacity)),
            HeapType::Radix => Box::new(RadixHeap::with_capacity(capacity)),
            HeapType::Set => Box::new(SetHeap::with_capacity(capacity)),
            HeapType::Linear => Box::new(LinearHeap::with_capacity(capacity)),
        }
    }
}

impl FromStr for HeapType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bheap" | "binary" => Ok(HeapType::Binary),
            "fheap" | "fibonacci" => Ok(HeapType::Fibonacci),
            "heap23" | "2-3" | "twothree" => Ok(HeapType::TwoThree),
            "triheap" | "trinomial" => Ok(HeapType::Trinomial),
            "radix" => Ok(HeapType::Radix),
            "set" => Ok(HeapType::Set),
            "linear" | "unsorted" => Ok(HeapType::Linear),
            _ => Err(Error::UnknownHeapType(s.to_string())),
        }
    }
}

impl TryFrom<String> for HeapType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HeapType> for String {
    fn from(heap: HeapType) -> Self {
        heap.name().to_string()
    }
}

impl fmt::Display for HeapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_selector_names_round_trip() {
        for heap in HeapType::ALL {
            assert_eq!(heap.name().parse::<HeapType>().unwrap(), heap);
        }
        assert_eq!("fibonacci".parse::<HeapType>().unwrap(), HeapType::Fibonacci);
        assert!(matches!(
            "PairingHeap".parse::<HeapType>(),
            Err(Error::UnknownHeapType(name)) if name == "PairingHeap"
        ));
    }

    #[test]
    fn test_pop_order_matches_sorted_keys() {
        for heap_type in HeapType::ALL {
            let mut heap = heap_type.create(8);
            for (v, k) in [(3, 4.0), (0, 2.5), (7, 9.0), (5, 0.0), (1, 2.5)] {
                heap.insert(v, k);
            }
            let keys: Vec<f64> = std::iter::from_fn(|| heap.pop_min()).map(|(_, k)| k).collect();
            assert_eq!(keys, vec![0.0, 2.5, 2.5, 4.0, 9.0], "{}", heap_type);
            assert!(heap.is_empty());
        }
    }

    #[test]
    fn test_decrease_key_reorders() {
        for heap_type in HeapType::ALL {
            let mut heap = heap_type.create(4);
            heap.insert(0, 1.0);
            heap.insert(1, 5.0);
            heap.insert(2, 6.0);
            assert_eq!(heap.pop_min(), Some((0, 1.0)), "{}", heap_type);
            heap.insert(3, 8.0);
            heap.decrease_key(3, 2.0);
            heap.decrease_key(2, 5.5);
            // not an improvement: ignored
            heap.decrease_key(1, 7.0);
            assert_eq!(heap.pop_min(), Some((3, 2.0)), "{}", heap_type);
            assert_eq!(heap.pop_min(), Some((1, 5.0)), "{}", heap_type);
            assert_eq!(heap.pop_min(), Some((2, 5.5)), "{}", heap_type);
            assert_eq!(heap.pop_min(), None, "{}", heap_type);
        }
    }

    #[test]
    fn test_clear_allows_reuse() {
        for heap_type in HeapType::ALL {
            let mut heap = heap_type.create(3);
            heap.insert(0, 3.0);
            heap.insert(1, 1.0);
            heap.clear();
            assert!(heap.is_empty(), "{}", heap_type);
            heap.insert(2, 4.0);
            heap.insert(0, 0.5);
            assert_eq!(heap.len(), 2);
            assert_eq!(heap.pop_min(), Some((0, 0.5)), "{}", heap_type);
            assert_eq!(heap.pop_min(), Some((2, 4.0)), "{}", heap_type);
        }
    }

    // Replays a Dijkstra-like workload: keys only grow past the last popped key.
    #[test]
    fn test_monotone_workload_agrees_with_binary_heap() {
        let n = 300;
        for heap_type in HeapType::ALL {
            let mut rng = StdRng::seed_from_u64(11);
            let mut reference = HeapType::Binary.create(n);
            let mut heap = heap_type.create(n);
            let mut key = vec![f64::INFINITY; n];
            let mut done = vec![false; n];
            let mut last = 0.0;
            let mut popped = Vec::new();

            for _ in 0..2000 {
                let v = rng.gen_range(0..n);
                if done[v] {
                    if let (Some(a), Some(b)) = (reference.pop_min(), heap.pop_min()) {
                        assert_eq!(a.1, b.1, "{}", heap_type);
                        assert!(b.1 >= last);
                        last = b.1;
                        popped.push(b.1);
                        done[a.0] = true;
                        done[b.0] = true;
                    }
                    continue;
                }
                let candidate = last + rng.gen_range(0.0..50.0f64).floor();
                if key[v].is_infinite() {
                    key[v] = candidate;
                    reference.insert(v, candidate);
                    heap.insert(v, candidate);
                } else if candidate < key[v] {
                    key[v] = candidate;
                    reference.decrease_key(v, candidate);
                    heap.decrease_key(v, candidate);
                }
                if rng.gen_bool(0.3) {
                    let a = reference.pop_min().unwrap();
                    let b = heap.pop_min().unwrap();
                    assert_eq!(a.1, b.1, "{}", heap_type);
                    last = b.1;
                    popped.push(b.1);
                    done[a.0] = true;
                    done[b.0] = true;
                }
            }
            assert!(popped.windows(2).all(|w| w[0] <= w[1]), "{}", heap_type);
            assert_eq!(reference.len(), heap.len(), "{}", heap_type);
        }
    }
}
