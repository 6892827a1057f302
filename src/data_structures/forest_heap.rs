use std::fmt::Debug;

use crate::data_structures::PriorityQueue;

const NIL: usize = usize::MAX;

/// How trees of equal rank are merged when the root list is consolidated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPolicy {
    /// Pairwise linking; decrease-key uses marks and cascading cuts
    Fibonacci,
    /// Three equal-rank trees are linked into one, and a leftover pair is linked too
    TwoThree,
    /// Only complete groups of three equal-rank trees are linked
    Trinomial,
}

#[derive(Debug, Clone)]
struct Node {
    key: f64,
    parent: usize,
    child: usize,
    left: usize,
    right: usize,
    rank: usize,
    marked: bool,
    queued: bool,
}

impl Node {
    fn detached(vertex: usize, key: f64) -> Self {
        Node {
            key,
            parent: NIL,
            child: NIL,
            left: vertex,
            right: vertex,
            rank: 0,
            marked: false,
            queued: true,
        }
    }
}

/// Heap-ordered forest addressed by vertex index
///
/// Nodes live in an arena indexed by vertex, so no allocation happens per
/// operation once the arena covers every vertex. Children of a node form a
/// circular doubly linked sibling list. Decrease-key cuts the node out to the
/// root list whenever heap order would be violated, and pop-min consolidates
/// the root list by rank according to the link policy.
#[derive(Debug)]
pub struct ForestHeap {
    policy: LinkPolicy,
    nodes: Vec<Node>,
    roots: Vec<usize>,
    min: usize,
    len: usize,
    /// Scratch buckets reused by consolidation
    buckets: Vec<Vec<usize>>,
}

impl ForestHeap {
    /// Creates an empty forest for vertices `0..capacity`
    pub fn new(policy: LinkPolicy, capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity);
        for v in 0..capacity {
            let mut node = Node::detached(v, f64::INFINITY);
            node.queued = false;
            nodes.push(node);
        }
        ForestHeap {
            policy,
            nodes,
            roots: Vec::new(),
            min: NIL,
            len: 0,
            buckets: Vec::new(),
        }
    }

    fn ensure_slot(&mut self, vertex: usize) {
        while self.nodes.len() <= vertex {
            let v = self.nodes.len();
            let mut node = Node::detached(v, f64::INFINITY);
            node.queued = false;
            self.nodes.push(node);
        }
    }

    fn less(&self, a: usize, b: usize) -> bool {
        let (ka, kb) = (self.nodes[a].key, self.nodes[b].key);
        ka < kb || (ka == kb && a < b)
    }

    fn group_size(&self) -> usize {
        match self.policy {
            LinkPolicy::Fibonacci => 2,
            LinkPolicy::TwoThree | LinkPolicy::Trinomial => 3,
        }
    }

    /// Makes `child` (a detached tree) the newest child of `parent`
    fn add_child(&mut self, parent: usize, child: usize) {
        let first = self.nodes[parent].child;
        if first == NIL {
            self.nodes[child].left = child;
            self.nodes[child].right = child;
            self.nodes[parent].child = child;
        } else {
            let next = self.nodes[first].right;
            self.nodes[first].right = child;
            self.nodes[child].left = first;
            self.nodes[child].right = next;
            self.nodes[next].left = child;
        }
        self.nodes[child].parent = parent;
        self.nodes[child].marked = false;
    }

    /// Detaches a non-root node from its parent and moves it to the root list
    fn cut(&mut self, vertex: usize) {
        let parent = self.nodes[vertex].parent;
        let (left, right) = (self.nodes[vertex].left, self.nodes[vertex].right);
        if right == vertex {
            self.nodes[parent].child = NIL;
        } else {
            self.nodes[left].right = right;
            self.nodes[right].left = left;
            if self.nodes[parent].child == vertex {
                self.nodes[parent].child = right;
            }
        }
        self.nodes[parent].rank = self.nodes[parent].rank.saturating_sub(1);

        let node = &mut self.nodes[vertex];
        node.parent = NIL;
        node.left = vertex;
        node.right = vertex;
        node.marked = false;
        self.roots.push(vertex);
    }

    fn cascading_cut(&mut self, mut vertex: usize) {
        loop {
            let parent = self.nodes[vertex].parent;
            if parent == NIL {
                break;
            }
            if !self.nodes[vertex].marked {
                self.nodes[vertex].marked = true;
                break;
            }
            self.cut(vertex);
            vertex = parent;
        }
    }

    /// Links a group of equal-rank roots under the smallest one
    fn link_group(&mut self, group: &[usize]) -> usize {
        let mut winner = group[0];
        for &v in &group[1..] {
            if self.less(v, winner) {
                winner = v;
            }
        }
        for &v in group {
            if v != winner {
                self.add_child(winner, v);
            }
        }
        self.nodes[winner].rank += 1;
        winner
    }

    fn consolidate(&mut self, candidates: Vec<usize>) {
        let mut buckets = std::mem::take(&mut self.buckets);
        for &root in &candidates {
            let rank = self.nodes[root].rank;
            if buckets.len() <= rank {
                buckets.resize_with(rank + 1, Vec::new);
            }
            buckets[rank].push(root);
        }

        let group = self.group_size();
        let mut rank = 0;
        while rank < buckets.len() {
            let mut promoted = Vec::new();
            while buckets[rank].len() >= group {
                let start = buckets[rank].len() - group;
                let trees: Vec<usize> = buckets[rank].drain(start..).collect();
                promoted.push(self.link_group(&trees));
            }
            if self.policy == LinkPolicy::TwoThree && buckets[rank].len() == 2 {
                let trees: Vec<usize> = buckets[rank].drain(..).collect();
                promoted.push(self.link_group(&trees));
            }
            for winner in promoted {
                let r = self.nodes[winner].rank;
                if buckets.len() <= r {
                    buckets.resize_with(r + 1, Vec::new);
                }
                buckets[r].push(winner);
            }
            rank += 1;
        }

        self.roots.clear();
        self.min = NIL;
        for bucket in buckets.iter_mut() {
            for root in bucket.drain(..) {
                if self.min == NIL || self.less(root, self.min) {
                    self.min = root;
                }
                self.roots.push(root);
            }
        }
        self.buckets = buckets;
    }
}

impl PriorityQueue for ForestHeap {
    fn insert(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        if self.nodes[vertex].queued {
            self.decrease_key(vertex, key);
            return;
        }
        self.nodes[vertex] = Node::detached(vertex, key);
        self.roots.push(vertex);
        if self.min == NIL || self.less(vertex, self.min) {
            self.min = vertex;
        }
        self.len += 1;
    }

    fn decrease_key(&mut self, vertex: usize, key: f64) {
        self.ensure_slot(vertex);
        if !self.nodes[vertex].queued {
            self.insert(vertex, key);
            return;
        }
        if key >= self.nodes[vertex].key {
            return;
        }
        self.nodes[vertex].key = key;

        let parent = self.nodes[vertex].parent;
        if parent != NIL && self.less(vertex, parent) {
            self.cut(vertex);
            if self.policy == LinkPolicy::Fibonacci {
                self.cascading_cut(parent);
            }
        }
        if self.less(vertex, self.min) {
            self.min = vertex;
        }
    }

    fn pop_min(&mut self) -> Option<(usize, f64)> {
        if self.min == NIL {
            return None;
        }
        let min = self.min;

        let mut candidates: Vec<usize> = self.roots.iter().copied().filter(|&r| r != min).collect();
        let first = self.nodes[min].child;
        if first != NIL {
            let mut c = first;
            loop {
                let next = self.nodes[c].right;
                let node = &mut self.nodes[c];
                node.parent = NIL;
                node.left = c;
                node.right = c;
                node.marked = false;
                candidates.push(c);
                c = next;
                if c == first {
                    break;
                }
            }
        }

        let node = &mut self.nodes[min];
        node.queued = false;
        node.child = NIL;
        let key = node.key;
        self.len -= 1;

        self.consolidate(candidates);
        Some((min, key))
    }

    fn len(&self) -> usize {
        self.len
    }

    fn clear(&mut self) {
        if self.len > 0 {
            for node in &mut self.nodes {
                node.queued = false;
            }
        }
        self.roots.clear();
        self.min = NIL;
        self.len = 0;
    }
}
