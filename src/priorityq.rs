// Copyright 2025 Lars Brubaker
// License: MIT
//
// Binary min-heap with stable handles, used as the A* open list.
//
// Every insert returns a handle that stays valid until the entry is
// extracted or deleted, so an entry whose priority improves can be removed
// and re-inserted without searching the heap. Freed handles are recycled
// through a free list.

use crate::geom::Real;

/// Index into PriorityQ::handles
pub type Handle = u32;

#[derive(Clone, Debug)]
struct HandleElem {
    key: Real,
    item: u32,
    /// Heap position while live, next free handle otherwise.
    node: u32,
    live: bool,
}

#[derive(Clone, Debug)]
pub struct PriorityQ {
    /// nodes[1..=size] hold handles in heap order; nodes[0] is unused.
    nodes: Vec<Handle>,
    handles: Vec<HandleElem>,
    free_list: Option<Handle>,
}

impl PriorityQ {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(0);
        PriorityQ {
            nodes,
            handles: Vec::with_capacity(capacity),
            free_list: None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    fn key_of(&self, h: Handle) -> Real {
        self.handles[h as usize].key
    }

    #[inline]
    fn leq(&self, a: Handle, b: Handle) -> bool {
        self.key_of(a) <= self.key_of(b)
    }

    #[inline]
    fn place(&mut self, pos: usize, h: Handle) {
        self.nodes[pos] = h;
        self.handles[h as usize].node = pos as u32;
    }

    fn float_down(&mut self, mut curr: usize) {
        let size = self.len();
        let h_curr = self.nodes[curr];
        loop {
            let mut child = curr << 1;
            if child > size {
                break;
            }
            if child < size && self.leq(self.nodes[child + 1], self.nodes[child]) {
                child += 1;
            }
            let h_child = self.nodes[child];
            if self.leq(h_curr, h_child) {
                break;
            }
            self.place(curr, h_child);
            curr = child;
        }
        self.place(curr, h_curr);
    }

    fn float_up(&mut self, mut curr: usize) {
        let h_curr = self.nodes[curr];
        loop {
            let parent = curr >> 1;
            if parent == 0 {
                break;
            }
            let h_parent = self.nodes[parent];
            if self.leq(h_parent, h_curr) {
                break;
            }
            self.place(curr, h_parent);
            curr = parent;
        }
        self.place(curr, h_curr);
    }

    /// Insert `item` with priority `key`. Returns its handle.
    pub fn insert(&mut self, key: Real, item: u32) -> Handle {
        let elem = HandleElem {
            key,
            item,
            node: self.nodes.len() as u32,
            live: true,
        };
        let h = match self.free_list {
            Some(f) => {
                self.free_list = match self.handles[f as usize].node {
                    u32::MAX => None,
                    next => Some(next),
                };
                self.handles[f as usize] = elem;
                f
            }
            None => {
                self.handles.push(elem);
                (self.handles.len() - 1) as Handle
            }
        };
        self.nodes.push(h);
        let curr = self.len();
        self.float_up(curr);
        h
    }

    /// Smallest entry as (key, item), without removing it.
    pub fn minimum(&self) -> Option<(Real, u32)> {
        if self.is_empty() {
            return None;
        }
        let e = &self.handles[self.nodes[1] as usize];
        Some((e.key, e.item))
    }

    pub fn extract_min(&mut self) -> Option<(Real, u32)> {
        let min = self.minimum()?;
        self.delete(self.nodes[1]);
        Some(min)
    }

    /// Priority of a live handle.
    pub fn key(&self, h: Handle) -> Option<Real> {
        self.handles
            .get(h as usize)
            .filter(|e| e.live)
            .map(|e| e.key)
    }

    /// Remove the entry behind `h`. Deleting a dead handle does nothing.
    pub fn delete(&mut self, h: Handle) {
        if self.key(h).is_none() {
            return;
        }
        let curr = self.handles[h as usize].node as usize;
        let last = self.len();
        let h_last = self.nodes[last];
        self.nodes.pop();
        if curr != last {
            self.place(curr, h_last);
            if curr > 1 && !self.leq(self.nodes[curr >> 1], h_last) {
                self.float_up(curr);
            } else {
                self.float_down(curr);
            }
        }

        let e = &mut self.handles[h as usize];
        e.live = false;
        e.node = self.free_list.unwrap_or(u32::MAX);
        self.free_list = Some(h);
    }
}

impl Default for PriorityQ {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn extracts_in_key_order() {
        let mut pq = PriorityQ::new();
        pq.insert(3.0, 30);
        pq.insert(1.0, 10);
        pq.insert(2.0, 20);
        assert_eq!(pq.minimum(), Some((1.0, 10)));
        assert_eq!(pq.extract_min(), Some((1.0, 10)));
        assert_eq!(pq.extract_min(), Some((2.0, 20)));
        assert_eq!(pq.extract_min(), Some((3.0, 30)));
        assert!(pq.is_empty());
        assert_eq!(pq.extract_min(), None);
    }

    #[test]
    fn delete_by_handle() {
        let mut pq = PriorityQ::new();
        let h1 = pq.insert(10.0, 1);
        let _h2 = pq.insert(5.0, 2);
        let h3 = pq.insert(7.0, 3);
        pq.delete(h1);
        assert_eq!(pq.key(h1), None);
        assert_eq!(pq.key(h3), Some(7.0));
        assert_eq!(pq.extract_min(), Some((5.0, 2)));
        assert_eq!(pq.extract_min(), Some((7.0, 3)));
        assert!(pq.is_empty());
    }

    #[test]
    fn reinsert_after_decrease() {
        let mut pq = PriorityQ::new();
        pq.insert(4.0, 1);
        let h = pq.insert(9.0, 2);
        pq.delete(h);
        pq.insert(1.0, 2);
        assert_eq!(pq.extract_min(), Some((1.0, 2)));
    }

    #[test]
    fn handles_are_recycled() {
        let mut pq = PriorityQ::new();
        let a = pq.insert(1.0, 1);
        let b = pq.insert(2.0, 2);
        pq.delete(a);
        pq.delete(b);
        let c = pq.insert(3.0, 3);
        let d = pq.insert(4.0, 4);
        assert!(c == a || c == b);
        assert!(d == a || d == b);
        assert_ne!(c, d);
        assert_eq!(pq.len(), 2);
    }

    proptest! {
        #[test]
        fn heap_order_survives_deletes(
            keys in prop::collection::vec(-1000.0f32..1000.0, 1..64),
            drop_every in 2usize..5,
        ) {
            let mut pq = PriorityQ::new();
            let handles: Vec<Handle> = keys
                .iter()
                .enumerate()
                .map(|(i, &k)| pq.insert(k, i as u32))
                .collect();
            let mut kept = Vec::new();
            for (i, &h) in handles.iter().enumerate() {
                if i % drop_every == 0 {
                    pq.delete(h);
                } else {
                    kept.push(keys[i]);
                }
            }
            kept.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let mut out = Vec::new();
            while let Some((k, _)) = pq.extract_min() {
                out.push(k);
            }
            prop_assert_eq!(out, kept);
        }
    }
}
