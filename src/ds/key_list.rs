//! Ordered key list with stable, generation-tagged position handles.
//!
//! A doubly linked list of keys whose nodes live in a slot arena
//! (`Vec` of slots + free list), linked by index rather than pointer. Every
//! node is addressed by a [`NodeHandle`] carrying the slot index and a
//! generation tag; the tag is bumped when a slot is freed, so a handle that
//! outlives its node is detected instead of silently resolving to an
//! unrelated key.
//!
//! ## Architecture
//!
//! ```text
//!   slots: Vec<Slot<K>>                       free: [1]
//!   ┌───────┬──────────────────────────────────────────┐
//!   │ index │ Slot { gen, node: { key, prev, next } }  │
//!   ├───────┼──────────────────────────────────────────┤
//!   │   0   │ gen 0, { A, prev: None, next: Some(2) }  │
//!   │   1   │ gen 3, (vacant)                          │
//!   │   2   │ gen 1, { B, prev: Some(0), next: None }  │
//!   └───────┴──────────────────────────────────────────┘
//!
//!   head ─► [0] ◄──► [2] ◄── tail        front = MRU, back = LRU
//! ```
//!
//! Used as a bare recency list (ARC ghost lists via
//! [`GhostList`](crate::ds::GhostList)) and as the ordering carrier for the
//! LRU and LFU policies, which keep a `HashMap` from key to handle on the
//! side.
//!
//! All of `push_front`, `push_back`, `pop_front`, `pop_back`, `detach`, and
//! `move_to_front` are O(1). A handle is valid until its node is detached;
//! handles must not be mixed between lists (a foreign handle misses or is
//! rejected by the generation check, never misbehaves unsafely).

/// Stable position handle into an [`OrderedKeyList`].
///
/// Remains valid until the node it names is detached. After detach the slot
/// may be reused, but the generation tag guarantees the stale handle no
/// longer resolves.
///
/// # Example
///
/// ```
/// use cachemux::ds::OrderedKeyList;
///
/// let mut list = OrderedKeyList::new();
/// let h = list.push_front("a");
/// assert!(list.contains(h));
///
/// list.detach(h);
/// assert!(!list.contains(h));
///
/// // The freed slot may be reused, but the old handle stays dead.
/// let _ = list.push_front("b");
/// assert!(!list.contains(h));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeHandle {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Node<K> {
    key: K,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot<K> {
    node: Option<Node<K>>,
    generation: u64,
}

/// Doubly linked list of keys with O(1) detach by stable handle.
///
/// Front is the most-recently-used end; back is the eviction end.
///
/// # Example
///
/// ```
/// use cachemux::ds::OrderedKeyList;
///
/// let mut list = OrderedKeyList::new();
/// let a = list.push_front(1);
/// let _b = list.push_front(2);
///
/// assert_eq!(list.peek_back(), Some(&1));
/// list.move_to_front(a);
/// assert_eq!(list.peek_back(), Some(&2));
/// assert_eq!(list.pop_back(), Some(2));
/// assert_eq!(list.pop_back(), Some(1));
/// assert!(list.is_empty());
/// ```
#[derive(Debug)]
pub struct OrderedKeyList<K> {
    slots: Vec<Slot<K>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<K> OrderedKeyList<K> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with reserved node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of keys in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `handle` currently names a live node in this list.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.slots
            .get(handle.index)
            .is_some_and(|slot| slot.generation == handle.generation && slot.node.is_some())
    }

    /// Returns the key at `handle`, if the handle is still live.
    pub fn get(&self, handle: NodeHandle) -> Option<&K> {
        let slot = self.slots.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.node.as_ref().map(|node| &node.key)
    }

    /// Returns the key at the front (MRU end).
    pub fn peek_front(&self) -> Option<&K> {
        self.head.and_then(|idx| self.key_at(idx))
    }

    /// Returns the key at the back (eviction end).
    pub fn peek_back(&self) -> Option<&K> {
        self.tail.and_then(|idx| self.key_at(idx))
    }

    /// Inserts `key` at the front and returns its handle.
    pub fn push_front(&mut self, key: K) -> NodeHandle {
        let idx = self.alloc(Node {
            key,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(old) => self.node_mut(old).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        self.len += 1;
        self.handle_for(idx)
    }

    /// Inserts `key` at the back and returns its handle.
    pub fn push_back(&mut self, key: K) -> NodeHandle {
        let idx = self.alloc(Node {
            key,
            prev: self.tail,
            next: None,
        });
        match self.tail {
            Some(old) => self.node_mut(old).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
        self.handle_for(idx)
    }

    /// Removes and returns the front key.
    pub fn pop_front(&mut self) -> Option<K> {
        let idx = self.head?;
        self.unlink(idx);
        Some(self.release(idx))
    }

    /// Removes and returns the back key.
    pub fn pop_back(&mut self) -> Option<K> {
        let idx = self.tail?;
        self.unlink(idx);
        Some(self.release(idx))
    }

    /// Detaches the node at `handle` and returns its key.
    ///
    /// Returns `None` if the handle is stale. The handle is invalid
    /// afterwards.
    pub fn detach(&mut self, handle: NodeHandle) -> Option<K> {
        if !self.contains(handle) {
            return None;
        }
        self.unlink(handle.index);
        Some(self.release(handle.index))
    }

    /// Moves a live node to the front; returns `false` on a stale handle.
    pub fn move_to_front(&mut self, handle: NodeHandle) -> bool {
        if !self.contains(handle) {
            return false;
        }
        if self.head == Some(handle.index) {
            return true;
        }
        self.unlink(handle.index);
        let idx = handle.index;
        self.node_mut(idx).prev = None;
        self.node_mut(idx).next = self.head;
        match self.head {
            Some(old) => self.node_mut(old).prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
        true
    }

    /// Iterates keys from front (MRU) to back (LRU).
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    /// Removes all keys. Outstanding handles become stale.
    pub fn clear(&mut self) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation += 1;
                self.free.push(idx);
            }
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    fn key_at(&self, idx: usize) -> Option<&K> {
        self.slots[idx].node.as_ref().map(|node| &node.key)
    }

    fn handle_for(&self, idx: usize) -> NodeHandle {
        NodeHandle {
            index: idx,
            generation: self.slots[idx].generation,
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<K> {
        self.slots[idx]
            .node
            .as_mut()
            .expect("slot index names a vacant slot")
    }

    fn alloc(&mut self, node: Node<K>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx].node = Some(node);
                idx
            },
            None => {
                self.slots.push(Slot {
                    node: Some(node),
                    generation: 0,
                });
                self.slots.len() - 1
            },
        }
    }

    /// Splices the node at `idx` out of the chain without freeing its slot.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let node = self.slots[idx]
                .node
                .as_ref()
                .expect("unlink of vacant slot");
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }
    }

    /// Frees the slot at `idx`, bumps its generation, and returns the key.
    fn release(&mut self, idx: usize) -> K {
        let slot = &mut self.slots[idx];
        let node = slot.node.take().expect("release of vacant slot");
        slot.generation += 1;
        self.free.push(idx);
        self.len -= 1;
        node.key
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
        }

        let live = self.slots.iter().filter(|slot| slot.node.is_some()).count();
        assert_eq!(live, self.len);
        assert_eq!(self.slots.len(), self.free.len() + self.len);

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(idx) = current {
            let node = self.slots[idx].node.as_ref().expect("chained vacant slot");
            assert_eq!(node.prev, prev);
            prev = Some(idx);
            current = node.next;
            count += 1;
            assert!(count <= self.len, "cycle detected in list");
        }
        assert_eq!(count, self.len);
        assert_eq!(self.tail, prev);
    }
}

impl<K> Default for OrderedKeyList<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over an [`OrderedKeyList`].
pub struct Iter<'a, K> {
    list: &'a OrderedKeyList<K>,
    current: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current?;
        let node = self.list.slots[idx].node.as_ref()?;
        self.current = node.next;
        Some(&node.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_pop_basic_order() {
        let mut list = OrderedKeyList::new();
        list.push_front("b");
        list.push_front("a");
        list.push_back("c");

        assert_eq!(list.len(), 3);
        assert_eq!(list.peek_front(), Some(&"a"));
        assert_eq!(list.peek_back(), Some(&"c"));

        assert_eq!(list.pop_back(), Some("c"));
        assert_eq!(list.pop_back(), Some("b"));
        assert_eq!(list.pop_back(), Some("a"));
        assert_eq!(list.pop_back(), None);
        assert!(list.is_empty());
    }

    #[test]
    fn detach_middle_and_ends() {
        let mut list = OrderedKeyList::new();
        let a = list.push_back("a");
        let b = list.push_back("b");
        let c = list.push_back("c");

        assert_eq!(list.detach(b), Some("b"));
        let keys: Vec<_> = list.iter().copied().collect();
        assert_eq!(keys, vec!["a", "c"]);

        assert_eq!(list.detach(a), Some("a"));
        assert_eq!(list.peek_front(), Some(&"c"));
        assert_eq!(list.peek_back(), Some(&"c"));

        assert_eq!(list.detach(c), Some("c"));
        assert!(list.is_empty());
        assert_eq!(list.peek_front(), None);
    }

    #[test]
    fn stale_handle_is_rejected_after_slot_reuse() {
        let mut list = OrderedKeyList::new();
        let a = list.push_front(1);
        assert_eq!(list.detach(a), Some(1));

        // Reuses slot 0 with a bumped generation.
        let b = list.push_front(2);
        assert!(!list.contains(a));
        assert_eq!(list.detach(a), None);
        assert_eq!(list.get(b), Some(&2));
    }

    #[test]
    fn move_to_front_reorders() {
        let mut list = OrderedKeyList::new();
        let a = list.push_back(1);
        let _b = list.push_back(2);
        let c = list.push_back(3);

        assert!(list.move_to_front(c));
        let keys: Vec<_> = list.iter().copied().collect();
        assert_eq!(keys, vec![3, 1, 2]);

        // Front node move is a no-op.
        assert!(list.move_to_front(c));
        assert!(list.move_to_front(a));
        let keys: Vec<_> = list.iter().copied().collect();
        assert_eq!(keys, vec![1, 3, 2]);
        list.debug_validate_invariants();
    }

    #[test]
    fn clear_invalidates_handles() {
        let mut list = OrderedKeyList::new();
        let a = list.push_front("a");
        list.push_front("b");
        list.clear();

        assert!(list.is_empty());
        assert!(!list.contains(a));
        assert_eq!(list.pop_back(), None);
        list.debug_validate_invariants();
    }

    #[test]
    fn foreign_handle_does_not_resolve() {
        let mut a = OrderedKeyList::new();
        let mut b = OrderedKeyList::new();
        let ha = a.push_front(1);
        b.push_front(2);
        b.push_front(3);

        // Same slot index, but detaching through the wrong list either
        // misses or hits a key that list legitimately owns; here slot 0 of
        // `b` is live so the generation check is what matters.
        let _ = b.detach(ha);
        b.debug_validate_invariants();
        assert!(a.contains(ha));
    }

    #[test]
    fn invariants_hold_after_mixed_ops() {
        let mut list = OrderedKeyList::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            handles.push(list.push_front(i));
        }
        for handle in handles.iter().step_by(3) {
            list.detach(*handle);
        }
        list.pop_back();
        list.push_back(99);
        list.move_to_front(*handles.last().unwrap());
        list.debug_validate_invariants();
    }
}
