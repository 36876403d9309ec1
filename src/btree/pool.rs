//! Node arena with a bounded free list.
//!
//! Every node of a tree lives in one `Vec` slot addressed by [`NodeId`].
//! Retired nodes are handled in one of two ways:
//!
//! - while the free list has room, the node is reset (entries, children and
//!   parent cleared, buffers kept) and its id goes on the free list;
//! - otherwise the node's buffers are dropped and only the slot index is
//!   remembered as vacant.
//!
//! Allocation prefers the free list, then vacant slots, then grows the arena.
//! The tree only retires a node after unlinking it, so an id coming off the
//! free list is never reachable from the root.

use std::ops::{Index, IndexMut};

use super::node::{Node, NodeId};

pub(crate) struct NodePool<K, V> {
    slots: Vec<Node<K, V>>,
    free: Vec<NodeId>,
    vacant: Vec<NodeId>,
    capacity: usize,
    order: usize,
}

impl<K, V> NodePool<K, V> {
    pub(crate) const fn new(order: usize, capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            vacant: Vec::new(),
            capacity,
            order,
        }
    }

    /// Hands out an empty, unlinked node.
    pub(crate) fn allocate(&mut self) -> NodeId {
        if let Some(id) = self.free.pop() {
            debug_assert!(self.slots[id.index()].entries.is_empty());
            return id;
        }
        let node = Node::with_capacity(self.order);
        if let Some(id) = self.vacant.pop() {
            self.slots[id.index()] = node;
            return id;
        }
        self.slots.push(node);
        NodeId::new(self.slots.len() - 1)
    }

    /// Takes back a node the tree no longer references.
    pub(crate) fn retire(&mut self, id: NodeId) {
        let node = &mut self.slots[id.index()];
        if self.free.len() < self.capacity {
            node.reset();
            self.free.push(id);
        } else {
            *node = Node::vacant();
            self.vacant.push(id);
            tracing::trace!(node = id.index(), "free list full, node dropped");
        }
    }

    /// Retires every node at once, keeping at most `capacity` of them.
    pub(crate) fn retire_all(&mut self) {
        self.free.clear();
        self.vacant.clear();
        self.slots.truncate(self.capacity);
        for (index, node) in self.slots.iter_mut().enumerate() {
            node.reset();
            self.free.push(NodeId::new(index));
        }
    }

    /// Number of nodes waiting for reuse.
    #[inline]
    pub(crate) fn free_len(&self) -> usize {
        self.free.len()
    }

    #[inline]
    pub(crate) const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of nodes currently handed out.
    #[inline]
    pub(crate) fn live_len(&self) -> usize {
        self.slots.len() - self.free.len() - self.vacant.len()
    }

    /// Two distinct nodes borrowed mutably at once.
    pub(crate) fn pair_mut(
        &mut self,
        first: NodeId,
        second: NodeId,
    ) -> (&mut Node<K, V>, &mut Node<K, V>) {
        let (first_index, second_index) = (first.index(), second.index());
        assert_ne!(first_index, second_index, "pair_mut needs two distinct nodes");
        if first_index < second_index {
            let (head, tail) = self.slots.split_at_mut(second_index);
            (&mut head[first_index], &mut tail[0])
        } else {
            let (head, tail) = self.slots.split_at_mut(first_index);
            (&mut tail[0], &mut head[second_index])
        }
    }

    /// Left-most leaf of the subtree rooted at `id`.
    pub(crate) fn leftmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&child) = self[id].children.first() {
            id = child;
        }
        id
    }

    /// Right-most leaf of the subtree rooted at `id`.
    pub(crate) fn rightmost_leaf(&self, mut id: NodeId) -> NodeId {
        while let Some(&child) = self[id].children.last() {
            id = child;
        }
        id
    }

    /// Moves an already built node into the arena.
    pub(crate) fn insert(&mut self, node: Node<K, V>) -> NodeId {
        self.slots.push(node);
        NodeId::new(self.slots.len() - 1)
    }
}

impl<K, V> Index<NodeId> for NodePool<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Self::Output {
        &self.slots[id.index()]
    }
}

impl<K, V> IndexMut<NodeId> for NodePool<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.slots[id.index()]
    }
}
