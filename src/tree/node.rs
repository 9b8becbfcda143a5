//! Cached filesystem node and the arena that stores it

use crate::tree::loader::Entry;
use crate::types::{NodeId, NodeKind, NodeName};
use std::sync::atomic::AtomicU32;

/// One cached directory entry
#[derive(Debug)]
pub(crate) struct Node {
    pub name: NodeName,
    pub kind: NodeKind,
    pub size: u64,
    /// Opaque key handed back to the loader (start cluster on a real volume)
    pub location: u64,
    pub parent: Option<NodeId>,
    /// First child, valid once `populated` is set
    pub child: Option<NodeId>,
    /// Next sibling in on-disk order
    pub next: Option<NodeId>,
    pub populated: bool,
    pub references: AtomicU32,
    /// Open `DirIterator`s over this directory; eviction waits for zero
    pub iterators: AtomicU32,
}

impl Node {
    pub fn from_entry(entry: Entry, parent: Option<NodeId>, references: u32) -> Self {
        Node {
            name: entry.name,
            kind: entry.kind,
            size: entry.size,
            location: entry.location,
            parent,
            child: None,
            next: None,
            populated: false,
            references: AtomicU32::new(references),
            iterators: AtomicU32::new(0),
        }
    }
}

/// Slot storage with a free list
#[derive(Debug, Default)]
pub(crate) struct Arena {
    slots: Vec<Option<Node>>,
    free: Vec<u32>,
}

impl Arena {
    pub fn insert(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = Some(node);
            return NodeId(index);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Some(node));
        NodeId(index)
    }

    pub fn remove(&mut self, id: NodeId) -> Option<Node> {
        let node = self.slots.get_mut(id.index())?.take()?;
        self.free.push(id.0);
        Some(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node id {}", id),
        }
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slots.get_mut(id.index()).and_then(Option::as_mut) {
            Some(node) => node,
            None => panic!("stale node id {}", id),
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    /// Ids of every node below `dir`, depth first
    pub fn descendants(&self, dir: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = Vec::new();
        if let Some(first) = self.node(dir).child {
            stack.push(first);
        }
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            out.push(id);
            if let Some(next) = node.next {
                stack.push(next);
            }
            if let Some(child) = node.child {
                stack.push(child);
            }
        }
        out
    }
}
