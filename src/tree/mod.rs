//! Node Cache
//!
//! In-memory tree of filesystem nodes mirroring on-disk directories. Nodes are
//! stored in an arena and shared through reference-counted `NodeRef` handles:
//! cloning a handle acquires the node, dropping it releases the node. A
//! directory's children are materialized lazily by a `DirectoryLoader`.

pub mod host;
pub mod loader;
pub mod memory;
pub(crate) mod node;

pub use loader::{DirectoryInfo, DirectoryLoader, Entry};

use crate::types::{NodeId, NodeKind, NodeName};
use node::{Arena, Node};
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::io;
use std::sync::atomic::Ordering;
use tracing::{debug, error, trace};

/// Arena-backed node cache
///
/// The root node is created with the tree and holds one reference for the
/// tree's whole lifetime.
pub struct NodeTree {
    arena: RwLock<Arena>,
    loader: Box<dyn DirectoryLoader>,
    /// Serializes population so each directory is loaded at most once
    populate_lock: Mutex<()>,
    root: NodeId,
}

impl NodeTree {
    /// Create a tree whose root is described by `loader.root()`.
    pub fn new<L: DirectoryLoader + 'static>(loader: L) -> Self {
        let mut arena = Arena::default();
        let root = arena.insert(Node::from_entry(loader.root(), None, 1));
        NodeTree {
            arena: RwLock::new(arena),
            loader: Box::new(loader),
            populate_lock: Mutex::new(()),
            root,
        }
    }

    /// Acquire the root node.
    pub fn root(&self) -> NodeRef<'_> {
        self.acquire(self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Current reference count of a node, for instrumentation.
    pub fn references(&self, id: NodeId) -> u32 {
        self.arena.read().node(id).references.load(Ordering::Acquire)
    }

    /// Number of nodes currently cached.
    pub fn cached_nodes(&self) -> usize {
        self.arena.read().len()
    }

    /// Re-wrap an id previously detached with `NodeRef::into_id`.
    ///
    /// The caller hands back the reference it owned; the count is unchanged.
    /// `id` must come from `into_id` on this tree and must not have been
    /// adopted already, otherwise the returned handle over-releases on drop.
    pub fn adopt(&self, id: NodeId) -> NodeRef<'_> {
        debug_assert!(
            self.arena
                .read()
                .get(id)
                .is_some_and(|node| node.references.load(Ordering::Acquire) > 0),
            "adopting node {} which holds no reference",
            id
        );
        NodeRef { tree: self, id }
    }

    pub(crate) fn acquire(&self, id: NodeId) -> NodeRef<'_> {
        self.arena
            .read()
            .node(id)
            .references
            .fetch_add(1, Ordering::AcqRel);
        NodeRef { tree: self, id }
    }

    fn release(&self, id: NodeId) {
        let arena = self.arena.read();
        let node = arena.node(id);
        let previous = node
            .references
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        match previous {
            Ok(1) => trace!(node = %id, name = %node.name, "Last reference released"),
            Ok(_) => {}
            Err(_) => {
                error!(node = %id, name = %node.name, "Released node with no references");
                debug_assert!(false, "over-release of node {}", id);
            }
        }
    }

    pub(crate) fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&Node) -> R) -> R {
        f(self.arena.read().node(id))
    }

    /// Follow a link out of `from` and acquire its target.
    ///
    /// The link is read and the count raised under one read guard, so a
    /// concurrent prune cannot free the target in between.
    fn acquire_link(
        &self,
        from: NodeId,
        link: impl FnOnce(&Node) -> Option<NodeId>,
    ) -> Option<NodeRef<'_>> {
        let arena = self.arena.read();
        let target = link(arena.node(from))?;
        arena
            .node(target)
            .references
            .fetch_add(1, Ordering::AcqRel);
        Some(NodeRef { tree: self, id: target })
    }

    pub(crate) fn first_child(&self, dir: NodeId) -> Option<NodeRef<'_>> {
        self.acquire_link(dir, |node| node.child)
    }

    pub(crate) fn next_sibling(&self, node: NodeId) -> Option<NodeRef<'_>> {
        self.acquire_link(node, |node| node.next)
    }

    /// Materialize the children of `dir` unless already done.
    pub(crate) fn populate(&self, dir: NodeId) -> io::Result<()> {
        if self.with_node(dir, |node| node.populated) {
            return Ok(());
        }
        let _guard = self.populate_lock.lock();
        self.load_children(dir)
    }

    /// Populate `dir` and register an open iterator on it.
    ///
    /// Registration happens while the directory is known to be populated,
    /// so `prune` cannot empty it between the two steps. Pair with
    /// `close_dir`.
    pub(crate) fn open_dir(&self, dir: NodeId) -> io::Result<()> {
        {
            let arena = self.arena.read();
            let node = arena.node(dir);
            if node.populated {
                node.iterators.fetch_add(1, Ordering::AcqRel);
                return Ok(());
            }
        }
        let _guard = self.populate_lock.lock();
        self.load_children(dir)?;
        self.arena
            .read()
            .node(dir)
            .iterators
            .fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    pub(crate) fn close_dir(&self, dir: NodeId) {
        let arena = self.arena.read();
        let previous = arena
            .node(dir)
            .iterators
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if previous.is_err() {
            error!(node = %dir, "Closed directory with no open iterator");
            debug_assert!(false, "unbalanced close of node {}", dir);
        }
    }

    /// Callers hold `populate_lock`.
    fn load_children(&self, dir: NodeId) -> io::Result<()> {
        let info = {
            let arena = self.arena.read();
            let node = arena.node(dir);
            if node.populated {
                return Ok(());
            }
            DirectoryInfo {
                id: dir,
                name: node.name.clone(),
                location: node.location,
                size: node.size,
            }
        };

        let entries = self.loader.load(&info)?;
        let count = entries.len();

        let mut arena = self.arena.write();
        let mut previous: Option<NodeId> = None;
        for entry in entries {
            let id = arena.insert(Node::from_entry(entry, Some(dir), 0));
            match previous {
                Some(prev) => arena.node_mut(prev).next = Some(id),
                None => arena.node_mut(dir).child = Some(id),
            }
            previous = Some(id);
        }
        arena.node_mut(dir).populated = true;

        debug!(node = %dir, name = %info.name, entries = count, "Directory populated");
        Ok(())
    }

    /// Evict the cached subtree below `dir`.
    ///
    /// Only succeeds when no node below `dir` is referenced and no iterator
    /// is open on `dir`. The directory is marked unpopulated so the next open
    /// loads it again. Returns the number of evicted nodes.
    pub fn prune(&self, dir: &NodeRef<'_>) -> usize {
        let _guard = self.populate_lock.lock();
        let mut arena = self.arena.write();
        let node = arena.node(dir.id);
        if !node.populated {
            return 0;
        }
        if node.iterators.load(Ordering::Acquire) > 0 {
            debug!(node = %dir.id, "Prune skipped, directory is being iterated");
            return 0;
        }

        let descendants = arena.descendants(dir.id);
        let held = descendants
            .iter()
            .any(|id| arena.node(*id).references.load(Ordering::Acquire) > 0);
        if held {
            debug!(node = %dir.id, "Prune skipped, subtree still referenced");
            return 0;
        }

        for id in &descendants {
            arena.remove(*id);
        }
        let node = arena.node_mut(dir.id);
        node.child = None;
        node.populated = false;

        debug!(node = %dir.id, evicted = descendants.len(), "Subtree pruned");
        descendants.len()
    }
}

impl fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("root", &self.root)
            .field("cached_nodes", &self.cached_nodes())
            .finish()
    }
}

/// Counted reference to a cached node
///
/// Cloning acquires, dropping releases. Moving a `NodeRef` transfers the
/// reference without touching the count.
pub struct NodeRef<'t> {
    tree: &'t NodeTree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t NodeTree {
        self.tree
    }

    /// Detach the reference from this handle; see `NodeTree::adopt`.
    pub fn into_id(self) -> NodeId {
        let id = self.id;
        std::mem::forget(self);
        id
    }

    pub fn name(&self) -> NodeName {
        self.tree.with_node(self.id, |node| node.name.clone())
    }

    /// Run `f` on the node's name without copying it.
    pub fn with_name<R>(&self, f: impl FnOnce(&NodeName) -> R) -> R {
        self.tree.with_node(self.id, |node| f(&node.name))
    }

    pub fn kind(&self) -> NodeKind {
        self.tree.with_node(self.id, |node| node.kind)
    }

    pub fn is_dir(&self) -> bool {
        self.kind() == NodeKind::Directory
    }

    pub fn size(&self) -> u64 {
        self.tree.with_node(self.id, |node| node.size)
    }

    pub fn location(&self) -> u64 {
        self.tree.with_node(self.id, |node| node.location)
    }

    pub fn is_populated(&self) -> bool {
        self.tree.with_node(self.id, |node| node.populated)
    }

    /// Acquire the parent directory; `None` for the root.
    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree.acquire_link(self.id, |node| node.parent)
    }
}

impl Clone for NodeRef<'_> {
    fn clone(&self) -> Self {
        self.tree.acquire(self.id)
    }
}

impl Drop for NodeRef<'_> {
    fn drop(&mut self) {
        self.tree.release(self.id);
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .finish()
    }
}
