//! Path Resolution
//!
//! Resolves slash-separated paths against the node cache, one component at a
//! time, starting at the root.

use crate::collate::Collator;
use crate::encoding::{ComponentEncoder, Utf8Encoder};
use crate::error::LookupError;
use crate::iter::DirIterator;
use crate::tree::{DirectoryLoader, NodeRef, NodeTree};
use crate::types::NodeName;
use tracing::{debug, instrument};

/// Iterator over the components of a path
///
/// Runs of '/' separate components; leading, embedded and trailing runs
/// collapse, so `"//a///b/"` yields `a` then `b`.
#[derive(Debug, Clone)]
pub struct Components<'p> {
    rest: &'p [u8],
}

impl<'p> Components<'p> {
    pub fn new(path: &'p [u8]) -> Self {
        Components { rest: path }
    }
}

impl<'p> Iterator for Components<'p> {
    type Item = &'p [u8];

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.rest.iter().position(|b| *b != b'/')?;
        let rest = &self.rest[start..];
        let end = rest.iter().position(|b| *b == b'/').unwrap_or(rest.len());
        let (component, tail) = rest.split_at(end);
        self.rest = tail;
        Some(component)
    }
}

/// A mounted view of a node cache
///
/// Bundles the tree with the collator and component encoder that lookups
/// use. The root is pinned for the volume's lifetime.
pub struct Volume {
    tree: NodeTree,
    collator: Collator,
    encoder: Box<dyn ComponentEncoder>,
}

impl Volume {
    pub fn new<L: DirectoryLoader + 'static>(loader: L, collator: Collator) -> Self {
        Self::with_encoder(loader, collator, Utf8Encoder::default())
    }

    pub fn with_encoder<L, E>(loader: L, collator: Collator, encoder: E) -> Self
    where
        L: DirectoryLoader + 'static,
        E: ComponentEncoder + 'static,
    {
        Volume {
            tree: NodeTree::new(loader),
            collator,
            encoder: Box::new(encoder),
        }
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn collator(&self) -> &Collator {
        &self.collator
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root()
    }

    /// Resolve `path` to an acquired node.
    ///
    /// "." components are skipped; ".." has no special meaning. On any error
    /// every reference taken during the call has been released.
    #[instrument(level = "debug", skip_all, fields(path = %String::from_utf8_lossy(path.as_ref())))]
    pub fn lookup<P: AsRef<[u8]>>(&self, path: P) -> Result<NodeRef<'_>, LookupError> {
        let mut parent = self.tree.root();

        for component in Components::new(path.as_ref()) {
            if component == b"." {
                continue;
            }
            let name = self.encoder.encode(component)?;
            parent = self.lookup_name(&parent, &name)?;
        }

        debug!(node = %parent.id(), "Path resolved");
        Ok(parent)
    }

    /// Find the first child of `parent` whose name collates equal to `name`.
    pub fn lookup_name<'v>(
        &'v self,
        parent: &NodeRef<'v>,
        name: &NodeName,
    ) -> Result<NodeRef<'v>, LookupError> {
        let mut it = DirIterator::open(parent)?;

        let found = it.by_ref().find(|child| {
            child.with_name(|candidate| {
                self.collator
                    .names_equal(name.as_units(), candidate.as_units())
            })
        });
        it.close();

        found.ok_or_else(|| {
            debug!(parent = %parent.id(), component = %name, "Component not found");
            LookupError::NotFound {
                component: name.to_string(),
            }
        })
    }

    /// Resolve `path` and open it for listing.
    pub fn read_dir<P: AsRef<[u8]>>(&self, path: P) -> Result<DirIterator<'_>, LookupError> {
        let dir = self.lookup(path)?;
        DirIterator::open(&dir)
    }
}

impl std::fmt::Debug for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Volume")
            .field("tree", &self.tree)
            .field("upcase_extent", &self.collator.table().extent())
            .finish()
    }
}
