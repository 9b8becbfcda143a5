//! Directory Iterator
//!
//! Cursor over the children of a cached directory. Opening pins the directory
//! and materializes its children; each step hands the caller an acquired
//! child. Closing (explicitly or by drop) releases the pin exactly once.

use crate::error::LookupError;
use crate::tree::NodeRef;
use tracing::debug;

enum Cursor<'t> {
    BeforeFirst,
    /// The iterator keeps its own reference to the current child so the
    /// sibling link stays valid while the caller holds or drops theirs
    At(NodeRef<'t>),
    Exhausted,
}

/// Open directory cursor
pub struct DirIterator<'t> {
    dir: NodeRef<'t>,
    cursor: Cursor<'t>,
}

impl<'t> DirIterator<'t> {
    /// Pin `dir` and make sure its children are cached.
    ///
    /// On failure the pin is dropped before the error is returned.
    pub fn open(dir: &NodeRef<'t>) -> Result<Self, LookupError> {
        let dir = dir.clone();
        if !dir.is_dir() {
            return Err(LookupError::NotADirectory {
                component: dir.name().to_string(),
            });
        }
        if let Err(err) = dir.tree().open_dir(dir.id()) {
            debug!(node = %dir.id(), error = %err, "Directory population failed");
            return Err(LookupError::Io(err));
        }
        Ok(DirIterator {
            dir,
            cursor: Cursor::BeforeFirst,
        })
    }

    /// The directory being iterated.
    pub fn directory(&self) -> &NodeRef<'t> {
        &self.dir
    }

    /// Advance to the next child and return an acquired reference to it.
    ///
    /// Returns `None` once the children are exhausted, and keeps returning
    /// `None` afterwards.
    pub fn next_child(&mut self) -> Option<NodeRef<'t>> {
        let tree = self.dir.tree();
        let next = match &self.cursor {
            Cursor::BeforeFirst => tree.first_child(self.dir.id()),
            Cursor::At(current) => tree.next_sibling(current.id()),
            Cursor::Exhausted => return None,
        };
        match next {
            Some(child) => {
                self.cursor = Cursor::At(child.clone());
                Some(child)
            }
            None => {
                self.cursor = Cursor::Exhausted;
                None
            }
        }
    }

    /// Release the directory pin.
    pub fn close(self) {}
}

impl Drop for DirIterator<'_> {
    fn drop(&mut self) {
        self.dir.tree().close_dir(self.dir.id());
    }
}

impl<'t> Iterator for DirIterator<'t> {
    type Item = NodeRef<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_child()
    }
}

impl std::iter::FusedIterator for DirIterator<'_> {}
