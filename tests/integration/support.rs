//! Shared fixtures

use exfat_lookup::tree::memory::MemoryImage;
use exfat_lookup::{Collator, NodeId, UpcaseTable, Volume};
use std::sync::Arc;

/// Volume over a small image:
///
/// ```text
/// /Music/Artist/Song.mp3
/// /Music/artist/other.mp3   (second "artist", shadowed by the first)
/// /Docs/Report.PDF
/// /Docs/a/b/c.txt
/// /readme
/// ```
pub fn sample_volume() -> (Volume, Arc<MemoryImage>) {
    let image = Arc::new(
        MemoryImage::builder()
            .file("/Music/Artist/Song.mp3", 4096)
            .dir("/Music/artist")
            .file("/Docs/Report.PDF", 2048)
            .file("/Docs/a/b/c.txt", 12)
            .file("/readme", 1)
            .build(),
    );
    let volume = Volume::new(image.clone(), Collator::new(UpcaseTable::ascii(128)));
    (volume, image)
}

/// Reference count of every cached node, indexed by id.
pub fn snapshot(volume: &Volume) -> Vec<(NodeId, u32)> {
    let tree = volume.tree();
    let mut ids = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(dir) = stack.pop() {
        ids.push(dir.id());
        if !dir.is_populated() {
            continue;
        }
        let mut it = exfat_lookup::DirIterator::open(&dir).unwrap();
        while let Some(child) = it.next_child() {
            if child.is_dir() {
                stack.push(child);
            } else {
                ids.push(child.id());
            }
        }
    }
    ids.sort();
    ids.into_iter().map(|id| (id, tree.references(id))).collect()
}
