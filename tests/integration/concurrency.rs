//! Lookups from several threads against one volume

use crate::support::{sample_volume, snapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

#[test]
fn concurrent_lookups_share_population_and_balance_counts() {
    let (volume, image) = sample_volume();
    let paths = [
        "Docs/a/b/c.txt",
        "music/artist/SONG.mp3",
        "DOCS/report.pdf",
        "readme",
        "Docs/missing",
    ];

    thread::scope(|scope| {
        for worker in 0..8 {
            let volume = &volume;
            scope.spawn(move || {
                for round in 0..50 {
                    let path = paths[(worker + round) % paths.len()];
                    let _ = volume.lookup(path);
                }
            });
        }
    });

    // every directory on the walked paths was loaded exactly once
    for dir in ["", "Docs", "Docs/a", "Docs/a/b", "Music", "Music/Artist"] {
        assert_eq!(image.load_count(image.location_of(dir).unwrap()), 1, "{dir}");
    }
    for (id, count) in snapshot(&volume) {
        let expected = if id == volume.tree().root_id() { 1 } else { 0 };
        assert_eq!(count, expected, "node {id}");
    }
}

#[test]
fn lookups_survive_concurrent_pruning() {
    let (volume, _image) = sample_volume();
    let paths = [
        "Docs/Report.PDF",
        "docs/a/b/c.txt",
        "Music/Artist/Song.mp3",
        "README",
    ];
    let stop = AtomicBool::new(false);

    thread::scope(|scope| {
        let pruner = scope.spawn(|| {
            while !stop.load(Ordering::Acquire) {
                if let Ok(docs) = volume.lookup("Docs") {
                    volume.tree().prune(&docs);
                }
                volume.tree().prune(&volume.root());
                thread::yield_now();
            }
        });

        let workers: Vec<_> = (0..4)
            .map(|worker| {
                let volume = &volume;
                scope.spawn(move || {
                    for round in 0..200 {
                        let path = paths[(worker + round) % paths.len()];
                        if let Err(err) = volume.lookup(path) {
                            panic!("{path}: {err}");
                        }
                    }
                })
            })
            .collect();

        let results: Vec<_> = workers.into_iter().map(|w| w.join()).collect();
        stop.store(true, Ordering::Release);
        pruner.join().unwrap();
        for result in results {
            result.unwrap();
        }
    });

    for (id, count) in snapshot(&volume) {
        let expected = if id == volume.tree().root_id() { 1 } else { 0 };
        assert_eq!(count, expected, "node {id}");
    }
    // nothing is left pinned, so the whole cache can be evicted
    let root = volume.root();
    volume.tree().prune(&root);
    assert_eq!(volume.tree().cached_nodes(), 1);
}
