//! Every lookup leaves reference counts exactly as it found them, except for
//! the one reference handed to the caller on success.

use crate::support::{sample_volume, snapshot};
use exfat_lookup::LookupError;

#[test]
fn success_adds_exactly_one_reference_to_result() {
    let (volume, _image) = sample_volume();
    drop(volume.lookup("/Docs/a/b/c.txt").unwrap());
    let before = snapshot(&volume);

    let node = volume.lookup("/docs/A/B/C.TXT").unwrap();
    let during = snapshot(&volume);
    for ((id, old), (_, new)) in before.iter().zip(during.iter()) {
        let expected = if *id == node.id() { old + 1 } else { *old };
        assert_eq!(*new, expected, "node {id}");
    }

    drop(node);
    assert_eq!(snapshot(&volume), before);
}

#[test]
fn intermediate_directories_are_released() {
    let (volume, _image) = sample_volume();
    let node = volume.lookup("Docs/a/b/c.txt").unwrap();
    let tree = volume.tree();

    let b = node.parent().unwrap();
    let a = b.parent().unwrap();
    let docs = a.parent().unwrap();
    // only the handles taken in this test
    assert_eq!(tree.references(b.id()), 1);
    assert_eq!(tree.references(a.id()), 1);
    assert_eq!(tree.references(docs.id()), 1);
    assert_eq!(tree.references(node.id()), 1);
    assert_eq!(tree.references(tree.root_id()), 1);
}

#[test]
fn not_found_releases_everything() {
    let (volume, _image) = sample_volume();
    drop(volume.lookup("Docs").unwrap());
    let before = snapshot(&volume);

    let err = volume.lookup("Docs/missing/b").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(snapshot(&volume), before);
}

#[test]
fn not_found_on_cold_cache_leaves_no_references() {
    let (volume, _image) = sample_volume();
    assert!(volume.lookup("Music/Artist/nope.mp3").is_err());
    for (id, count) in snapshot(&volume) {
        let expected = if id == volume.tree().root_id() { 1 } else { 0 };
        assert_eq!(count, expected, "node {id}");
    }
}

#[test]
fn encoding_error_touches_nothing() {
    let (volume, image) = sample_volume();
    let long = "x".repeat(300);

    let err = volume.lookup(format!("/{long}/Docs")).unwrap_err();
    assert!(matches!(err, LookupError::Encoding(_)));
    assert_eq!(image.total_loads(), 0);
    assert_eq!(volume.tree().cached_nodes(), 1);
    assert_eq!(volume.tree().references(volume.tree().root_id()), 1);
}

#[test]
fn invalid_utf8_component_is_an_encoding_error() {
    let (volume, _image) = sample_volume();
    let err = volume.lookup(b"/Docs/\xff\xfe".as_slice()).unwrap_err();
    assert!(matches!(err, LookupError::Encoding(_)));
    assert_eq!(volume.tree().references(volume.tree().root_id()), 1);
}

#[test]
fn population_failure_releases_everything() {
    let (volume, image) = sample_volume();
    let docs_location = image.location_of("/Docs").unwrap();
    image.fail_loads_of(docs_location);

    let err = volume.lookup("Docs/Report.PDF").unwrap_err();
    assert!(matches!(err, LookupError::Io(_)));
    for (id, count) in snapshot(&volume) {
        let expected = if id == volume.tree().root_id() { 1 } else { 0 };
        assert_eq!(count, expected, "node {id}");
    }

    image.clear_failures();
    let node = volume.lookup("Docs/Report.PDF").unwrap();
    assert_eq!(node.size(), 2048);
}

#[test]
fn descending_through_a_file_releases_everything() {
    let (volume, _image) = sample_volume();
    let err = volume.lookup("readme/x").unwrap_err();
    assert!(matches!(err, LookupError::NotADirectory { .. }));
    for (id, count) in snapshot(&volume) {
        let expected = if id == volume.tree().root_id() { 1 } else { 0 };
        assert_eq!(count, expected, "node {id}");
    }
}
