//! Path resolution behavior

use crate::support::sample_volume;
use exfat_lookup::tree::memory::MemoryImage;
use exfat_lookup::{Collator, DirIterator, LookupError, UpcaseTable, Volume};

#[test]
fn dot_components_are_no_ops() {
    let (volume, _image) = sample_volume();
    let plain = volume.lookup("Docs/Report.PDF").unwrap();
    let dotted = volume.lookup("./Docs/./././Report.PDF/.").unwrap();
    assert_eq!(plain, dotted);
}

#[test]
fn slash_runs_collapse() {
    let (volume, _image) = sample_volume();
    let plain = volume.lookup("Docs/a").unwrap();
    let slashed = volume.lookup("//Docs///a//").unwrap();
    assert_eq!(plain, slashed);
}

#[test]
fn root_resolution_does_not_touch_the_tree() {
    let (volume, image) = sample_volume();
    let root = volume.lookup("").unwrap();
    let slash = volume.lookup("/").unwrap();
    assert_eq!(root.id(), volume.tree().root_id());
    assert_eq!(root, slash);
    assert_eq!(volume.tree().references(root.id()), 3);
    assert_eq!(image.total_loads(), 0);
}

#[test]
fn first_match_in_disk_order_wins() {
    let (volume, _image) = sample_volume();
    let node = volume.lookup("MUSIC/ARTIST").unwrap();
    assert_eq!(node.name().to_string(), "Artist");

    // the shadowed "artist" directory is still listed
    let names: Vec<String> = volume
        .read_dir("music")
        .unwrap()
        .map(|child| child.name().to_string())
        .collect();
    assert_eq!(names, vec!["Artist", "artist"]);

    let song = volume.lookup("music/artist/song.MP3").unwrap();
    assert_eq!(song.size(), 4096);
}

#[test]
fn not_found_names_the_missing_component() {
    let (volume, _image) = sample_volume();
    match volume.lookup("Docs/a/missing/c.txt") {
        Err(LookupError::NotFound { component }) => assert_eq!(component, "missing"),
        other => panic!("unexpected result: {other:?}"),
    };
}

#[test]
fn directories_are_populated_once() {
    let (volume, image) = sample_volume();
    for _ in 0..5 {
        volume.lookup("Docs/a/b/c.txt").unwrap();
        let _ = volume.lookup("Docs/a/b/none");
    }
    assert_eq!(image.load_count(image.root_location()), 1);
    assert_eq!(image.load_count(image.location_of("Docs").unwrap()), 1);
    assert_eq!(image.load_count(image.location_of("Docs/a/b").unwrap()), 1);
    assert_eq!(image.total_loads(), 4);
}

#[test]
fn only_the_path_walked_is_populated() {
    let (volume, image) = sample_volume();
    volume.lookup("readme").unwrap();
    assert_eq!(image.total_loads(), 1);
    assert_eq!(image.load_count(image.location_of("Music").unwrap()), 0);
}

#[test]
fn prune_and_lookup_again() {
    let (volume, image) = sample_volume();
    volume.lookup("Docs/a/b/c.txt").unwrap();
    let docs = volume.lookup("Docs").unwrap();

    let evicted = volume.tree().prune(&docs);
    assert_eq!(evicted, 4);
    assert!(!docs.is_populated());

    let node = volume.lookup("docs/a/b/c.txt").unwrap();
    assert_eq!(node.size(), 12);
    assert_eq!(image.load_count(image.location_of("Docs").unwrap()), 2);
}

#[test]
fn prune_refused_while_a_descendant_is_held() {
    let (volume, _image) = sample_volume();
    let leaf = volume.lookup("Docs/a/b/c.txt").unwrap();
    let docs = volume.lookup("Docs").unwrap();
    assert_eq!(volume.tree().prune(&docs), 0);
    assert!(docs.is_populated());
    drop(leaf);
    assert_eq!(volume.tree().prune(&docs), 4);
}

#[test]
fn prune_refused_during_iteration() {
    let (volume, _image) = sample_volume();
    let docs = volume.lookup("Docs").unwrap();
    let mut it = DirIterator::open(&docs).unwrap();
    drop(it.next_child());

    // the cursor still pins the current child
    assert_eq!(volume.tree().prune(&docs), 0);
    assert!(it.next_child().is_some());
    it.close();
}

#[test]
fn prune_refused_before_first_step() {
    let (volume, _image) = sample_volume();
    let docs = volume.lookup("Docs").unwrap();
    let mut it = DirIterator::open(&docs).unwrap();

    assert_eq!(volume.tree().prune(&docs), 0);
    assert_eq!(it.next_child().unwrap().name().to_string(), "Report.PDF");
    it.close();
    assert_eq!(volume.tree().prune(&docs), 4);
}

#[test]
fn folding_follows_the_table() {
    let image = MemoryImage::builder().file("/\u{e9}t\u{e9}.txt", 1).build();

    // ASCII-only table: 0xE9 is outside the table and compares raw
    let ascii = Volume::new(image, Collator::new(UpcaseTable::ascii(128)));
    assert!(ascii.lookup("/\u{e9}t\u{e9}.txt").is_ok());
    assert!(ascii.lookup("/\u{e9}T\u{e9}.TXT").is_ok());
    assert!(ascii.lookup("/\u{c9}T\u{c9}.TXT").unwrap_err().is_not_found());

    // Latin-1 table folding 0xE0..=0xFE (except 0xF7) onto 0xC0..=0xDE
    let mut entries: Vec<u16> = (0..0x100).collect();
    for unit in 0x61..=0x7a {
        entries[unit] = unit as u16 - 0x20;
    }
    for unit in (0xe0..=0xfe).filter(|u| *u != 0xf7) {
        entries[unit] = unit as u16 - 0x20;
    }
    let image = MemoryImage::builder().file("/\u{e9}t\u{e9}.txt", 1).build();
    let latin = Volume::new(
        image,
        Collator::new(UpcaseTable::from_entries(entries).unwrap()),
    );
    assert!(latin.lookup("/\u{c9}T\u{c9}.TXT").is_ok());
}

#[test]
fn encoder_limit_is_configurable() {
    let image = MemoryImage::builder().file("/abcdef", 1).build();
    let volume = Volume::with_encoder(
        image,
        Collator::default(),
        exfat_lookup::Utf8Encoder::new(4),
    );
    assert!(matches!(
        volume.lookup("abcdef"),
        Err(LookupError::Encoding(exfat_lookup::EncodingError::TooLong { len: 6, max: 4 }))
    ));
}
