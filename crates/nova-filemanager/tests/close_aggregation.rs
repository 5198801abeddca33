//! S6 (close aggregation) and the round-trip/idempotence properties from
//! the testable-properties section: `close()` is safe to call twice, and
//! `create_empty_location` twice leaves exactly one group.

use std::io::Write as _;

use nova_core::AbsPathBuf;
use nova_filemanager::{FileManager, FileManagerError, Location, PathRoot};

fn write_jar(path: &std::path::Path, entries: &[(&str, &[u8])]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();
    for (name, bytes) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(bytes).unwrap();
    }
    zip.finish().unwrap();
}

#[test]
fn close_is_idempotent() {
    let dir_a = tempfile::tempdir().unwrap();
    let dir_b = tempfile::tempdir().unwrap();

    let mut fm = FileManager::new(None);
    fm.add_path(
        Location::class_path(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir_a.path()).unwrap()),
    )
    .unwrap();
    fm.add_path(
        Location::source_path(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir_b.path()).unwrap()),
    )
    .unwrap();

    fm.close().unwrap();
    fm.close().unwrap();
}

#[test]
fn close_raises_composite_error_when_one_container_fails_to_close() {
    let dir = tempfile::tempdir().unwrap();
    let jar_a = dir.path().join("a.jar");
    let jar_b = dir.path().join("b.jar");
    write_jar(&jar_a, &[("Foo.class", b"a")]);
    write_jar(&jar_b, &[("Bar.class", b"b")]);

    let mut fm = FileManager::new(None);
    fm.add_path(
        Location::class_path(),
        &PathRoot::archive(AbsPathBuf::canonicalize(&jar_a).unwrap()),
    )
    .unwrap();
    fm.add_path(
        Location::source_path(),
        &PathRoot::archive(AbsPathBuf::canonicalize(&jar_b).unwrap()),
    )
    .unwrap();

    // Simulate a build output directory being cleaned mid-build: one
    // container's backing jar disappears before close is called.
    std::fs::remove_file(&jar_a).unwrap();

    let err = fm.close().unwrap_err();
    match err {
        FileManagerError::CompositeClose { total, failed, .. } => {
            assert_eq!(total, 2);
            assert_eq!(failed, 1);
        }
        other => panic!("expected CompositeClose, got {other:?}"),
    }
}

#[test]
fn create_empty_location_twice_leaves_one_group() {
    let mut fm = FileManager::new(None);
    fm.create_empty_location(Location::class_path()).unwrap();
    fm.create_empty_location(Location::class_path()).unwrap();
    assert!(fm.has_location(&Location::class_path()));
    assert!(fm
        .get_package_container_group(&Location::class_path())
        .unwrap()
        .unwrap()
        .containers()
        .is_empty());
}
