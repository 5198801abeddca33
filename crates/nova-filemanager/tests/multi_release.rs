//! S2 — multi-release jar: the effective release caps which overlay wins.

use std::io::Write as _;

use nova_core::AbsPathBuf;
use nova_filemanager::{FileManager, Kind, Location, PathRoot};

fn write_multi_release_jar(path: &std::path::Path) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::FileOptions::default();

    let manifest = b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n\r\n";
    zip.start_file("META-INF/MANIFEST.MF", options).unwrap();
    zip.write_all(manifest).unwrap();

    zip.start_file("p/C.class", options).unwrap();
    zip.write_all(b"base").unwrap();

    zip.start_file("META-INF/versions/17/p/C.class", options).unwrap();
    zip.write_all(b"v17").unwrap();

    zip.finish().unwrap();
}

#[test]
fn release_17_resolves_the_overlay() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("lib.jar");
    write_multi_release_jar(&jar);

    let mut fm = FileManager::new(Some(17));
    fm.add_path(
        Location::class_path(),
        &PathRoot::archive(AbsPathBuf::canonicalize(&jar).unwrap()),
    )
    .unwrap();

    let handle = fm
        .get_java_file_for_input(&Location::class_path(), "p.C", Kind::Class)
        .unwrap()
        .unwrap();
    assert_eq!(
        fm.infer_binary_name(&Location::class_path(), &handle),
        Some("p.C".to_string())
    );
    assert!(handle.relative_path().to_string_lossy().contains("versions/17"));
}

#[test]
fn release_9_falls_back_to_base_entry() {
    let dir = tempfile::tempdir().unwrap();
    let jar = dir.path().join("lib.jar");
    write_multi_release_jar(&jar);

    let mut fm = FileManager::new(Some(9));
    fm.add_path(
        Location::class_path(),
        &PathRoot::archive(AbsPathBuf::canonicalize(&jar).unwrap()),
    )
    .unwrap();

    let handle = fm
        .get_java_file_for_input(&Location::class_path(), "p.C", Kind::Class)
        .unwrap()
        .unwrap();
    assert!(!handle.relative_path().to_string_lossy().contains("versions"));
}
