//! S1 — classpath shadowing: first-registered container wins on lookup, but
//! listing concatenates every container's view without deduplication.

use nova_core::AbsPathBuf;
use nova_filemanager::{FileManager, Kind, Location, PathRoot};

fn disk(path: &std::path::Path) -> PathRoot {
    PathRoot::disk(AbsPathBuf::canonicalize(path).unwrap())
}

#[test]
fn first_registered_directory_wins_and_listing_concatenates() {
    let a = tempfile::tempdir().unwrap();
    let b = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(a.path().join("p")).unwrap();
    std::fs::create_dir_all(b.path().join("p")).unwrap();
    std::fs::write(a.path().join("p/X.class"), b"from-a").unwrap();
    std::fs::write(b.path().join("p/X.class"), b"from-b").unwrap();

    let mut fm = FileManager::new(None);
    fm.add_path(Location::class_path(), &disk(a.path())).unwrap();
    fm.add_path(Location::class_path(), &disk(b.path())).unwrap();

    let handle = fm
        .get_java_file_for_input(&Location::class_path(), "p.X", Kind::Class)
        .unwrap()
        .unwrap();
    assert!(handle.container_id().contains(a.path().to_str().unwrap()));

    let listed = fm.list(&Location::class_path(), "p", &[Kind::Class], false).unwrap();
    assert_eq!(listed.len(), 2);
}
