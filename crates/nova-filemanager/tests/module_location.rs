//! S3 — module location resolution over `module-source-path`.

use nova_core::AbsPathBuf;
use nova_filemanager::{FileManager, Location, ModuleName, PathRoot};

#[test]
fn module_source_path_entry_is_discoverable_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let module_dir = dir.path().join("mod.a");
    std::fs::create_dir_all(&module_dir).unwrap();

    let module_location =
        Location::module(Location::module_source_path(), ModuleName::new("mod.a")).unwrap();

    let mut fm = FileManager::new(None);
    fm.add_path(
        module_location.clone(),
        &PathRoot::disk(AbsPathBuf::canonicalize(&module_dir).unwrap()),
    )
    .unwrap();

    let locations = fm
        .list_locations_for_modules(&Location::module_source_path())
        .unwrap();
    assert_eq!(locations, vec![vec![module_location.clone()]]);

    let synthesised = fm
        .get_location_for_module_by_name(&Location::module_source_path(), ModuleName::new("mod.a"))
        .unwrap();
    assert_eq!(synthesised, module_location);

    assert_eq!(
        fm.infer_module_name(&module_location).unwrap(),
        Some(ModuleName::new("mod.a"))
    );
}

#[test]
fn source_path_and_module_source_path_are_mutually_exclusive() {
    let dir = tempfile::tempdir().unwrap();
    let mut fm = FileManager::new(None);
    fm.add_path(
        Location::source_path(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir.path()).unwrap()),
    )
    .unwrap();

    let err = fm.add_path(
        Location::module_source_path(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir.path()).unwrap()),
    );
    assert!(err.is_err());

    let mut fm2 = FileManager::new(None);
    fm2.add_path(
        Location::module_source_path(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir.path()).unwrap()),
    )
    .unwrap();
    let err2 = fm2.add_path(
        Location::source_path(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir.path()).unwrap()),
    );
    assert!(err2.is_err());
}
