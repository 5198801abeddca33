//! S5 — output auto-module: writing to a ModuleLocation under class-output
//! auto-creates the module sub-group; the same call against a package-only
//! input location is rejected.

use nova_core::AbsPathBuf;
use nova_filemanager::{FileManager, Kind, Location, ModuleName, PathRoot};

#[test]
fn module_output_location_auto_creates_sub_group() {
    let dir = tempfile::tempdir().unwrap();
    let mut fm = FileManager::new(None);
    fm.add_path(
        Location::class_output(),
        &PathRoot::disk(AbsPathBuf::canonicalize(dir.path()).unwrap()),
    )
    .unwrap();

    let module_location = Location::module(Location::class_output(), ModuleName::new("mod.a")).unwrap();
    let handle = fm
        .get_java_file_for_output(&module_location, "p.X", Kind::Class)
        .unwrap()
        .unwrap();
    assert_eq!(handle.binary_name(), "p.X");

    let locations = fm.list_locations_for_modules(&Location::class_output()).unwrap();
    assert_eq!(locations[0], vec![module_location]);
}

#[test]
fn output_lookup_against_input_location_is_rejected() {
    let mut fm = FileManager::new(None);
    let module_location = Location::module(Location::module_source_path(), ModuleName::new("mod.a")).unwrap();
    let err = fm.get_java_file_for_output(&module_location, "p.X", Kind::Class);
    assert!(err.is_err());
}
