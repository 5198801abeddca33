//! Module discovery (C3): determines whether a classpath/module-path entry is
//! an explicit module (carries a `module-info.class`), an automatic module
//! (named from its manifest or filename), or unnamed.
//!
//! Discovery never raises: a malformed `module-info.class` or an I/O failure
//! while probing for one is swallowed and treated the same as "no descriptor
//! here", falling through to automatic-name derivation.

use std::io::Read;
use std::path::Path;

use nova_classfile::parse_module_info_class;
use nova_modules::{ModuleInfo, ModuleName};

use crate::module_name;

/// How a module's name was determined for one classpath/module-path entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModuleNameKind {
    Explicit,
    Automatic,
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiscoveredModule {
    pub name: Option<ModuleName>,
    pub kind: ModuleNameKind,
    pub info: Option<ModuleInfo>,
}

impl DiscoveredModule {
    fn unnamed() -> Self {
        Self {
            name: None,
            kind: ModuleNameKind::None,
            info: None,
        }
    }

    fn explicit(info: ModuleInfo) -> Self {
        Self {
            name: Some(info.name.clone()),
            kind: ModuleNameKind::Explicit,
            info: Some(info),
        }
    }

    fn automatic(name: ModuleName) -> Self {
        let info = ModuleInfo::automatic(name.clone());
        Self {
            name: Some(name),
            kind: ModuleNameKind::Automatic,
            info: Some(info),
        }
    }

    fn automatic_or_unnamed(name: Option<ModuleName>) -> Self {
        match name {
            Some(name) => Self::automatic(name),
            None => Self::unnamed(),
        }
    }
}

/// Read `module-info.class` directly out of an exploded class directory, if
/// present. A read failure or a malformed descriptor is swallowed and
/// logged, not propagated: discovery falls back to an automatic name.
fn read_module_info_from_dir(dir: &Path) -> Option<ModuleInfo> {
    let path = dir.join("module-info.class");
    match std::fs::read(&path) {
        Ok(bytes) => match parse_module_info_class(&bytes) {
            Ok(info) => Some(info),
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "malformed module-info.class, falling back to automatic naming");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "failed to read module-info.class, falling back to automatic naming");
            None
        }
    }
}

/// Discover module metadata for a class directory placed on the module path:
/// explicit if it has `module-info.class` at its root, otherwise an automatic
/// module named from the directory's filename.
pub fn discover_for_class_dir(dir: &Path) -> DiscoveredModule {
    match read_module_info_from_dir(dir) {
        Some(info) => DiscoveredModule::explicit(info),
        None => DiscoveredModule::automatic_or_unnamed(
            module_name::derive_automatic_module_name_from_jar_path(dir),
        ),
    }
}

/// Read `module-info.class` out of a jar at one of the explicit-module
/// candidate entry names, swallowing any I/O, zip, or descriptor-parse
/// failure as "no explicit descriptor here".
fn read_module_info_from_jar(archive: &mut zip::ZipArchive<std::fs::File>) -> Option<ModuleInfo> {
    for candidate in ["module-info.class", "META-INF/versions/9/module-info.class"] {
        let mut entry = match archive.by_name(candidate) {
            Ok(entry) => entry,
            Err(zip::result::ZipError::FileNotFound) => continue,
            Err(err) => {
                tracing::debug!(entry = candidate, error = %err, "failed to read module-info.class entry");
                continue;
            }
        };
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        if let Err(err) = entry.read_to_end(&mut bytes) {
            tracing::debug!(entry = candidate, error = %err, "failed to read module-info.class entry");
            continue;
        }
        match parse_module_info_class(&bytes) {
            Ok(info) => return Some(info),
            Err(err) => {
                tracing::debug!(entry = candidate, error = %err, "malformed module-info.class, falling back to automatic naming");
                continue;
            }
        }
    }
    None
}

/// Discover module metadata for a jar: explicit if it carries a
/// `module-info.class` at the root or under the base multi-release overlay
/// (`META-INF/versions/9/`), otherwise automatic (named from
/// `Automatic-Module-Name` in the manifest, falling back to the filename), or
/// `None` if the jar has no usable name at all. Any I/O or zip-format failure
/// opening the jar is swallowed the same way.
pub fn discover_for_jar(path: &Path) -> DiscoveredModule {
    let fallback_name = || module_name::derive_automatic_module_name_from_jar_path(path);

    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "failed to open jar for module discovery");
            return DiscoveredModule::automatic_or_unnamed(fallback_name());
        }
    };
    let mut archive = match zip::ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(err) => {
            tracing::debug!(path = %path.display(), error = %err, "failed to read jar central directory");
            return DiscoveredModule::automatic_or_unnamed(fallback_name());
        }
    };

    if let Some(info) = read_module_info_from_jar(&mut archive) {
        return DiscoveredModule::explicit(info);
    }

    let name = module_name::automatic_module_name_from_jar_manifest(&mut archive).or_else(fallback_name);
    DiscoveredModule::automatic_or_unnamed(name)
}

/// Discover module metadata for any module-path entry, dispatching on
/// whether it is a directory or an archive.
pub fn discover_for_path(path: &Path) -> DiscoveredModule {
    if path.is_dir() {
        discover_for_class_dir(path)
    } else {
        discover_for_jar(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_jar(path: &Path, entries: &[(&str, &[u8])]) {
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
    fn automatic_name_from_manifest_wins_over_filename() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("my-lib-1.2.3.jar");
        let manifest = b"Manifest-Version: 1.0\r\nAutomatic-Module-Name: custom.name\r\n\r\n";
        write_jar(&jar, &[("META-INF/MANIFEST.MF", manifest)]);

        let discovered = discover_for_jar(&jar);
        assert_eq!(discovered.kind, ModuleNameKind::Automatic);
        assert_eq!(discovered.name.unwrap().as_str(), "custom.name");
    }

    #[test]
    fn automatic_name_falls_back_to_filename() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("guava-31.1-jre.jar");
        write_jar(&jar, &[("README.txt", b"hello")]);

        let discovered = discover_for_jar(&jar);
        assert_eq!(discovered.kind, ModuleNameKind::Automatic);
        assert_eq!(discovered.name.unwrap().as_str(), "guava");
    }

    #[test]
    fn missing_jar_still_derives_automatic_name() {
        let path = Path::new("/does/not/exist/foo-2.0.jar");
        let discovered = discover_for_jar(path);
        assert_eq!(discovered.kind, ModuleNameKind::Automatic);
        assert_eq!(discovered.name.unwrap().as_str(), "foo");
    }

    #[test]
    fn class_dir_without_module_info_is_automatic() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("my.module");
        std::fs::create_dir_all(&module_dir).unwrap();

        let discovered = discover_for_class_dir(&module_dir);
        assert_eq!(discovered.kind, ModuleNameKind::Automatic);
        assert_eq!(discovered.name.unwrap().as_str(), "my.module");
    }

    #[test]
    fn corrupt_module_info_falls_back_to_automatic_instead_of_raising() {
        let dir = tempfile::tempdir().unwrap();
        let module_dir = dir.path().join("my.module");
        std::fs::create_dir_all(&module_dir).unwrap();
        std::fs::write(module_dir.join("module-info.class"), b"not a classfile").unwrap();

        let discovered = discover_for_class_dir(&module_dir);
        assert_eq!(discovered.kind, ModuleNameKind::Automatic);
        assert_eq!(discovered.name.unwrap().as_str(), "my.module");
    }
}
