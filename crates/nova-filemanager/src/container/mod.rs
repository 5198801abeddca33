//! Containers (C2): a single classpath/module-path/output entry, backed by a
//! directory, an archive, or an in-memory scratch filesystem.
//!
//! Modeled as a closed enum with match dispatch rather than a trait object,
//! since the set of backing storage kinds is fixed and each variant's
//! behaviour (multi-release overlay resolution, writability) differs enough
//! that a shared trait would mostly be downcasting in disguise.

pub mod archive;
pub mod disk;

use std::path::{Path, PathBuf};

use nova_core::AbsPathBuf;

use crate::error::{FileManagerError, Result};
use crate::handle::FileHandle;
use crate::kind::Kind;
use crate::location::Location;
use crate::module_discovery::{self, DiscoveredModule};
use crate::path_root::{InMemoryRoot, PathRoot};
use crate::paths;

use archive::ArchiveContainer;
use disk::DiskContainer;

/// A single physical entry making up one element of a classpath/module-path,
/// or an output sink.
pub enum Container {
    Disk(DiskContainer),
    Archive(ArchiveContainer),
    Memory(InMemoryRoot),
}

impl Container {
    pub fn from_root(root: &PathRoot, target_release: Option<u16>) -> Result<Self> {
        match root {
            PathRoot::Disk(path) => Ok(Container::Disk(DiskContainer::new(path.clone(), target_release))),
            PathRoot::Archive(path) => Ok(Container::Archive(ArchiveContainer::open(
                path.clone(),
                target_release,
            )?)),
            PathRoot::Memory(mem) => Ok(Container::Memory(mem.clone())),
        }
    }

    pub fn identity(&self) -> String {
        match self {
            Container::Disk(d) => format!("disk:{}", d.root().as_path().display()),
            Container::Archive(a) => format!("archive:{}", a.path().as_path().display()),
            Container::Memory(m) => format!("memory:{}", m.label()),
        }
    }

    pub fn is_writable(&self) -> bool {
        !matches!(self, Container::Archive(_))
    }

    /// `is_class` gates whether a multi-release overlay may back the result:
    /// per the multi-release jar contract, only `Kind::Class` lookups may
    /// resolve through `META-INF/versions/<n>/...`; every other kind always
    /// reads the default root.
    pub fn read(&self, relative_path: &Path, is_class: bool) -> Result<Option<Vec<u8>>> {
        match self {
            Container::Disk(d) => d.read(relative_path, is_class),
            Container::Archive(a) => a.read(relative_path, is_class),
            Container::Memory(m) => Ok(m.read(relative_path)),
        }
    }

    pub fn contains(&self, relative_path: &Path, is_class: bool) -> bool {
        match self {
            Container::Disk(d) => d.contains(relative_path, is_class),
            Container::Archive(a) => a.contains(relative_path, is_class),
            Container::Memory(m) => m.read(relative_path).is_some(),
        }
    }

    /// Closes whatever resource this container opened implicitly (an
    /// archive's file handle); a no-op for disk and in-memory containers,
    /// which open nothing of their own beyond what the caller already owns.
    pub fn close(&self) -> Result<()> {
        match self {
            Container::Disk(d) => d.close(),
            Container::Archive(a) => a.close(),
            Container::Memory(_) => Ok(()),
        }
    }

    /// Module metadata for this container, for the backing kinds modules can
    /// live in (exploded class directories and jar/jmod archives). `None` for
    /// in-memory scratch containers, which never carry a `module-info.class`
    /// or a derivable filename.
    pub fn module_finder(&self) -> Option<DiscoveredModule> {
        match self {
            Container::Disk(d) => Some(module_discovery::discover_for_class_dir(d.root().as_path())),
            Container::Archive(a) => Some(module_discovery::discover_for_jar(a.path().as_path())),
            Container::Memory(_) => None,
        }
    }

    pub fn write(&self, relative_path: &Path, bytes: &[u8]) -> Result<()> {
        match self {
            Container::Disk(d) => d.write(relative_path, bytes),
            Container::Archive(_) => Err(FileManagerError::illegal_argument(
                "archive-backed containers are read-only",
            )),
            Container::Memory(m) => {
                m.write(relative_path.to_path_buf(), bytes.to_vec());
                Ok(())
            }
        }
    }

    pub fn list(&self, relative_dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        match self {
            Container::Disk(d) => d.list(relative_dir, extension, recursive),
            Container::Archive(a) => a.list(relative_dir, extension, recursive),
            Container::Memory(m) => {
                let prefix = relative_dir.to_string_lossy().into_owned();
                let mut out: Vec<PathBuf> = m
                    .list()
                    .into_iter()
                    .filter(|p| prefix.is_empty() || p.starts_with(&prefix))
                    .filter(|p| {
                        extension.is_empty()
                            || p.extension().and_then(|e| e.to_str()) == Some(extension)
                    })
                    .filter(|p| {
                        recursive
                            || p.strip_prefix(&prefix)
                                .map(|rest| rest.components().count() <= 1)
                                .unwrap_or(true)
                    })
                    .collect();
                out.sort();
                Ok(out)
            }
        }
    }

    pub fn root_display_path(&self) -> Option<&AbsPathBuf> {
        match self {
            Container::Disk(d) => Some(d.root()),
            Container::Archive(a) => Some(a.path()),
            Container::Memory(_) => None,
        }
    }

    /// Resolve `(package, relative_name)` per the standard file-manager
    /// convention and return a handle iff the target is a regular file.
    pub fn get_file_for_input(
        &self,
        location: &Location,
        package: &str,
        relative_name: &str,
    ) -> Result<Option<FileHandle>> {
        let rel = paths::resource_to_path(Path::new(""), package, relative_name)?;
        if self.contains(&rel, false) {
            Ok(Some(FileHandle::new(location.clone(), self.identity(), rel)))
        } else {
            Ok(None)
        }
    }

    /// Resolve `(package, relative_name)` and return a handle unconditionally
    /// (the target need not exist yet), or `None` if this container is
    /// read-only.
    pub fn get_file_for_output(
        &self,
        location: &Location,
        package: &str,
        relative_name: &str,
    ) -> Result<Option<FileHandle>> {
        if !self.is_writable() {
            return Ok(None);
        }
        let rel = paths::resource_to_path(Path::new(""), package, relative_name)?;
        Ok(Some(FileHandle::new(location.clone(), self.identity(), rel)))
    }

    pub fn get_java_file_for_input(
        &self,
        location: &Location,
        binary_name: &str,
        kind: Kind,
    ) -> Result<Option<FileHandle>> {
        let rel = paths::binary_to_path(Path::new(""), binary_name, kind);
        if self.contains(&rel, kind == Kind::Class) {
            Ok(Some(FileHandle::new(location.clone(), self.identity(), rel)))
        } else {
            Ok(None)
        }
    }

    pub fn get_java_file_for_output(
        &self,
        location: &Location,
        binary_name: &str,
        kind: Kind,
    ) -> Result<Option<FileHandle>> {
        if !self.is_writable() {
            return Ok(None);
        }
        let rel = paths::binary_to_path(Path::new(""), binary_name, kind);
        Ok(Some(FileHandle::new(location.clone(), self.identity(), rel)))
    }

    /// Strip this handle's relative path down to a binary name, returning
    /// `None` only if the handle did not come from this container.
    pub fn infer_binary_name(&self, handle: &FileHandle) -> Option<String> {
        if handle.container_id() != self.identity() {
            return None;
        }
        let rel = handle.relative_path().to_string_lossy();
        let rel = rel
            .strip_prefix("META-INF/versions/")
            .and_then(|s| s.split_once('/').map(|(_, rest)| rest))
            .unwrap_or(&rel);
        let without_ext = rel
            .strip_suffix(handle.kind().extension())
            .unwrap_or(rel);
        Some(without_ext.replace('/', ".").replace(std::path::MAIN_SEPARATOR, "."))
    }

    /// List every file in `package` whose kind is in `kinds`, as handles.
    pub fn list_files_by_kind(
        &self,
        location: &Location,
        package: &str,
        kinds: &[Kind],
        recurse: bool,
    ) -> Result<Vec<FileHandle>> {
        let package_dir = PathBuf::from(package.replace('.', "/"));
        let mut out = Vec::new();
        for kind in kinds {
            let ext = kind.extension().trim_start_matches('.');
            for rel in self.list(&package_dir, ext, recurse)? {
                out.push(FileHandle::new(location.clone(), self.identity(), rel));
            }
        }
        Ok(out)
    }
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Container({})", self.identity())
    }
}
