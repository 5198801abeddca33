use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::class_loader::ClassLoader;
use crate::container::Container;
use crate::error::{aggregate_close_errors, FileManagerError, Result};
use crate::handle::FileHandle;
use crate::kind::Kind;
use crate::location::Location;
use crate::path_root::PathRoot;

/// An ordered list of containers bound to one package-oriented location
/// (C4): classpath-style first-match lookup, plus a lazily-built composite
/// class loader over the current container order.
pub struct PackageContainerGroup {
    location: Location,
    release: Option<u16>,
    containers: Vec<Arc<Container>>,
    class_loader: Mutex<Option<Arc<ClassLoader>>>,
    dirty: AtomicBool,
}

impl PackageContainerGroup {
    pub fn new(location: Location, release: Option<u16>) -> Result<Self> {
        if !location.is_package_oriented_input() && !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(&location, "package-oriented"));
        }
        Ok(Self {
            location,
            release,
            containers: Vec::new(),
            class_loader: Mutex::new(None),
            dirty: AtomicBool::new(true),
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn containers(&self) -> &[Arc<Container>] {
        &self.containers
    }

    /// Appends an already-constructed container, owned for close-on-close.
    pub fn add_package_container(&mut self, container: Container) {
        self.containers.push(Arc::new(container));
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Appends an already-shared container, e.g. one copied over from
    /// another group by [`crate::repository::Repository::copy_containers`].
    pub fn add_shared_container(&mut self, container: Arc<Container>) {
        self.containers.push(container);
        self.dirty.store(true, Ordering::SeqCst);
    }

    /// Wraps a path root in the right container variant (archive if its
    /// extension is one of `.zip`/`.jar`/`.war`, directory otherwise) and
    /// appends it. The root itself is not owned by this group.
    pub fn add_package(&mut self, root: &PathRoot) -> Result<()> {
        let container = Container::from_root(root, self.release)?;
        self.add_package_container(container);
        Ok(())
    }

    pub fn get_file_for_input(&self, package: &str, relative_name: &str) -> Result<Option<FileHandle>> {
        for container in &self.containers {
            if let Some(handle) = container.get_file_for_input(&self.location, package, relative_name)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    /// Returns the first writable container's output handle.
    pub fn get_file_for_output(&self, package: &str, relative_name: &str) -> Result<Option<FileHandle>> {
        for container in &self.containers {
            if let Some(handle) = container.get_file_for_output(&self.location, package, relative_name)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn get_java_file_for_input(&self, binary_name: &str, kind: Kind) -> Result<Option<FileHandle>> {
        for container in &self.containers {
            if let Some(handle) = container.get_java_file_for_input(&self.location, binary_name, kind)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileHandle>> {
        for container in &self.containers {
            if let Some(handle) = container.get_java_file_for_output(&self.location, binary_name, kind)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn infer_binary_name(&self, handle: &FileHandle) -> Option<String> {
        self.containers
            .iter()
            .find_map(|c| c.infer_binary_name(handle))
    }

    pub fn contains(&self, handle: &FileHandle) -> bool {
        self.containers.iter().any(|c| {
            c.identity() == handle.container_id()
                && c.contains(handle.relative_path(), handle.kind() == Kind::Class)
        })
    }

    /// Concatenation of every container's listing for `package`; no
    /// deduplication across containers (shadowing is visible to callers).
    pub fn list_files_by_kind(&self, package: &str, kinds: &[Kind], recurse: bool) -> Result<Vec<FileHandle>> {
        let mut out = Vec::new();
        for container in &self.containers {
            out.extend(container.list_files_by_kind(&self.location, package, kinds, recurse)?);
        }
        Ok(out)
    }

    /// Lazily builds (or rebuilds, if the container list changed since the
    /// last build) a composite class loader over the current containers.
    pub fn class_loader(&self) -> Arc<ClassLoader> {
        let mut guard = self.class_loader.lock().unwrap();
        if self.dirty.swap(false, Ordering::SeqCst) || guard.is_none() {
            let loader = Arc::new(ClassLoader::new(self.containers.clone()));
            *guard = Some(loader.clone());
            loader
        } else {
            guard.as_ref().unwrap().clone()
        }
    }

    /// Services cannot be loaded from a single module in isolation.
    pub fn get_service_loader(&self) -> Result<Arc<ClassLoader>> {
        if self.location.as_module().is_some() {
            return Err(FileManagerError::illegal_argument(
                "cannot load services from a single module location in isolation",
            ));
        }
        Ok(self.class_loader())
    }

    /// Closes every owned container best-effort, collecting every failure
    /// and raising once at the end with all causes attached.
    pub fn close(&mut self) -> Result<()> {
        let results: Vec<Result<()>> = self
            .containers
            .drain(..)
            .map(|container| {
                if Arc::strong_count(&container) > 1 {
                    tracing::warn!(
                        location = %self.location,
                        "container still referenced by a live class loader at close time"
                    );
                }
                container.close()
            })
            .collect();
        aggregate_close_errors(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nova_core::AbsPathBuf;

    #[test]
    fn rejects_non_package_oriented_location() {
        let group = PackageContainerGroup::new(Location::module_source_path(), None);
        assert!(group.is_err());
    }

    #[test]
    fn first_match_wins_across_containers() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir_a.path().join("com/example")).unwrap();
        std::fs::create_dir_all(dir_b.path().join("com/example")).unwrap();
        std::fs::write(dir_a.path().join("com/example/Foo.class"), b"a").unwrap();
        std::fs::write(dir_b.path().join("com/example/Foo.class"), b"b").unwrap();

        let mut group = PackageContainerGroup::new(Location::class_path(), None).unwrap();
        group
            .add_package(&PathRoot::disk(AbsPathBuf::canonicalize(dir_a.path()).unwrap()))
            .unwrap();
        group
            .add_package(&PathRoot::disk(AbsPathBuf::canonicalize(dir_b.path()).unwrap()))
            .unwrap();

        let handle = group
            .get_java_file_for_input("com.example.Foo", Kind::Class)
            .unwrap()
            .unwrap();
        assert!(handle.container_id().contains(dir_a.path().to_str().unwrap()));
    }

    #[test]
    fn class_loader_rebuilds_after_mutation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Foo.class"), b"v1").unwrap();

        let mut group = PackageContainerGroup::new(Location::class_path(), None).unwrap();
        group
            .add_package(&PathRoot::disk(AbsPathBuf::canonicalize(dir.path()).unwrap()))
            .unwrap();
        let loader = group.class_loader();
        assert_eq!(loader.container_count(), 1);

        let dir2 = tempfile::tempdir().unwrap();
        group
            .add_package(&PathRoot::disk(AbsPathBuf::canonicalize(dir2.path()).unwrap()))
            .unwrap();
        let loader2 = group.class_loader();
        assert_eq!(loader2.container_count(), 2);
    }
}
