//! A lazy, composite class loader over a snapshot of a package container
//! group's containers, resolving classes in container order (first hit
//! wins), mirroring `URLClassLoader`'s delegation model without any actual
//! class-loading machinery (this crate never loads bytecode into a VM).

use std::path::Path;
use std::sync::Arc;

use crate::container::Container;
use crate::error::Result;
use crate::kind::Kind;
use crate::paths;

/// An immutable snapshot of a package container group's containers, used to
/// resolve class bytes by binary name in declaration order.
pub struct ClassLoader {
    containers: Vec<Arc<Container>>,
}

impl ClassLoader {
    pub(crate) fn new(containers: Vec<Arc<Container>>) -> Self {
        Self { containers }
    }

    /// Resolve `binary_name`'s class bytes, trying each container in order
    /// and returning the first hit.
    pub fn find_class(&self, binary_name: &str) -> Result<Option<Vec<u8>>> {
        let rel = paths::binary_to_path(Path::new(""), binary_name, Kind::Class);
        for container in &self.containers {
            if let Some(bytes) = container.read(&rel, true)? {
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }

    /// Resolve a resource by its root-relative path, first hit wins.
    pub fn find_resource(&self, relative_path: &Path) -> Result<Option<Vec<u8>>> {
        for container in &self.containers {
            if let Some(bytes) = container.read(relative_path, false)? {
                return Ok(Some(bytes));
            }
        }
        Ok(None)
    }

    pub fn container_count(&self) -> usize {
        self.containers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path_root::PathRoot;
    use nova_core::AbsPathBuf;

    #[test]
    fn first_container_wins_on_conflict() {
        let dir_a = tempfile::tempdir().unwrap();
        let dir_b = tempfile::tempdir().unwrap();
        std::fs::write(dir_a.path().join("Foo.class"), b"from-a").unwrap();
        std::fs::write(dir_b.path().join("Foo.class"), b"from-b").unwrap();

        let root_a = PathRoot::disk(AbsPathBuf::canonicalize(dir_a.path()).unwrap());
        let root_b = PathRoot::disk(AbsPathBuf::canonicalize(dir_b.path()).unwrap());
        let container_a = Arc::new(Container::from_root(&root_a, None).unwrap());
        let container_b = Arc::new(Container::from_root(&root_b, None).unwrap());

        let loader = ClassLoader::new(vec![container_a, container_b]);
        assert_eq!(loader.find_class("Foo").unwrap(), Some(b"from-a".to_vec()));
    }
}
