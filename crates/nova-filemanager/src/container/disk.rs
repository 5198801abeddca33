use std::path::{Path, PathBuf};

use nova_core::AbsPathBuf;

use crate::error::Result;

/// A single classpath/source-path entry backed by a real directory on disk.
///
/// Resolves multi-release overlays the same way [`super::archive::ArchiveContainer`]
/// does for jars: an exploded multi-release directory (one containing
/// `META-INF/versions/`) prefers the highest versioned copy of a file at or
/// below `target_release`, falling back to the unversioned copy.
#[derive(Clone, Debug)]
pub struct DiskContainer {
    root: AbsPathBuf,
    target_release: Option<u16>,
}

impl DiskContainer {
    pub fn new(root: AbsPathBuf, target_release: Option<u16>) -> Self {
        Self { root, target_release }
    }

    pub fn root(&self) -> &AbsPathBuf {
        &self.root
    }

    fn is_multi_release(&self) -> bool {
        self.root.as_path().join("META-INF/versions").is_dir()
    }

    /// The real on-disk path backing `relative_path`, preferring the best
    /// applicable multi-release overlay. The overlay is only consulted for
    /// class-kind lookups: resources other than `.class` files always read
    /// from the default root.
    fn resolve(&self, relative_path: &Path, is_class: bool) -> Option<PathBuf> {
        if is_class && self.is_multi_release() {
            let mut versions: Vec<u16> = Vec::new();
            if let Ok(entries) = std::fs::read_dir(self.root.as_path().join("META-INF/versions")) {
                for entry in entries.flatten() {
                    if let Some(v) = entry.file_name().to_str().and_then(|s| s.parse::<u16>().ok()) {
                        versions.push(v);
                    }
                }
            }
            versions.sort_unstable_by(|a, b| b.cmp(a));
            for version in versions {
                if version < 9 {
                    continue;
                }
                if let Some(target) = self.target_release {
                    if version > target {
                        continue;
                    }
                }
                let candidate = self
                    .root
                    .as_path()
                    .join("META-INF/versions")
                    .join(version.to_string())
                    .join(relative_path);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }

        let base = self.root.as_path().join(relative_path);
        base.is_file().then_some(base)
    }

    pub fn read(&self, relative_path: &Path, is_class: bool) -> Result<Option<Vec<u8>>> {
        match self.resolve(relative_path, is_class) {
            Some(path) => Ok(Some(std::fs::read(path)?)),
            None => Ok(None),
        }
    }

    pub fn contains(&self, relative_path: &Path, is_class: bool) -> bool {
        self.resolve(relative_path, is_class).is_some()
    }

    /// A directory container opens no resource of its own at construction
    /// time, so there is nothing for it to close.
    pub fn close(&self) -> Result<()> {
        Ok(())
    }

    pub fn write(&self, relative_path: &Path, bytes: &[u8]) -> Result<()> {
        let dest = self.root.as_path().join(relative_path);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(dest, bytes)?;
        Ok(())
    }

    /// Lists every file under the root with the given extension, relative to
    /// the root, in deterministic (sorted) order. This is a raw per-entry
    /// listing: an exploded multi-release directory's overlay files are
    /// reported under their own `META-INF/versions/<n>/...` paths, since a
    /// class that exists only in an overlay must still be discoverable.
    pub fn list(&self, relative_dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        let start = self.root.as_path().join(relative_dir);
        if !start.is_dir() {
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        let walker = walkdir::WalkDir::new(&start)
            .min_depth(1)
            .max_depth(if recursive { usize::MAX } else { 1 })
            .follow_links(false);

        for entry in walker.into_iter().filter_map(std::result::Result::ok) {
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.file_name().and_then(|n| n.to_str()) == Some("MANIFEST.MF")
                && path.parent().and_then(|p| p.file_name()).and_then(|n| n.to_str()) == Some("META-INF")
            {
                continue;
            }
            if extension.is_empty() || path.extension().and_then(|e| e.to_str()) == Some(extension) {
                if let Ok(rel) = path.strip_prefix(self.root.as_path()) {
                    out.push(rel.to_path_buf());
                }
            }
        }
        out.sort();
        Ok(out)
    }
}
