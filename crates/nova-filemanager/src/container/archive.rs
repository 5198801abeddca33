use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use nova_core::AbsPathBuf;

use crate::error::Result;

/// A single classpath/module-path entry backed by a jar/jmod archive.
///
/// Multi-release jars overlay version-specific entries under
/// `META-INF/versions/<n>/...`; `read` resolves the highest applicable
/// overlay at or below `target_release`, falling back to the base entry.
/// The archive is opened once and its index cached behind a [`Mutex`] since
/// `zip::ZipArchive` requires `&mut` to read entries.
pub struct ArchiveContainer {
    path: AbsPathBuf,
    target_release: Option<u16>,
    archive: Mutex<zip::ZipArchive<std::fs::File>>,
    is_multi_release: bool,
}

impl ArchiveContainer {
    pub fn open(path: AbsPathBuf, target_release: Option<u16>) -> Result<Self> {
        let file = std::fs::File::open(path.as_path())?;
        let mut archive = zip::ZipArchive::new(file)?;
        let is_multi_release = jar_is_multi_release(&mut archive);
        Ok(Self {
            path,
            target_release,
            archive: Mutex::new(archive),
            is_multi_release,
        })
    }

    pub fn path(&self) -> &AbsPathBuf {
        &self.path
    }

    /// The entry name inside the archive that currently backs `relative_path`,
    /// preferring the highest-versioned multi-release overlay that does not
    /// exceed `target_release`.
    ///
    /// The overlay is only consulted for class-kind lookups: per the
    /// multi-release jar spec, resources other than `.class` files are always
    /// read from the default root, never from a versioned overlay.
    fn resolve_entry_name(
        &self,
        relative_path: &Path,
        archive: &mut zip::ZipArchive<std::fs::File>,
        is_class: bool,
    ) -> Option<String> {
        let suffix = relative_path.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");

        if is_class && self.is_multi_release {
            let mut versions: Vec<u16> = Vec::new();
            for i in 0..archive.len() {
                let Ok(entry) = archive.by_index(i) else { continue };
                let name = entry.name();
                if let Some(rest) = name.strip_prefix("META-INF/versions/") {
                    if let Some((version_str, _)) = rest.split_once('/') {
                        if let Ok(v) = version_str.parse::<u16>() {
                            versions.push(v);
                        }
                    }
                }
            }
            versions.sort_unstable();
            versions.dedup();
            versions.reverse();

            for version in versions {
                if version < 9 {
                    continue;
                }
                if let Some(target) = self.target_release {
                    if version > target {
                        continue;
                    }
                }
                let candidate = format!("META-INF/versions/{version}/{suffix}");
                if archive.by_name(&candidate).is_ok() {
                    return Some(candidate);
                }
            }
        }

        archive.by_name(&suffix).ok().map(|_| suffix)
    }

    pub fn read(&self, relative_path: &Path, is_class: bool) -> Result<Option<Vec<u8>>> {
        let mut archive = self.archive.lock().unwrap();
        let Some(entry_name) = self.resolve_entry_name(relative_path, &mut archive, is_class) else {
            return Ok(None);
        };
        let mut entry = archive.by_name(&entry_name)?;
        let mut bytes = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut bytes)?;
        Ok(Some(bytes))
    }

    pub fn contains(&self, relative_path: &Path, is_class: bool) -> bool {
        let mut archive = self.archive.lock().unwrap();
        self.resolve_entry_name(relative_path, &mut archive, is_class).is_some()
    }

    /// Closes the file handle this container opened implicitly when it was
    /// constructed, verifying the backing jar is still present. A jar backing
    /// a container commonly lives under a build output directory that can be
    /// cleaned out from under a long-lived file manager; if that happened
    /// between open and close, this surfaces as part of the aggregated close
    /// failure instead of silently succeeding.
    pub fn close(&self) -> Result<()> {
        std::fs::metadata(self.path.as_path())?;
        Ok(())
    }

    /// Lists archive entries under `relative_dir` with the given extension.
    /// This is a raw per-entry listing: a multi-release jar's overlay entries
    /// are reported under their own `META-INF/versions/<n>/...` names rather
    /// than being merged into one logical view, since a class that exists
    /// only in an overlay (no base-root counterpart) must still be
    /// discoverable. Only the manifest itself is excluded.
    pub fn list(&self, relative_dir: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
        let prefix = relative_dir.to_string_lossy().replace(std::path::MAIN_SEPARATOR, "/");
        let mut archive = self.archive.lock().unwrap();
        let mut out = Vec::new();

        for i in 0..archive.len() {
            let entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let name = entry.name();
            if name == "META-INF/MANIFEST.MF" {
                continue;
            }
            if !prefix.is_empty() && !name.starts_with(&prefix) {
                continue;
            }
            let rel = name.strip_prefix(&prefix).unwrap_or(name).trim_start_matches('/');
            if !recursive && rel.contains('/') {
                continue;
            }
            if !extension.is_empty() && !name.ends_with(&format!(".{extension}")) {
                continue;
            }
            out.push(PathBuf::from(name));
        }
        out.sort();
        out.dedup();
        Ok(out)
    }
}

fn jar_is_multi_release<R: std::io::Read + std::io::Seek>(archive: &mut zip::ZipArchive<R>) -> bool {
    let Ok(mut manifest) = archive.by_name("META-INF/MANIFEST.MF") else {
        return false;
    };
    let mut bytes = Vec::with_capacity(manifest.size() as usize);
    if manifest.read_to_end(&mut bytes).is_err() {
        return false;
    }
    let text = String::from_utf8_lossy(&bytes);
    crate::module_name::manifest_main_attribute(&text, "Multi-Release")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
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
    fn reads_base_entry_when_not_multi_release() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar, &[("Foo.class", b"base")]);

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        assert_eq!(
            container.read(Path::new("Foo.class"), true).unwrap(),
            Some(b"base".to_vec())
        );
    }

    #[test]
    fn multi_release_overlay_preferred_when_no_target() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        let manifest = b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n\r\n";
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", manifest),
                ("Foo.class", b"base"),
                ("META-INF/versions/11/Foo.class", b"v11"),
            ],
        );

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        assert_eq!(
            container.read(Path::new("Foo.class"), true).unwrap(),
            Some(b"v11".to_vec())
        );
    }

    #[test]
    fn non_class_lookup_never_consults_the_overlay() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        let manifest = b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n\r\n";
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", manifest),
                ("Foo.txt", b"base"),
                ("META-INF/versions/11/Foo.txt", b"v11"),
            ],
        );

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        assert_eq!(
            container.read(Path::new("Foo.txt"), false).unwrap(),
            Some(b"base".to_vec())
        );
    }

    #[test]
    fn multi_release_overlay_capped_by_target_release() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        let manifest = b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n\r\n";
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", manifest),
                ("Foo.class", b"base"),
                ("META-INF/versions/17/Foo.class", b"v17"),
            ],
        );

        let container =
            ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), Some(11)).unwrap();
        assert_eq!(
            container.read(Path::new("Foo.class"), true).unwrap(),
            Some(b"base".to_vec())
        );
    }

    #[test]
    fn missing_entry_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar, &[("Foo.class", b"base")]);

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        assert_eq!(container.read(Path::new("Bar.class"), true).unwrap(), None);
    }

    #[test]
    fn listing_surfaces_overlay_only_entries_and_skips_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        let manifest = b"Manifest-Version: 1.0\r\nMulti-Release: true\r\n\r\n";
        write_jar(
            &jar,
            &[
                ("META-INF/MANIFEST.MF", manifest),
                ("Foo.class", b"base"),
                ("META-INF/versions/11/Bar.class", b"v11-only"),
            ],
        );

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        let listed = container.list(Path::new(""), "class", true).unwrap();
        assert_eq!(
            listed,
            vec![
                PathBuf::from("Foo.class"),
                PathBuf::from("META-INF/versions/11/Bar.class"),
            ]
        );
    }

    #[test]
    fn close_succeeds_while_the_backing_jar_still_exists() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar, &[("Foo.class", b"base")]);

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        assert!(container.close().is_ok());
    }

    #[test]
    fn close_fails_if_the_backing_jar_was_removed() {
        let dir = tempfile::tempdir().unwrap();
        let jar = dir.path().join("lib.jar");
        write_jar(&jar, &[("Foo.class", b"base")]);

        let container = ArchiveContainer::open(AbsPathBuf::canonicalize(&jar).unwrap(), None).unwrap();
        std::fs::remove_file(&jar).unwrap();
        assert!(container.close().is_err());
    }
}
