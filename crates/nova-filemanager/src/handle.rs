use std::path::{Path, PathBuf};

use crate::kind::Kind;
use crate::location::Location;

/// A single file known to the file manager: where it lives logically
/// (`location`), where it lives inside its container (`relative_path`), and
/// how to address it as bytes (`container_id`, opaque to callers).
///
/// This is the virtual-filesystem analogue of a `JavaFileObject`: enough
/// information to derive a binary name, a display URI and a [`Kind`] without
/// re-reading the backing store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FileHandle {
    location: Location,
    container_id: String,
    relative_path: PathBuf,
    kind: Kind,
}

impl FileHandle {
    pub fn new(location: Location, container_id: impl Into<String>, relative_path: PathBuf) -> Self {
        let kind = relative_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(Kind::from_filename)
            .unwrap_or(Kind::Other);
        Self {
            location,
            container_id: container_id.into(),
            relative_path,
            kind,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn file_name(&self) -> &str {
        self.relative_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("")
    }

    /// The fully-qualified binary name (`java.lang.String` / `pkg.Outer$Inner`)
    /// implied by this handle's relative path, with its kind's extension
    /// stripped and path separators replaced by `.`.
    pub fn binary_name(&self) -> String {
        let without_ext = self
            .relative_path
            .to_string_lossy()
            .strip_suffix(self.kind.extension())
            .map(str::to_owned)
            .unwrap_or_else(|| self.relative_path.to_string_lossy().into_owned());
        without_ext.replace(std::path::MAIN_SEPARATOR, ".").replace('/', ".")
    }

    /// A human-readable URI-ish identifier for diagnostics: not a real URI
    /// (archive-backed handles have no `jar:`/`!` scheme here), just a stable
    /// display string combining the container identity and relative path.
    pub fn display_uri(&self) -> String {
        format!("{}!{}", self.container_id, self.relative_path.display())
    }
}

impl std::fmt::Display for FileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_uri())
    }
}
