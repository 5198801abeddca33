//! Deterministic path-computation helpers shared by every container variant:
//! binary name <-> package/path conversions, with the fragment-joining rules
//! `javac`'s file manager uses.

use std::path::{Path, PathBuf};

use crate::error::{FileManagerError, Result};
use crate::kind::Kind;

/// The package portion of a binary name: everything before the last `.`, or
/// empty if there is none.
pub fn binary_to_package(binary_name: &str) -> &str {
    match binary_name.rfind('.') {
        Some(idx) => &binary_name[..idx],
        None => "",
    }
}

/// The simple-name portion of a binary name: everything after the last `.`,
/// or the whole name if there is none.
pub fn binary_to_simple(binary_name: &str) -> &str {
    match binary_name.rfind('.') {
        Some(idx) => &binary_name[idx + 1..],
        None => binary_name,
    }
}

/// Resolve `root/pkg/segments.../Simple<kind-extension>` for a binary name.
pub fn binary_to_path(root: &Path, binary_name: &str, kind: Kind) -> PathBuf {
    let package = binary_to_package(binary_name);
    let simple = binary_to_simple(binary_name);
    let mut path = package_to_path(root, package);
    path.push(format!("{simple}{}", kind.extension()));
    path
}

/// Resolve `root/segment/segment/...` for a `.`-separated package name.
pub fn package_to_path(root: &Path, package: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    if !package.is_empty() {
        for segment in package.split('.') {
            path.push(segment);
        }
    }
    path
}

/// Resolve a relative resource name against `root`, either root-relative
/// (when `relative` begins with `/`, ignoring `package`) or package-relative.
///
/// Rejects an absolute `relative` fragment that is not root-relative, and any
/// fragment containing a platform path separator embedded oddly would simply
/// be treated as a literal path segment by the caller's `Path::push` — this
/// function only distinguishes root-relative vs package-relative addressing.
pub fn resource_to_path(root: &Path, package: &str, relative: &str) -> Result<PathBuf> {
    if let Some(root_relative) = relative.strip_prefix('/') {
        return Ok(join_relative(root, root_relative));
    }
    if Path::new(relative).is_absolute() {
        return Err(FileManagerError::absolute_path_rejected(&PathBuf::from(relative)));
    }
    let mut path = package_to_path(root, package);
    path.push(relative);
    Ok(path)
}

fn join_relative(root: &Path, relative: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for segment in relative.split('/') {
        if !segment.is_empty() {
            path.push(segment);
        }
    }
    path
}

/// Reject a caller-supplied path fragment that is absolute; fragments passed
/// to the file manager must always be relative to some root.
pub fn reject_absolute(path: &Path) -> Result<()> {
    if path.is_absolute() {
        return Err(FileManagerError::absolute_path_rejected(&path.to_path_buf()));
    }
    Ok(())
}
