//! Path-safety checks for manifest entries.
//!
//! Lexical first: a declared path is unsafe when it is absolute, carries a root or
//! prefix, or has a `..` component. Only paths that pass are resolved on disk, and
//! only to catch symlinks inside the outputs tree pointing out of it.

use std::path::{Component, Path, PathBuf};

/// Whether `file` stays below whatever directory it is joined to, judged on the string alone.
pub fn is_lexically_safe(file: &str) -> bool {
    if file.is_empty() || file.starts_with('/') || file.starts_with('\\') {
        return false;
    }
    // `\` is not a separator on unix, so `..\x` would otherwise be one normal component.
    if file.split(['/', '\\']).any(|segment| segment == "..") {
        return false;
    }
    Path::new(file).components().all(|component| {
        matches!(component, Component::Normal(_) | Component::CurDir)
    })
}

/// Join and normalize without touching the filesystem. `..` pops a component.
pub fn normalize_lexically(base: &Path, file: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.join(file).components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `file` under `root` resolves inside `root` once symlinks are followed.
///
/// Resolves the deepest existing ancestor of the joined path. When `root` does not
/// exist there is nothing on disk to follow and the path is accepted.
pub fn resolves_within(root: &Path, file: &str) -> bool {
    let Ok(canonical_root) = root.canonicalize() else {
        return true;
    };

    let joined = normalize_lexically(root, file);
    if !joined.starts_with(normalize_lexically(root, "")) {
        return false;
    }

    let mut probe = joined.as_path();
    loop {
        if probe.exists() || probe.symlink_metadata().is_ok() {
            return match probe.canonicalize() {
                Ok(resolved) => resolved.starts_with(&canonical_root),
                // Dangling link: cannot be followed, so it cannot be proven inside.
                Err(_) => false,
            };
        }
        match probe.parent() {
            Some(parent) => probe = parent,
            None => return true,
        }
    }
}
