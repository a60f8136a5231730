use std::path::{Component, Path, PathBuf};

/// Resolve `segments` onto `root` the way a shell `cd` sequence would.
///
/// Each segment is joined in turn; an absolute segment discards everything
/// before it. The result is lexically normalized (`.` dropped, `..` pops a
/// component) without touching the filesystem, so symlinks are not followed.
///
/// Resolving an already-absolute path returns it (normalized) regardless of
/// `root`, and resolving the same relative input twice yields the same path.
pub fn resolve_from<I, S>(root: &Path, segments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<Path>,
{
    let mut joined = root.to_path_buf();
    for segment in segments {
        joined.push(segment.as_ref());
    }
    normalize(&joined)
}

/// Lexically normalize a path.
///
/// `..` above the root of an absolute path is dropped; on a relative path it
/// is kept so that `../x` stays meaningful.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Strip one trailing script extension (`.js`, `.ts`, `.jsx`, `.tsx`).
pub fn strip_script_extension(path: &str) -> &str {
    for ext in SCRIPT_EXTENSIONS {
        if let Some(stripped) = path.strip_suffix(ext) {
            return stripped;
        }
    }
    path
}

/// Extensions tried, in order, when resolving an extension-less entry file.
pub const SCRIPT_EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];
