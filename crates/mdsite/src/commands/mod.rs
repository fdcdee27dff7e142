pub mod build;
pub mod init;

use std::path::PathBuf;

/// Resolve the workspace root from `--root` or the current directory.
///
/// Returns `None` when neither is usable; the build reports that as a
/// missing output root.
pub fn workspace_root(explicit: Option<PathBuf>) -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok();
    let root = match (explicit, cwd) {
        (Some(path), _) if path.is_absolute() => path,
        (Some(path), Some(cwd)) => cwd.join(path),
        (None, Some(cwd)) => cwd,
        _ => return None,
    };
    Some(root.canonicalize().unwrap_or(root))
}
