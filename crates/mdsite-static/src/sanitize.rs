//! Output folder name sanitizing.

use std::path::MAIN_SEPARATOR_STR;

/// Strip one leading `.` from every segment of a relative directory.
///
/// Hidden source directories such as `.github` become plain `github` folders
/// in the output tree. A segment that is exactly `.` is kept as is. Nothing
/// else is normalized: `..` is not resolved, so inputs must already be
/// confined to the source tree.
pub fn sanitize(relative_dir: &str) -> String {
    relative_dir
        .split(MAIN_SEPARATOR_STR)
        .map(|segment| {
            if segment == "." {
                segment
            } else {
                segment.strip_prefix('.').unwrap_or(segment)
            }
        })
        .collect::<Vec<_>>()
        .join(MAIN_SEPARATOR_STR)
}
