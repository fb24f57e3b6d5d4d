//! Desktop entry lookup along the XDG data directories

use std::env;
use std::path::{Path, PathBuf};

const FALLBACK_DATA_DIRS: [&str; 2] = ["/usr/local/share/", "/usr/share/"];

/// Directories searched for `applications/<entry>.desktop`, in order
///
/// Entries of `xdg_data_dirs` come first, followed by the two system
/// fallbacks. Empty entries are skipped.
pub fn data_dirs(xdg_data_dirs: Option<&str>) -> Vec<PathBuf> {
    xdg_data_dirs
        .unwrap_or_default()
        .split(':')
        .filter(|dir| !dir.is_empty())
        .chain(FALLBACK_DATA_DIRS)
        .map(PathBuf::from)
        .collect()
}

/// First existing `<dir>/applications/<entry>.desktop` among `dirs`
pub fn find_desktop_entry<P: AsRef<Path>>(entry: &str, dirs: &[P]) -> Option<PathBuf> {
    dirs.iter()
        .map(|dir| dir.as_ref().join("applications").join(format!("{}.desktop", entry)))
        .find(|path| path.is_file())
}

/// Look `entry` up using the process's `XDG_DATA_DIRS`
pub fn locate_desktop_entry(entry: &str) -> Option<PathBuf> {
    let xdg = env::var("XDG_DATA_DIRS").ok();
    find_desktop_entry(entry, &data_dirs(xdg.as_deref()))
}
