//! Filesystem helpers: `.git`-excluded tree copies and crash-safe writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::core::error::Result;

/// Directory entries with this name are never copied or hashed.
pub const GIT_DIR: &str = ".git";

/// Recursively copy `src` into `dst`, skipping any entry named `.git` at any
/// depth and skipping symlinks. Existing files in `dst` are overwritten;
/// files present only in `dst` are left alone. Returns the number of regular
/// files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    fs::create_dir_all(dst)?;
    let mut copied = 0;

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == GIT_DIR {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            log::debug!("skipping symlink {}", entry.path().display());
            continue;
        }

        let target = dst.join(&name);
        if file_type.is_dir() {
            copied += copy_tree(&entry.path(), &target)?;
        } else if file_type.is_file() {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Write data to a file atomically using temp-file-then-rename.
///
/// On POSIX, `rename()` within the same filesystem is atomic: either the old
/// file or the new file is visible, never a partial write. The temp file is
/// synced before renaming so the data is durable on disk.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data)?;
    file.sync_data()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> std::path::PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Remove a directory tree if it exists; missing is not an error.
pub fn remove_tree_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}
