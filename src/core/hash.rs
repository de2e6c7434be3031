//! Deterministic content hashing of directory trees using SHA-256.
//!
//! The hash covers the set of relative paths and file contents under a root,
//! with `.git` directories excluded, so it is stable across filesystem
//! iteration orders, timestamps, and runs on identical content.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::core::error::Result;
use crate::core::fsutil::GIT_DIR;

/// Compute the SHA-256 hash of a directory tree, returned as lowercase hex.
///
/// Entries are enumerated recursively (skipping `.git` at any depth, symlinks
/// and non-regular files), recorded by their relative path, sorted byte-wise,
/// and fed into the hasher as `path, NUL, [contents]` per entry. Directories
/// contribute their path only, so an empty directory still changes the hash.
pub fn hash_tree(root: &Path) -> Result<String> {
    let mut entries = Vec::new();
    collect(root, String::new(), &mut entries)?;
    entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

    let mut hasher = Sha256::new();
    for (rel, is_dir) in &entries {
        hasher.update(rel.as_bytes());
        hasher.update([0u8]);
        if !is_dir {
            let mut file = File::open(root.join(rel))?;
            io::copy(&mut file, &mut hasher)?;
        }
    }

    Ok(hex_encode(&hasher.finalize()))
}

/// Collect `(relative_path, is_dir)` pairs under `dir`, `prefix` being the
/// relative path accumulated so far (`/`-separated).
fn collect(dir: &Path, prefix: String, out: &mut Vec<(String, bool)>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if name == GIT_DIR {
            continue;
        }

        let file_type = entry.file_type()?;
        if file_type.is_symlink() {
            continue;
        }

        let rel = if prefix.is_empty() {
            name.to_string_lossy().into_owned()
        } else {
            format!("{}/{}", prefix, name.to_string_lossy())
        };

        if file_type.is_dir() {
            out.push((rel.clone(), true));
            collect(&entry.path(), rel, out)?;
        } else if file_type.is_file() {
            out.push((rel, false));
        }
        // Device files and other special entries are skipped.
    }
    Ok(())
}

/// Encode raw bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}
