//! Additive image mirroring.

use super::collect_all_files;
use anyhow::{Context, Result};
use std::{fs, path::Path};

/// Copy every file under `src` into `dst`, keeping relative paths.
///
/// Files already present at the destination are never touched, even when
/// the source is newer. Returns the number of files copied.
pub fn mirror_images(src: &Path, dst: &Path) -> Result<usize> {
    if !src.is_dir() {
        return Ok(0);
    }

    let mut copied = 0;
    for path in collect_all_files(src) {
        let rel = path.strip_prefix(src)?;
        let dest = dst.join(rel);
        if dest.exists() {
            continue;
        }
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::copy(&path, &dest).with_context(|| {
            format!("Failed to copy {} to {}", path.display(), dest.display())
        })?;
        copied += 1;
    }

    Ok(copied)
}
