//! ZIP extraction with a path-traversal guard.

use rapiddns_core::{RapidDnsError, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::ZipArchive;

/// Extract every entry of `archive` into `dest_dir`.
///
/// All entry names are checked before anything is written: a single entry
/// that would land outside `dest_dir` aborts the extraction with
/// [`RapidDnsError::PathTraversal`] and leaves the directory untouched.
/// Returns the written file paths in archive order.
pub fn extract_zip(archive: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let file = File::open(archive)?;
    let mut zip = ZipArchive::new(file).map_err(|e| RapidDnsError::Archive(e.to_string()))?;

    let mut targets = Vec::with_capacity(zip.len());
    for i in 0..zip.len() {
        let entry = zip
            .by_index(i)
            .map_err(|e| RapidDnsError::Archive(e.to_string()))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(RapidDnsError::PathTraversal {
                entry: entry.name().to_string(),
            });
        };
        targets.push((dest_dir.join(relative), entry.is_dir()));
    }

    let mut written = Vec::new();
    for (i, (target, is_dir)) in targets.into_iter().enumerate() {
        if is_dir {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut entry = zip
            .by_index(i)
            .map_err(|e| RapidDnsError::Archive(e.to_string()))?;
        let mut out = File::create(&target)?;
        let bytes = io::copy(&mut entry, &mut out)?;
        debug!(path = %target.display(), bytes, "extracted");
        written.push(target);
    }

    Ok(written)
}
