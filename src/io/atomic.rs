//! Atomic file writes with automatic parent creation.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Writes through a temp file in the destination directory, then renames it
/// over `dest`, so readers never see a half-written report.
pub fn atomic_write(dest: impl AsRef<Path>, bytes: impl AsRef<[u8]>) -> io::Result<()> {
    let dest = dest.as_ref();
    let parent = match dest.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes.as_ref())?;
    tmp.flush()?;
    tmp.persist(dest).map_err(|e| e.error)?;
    Ok(())
}
