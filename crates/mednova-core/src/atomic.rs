use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Atomic write: write to temp file in same dir, then rename.
///
/// The target either keeps its previous bytes or holds the full new content.
/// A failure at any step leaves no partial file at `path`.
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
    tmp.write_all(data)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
