use std::io::Read;
use std::path::Path;

fn is_binary_file(path: &Path) -> std::io::Result<bool> {
    let mut f = std::fs::File::open(path)?;
    let mut buf = [0u8; 1024];
    let read = f.read(&mut buf)?;
    Ok(buf[..read].contains(&0))
}

/// Read a file as text, returning `None` for binary or non-UTF-8 content.
pub fn read_text_file(path: &Path) -> std::io::Result<Option<String>> {
    if is_binary_file(path)? {
        return Ok(None);
    }

    match std::fs::read_to_string(path) {
        Ok(s) => Ok(Some(s)),
        Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Ok(None),
        Err(e) => Err(e),
    }
}

/// The string key under which a path is stored in the index.
///
/// Canonicalized when possible so the scanner and the watcher agree on one
/// key for the same file regardless of how they spelled the path.
pub fn path_key(path: &Path) -> String {
    if let Ok(p) = path.canonicalize() {
        return p.to_string_lossy().into_owned();
    }

    // A deleted file cannot be canonicalized; resolving the parent instead
    // keeps the purge key equal to the key used while the file still existed.
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(parent) = parent.canonicalize()
    {
        return parent.join(name).to_string_lossy().into_owned();
    }

    path.to_string_lossy().into_owned()
}
