use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Writes an endpoint file named `endpoint.txt` inside `dir`.
pub fn write_endpoint_file(dir: &Path, host: &str, port: u16) -> io::Result<PathBuf> {
    let path = dir.join("endpoint.txt");
    fs::write(&path, format!("{host}\n{port}\n"))?;
    Ok(path)
}

/// Creates a temporary file with arbitrary endpoint file `contents`.
///
/// The file is removed when the handle drops.
pub fn endpoint_file(contents: &str) -> io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(contents.as_bytes())?;
    file.flush()?;
    Ok(file)
}
