// repairlog - platform/fs.rs
//
// Thin filesystem helpers used by the app layer.

use crate::util::constants;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// True when `path` selects stdout rather than a file.
pub fn is_stdout(path: &Path) -> bool {
    path.as_os_str() == constants::STDOUT_PATH
}

/// Open a file for buffered reading.
pub fn open_buffered(path: &Path) -> io::Result<BufReader<std::fs::File>> {
    Ok(BufReader::new(std::fs::File::open(path)?))
}

/// Create (or truncate) an output sink.
///
/// `-` writes to stdout. Otherwise missing parent directories are created
/// first.
pub fn create_output(path: &Path) -> io::Result<Box<dyn Write>> {
    if is_stdout(path) {
        return Ok(Box::new(BufWriter::new(io::stdout().lock())));
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::debug!(dir = %parent.display(), "Created output directory");
        }
    }

    Ok(Box::new(BufWriter::new(std::fs::File::create(path)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_is_stdout() {
        assert!(is_stdout(&PathBuf::from("-")));
        assert!(!is_stdout(&PathBuf::from("-.json")));
    }

    #[test]
    fn test_create_output_makes_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("out.json");
        {
            let mut out = create_output(&path).unwrap();
            out.write_all(b"[]").unwrap();
            out.flush().unwrap();
        }
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
