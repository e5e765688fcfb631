#![forbid(unsafe_code)]

use std::fs;
use std::path::PathBuf;

use glob::{glob, Pattern};
use log::error;

use crate::utils::errors::FileOpError;

// ---------------------------------------------------------------------------
// list_files:
// ---------------------------------------------------------------------------
/** Return the base names of the regular files that are immediate children of
 * the directory.  Subdirectories are excluded and nothing is recursed into.
 * Symbolic links to regular files count as files.
 */
pub fn list_files(dir: &str) -> Result<Vec<String>, FileOpError> {
    let paths = get_files_in_dir(dir)?;
    Ok(paths.iter()
        .filter_map(|p| p.file_name())
        .map(|f| f.to_string_lossy().into_owned())
        .collect())
}

// ---------------------------------------------------------------------------
// get_files_in_dir:
// ---------------------------------------------------------------------------
/** Return a list of PathBufs representing the immediate file children of the
 * directory.  The directory must exist; glob alone would silently report an
 * empty listing for a missing directory.
 */
pub fn get_files_in_dir(dir: &str) -> Result<Vec<PathBuf>, FileOpError> {
    // Distinguish a missing directory from a path that isn't one.
    let meta = fs::metadata(dir).map_err(|e| FileOpError::from_io(dir, e))?;
    if !meta.is_dir() {
        return Err(FileOpError::NotADirectory(dir.to_string()));
    }

    // Globify the directory string, escaping any metacharacters in it.
    let escaped = Pattern::escape(dir);
    let pattern = if escaped.ends_with('/') {escaped + "*"} else {escaped + "/*"};
    let entries = glob(&pattern).map_err(|e| {
        FileOpError::Io(dir.to_string(), std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
    })?;

    // Collect all the immediate files in the directory.
    let mut v = vec!();
    for entry in entries {
        match entry {
            Ok(f) => {
                if f.is_file() {v.push(f);}
            },
            Err(e) => {
                let msg = format!("Unable to access a directory entry in {}: {:?}.", &pattern, e);
                error!("{}", msg);
                return Err(FileOpError::Io(dir.to_string(), e.into()));
            },
        }
    }

    Ok(v)
}
