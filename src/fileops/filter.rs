#![forbid(unsafe_code)]

use std::fmt;
use std::fs;
use std::path::Path;

use log::warn;

/// Default boundary between small and large files, in bytes.
pub const DEFAULT_SIZE_THRESHOLD: u64 = 1024;

/// A size predicate used to filter a file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Strictly larger than the threshold.
    Large,
    /// Smaller than or equal to the threshold.
    Small,
    Unknown(String),
}

impl Condition {
    pub fn parse(s: &str) -> Self {
        match s {
            "large" => Condition::Large,
            "small" => Condition::Small,
            _ => Condition::Unknown(s.to_string()),
        }
    }

    /// Whether a file of `size` bytes is kept; unknown conditions keep everything.
    pub fn keeps(&self, size: u64, threshold: u64) -> bool {
        match self {
            Condition::Large => size > threshold,
            Condition::Small => size <= threshold,
            Condition::Unknown(_) => true,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Large => write!(f, "large"),
            Condition::Small => write!(f, "small"),
            Condition::Unknown(s) => write!(f, "{}", s),
        }
    }
}

// ---------------------------------------------------------------------------
// advanced_filter:
// ---------------------------------------------------------------------------
/** Filter file names taken from `dir` by the size condition.  Sizes are read
 * from `dir/name`.  A file whose metadata can't be read is dropped and
 * logged; an unknown condition returns the list unchanged.
 */
pub fn advanced_filter(dir: &str, files: Vec<String>, condition: &Condition, threshold: u64)
-> Vec<String> {
    if let Condition::Unknown(_) = condition {
        return files;
    }

    let base = Path::new(dir);
    files.into_iter()
        .filter(|name| match fs::metadata(base.join(name)) {
            Ok(meta) => condition.keeps(meta.len(), threshold),
            Err(e) => {
                warn!("Unable to read size of {} in {}: {}", name, dir, e);
                false
            }
        })
        .collect()
}
