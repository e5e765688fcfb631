#![forbid(unsafe_code)]

use std::fmt;

/// A case transformation applied to every name in a file listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Uppercase,
    Lowercase,
    /// Unrecognized operations leave the names untouched.
    Unknown(String),
}

impl Operation {
    /// Parse an operation name.  Only the exact lowercase names are recognized.
    pub fn parse(s: &str) -> Self {
        match s {
            "uppercase" => Operation::Uppercase,
            "lowercase" => Operation::Lowercase,
            _ => Operation::Unknown(s.to_string()),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Uppercase => write!(f, "uppercase"),
            Operation::Lowercase => write!(f, "lowercase"),
            Operation::Unknown(s) => write!(f, "{}", s),
        }
    }
}

// ---------------------------------------------------------------------------
// apply_operation:
// ---------------------------------------------------------------------------
/** Map each file name through the operation.  The input is consumed and a
 * new list is returned in the same order.
 */
pub fn apply_operation(files: Vec<String>, operation: &Operation) -> Vec<String> {
    match operation {
        Operation::Uppercase => files.iter().map(|f| f.to_uppercase()).collect(),
        Operation::Lowercase => files.iter().map(|f| f.to_lowercase()).collect(),
        Operation::Unknown(_) => files,
    }
}
