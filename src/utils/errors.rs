#![forbid(unsafe_code)]

use poem_openapi::Object;
use thiserror::Error;

/// Error enumerates the errors returned by this application.
#[derive(Error, Debug)]
pub enum Errors {
    /// Input parameter logging.
    #[error("files_server input parameters:\n{}", .0)]
    InputParms(String),

    /// Inaccessible logger configuration file.
    #[error("Unable to access the Log4rs configuration file: {}", .0)]
    Log4rsInitialization(String),

    #[error("Reading application configuration file: {}", .0)]
    ReadingConfigFile(String),

    #[error("Unable to parse TOML file: {}", .0)]
    TOMLParseError(String),
}

/// FileOpError enumerates the failures of the directory operations that
/// are reported back to HTTP clients.
#[derive(Error, Debug)]
pub enum FileOpError {
    #[error("Directory not found: {}", .0)]
    NotFound(String),

    #[error("Path is not a directory: {}", .0)]
    NotADirectory(String),

    #[error("I/O error accessing {}: {}", .0, .1)]
    Io(String, #[source] std::io::Error),
}

impl FileOpError {
    /// Classify an I/O error raised while reading `dir`.
    pub fn from_io(dir: &str, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => FileOpError::NotFound(dir.to_string()),
            _ => FileOpError::Io(dir.to_string(), e),
        }
    }

    /// The HTTP status this error is reported with.
    pub fn http_status(&self) -> u16 {
        match self {
            FileOpError::NotFound(_) => 404,
            FileOpError::NotADirectory(_) => 400,
            FileOpError::Io(_, _) => 500,
        }
    }
}

// ---------------------------------------------------------------------------
// HttpResult:
// ---------------------------------------------------------------------------
/// The body of every non-200 response.
#[derive(Object, Debug)]
pub struct HttpResult {
    pub result_code: String,
    pub result_msg: String,
}

impl HttpResult {
    pub fn new(result_code: String, result_msg: String) -> Self {
        Self { result_code, result_msg }
    }
}
