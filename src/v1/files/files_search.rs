#![forbid(unsafe_code)]

use std::path::PathBuf;

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Query, ApiResponse };
use anyhow::Result;
use tokio::task::spawn_blocking;
use log::{error, info};

use crate::fileops::search::{DirectorySearcher, SearchOptions};
use crate::utils::config::Config;
use crate::utils::errors::{FileOpError, HttpResult};
use crate::utils::fs_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct SearchFilesApi {
    default_directory: String,
    options: SearchOptions,
}

struct ReqSearchFiles
{
    directory: String,
    filename: String,
}

#[derive(Object, Debug)]
pub struct RespSearchFiles
{
    result_code: String,
    result_msg: String,
    filename: String,
    path: String,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqSearchFiles {
    type Req = ReqSearchFiles;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request:");
        s.push_str("\n    directory: ");
        s.push_str(&self.directory);
        s.push_str("\n    filename: ");
        s.push_str(&self.filename);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum FilesResponse {
    #[oai(status = 200)]
    Http200(Json<RespSearchFiles>),
    #[oai(status = 400)]
    Http400(Json<HttpResult>),
    #[oai(status = 404)]
    Http404(Json<HttpResult>),
    #[oai(status = 500)]
    Http500(Json<HttpResult>),
}

fn make_http_200(resp: RespSearchFiles) -> FilesResponse {
    FilesResponse::Http200(Json(resp))
}
fn make_http_400(msg: String) -> FilesResponse {
    FilesResponse::Http400(Json(HttpResult::new(400.to_string(), msg)))
}
fn make_http_404(msg: String) -> FilesResponse {
    FilesResponse::Http404(Json(HttpResult::new(404.to_string(), msg)))
}
fn make_http_500(msg: String) -> FilesResponse {
    FilesResponse::Http500(Json(HttpResult::new(500.to_string(), msg)))
}
fn make_http_error(e: FileOpError) -> FilesResponse {
    let msg = "ERROR: ".to_owned() + e.to_string().as_str();
    match e.http_status() {
        400 => make_http_400(msg),
        404 => make_http_404(msg),
        _ => {
            error!("{}", msg);
            make_http_500(msg)
        },
    }
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl SearchFilesApi {
    /// Recursively search a directory tree for a file with an exact name.
    ///
    /// The first match found is returned.  Unreadable subdirectories are
    /// skipped, and a tree without a match yields 404.  A directory parameter
    /// naming a regular file is rejected with 400.
    #[oai(path = "/files/search", method = "get")]
    async fn search_files_api(&self, http_req: &Request,
                              directory: Query<Option<String>>,
                              filename: Query<Option<String>>)
    -> FilesResponse {
        // A file name is the one required input.
        let filename = match filename.0 {
            Some(f) if !f.is_empty() => f,
            _ => return make_http_400("ERROR: A non-empty filename parameter is required.".to_string()),
        };

        // Package the request parameters.
        let req = ReqSearchFiles {
            directory: directory.0.unwrap_or_else(|| self.default_directory.clone()),
            filename,
        };

        // -------------------- Process Request ----------------------
        match RespSearchFiles::process(http_req, req, self.options).await {
            Ok(r) => r,
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                make_http_500(msg)
            }
        }
    }
}

impl SearchFilesApi {
    pub fn new(config: &Config) -> Self {
        Self {
            default_directory: config.default_directory.clone(),
            options: config.search_options(),
        }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespSearchFiles {
    /// Create a new response.
    fn new(result_code: &str, result_msg: String, filename: String, path: String) -> Self {
        Self {result_code: result_code.to_string(), result_msg, filename, path}
    }

    /// Process the request.
    async fn process(http_req: &Request, req: ReqSearchFiles, options: SearchOptions)
    -> Result<FilesResponse> {
        // Conditional logging depending on log level.
        fs_utils::debug_request(http_req, &req);

        // The walk blocks, keep it off the async workers.
        let ReqSearchFiles { directory, filename } = req;
        let root = PathBuf::from(&directory);
        let target = filename.clone();
        let found = spawn_blocking(move || {
            // A missing root is just a tree with no match.
            match std::fs::metadata(&root) {
                Ok(meta) if !meta.is_dir() =>
                    Err(FileOpError::NotADirectory(root.to_string_lossy().into_owned())),
                _ => Ok(DirectorySearcher::new(options).search(&root, &target)),
            }
        }).await?;

        match found {
            Err(e) => Ok(make_http_error(e)),
            Ok(Some(path)) => {
                let path = path.to_string_lossy().into_owned();
                info!("Search for '{}' under '{}' found {}.", filename, directory, path);
                Ok(make_http_200(Self::new("0", "success".to_string(), filename, path)))
            },
            Ok(None) => {
                let msg = format!("File '{}' not found under '{}'.", filename, directory);
                Ok(make_http_404(msg))
            },
        }
    }
}
