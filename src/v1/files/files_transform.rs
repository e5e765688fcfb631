#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Query, ApiResponse };
use anyhow::Result;
use tokio::task::spawn_blocking;
use log::{debug, error};

use crate::fileops::listing::list_files;
use crate::fileops::transform::{apply_operation, Operation};
use crate::utils::config::Config;
use crate::utils::errors::{FileOpError, HttpResult};
use crate::utils::fs_utils::{self, RequestDebug};

const DEFAULT_OPERATION: &str = "uppercase";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct TransformFilesApi {
    default_directory: String,
}

struct ReqTransformFiles
{
    directory: String,
    operation: Operation,
}

#[derive(Object, Debug)]
pub struct RespTransformFiles
{
    result_code: String,
    result_msg: String,
    operation: String,
    num_files: i32,
    files: Vec<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqTransformFiles {
    type Req = ReqTransformFiles;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request:");
        s.push_str("\n    directory: ");
        s.push_str(&self.directory);
        s.push_str("\n    operation: ");
        s.push_str(&self.operation.to_string());
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum FilesResponse {
    #[oai(status = 200)]
    Http200(Json<RespTransformFiles>),
    #[oai(status = 400)]
    Http400(Json<HttpResult>),
    #[oai(status = 404)]
    Http404(Json<HttpResult>),
    #[oai(status = 500)]
    Http500(Json<HttpResult>),
}

fn make_http_200(resp: RespTransformFiles) -> FilesResponse {
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
impl TransformFilesApi {
    /// List a directory's files with a case operation applied to each name.
    ///
    /// Supported operations are uppercase and lowercase; any other value
    /// returns the names unchanged.
    #[oai(path = "/files/transform", method = "get")]
    async fn transform_files_api(&self, http_req: &Request,
                                 directory: Query<Option<String>>,
                                 operation: Query<Option<String>>)
    -> FilesResponse {
        // Package the request parameters.
        let op = operation.0.unwrap_or_else(|| DEFAULT_OPERATION.to_string());
        let req = ReqTransformFiles {
            directory: directory.0.unwrap_or_else(|| self.default_directory.clone()),
            operation: Operation::parse(&op),
        };

        // -------------------- Process Request ----------------------
        match RespTransformFiles::process(http_req, req).await {
            Ok(r) => r,
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                make_http_500(msg)
            }
        }
    }
}

impl TransformFilesApi {
    pub fn new(config: &Config) -> Self {
        Self { default_directory: config.default_directory.clone() }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespTransformFiles {
    /// Create a new response.
    fn new(result_code: &str, result_msg: String, operation: String, files: Vec<String>) -> Self {
        Self {result_code: result_code.to_string(), result_msg, operation,
              num_files: files.len() as i32, files}
    }

    /// Process the request.
    async fn process(http_req: &Request, req: ReqTransformFiles) -> Result<FilesResponse> {
        // Conditional logging depending on log level.
        fs_utils::debug_request(http_req, &req);

        if let Operation::Unknown(op) = &req.operation {
            debug!("Unknown operation '{}', returning names unchanged.", op);
        }

        let ReqTransformFiles { directory, operation } = req;
        let op_name = operation.to_string();
        let result = spawn_blocking(move || {
            list_files(&directory).map(|files| apply_operation(files, &operation))
        }).await?;

        match result {
            Ok(files) => Ok(make_http_200(Self::new("0", "success".to_string(), op_name, files))),
            Err(e) => Ok(make_http_error(e)),
        }
    }
}
