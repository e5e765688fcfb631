#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Query, ApiResponse };
use anyhow::Result;
use tokio::task::spawn_blocking;
use log::{debug, error};

use crate::fileops::filter::{advanced_filter, Condition};
use crate::fileops::listing::list_files;
use crate::utils::config::Config;
use crate::utils::errors::{FileOpError, HttpResult};
use crate::utils::fs_utils::{self, RequestDebug};

const DEFAULT_CONDITION: &str = "large";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct FilterFilesApi {
    default_directory: String,
    size_threshold: u64,
}

struct ReqFilterFiles
{
    directory: String,
    condition: Condition,
    threshold: u64,
}

#[derive(Object, Debug)]
pub struct RespFilterFiles
{
    result_code: String,
    result_msg: String,
    condition: String,
    threshold: u64,
    num_files: i32,
    files: Vec<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqFilterFiles {
    type Req = ReqFilterFiles;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request:");
        s.push_str("\n    directory: ");
        s.push_str(&self.directory);
        s.push_str("\n    condition: ");
        s.push_str(&self.condition.to_string());
        s.push_str("\n    threshold: ");
        s.push_str(&self.threshold.to_string());
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum FilesResponse {
    #[oai(status = 200)]
    Http200(Json<RespFilterFiles>),
    #[oai(status = 400)]
    Http400(Json<HttpResult>),
    #[oai(status = 404)]
    Http404(Json<HttpResult>),
    #[oai(status = 500)]
    Http500(Json<HttpResult>),
}

fn make_http_200(resp: RespFilterFiles) -> FilesResponse {
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
impl FilterFilesApi {
    /// List a directory's files that satisfy a size condition.
    ///
    /// "large" keeps files bigger than the configured threshold, "small"
    /// keeps the rest.  Any other condition returns every file.
    #[oai(path = "/files/filter", method = "get")]
    async fn filter_files_api(&self, http_req: &Request,
                              directory: Query<Option<String>>,
                              condition: Query<Option<String>>)
    -> FilesResponse {
        // Package the request parameters.
        let cond = condition.0.unwrap_or_else(|| DEFAULT_CONDITION.to_string());
        let req = ReqFilterFiles {
            directory: directory.0.unwrap_or_else(|| self.default_directory.clone()),
            condition: Condition::parse(&cond),
            threshold: self.size_threshold,
        };

        // -------------------- Process Request ----------------------
        match RespFilterFiles::process(http_req, req).await {
            Ok(r) => r,
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                make_http_500(msg)
            }
        }
    }
}

impl FilterFilesApi {
    pub fn new(config: &Config) -> Self {
        Self {
            default_directory: config.default_directory.clone(),
            size_threshold: config.size_threshold,
        }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespFilterFiles {
    /// Create a new response.
    fn new(result_code: &str, result_msg: String, condition: String, threshold: u64,
           files: Vec<String>)
    -> Self {
        Self {result_code: result_code.to_string(), result_msg, condition, threshold,
              num_files: files.len() as i32, files}
    }

    /// Process the request.
    async fn process(http_req: &Request, req: ReqFilterFiles) -> Result<FilesResponse> {
        // Conditional logging depending on log level.
        fs_utils::debug_request(http_req, &req);

        if let Condition::Unknown(c) = &req.condition {
            debug!("Unknown condition '{}', returning all files.", c);
        }

        let ReqFilterFiles { directory, condition, threshold } = req;
        let cond_name = condition.to_string();
        let result = spawn_blocking(move || {
            list_files(&directory)
                .map(|files| advanced_filter(&directory, files, &condition, threshold))
        }).await?;

        match result {
            Ok(files) => Ok(make_http_200(
                Self::new("0", "success".to_string(), cond_name, threshold, files))),
            Err(e) => Ok(make_http_error(e)),
        }
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::http::StatusCode;
    use poem::test::TestClient;
    use poem::Route;
    use poem_openapi::OpenApiService;
    use serde_json::Value;
    use std::fs;

    fn client(config: &Config) -> TestClient<Route> {
        let api = OpenApiService::new(FilterFilesApi::new(config), "Files", "0.1.0");
        TestClient::new(Route::new().nest("/v1", api))
    }

    async fn body_of(resp: poem::test::TestResponse) -> Value {
        serde_json::from_str(&resp.0.into_body().into_string().await.unwrap()).unwrap()
    }

    fn sized_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("small.txt"), vec![b'x'; 100]).unwrap();
        fs::write(dir.path().join("large.bin"), vec![b'y'; 2048]).unwrap();
        dir
    }

    #[tokio::test]
    async fn defaults_to_large() {
        let dir = sized_dir();
        let resp = client(&Config::new())
            .get(format!("/v1/files/filter?directory={}", dir.path().display()))
            .send().await;
        resp.assert_status_is_ok();

        let body = body_of(resp).await;
        assert_eq!(body["condition"], "large");
        assert_eq!(body["threshold"], 1024);
        assert_eq!(body["num_files"], 1);
        assert_eq!(body["files"][0], "large.bin");
    }

    #[tokio::test]
    async fn small() {
        let dir = sized_dir();
        let resp = client(&Config::new())
            .get(format!("/v1/files/filter?directory={}&condition=small", dir.path().display()))
            .send().await;
        resp.assert_status_is_ok();

        let body = body_of(resp).await;
        assert_eq!(body["num_files"], 1);
        assert_eq!(body["files"][0], "small.txt");
    }

    #[tokio::test]
    async fn configured_threshold() {
        let dir = sized_dir();
        let config = Config { size_threshold: 10_000, ..Config::new() };
        let resp = client(&config)
            .get(format!("/v1/files/filter?directory={}&condition=small", dir.path().display()))
            .send().await;
        resp.assert_status_is_ok();
        assert_eq!(body_of(resp).await["num_files"], 2);
    }

    #[tokio::test]
    async fn unknown_condition_keeps_all() {
        let dir = sized_dir();
        let resp = client(&Config::new())
            .get(format!("/v1/files/filter?directory={}&condition=huge", dir.path().display()))
            .send().await;
        resp.assert_status_is_ok();
        assert_eq!(body_of(resp).await["num_files"], 2);
    }

    #[tokio::test]
    async fn missing_directory_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let resp = client(&Config::new())
            .get(format!("/v1/files/filter?directory={}/gone", dir.path().display()))
            .send().await;
        resp.assert_status(StatusCode::NOT_FOUND);
    }
}
