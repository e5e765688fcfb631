#![forbid(unsafe_code)]

use poem::Request;
use poem_openapi::{ OpenApi, payload::Json, Object, param::Query, ApiResponse };
use anyhow::Result;
use tokio::task::spawn_blocking;
use log::error;

use crate::fileops::listing::list_files;
use crate::utils::config::Config;
use crate::utils::errors::{FileOpError, HttpResult};
use crate::utils::fs_utils::{self, RequestDebug};

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct ListFilesApi {
    default_directory: String,
}

struct ReqListFiles
{
    directory: String,
}

#[derive(Object, Debug)]
pub struct RespListFiles
{
    result_code: String,
    result_msg: String,
    num_files: i32,
    files: Vec<String>,
}

// Implement the debug record trait for logging.
impl RequestDebug for ReqListFiles {
    type Req = ReqListFiles;
    fn get_request_info(&self) -> String {
        let mut s = String::with_capacity(255);
        s.push_str("  Request:");
        s.push_str("\n    directory: ");
        s.push_str(&self.directory);
        s
    }
}

// ------------------- HTTP Status Codes -------------------
#[derive(Debug, ApiResponse)]
enum FilesResponse {
    #[oai(status = 200)]
    Http200(Json<RespListFiles>),
    #[oai(status = 400)]
    Http400(Json<HttpResult>),
    #[oai(status = 404)]
    Http404(Json<HttpResult>),
    #[oai(status = 500)]
    Http500(Json<HttpResult>),
}

fn make_http_200(resp: RespListFiles) -> FilesResponse {
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
impl ListFilesApi {
    /// List the regular files directly inside a directory.
    #[oai(path = "/files", method = "get")]
    async fn list_files_api(&self, http_req: &Request, directory: Query<Option<String>>)
    -> FilesResponse {
        // Package the request parameters.
        let req = ReqListFiles {
            directory: directory.0.unwrap_or_else(|| self.default_directory.clone()),
        };

        // -------------------- Process Request ----------------------
        match RespListFiles::process(http_req, req).await {
            Ok(r) => r,
            Err(e) => {
                let msg = "ERROR: ".to_owned() + e.to_string().as_str();
                error!("{}", msg);
                make_http_500(msg)
            }
        }
    }
}

impl ListFilesApi {
    pub fn new(config: &Config) -> Self {
        Self { default_directory: config.default_directory.clone() }
    }
}

// ***************************************************************************
//                          Request/Response Methods
// ***************************************************************************
impl RespListFiles {
    /// Create a new response.
    fn new(result_code: &str, result_msg: String, files: Vec<String>) -> Self {
        Self {result_code: result_code.to_string(), result_msg,
              num_files: files.len() as i32, files}
    }

    /// Process the request.
    async fn process(http_req: &Request, req: ReqListFiles) -> Result<FilesResponse> {
        // Conditional logging depending on log level.
        fs_utils::debug_request(http_req, &req);

        // The listing blocks, keep it off the async workers.
        let dir = req.directory;
        match spawn_blocking(move || list_files(&dir)).await? {
            Ok(files) => Ok(make_http_200(Self::new("0", "success".to_string(), files))),
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
        let api = OpenApiService::new(ListFilesApi::new(config), "Files", "0.1.0");
        TestClient::new(Route::new().nest("/v1", api))
    }

    #[tokio::test]
    async fn lists_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let cli = client(&Config::new());
        let resp = cli.get(format!("/v1/files?directory={}", dir.path().display())).send().await;
        resp.assert_status_is_ok();

        let body: Value = serde_json::from_str(&resp.0.into_body().into_string().await.unwrap()).unwrap();
        assert_eq!(body["result_code"], "0");
        assert_eq!(body["num_files"], 1);
        assert_eq!(body["files"][0], "a.txt");
    }

    #[tokio::test]
    async fn default_directory_from_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        let config = Config { default_directory: dir.path().display().to_string(), ..Config::new() };

        let resp = client(&config).get("/v1/files").send().await;
        resp.assert_status_is_ok();

        let body: Value = serde_json::from_str(&resp.0.into_body().into_string().await.unwrap()).unwrap();
        assert_eq!(body["files"][0], "b.txt");
    }

    #[tokio::test]
    async fn missing_directory_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let resp = client(&Config::new())
            .get(format!("/v1/files?directory={}/nope", dir.path().display()))
            .send().await;
        resp.assert_status(StatusCode::NOT_FOUND);

        let body: Value = serde_json::from_str(&resp.0.into_body().into_string().await.unwrap()).unwrap();
        assert_eq!(body["result_code"], "404");
    }

    #[tokio::test]
    async fn file_is_400() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        let resp = client(&Config::new())
            .get(format!("/v1/files?directory={}/a.txt", dir.path().display()))
            .send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }
}
