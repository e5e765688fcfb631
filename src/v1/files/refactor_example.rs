#![forbid(unsafe_code)]

use poem_openapi::{ OpenApi, payload::Json, Object };

const REFACTOR_MESSAGE: &str = "Refactored code example";

// ***************************************************************************
//                          Request/Response Definiions
// ***************************************************************************
pub struct RefactorExampleApi;

#[derive(Object)]
struct RespRefactorExample
{
    message: String,
}

// ***************************************************************************
//                             OpenAPI Endpoint
// ***************************************************************************
#[OpenApi]
impl RefactorExampleApi {
    /// Return a fixed message; the endpoint has no side effects.
    #[oai(path = "/refactor_example", method = "get")]
    async fn get_refactor_example(&self) -> Json<RespRefactorExample> {
        Json(RespRefactorExample { message: REFACTOR_MESSAGE.to_string() })
    }
}

// ***************************************************************************
//                                  Tests
// ***************************************************************************
#[cfg(test)]
mod tests {
    use super::*;
    use poem::test::TestClient;
    use poem::Route;
    use poem_openapi::OpenApiService;
    use serde_json::Value;

    #[tokio::test]
    async fn returns_message() {
        let api = OpenApiService::new(RefactorExampleApi, "Files", "0.1.0");
        let cli = TestClient::new(Route::new().nest("/v1", api));

        let resp = cli.get("/v1/refactor_example").send().await;
        resp.assert_status_is_ok();

        let body: Value = serde_json::from_str(&resp.0.into_body().into_string().await.unwrap()).unwrap();
        assert_eq!(body["message"], "Refactored code example");
    }
}
