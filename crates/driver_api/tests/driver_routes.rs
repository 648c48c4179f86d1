use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use driver_api::{router, INSERT_RANDOM_COUNT};
use driver_core::{ConnectionProvider, DriverService, SqliteDriverRepository};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    _dir: TempDir,
    provider: ConnectionProvider,
    app: Router,
}

impl TestApp {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let provider = ConnectionProvider::open_path(dir.path().join("drivers.db")).unwrap();
        let service = DriverService::with_seed(SqliteDriverRepository::new(provider.clone()), 1);
        Self {
            _dir: dir,
            provider,
            app: router(Arc::new(service)),
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let (status, _, json) = self.send_full(method, uri, body).await;
        (status, json)
    }

    async fn send_full(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Option<String>, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Option<String>, Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|value| value.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // Extractor rejections raised by axum itself carry plain-text bodies.
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, location, json)
    }

    fn break_store(&self) {
        self.provider
            .connect()
            .unwrap()
            .execute_batch("DROP TABLE Drivers;")
            .unwrap();
    }
}

fn john() -> Value {
    json!({
        "firstName": "John",
        "lastName": "Doe",
        "email": "john.doe@example.com",
        "phoneNumber": "555-1234"
    })
}

#[tokio::test]
async fn create_returns_201_with_location_and_driver() {
    let app = TestApp::new();

    let (status, location, body) = app.send_full("POST", "/api/driver", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(location.as_deref(), Some("/api/driver/1"));
    assert_eq!(body["id"], 1);
    assert_eq!(body["driver"]["firstName"], "John");
    assert_eq!(body["driver"]["phoneNumber"], "555-1234");
}

#[tokio::test]
async fn get_driver_returns_200_or_404() {
    let app = TestApp::new();
    app.send("POST", "/api/driver", Some(john())).await;

    let (status, body) = app.send("GET", "/api/driver/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["driver"]["id"], 1);
    assert_eq!(body["driver"]["lastName"], "Doe");

    let (status, body) = app.send("GET", "/api/driver/99", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Driver not found");
}

#[tokio::test]
async fn create_rejects_invalid_and_malformed_bodies() {
    let app = TestApp::new();

    let mut invalid = john();
    invalid["email"] = json!("nope");
    invalid["firstName"] = json!("");
    let (status, body) = app.send("POST", "/api/driver", Some(invalid)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    let errors = body["errors"].as_array().unwrap();
    assert!(errors.contains(&json!("First name is required")));
    assert!(errors.contains(&json!("Invalid email address")));

    let (status, _) = app
        .send("POST", "/api/driver", Some(json!({ "firstName": "OnlyName" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let request = Request::builder()
        .method("POST")
        .uri("/api/driver")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, _) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = app.send("GET", "/api/driver", None).await;
    assert!(list["drivers"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn get_all_uses_default_and_explicit_paging() {
    let app = TestApp::new();
    let (status, _) = app.send("POST", "/api/driver/insert-random", None).await;
    assert_eq!(status, StatusCode::OK);
    app.send("POST", "/api/driver/insert-random", None).await;

    let (status, body) = app.send("GET", "/api/driver", None).await;
    assert_eq!(status, StatusCode::OK);
    let drivers = body["drivers"].as_array().unwrap();
    assert_eq!(drivers.len(), 10);
    assert_eq!(drivers[0]["id"], 1);

    let (_, body) = app
        .send("GET", "/api/driver?pageNumber=4&pageSize=6", None)
        .await;
    let drivers = body["drivers"].as_array().unwrap();
    assert_eq!(drivers.len(), 2 * INSERT_RANDOM_COUNT - 18);
    assert_eq!(drivers[0]["id"], 19);
}

#[tokio::test]
async fn update_returns_204_and_path_identity_wins() {
    let app = TestApp::new();
    app.send("POST", "/api/driver", Some(john())).await;

    let mut update = john();
    update["id"] = json!(500);
    update["firstName"] = json!("Jane");
    let (status, body) = app.send("PUT", "/api/driver/1", Some(update)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (_, body) = app.send("GET", "/api/driver/1", None).await;
    assert_eq!(body["driver"]["firstName"], "Jane");
    assert_eq!(body["driver"]["id"], 1);

    let (status, _) = app.send("GET", "/api/driver/500", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_rejects_invalid_body() {
    let app = TestApp::new();
    let mut update = john();
    update["phoneNumber"] = json!("call me maybe");

    let (status, body) = app.send("PUT", "/api/driver/1", Some(update)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["Invalid phone number"]));
}

#[tokio::test]
async fn delete_returns_200_even_when_missing() {
    let app = TestApp::new();
    app.send("POST", "/api/driver", Some(john())).await;

    let (status, body) = app.send("DELETE", "/api/driver/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Driver deleted successfully");

    let (status, _) = app.send("GET", "/api/driver/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send("DELETE", "/api/driver/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn alphabetized_lists_by_first_then_last_name() {
    let app = TestApp::new();
    for (first, last) in [("Zed", "Alpha"), ("Amy", "Zulu"), ("Amy", "Beta")] {
        let mut body = john();
        body["firstName"] = json!(first);
        body["lastName"] = json!(last);
        app.send("POST", "/api/driver", Some(body)).await;
    }

    let (status, body) = app.send("GET", "/api/driver/alphabetized", None).await;
    assert_eq!(status, StatusCode::OK);
    let names = body["drivers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| format!("{} {}", d["firstName"].as_str().unwrap(), d["lastName"].as_str().unwrap()))
        .collect::<Vec<_>>();
    assert_eq!(names, ["Amy Beta", "Amy Zulu", "Zed Alpha"]);
}

#[tokio::test]
async fn alphabetize_name_sorts_characters() {
    let app = TestApp::new();

    let (status, body) = app
        .send("GET", "/api/driver/alphabetize-name?name=John", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alphabetizedName"], "Jhno");

    let (status, body) = app.send("GET", "/api/driver/alphabetize-name", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["alphabetizedName"], "");
}

#[tokio::test]
async fn storage_failures_return_500_with_details() {
    let app = TestApp::new();
    app.break_store();

    let (status, body) = app.send("POST", "/api/driver/insert-random", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        "An error occurred while inserting random drivers"
    );
    assert!(body["details"].as_str().unwrap().contains("no such table"));

    for (method, uri, payload) in [
        ("POST", "/api/driver", Some(john())),
        ("GET", "/api/driver/1", None),
        ("GET", "/api/driver", None),
        ("PUT", "/api/driver/1", Some(john())),
        ("DELETE", "/api/driver/1", None),
        ("GET", "/api/driver/alphabetized", None),
    ] {
        let (status, body) = app.send(method, uri, payload).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
        assert!(body["details"].is_string(), "{method} {uri}");
    }

    let (status, _) = app
        .send("GET", "/api/driver/alphabetize-name?name=abc", None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn non_numeric_identity_is_a_bad_request() {
    let app = TestApp::new();
    let (status, _, _) = app
        .send_request(
            Request::builder()
                .uri("/api/driver/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn extreme_page_number_returns_first_page() {
    let app = TestApp::new();
    app.send("POST", "/api/driver", Some(john())).await;

    let (status, body) = app
        .send("GET", "/api/driver?pageNumber=-9223372036854775808", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["drivers"].as_array().unwrap().len(), 1);
}
