mod common;

use axum::http::{Method, StatusCode};
use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
use serde_json::json;
use uuid::Uuid;

use common::{send, send_raw};
use todo_board::{db::entities::todo, test_helpers::mock_app};

fn exec(rows_affected: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected,
    }
}

fn postgres() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

#[tokio::test]
async fn missing_todo_is_404() {
    let app = mock_app(postgres().append_query_results([Vec::<todo::Model>::new()]))
        .expect("app should build");
    let (status, body) = send(&app, Method::GET, &format!("/todos/{}", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Todo not found" }));
}

#[tokio::test]
async fn deleting_missing_rows_is_404_not_500() {
    let cases = [
        ("/todos", vec![exec(0)], "Todo not found"),
        ("/categories", vec![exec(0), exec(0)], "Category not found"),
        ("/users", vec![exec(0), exec(0)], "User not found"),
    ];

    for (prefix, results, message) in cases {
        let app = mock_app(postgres().append_exec_results(results)).expect("app should build");
        let uri = format!("{prefix}/{}", Uuid::new_v4());
        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body, json!({ "error": message }), "{uri}");
    }
}

#[tokio::test]
async fn malformed_path_id_is_a_json_400() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(&app, Method::GET, "/todos/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn malformed_json_is_a_json_400() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send_raw(&app, Method::POST, "/todos", "{\"title\":").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn wrongly_typed_json_is_reported_as_400() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(&app, Method::POST, "/todos", Some(json!({ "title": 42 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn unknown_priority_never_reaches_the_database() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(
        &app,
        Method::POST,
        "/todos",
        Some(json!({ "title": "Ship it", "priority": "urgent" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "error": "Invalid priority 'urgent'. Expected one of: low, medium, high" })
    );
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(
        &app,
        Method::POST,
        "/users/login",
        Some(json!({ "username": "grace" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Username and password are required" }));
}

#[tokio::test]
async fn database_failures_are_opaque_500s() {
    let app = mock_app(postgres().append_query_errors([DbErr::Custom(
        "relation \"todos\" does not exist".into(),
    )]))
    .expect("app should build");
    let (status, body) = send(&app, Method::GET, "/todos", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Error fetching todos. Please check the logs for more details" })
    );
}

#[tokio::test]
async fn unknown_route_is_a_json_404() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(&app, Method::GET, "/nowhere", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));
}

#[tokio::test]
async fn wrong_method_keeps_its_status() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(&app, Method::PATCH, "/todos", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn index_lists_the_endpoints() {
    let app = mock_app(postgres()).expect("app should build");
    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    let html = body.as_str().expect("index should be html");
    assert!(html.contains("Log in with username or email"));
    assert!(html.contains("Todo Board"));
}
