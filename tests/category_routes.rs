mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use common::{id_of, send};
use todo_board::test_helpers::sqlite_app;

#[tokio::test]
async fn deleting_a_category_detaches_its_todos() {
    let app = sqlite_app().await.expect("app should start");
    let (status, category) =
        send(&app, Method::POST, "/categories", Some(json!({ "name": " Work " }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["name"], "Work");
    let category_id = id_of(&category);

    let (status, todo) = send(
        &app,
        Method::POST,
        "/todos",
        Some(json!({ "title": "Quarterly report", "category_id": category_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let todo_id = id_of(&todo);

    let (status, body) =
        send(&app, Method::DELETE, &format!("/categories/{category_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, todo) = send(&app, Method::GET, &format!("/todos/{todo_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(todo["category_id"], Value::Null);

    let (_, categories) = send(&app, Method::GET, "/categories", None).await;
    assert_eq!(categories, json!([]));
}

#[tokio::test]
async fn deleting_a_missing_category_is_404() {
    let app = sqlite_app().await.expect("app should start");
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/categories/{}", Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Category not found" }));
}

#[tokio::test]
async fn owner_is_optional_but_must_exist() {
    let app = sqlite_app().await.expect("app should start");

    let (status, category) = send(
        &app,
        Method::POST,
        "/categories",
        Some(json!({ "name": "Errands", "user_id": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["user_id"], Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/categories",
        Some(json!({ "name": "Errands", "user_id": Uuid::new_v4() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User does not exist" }));
}

#[tokio::test]
async fn blank_name_is_rejected() {
    let app = sqlite_app().await.expect("app should start");
    let (status, body) = send(&app, Method::POST, "/categories", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Name is required" }));
}
