use askama::Template;
use axum::{Router, http::StatusCode, response::Html, routing::get};
use chrono::Local;

pub struct Endpoint {
    pub method: &'static str,
    pub path: &'static str,
    pub summary: &'static str,
}

pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint { method: "GET", path: "/categories", summary: "List categories" },
    Endpoint { method: "POST", path: "/categories", summary: "Create a category" },
    Endpoint { method: "DELETE", path: "/categories/{id}", summary: "Delete a category and detach its todos" },
    Endpoint { method: "GET", path: "/todos", summary: "List todos" },
    Endpoint { method: "GET", path: "/todos/{id}", summary: "Fetch one todo" },
    Endpoint { method: "POST", path: "/todos", summary: "Create a todo" },
    Endpoint { method: "PUT", path: "/todos/{id}", summary: "Replace a todo" },
    Endpoint { method: "DELETE", path: "/todos/{id}", summary: "Delete a todo" },
    Endpoint { method: "GET", path: "/users", summary: "List users" },
    Endpoint { method: "GET", path: "/users/{id}", summary: "Fetch one user" },
    Endpoint { method: "POST", path: "/users", summary: "Register a user" },
    Endpoint { method: "POST", path: "/users/register", summary: "Register a user" },
    Endpoint { method: "POST", path: "/users/login", summary: "Log in with username or email" },
    Endpoint { method: "PUT", path: "/users/{id}", summary: "Update a user profile" },
    Endpoint { method: "DELETE", path: "/users/{id}", summary: "Delete a user" },
];

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {
    now: String,
    project_name: &'static str,
    endpoints: &'static [Endpoint],
}

type HtmlError = (StatusCode, Html<String>);

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Result<Html<String>, HtmlError> {
    let rendered = IndexTemplate {
        now: Local::now().to_rfc3339(),
        project_name: "Todo Board",
        endpoints: ENDPOINTS,
    }
    .render()
    .map_err(|err| {
        tracing::error!(error = %err, "failed to render index");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html("failed to render index".to_string()),
        )
    })?;
    Ok(Html(rendered))
}
