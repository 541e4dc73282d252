use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub zip_code: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn display_name(&self) -> &str {
        if self.first_name.is_empty() {
            &self.username
        } else {
            &self.first_name
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub const ALL: [Status; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
    pub category_id: Option<Uuid>,
}

/// Body for creating or replacing a todo.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TodoInput {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub priority: Priority,
    pub status: Status,
    pub category_id: Option<Uuid>,
}

impl From<&Todo> for TodoInput {
    fn from(todo: &Todo) -> Self {
        Self {
            title: todo.title.clone(),
            description: todo.description.clone(),
            due_date: todo.due_date,
            priority: todo.priority,
            status: todo.status,
            category_id: todo.category_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewCategory {
    pub name: String,
    pub user_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub zip_code: String,
    pub username: String,
    pub password: String,
    pub is_admin: bool,
}

/// Profile update; `password: None` keeps the stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub city: String,
    pub zip_code: String,
    pub username: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Credentials<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Registered {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoggedIn {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Message {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{Priority, Status, Todo, TodoInput};

    #[test]
    fn todo_payload_uses_wire_names() {
        let input = TodoInput {
            title: "Plan sprint".to_string(),
            status: Status::InProgress,
            priority: Priority::High,
            ..TodoInput::default()
        };
        let value = serde_json::to_value(&input).expect("input should serialize");
        assert_eq!(value["status"], "in_progress");
        assert_eq!(value["priority"], "high");
        assert_eq!(value["category_id"], serde_json::Value::Null);
    }

    #[test]
    fn server_todos_ignore_extra_fields() {
        let todo: Todo = serde_json::from_value(json!({
            "id": "6f1c2f7e-5a55-4b8e-9b8e-0d6c1f0a4e11",
            "title": "Plan sprint",
            "description": null,
            "due_date": "2026-04-02",
            "priority": "low",
            "status": "completed",
            "category_id": null,
            "created_at": "2026-01-01T00:00:00+00:00",
            "updated_at": "2026-01-01T00:00:00+00:00",
        }))
        .expect("todo should parse");
        assert_eq!(todo.status, Status::Completed);
        assert_eq!(todo.due_date.map(|d| d.to_string()).as_deref(), Some("2026-04-02"));
    }
}
