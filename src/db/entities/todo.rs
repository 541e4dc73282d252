use std::fmt;

use base_entity_derive::base_entity;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[base_entity]
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub priority: String,
    pub status: String,
    #[sea_orm(indexed)]
    pub category_id: Option<Uuid>,
    #[sea_orm(belongs_to, from = "category_id", to = "id", on_delete = "SetNull")]
    pub category: HasOne<super::category::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TodoPriority {
    pub const ALL: [TodoPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for TodoPriority {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for TodoPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TodoStatus {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or(())
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{TodoPriority, TodoStatus};

    #[test]
    fn stored_strings_map_back_to_variants() {
        for priority in TodoPriority::ALL {
            assert_eq!(TodoPriority::try_from(priority.as_str()), Ok(priority));
        }
        for status in TodoStatus::ALL {
            assert_eq!(TodoStatus::try_from(status.as_str()), Ok(status));
        }
        assert!(TodoPriority::try_from("urgent").is_err());
        assert!(TodoStatus::try_from("done").is_err());
    }

    #[test]
    fn defaults_match_new_task_form() {
        assert_eq!(TodoPriority::default(), TodoPriority::Medium);
        assert_eq!(TodoStatus::default(), TodoStatus::Pending);
        assert_eq!(
            serde_json::to_value(TodoStatus::InProgress).expect("status should serialize"),
            serde_json::json!("in_progress")
        );
    }
}
