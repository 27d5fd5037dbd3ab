use chrono::{DateTime, Utc};
use domain::{Todo, TodoId};
use sqlx::FromRow;

/// todos テーブルの 1 行
#[derive(Debug, Clone, FromRow)]
pub struct TodoRecord {
    pub id: TodoId,
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Self {
        Todo {
            id: record.id,
            subject: record.subject,
            description: record.description,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
