use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// データストアが採番する Todo の識別子
pub type TodoId = i64;

/// 永続化された Todo 1 件
///
/// データストアが唯一の正であり、この値は読み出し時点のコピーです。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: TodoId,
    pub subject: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
