//! 各操作のリクエスト/レスポンス値オブジェクト（永続化されない）
//!
//! `validate` はサービス呼び出し前にハンドラ層で実行され、
//! 失敗は常に `TodoError::Validation` になります。

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Todo, TodoError, TodoId};

/// 一覧取得でページサイズ未指定（0）のときに使用する件数
pub const DEFAULT_PAGE_SIZE: i64 = 10_000;

/// POST /todos リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

impl CreateTodoRequest {
    pub fn validate(&self) -> Result<(), TodoError> {
        require_subject(&self.subject)
    }
}

/// POST /todos レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTodoResponse {
    pub todo: Todo,
}

/// GET /todos のクエリ
///
/// `prev_id == 0` は先頭から、`size == 0` はデフォルトサイズを意味します。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadTodoRequest {
    pub prev_id: TodoId,
    pub size: i64,
}

impl ReadTodoRequest {
    /// 直前ページの最小 ID。0 は「カーソルなし」
    pub fn cursor(&self) -> Option<TodoId> {
        (self.prev_id != 0).then_some(self.prev_id)
    }

    /// 実際に適用するページサイズ
    pub fn page_size(&self) -> i64 {
        if self.size == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            self.size
        }
    }
}

/// GET /todos レスポンス（ID 降順）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadTodoResponse {
    pub todos: Vec<Todo>,
}

/// PUT /todos リクエスト
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoRequest {
    #[serde(default)]
    pub id: TodoId,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

impl UpdateTodoRequest {
    pub fn validate(&self) -> Result<(), TodoError> {
        if self.id == 0 {
            return Err(TodoError::Validation("id is required".to_string()));
        }
        require_subject(&self.subject)
    }
}

/// PUT /todos レスポンス
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTodoResponse {
    pub todo: Todo,
}

/// DELETE /todos リクエスト。重複した ID は 1 件として扱う
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoRequest {
    #[serde(default)]
    pub ids: BTreeSet<TodoId>,
}

impl DeleteTodoRequest {
    pub fn validate(&self) -> Result<(), TodoError> {
        if self.ids.is_empty() {
            return Err(TodoError::Validation("ids must not be empty".to_string()));
        }
        Ok(())
    }
}

/// DELETE /todos レスポンス（`{}`）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTodoResponse {}

fn require_subject(subject: &str) -> Result<(), TodoError> {
    if subject.is_empty() {
        return Err(TodoError::Validation("subject is required".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn create_request_defaults_description_to_empty() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"subject":"Task"}"#).unwrap();
        assert_eq!(req.subject, "Task");
        assert_eq!(req.description, "");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn create_request_without_subject_is_invalid() {
        let req: CreateTodoRequest = serde_json::from_str(r#"{"description":"d"}"#).unwrap();
        assert_eq!(req.validate().unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn update_request_requires_non_zero_id() {
        let req = UpdateTodoRequest { id: 0, subject: "A".into(), description: String::new() };
        assert_eq!(req.validate().unwrap_err().kind(), ErrorKind::Validation);

        let req = UpdateTodoRequest { id: 3, subject: String::new(), description: String::new() };
        assert_eq!(req.validate().unwrap_err().kind(), ErrorKind::Validation);

        let req = UpdateTodoRequest { id: 3, subject: "A".into(), description: String::new() };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn delete_request_collapses_duplicate_ids() {
        let req: DeleteTodoRequest = serde_json::from_str(r#"{"ids":[3,1,3]}"#).unwrap();
        assert_eq!(req.ids.into_iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn delete_request_with_empty_ids_is_invalid() {
        let req: DeleteTodoRequest = serde_json::from_str(r#"{"ids":[]}"#).unwrap();
        assert!(req.validate().is_err());
        let req: DeleteTodoRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn delete_response_serializes_to_empty_object() {
        assert_eq!(serde_json::to_string(&DeleteTodoResponse {}).unwrap(), "{}");
    }

    #[test]
    fn read_request_substitutes_defaults() {
        let req = ReadTodoRequest::default();
        assert_eq!(req.cursor(), None);
        assert_eq!(req.page_size(), DEFAULT_PAGE_SIZE);

        let req = ReadTodoRequest { prev_id: 42, size: 5 };
        assert_eq!(req.cursor(), Some(42));
        assert_eq!(req.page_size(), 5);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn non_empty_subject_is_always_accepted(subject in ".{1,64}", description in ".{0,64}") {
                let req = CreateTodoRequest { subject, description };
                prop_assert!(req.validate().is_ok());
            }

            #[test]
            fn empty_subject_is_always_rejected(id in any::<i64>(), description in ".{0,64}") {
                let create = CreateTodoRequest { subject: String::new(), description: description.clone() };
                prop_assert_eq!(create.validate().unwrap_err().kind(), ErrorKind::Validation);

                let update = UpdateTodoRequest { id, subject: String::new(), description };
                prop_assert_eq!(update.validate().unwrap_err().kind(), ErrorKind::Validation);
            }
        }
    }
}
