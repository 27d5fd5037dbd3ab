use thiserror::Error;

/// エラー種別のタグ（HTTP ステータスの決定に使用）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 入力の形式不正・必須項目の欠落
    Validation,
    /// 対象の ID がデータストアに存在しない
    NotFound,
    /// データストアの I/O・制約エラー
    Persistence,
    /// シリアライズ失敗などの分類外エラー
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TodoError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Todo not found: {0}")]
    NotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TodoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::Validation(_) => ErrorKind::Validation,
            TodoError::NotFound(_) => ErrorKind::NotFound,
            TodoError::Persistence(_) => ErrorKind::Persistence,
            TodoError::Internal(_) => ErrorKind::Internal,
        }
    }
}
