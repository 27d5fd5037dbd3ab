//! Todo の CRUD を担うサービス
//!
//! 永続化操作を発行してよいのはこのモジュールだけです。SQL と行のマッピングを
//! ここに閉じ込め、呼び出し側にはドメイン型と `TodoError` だけを返します。
//! 呼び出し側の Future が drop されると実行中のクエリも中断されます。

use std::collections::BTreeSet;

use domain::{ReadTodoRequest, Todo, TodoError, TodoId};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, error, info};

use crate::TodoRecord;

const SELECT_TODOS: &str =
    "SELECT id, subject, description, created_at, updated_at FROM todos";

const SELECT_TODO_BY_ID: &str =
    "SELECT id, subject, description, created_at, updated_at FROM todos WHERE id = ?";

const INSERT_TODO: &str = "INSERT INTO todos (subject, description) VALUES (?, ?)";

/// `updated_at` は必ず前進させる。現在時刻が前回値以下（同一ミリ秒内の更新）なら前回値 + 1ms
const UPDATE_TODO: &str = r#"
UPDATE todos
SET subject = ?,
    description = ?,
    updated_at = CASE
        WHEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now') > updated_at
            THEN strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
        ELSE strftime('%Y-%m-%dT%H:%M:%fZ', updated_at, '+0.001 seconds')
    END
WHERE id = ?
"#;

/// 1 文あたりのバインド数の上限（SQLite の既定上限 32766 より小さく取る）
pub const DELETE_BATCH_SIZE: usize = 10_000;

/// データストアのハンドルは構築時に注入する
#[derive(Clone)]
pub struct TodoService {
    pool: SqlitePool,
}

impl TodoService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 1 行挿入し、採番された ID で読み直して返します。
    pub async fn create_todo(&self, subject: &str, description: &str) -> Result<Todo, TodoError> {
        let result = sqlx::query(INSERT_TODO)
            .bind(subject)
            .bind(description)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        let id = result.last_insert_rowid();
        let todo = self
            .find_todo(id)
            .await?
            .ok_or_else(|| TodoError::Persistence(format!("inserted todo {id} could not be re-read")))?;

        info!(todo_id = id, "todo created");
        Ok(todo)
    }

    /// ID 降順で最大 `size` 件を返します（キーセットページング）。
    ///
    /// `prev_id` が 0 以外なら `id < prev_id` の行だけを対象にします。
    /// 次ページは今回返した最小 ID を `prev_id` に渡して取得します。
    pub async fn read_todos(&self, prev_id: TodoId, size: i64) -> Result<Vec<Todo>, TodoError> {
        let page = ReadTodoRequest { prev_id, size };

        let mut query = QueryBuilder::<Sqlite>::new(SELECT_TODOS);
        if let Some(cursor) = page.cursor() {
            query.push(" WHERE id < ").push_bind(cursor);
        }
        query.push(" ORDER BY id DESC LIMIT ").push_bind(page.page_size());

        let records: Vec<TodoRecord> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(persistence)?;

        debug!(prev_id, size = page.page_size(), count = records.len(), "todos read");
        Ok(records.into_iter().map(Todo::from).collect())
    }

    /// 件名と説明を更新し、`updated_at` を進めます。
    ///
    /// 更新件数が 0 の場合は `NotFound` を返し、データは変化しません。
    pub async fn update_todo(
        &self,
        id: TodoId,
        subject: &str,
        description: &str,
    ) -> Result<Todo, TodoError> {
        let result = sqlx::query(UPDATE_TODO)
            .bind(subject)
            .bind(description)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(persistence)?;

        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }

        // 読み直しの前に別リクエストで削除された場合も NotFound
        let todo = self.find_todo(id).await?.ok_or_else(|| not_found(id))?;
        info!(todo_id = id, "todo updated");
        Ok(todo)
    }

    /// ID 集合に含まれる行を 1 トランザクションでまとめて削除します。
    ///
    /// `DELETE_BATCH_SIZE` 件ごとに `id IN (...)` 文を発行し、最後に 1 回だけコミットする。
    /// 一部の ID が存在しなくても成功とし、1 行も削除されなかった場合のみ `NotFound`
    /// （その場合はロールバックされる）。
    pub async fn delete_todos(&self, ids: &BTreeSet<TodoId>) -> Result<(), TodoError> {
        // 空集合はハンドラの validate で弾かれるため、通常ここには到達しない
        if ids.is_empty() {
            return Err(TodoError::Validation("ids must not be empty".to_string()));
        }

        let ids: Vec<TodoId> = ids.iter().copied().collect();
        let mut tx = self.pool.begin().await.map_err(persistence)?;

        let mut deleted = 0;
        for batch in ids.chunks(DELETE_BATCH_SIZE) {
            let mut query = QueryBuilder::<Sqlite>::new("DELETE FROM todos WHERE id IN (");
            let mut separated = query.separated(", ");
            for id in batch {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");

            let result = query
                .build()
                .execute(&mut *tx)
                .await
                .map_err(persistence)?;
            deleted += result.rows_affected();
        }

        if deleted == 0 {
            // tx は drop 時にロールバックされる
            return Err(TodoError::NotFound(format!("none of {} ids exist", ids.len())));
        }
        tx.commit().await.map_err(persistence)?;

        info!(requested = ids.len(), deleted, "todos deleted");
        Ok(())
    }

    async fn find_todo(&self, id: TodoId) -> Result<Option<Todo>, TodoError> {
        let record: Option<TodoRecord> = sqlx::query_as(SELECT_TODO_BY_ID)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(persistence)?;
        Ok(record.map(Todo::from))
    }
}

fn not_found(id: TodoId) -> TodoError {
    TodoError::NotFound(id.to_string())
}

fn persistence(e: sqlx::Error) -> TodoError {
    error!(error = %e, "datastore error");
    TodoError::Persistence(e.to_string())
}
