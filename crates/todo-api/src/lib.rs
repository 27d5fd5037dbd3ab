//! Todo CRUD の HTTP API（axum）
//!
//! `/todos` の各メソッドを `TodoService` へ振り分けます。
//! データストアのハンドルは `AppState` 経由で注入します。

use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, MethodFilter},
    Router,
};
use infrastructure::TodoService;

pub mod error;
pub mod handlers;

use error::ApiError;

/// アプリケーションの共有状態
#[derive(Clone)]
pub struct AppState {
    pub todos: TodoService,
}

/// ルータを構築して返します。
pub fn app(todos: TodoService, request_timeout: Duration) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health))
        .route(
            "/todos",
            get(handlers::read_todos)
                .post(handlers::create_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todos)
                // get() は HEAD にも応答するため明示的に拒否する
                .on(MethodFilter::HEAD, handlers::method_not_supported)
                .fallback(handlers::method_not_supported),
        )
        .layer(middleware::from_fn_with_state(request_timeout, with_deadline))
        .with_state(AppState { todos })
}

/// リクエストに期限を設ける。期限切れの場合は処理中の Future を drop し、
/// 実行中のデータストア呼び出しもそこで打ち切られる
async fn with_deadline(
    State(timeout): State<Duration>,
    req: Request,
    next: Next,
) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    tracing::info!(%method, %path, "incoming request");

    match tokio::time::timeout(timeout, next.run(req)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%method, %path, timeout_ms = timeout.as_millis() as u64, "request timed out");
            ApiError::Timeout.into_response()
        }
    }
}
