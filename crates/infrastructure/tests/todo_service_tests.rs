use std::collections::{BTreeSet, HashSet};

use domain::ErrorKind;
use infrastructure::{connect, TodoService};
use shared::Config;

/// テストごとに独立したインメモリ DB を用意
async fn setup() -> TodoService {
    let pool = connect(&Config::in_memory())
        .await
        .expect("インメモリ DB の作成に失敗");
    TodoService::new(pool)
}

#[tokio::test]
async fn concurrent_creates_get_unique_ids() {
    let svc = setup().await;

    let futures = (0..20).map(|i| {
        let svc = svc.clone();
        async move { svc.create_todo(&format!("task {i}"), "").await }
    });
    let results = futures::future::join_all(futures).await;

    let ids: HashSet<_> = results.into_iter().map(|r| r.unwrap().id).collect();
    assert_eq!(ids.len(), 20);
    assert!(!ids.contains(&0));
}

#[tokio::test]
async fn update_keeps_created_at_and_advances_updated_at() {
    let svc = setup().await;
    let todo = svc.create_todo("draft", "").await.unwrap();

    let updated = svc.update_todo(todo.id, "final", "done").await.unwrap();

    assert_eq!(updated.subject, "final");
    assert_eq!(updated.description, "done");
    assert_eq!(updated.created_at, todo.created_at);
    assert!(updated.updated_at > todo.updated_at);
    assert!(updated.created_at <= updated.updated_at);
}

#[tokio::test]
async fn failed_update_leaves_rows_unchanged() {
    let svc = setup().await;
    let todo = svc.create_todo("keep", "as is").await.unwrap();

    let err = svc.update_todo(todo.id + 1, "x", "y").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);

    assert_eq!(svc.read_todos(0, 0).await.unwrap(), vec![todo]);
}

#[tokio::test]
async fn deleted_ids_are_not_reused() {
    let svc = setup().await;
    let first = svc.create_todo("a", "").await.unwrap();
    svc.delete_todos(&BTreeSet::from([first.id])).await.unwrap();

    let second = svc.create_todo("b", "").await.unwrap();
    assert!(second.id > first.id);
}

#[tokio::test]
async fn delete_mixed_set_removes_existing_only() {
    let svc = setup().await;
    let a = svc.create_todo("a", "").await.unwrap();
    let b = svc.create_todo("b", "").await.unwrap();

    svc.delete_todos(&BTreeSet::from([a.id, b.id + 50, b.id + 51]))
        .await
        .unwrap();

    let remaining = svc.read_todos(0, 0).await.unwrap();
    assert_eq!(remaining, vec![b]);
}

#[tokio::test]
async fn page_size_bounds_result() {
    let svc = setup().await;
    for i in 0..5 {
        svc.create_todo(&format!("t{i}"), "").await.unwrap();
    }

    assert_eq!(svc.read_todos(0, 2).await.unwrap().len(), 2);
    assert_eq!(svc.read_todos(0, 0).await.unwrap().len(), 5);
}
