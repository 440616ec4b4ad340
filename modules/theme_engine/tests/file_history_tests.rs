//! Raw theme files: history, restore and diff

mod common;

use common::{print_test_header, FailingPublisher, Harness};
use std::sync::Arc;
use theme_engine::contract::*;
use theme_engine::domain::diff::DiffStatus;
use uuid::Uuid;

const PATH: &str = "assets/theme.css";

#[tokio::test]
async fn test_save_records_create_then_update() {
    let h = Harness::new();
    let store_id = Uuid::new_v4();

    let created = h
        .service
        .save_file(store_id, "dawn", PATH, "body { color: black; }")
        .await
        .unwrap();
    assert_eq!(created.version, 1);
    assert_eq!(created.change_type, FileChangeType::Create);

    let updated = h
        .service
        .save_file(store_id, "dawn", PATH, "body { color: navy; }")
        .await
        .unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.change_type, FileChangeType::Update);

    let content = h.service.read_file(store_id, "dawn", PATH).await.unwrap();
    assert_eq!(content, "body { color: navy; }");

    // Histories are per store and per file
    let other = h
        .service
        .save_file(Uuid::new_v4(), "dawn", PATH, "x")
        .await
        .unwrap();
    assert_eq!(other.version, 1);
    let layout = h
        .service
        .save_file(store_id, "dawn", "layout/theme.liquid", "<html>")
        .await
        .unwrap();
    assert_eq!(layout.version, 1);
}

#[tokio::test]
async fn test_restore_can_itself_be_undone() {
    print_test_header(
        "test_restore_can_itself_be_undone",
        "Restoring the pre_restore entry written by a restore brings back the overwritten content",
    );
    let h = Harness::new();
    let store_id = Uuid::new_v4();
    let first = h.service.save_file(store_id, "dawn", PATH, "v1").await.unwrap();
    h.service.save_file(store_id, "dawn", PATH, "v2").await.unwrap();

    let restored = h
        .service
        .restore_file(store_id, "dawn", PATH, first.id)
        .await
        .unwrap();
    assert_eq!(restored.change_type, FileChangeType::Restore);
    assert_eq!(restored.version, 4);
    assert_eq!(h.service.read_file(store_id, "dawn", PATH).await.unwrap(), "v1");

    let history = h
        .service
        .list_file_history(store_id, "dawn", PATH, None)
        .await
        .unwrap();
    let summary: Vec<(i32, FileChangeType, &str)> = history
        .iter()
        .map(|entry| (entry.version, entry.change_type, entry.content.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (4, FileChangeType::Restore, "v1"),
            (3, FileChangeType::PreRestore, "v2"),
            (2, FileChangeType::Update, "v2"),
            (1, FileChangeType::Create, "v1"),
        ]
    );

    // Undo the undo
    let pre_restore = history[1].id;
    h.service
        .restore_file(store_id, "dawn", PATH, pre_restore)
        .await
        .unwrap();
    assert_eq!(h.service.read_file(store_id, "dawn", PATH).await.unwrap(), "v2");

    let history = h
        .service
        .list_file_history(store_id, "dawn", PATH, None)
        .await
        .unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(history[1].change_type, FileChangeType::PreRestore);
    assert_eq!(history[1].content, "v1");
    assert!(h.events.kinds().iter().all(|kind| *kind == "file_restored"));
}

#[tokio::test]
async fn test_restore_rejects_foreign_history_entry() {
    let h = Harness::new();
    let store_id = Uuid::new_v4();
    let other_file = h
        .service
        .save_file(store_id, "dawn", "assets/other.css", "a")
        .await
        .unwrap();
    h.service.save_file(store_id, "dawn", PATH, "b").await.unwrap();

    let err = h
        .service
        .restore_file(store_id, "dawn", PATH, other_file.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeEngineError::Validation { .. }));

    let err = h
        .service
        .restore_file(Uuid::new_v4(), "dawn", "assets/other.css", other_file.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeEngineError::Validation { .. }));

    let err = h
        .service
        .restore_file(store_id, "dawn", PATH, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeEngineError::NotFound { .. }));
    assert_eq!(h.service.read_file(store_id, "dawn", PATH).await.unwrap(), "b");
}

#[tokio::test]
async fn test_file_paths_are_confined() {
    let h = Harness::new();
    let store_id = Uuid::new_v4();

    for path in ["../secrets.env", "/etc/passwd", "assets//theme.css", "assets/./x", ""] {
        let err = h
            .service
            .save_file(store_id, "dawn", path, "x")
            .await
            .unwrap_err();
        assert!(
            matches!(err, ThemeEngineError::Validation { .. }),
            "path {:?} was accepted",
            path
        );
    }

    let err = h.service.read_file(store_id, "dawn", PATH).await.unwrap_err();
    assert!(matches!(err, ThemeEngineError::NotFound { .. }));
}

#[tokio::test]
async fn test_history_listing_is_bounded() {
    let config = theme_engine::Config {
        file_history_limit: 3,
        ..Default::default()
    };
    let h = Harness::with_config(config);
    let store_id = Uuid::new_v4();
    for index in 0..5 {
        h.service
            .save_file(store_id, "dawn", PATH, &format!("rev {}", index))
            .await
            .unwrap();
    }

    let default = h
        .service
        .list_file_history(store_id, "dawn", PATH, None)
        .await
        .unwrap();
    let versions: Vec<i32> = default.iter().map(|entry| entry.version).collect();
    assert_eq!(versions, vec![5, 4, 3]);

    let too_many = h
        .service
        .list_file_history(store_id, "dawn", PATH, Some(50))
        .await
        .unwrap();
    assert_eq!(too_many.len(), 3);
}

#[tokio::test]
async fn test_diff_between_versions() {
    let h = Harness::new();
    let store_id = Uuid::new_v4();
    h.service
        .save_file(store_id, "dawn", PATH, "a\nb\nc")
        .await
        .unwrap();
    h.service
        .save_file(store_id, "dawn", PATH, "a\nB\nc\nd")
        .await
        .unwrap();

    let diff = h
        .service
        .diff_file_versions(store_id, "dawn", PATH, 1, 2)
        .await
        .unwrap();
    let summary: Vec<(DiffStatus, &str)> = diff
        .iter()
        .map(|line| (line.status, line.text.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (DiffStatus::Unchanged, "a"),
            (DiffStatus::Removed, "b"),
            (DiffStatus::Added, "B"),
            (DiffStatus::Unchanged, "c"),
            (DiffStatus::Added, "d"),
        ]
    );

    let err = h
        .service
        .diff_file_versions(store_id, "dawn", PATH, 1, 9)
        .await
        .unwrap_err();
    assert!(matches!(err, ThemeEngineError::NotFound { .. }));
}

#[tokio::test]
async fn test_publisher_failure_does_not_fail_restore() {
    let h = Harness::with_publisher(Arc::new(FailingPublisher));
    let store_id = Uuid::new_v4();
    let first = h.service.save_file(store_id, "dawn", PATH, "one").await.unwrap();
    h.service.save_file(store_id, "dawn", PATH, "two").await.unwrap();

    h.service
        .restore_file(store_id, "dawn", PATH, first.id)
        .await
        .unwrap();
    assert_eq!(h.service.read_file(store_id, "dawn", PATH).await.unwrap(), "one");
}
