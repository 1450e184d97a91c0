// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn put_then_get_round_trips() {
    let store = FakeObjectStore::new();
    store
        .put_file("user-storage", "svc/outputs/wf/result.tar", b"payload".to_vec())
        .await
        .expect("put succeeds");

    let bytes = store
        .get_file("user-storage", "svc/outputs/wf/result.tar")
        .await
        .expect("get succeeds");
    assert_eq!(bytes, b"payload");
}

#[tokio::test]
async fn get_missing_object_is_not_found() {
    let store = FakeObjectStore::new();
    let err = store
        .get_file("user-storage", "missing")
        .await
        .expect_err("nothing was put");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn get_objects_list_filters_by_prefix() {
    let store = FakeObjectStore::new();
    store.seed("user-storage", "svc/outputs/a", b"1".to_vec());
    store.seed("user-storage", "svc/outputs/b", b"2".to_vec());
    store.seed("user-storage", "svc/inputs/c", b"3".to_vec());

    let outputs = store
        .get_objects_list("user-storage", Some("svc/outputs/"))
        .await
        .expect("list succeeds");
    assert_eq!(outputs.len(), 2);

    let all = store
        .get_objects_list("user-storage", None)
        .await
        .expect("list succeeds");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn bucket_exists_reflects_create_bucket() {
    let store = FakeObjectStore::new();
    assert!(!store.bucket_exists("fresh").await.unwrap());
    store.create_bucket("fresh").await.unwrap();
    assert!(store.bucket_exists("fresh").await.unwrap());
}
