// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use tempfile::tempdir;

use super::*;

fn write_asset(dir: &Path, id: &str) {
    let body = serde_json::json!({
        "service_id": id,
        "input_resources": [],
        "output_resources": [{"name": "result", "kind": "data"}],
        "workflow_resource_spec": {"worker_image": "registry.example/worker:latest"},
    });
    let mut file = std::fs::File::create(dir.join(format!("{id}.json"))).expect("create asset file");
    file.write_all(body.to_string().as_bytes()).expect("write asset file");
}

#[test]
fn load_indexes_by_file_stem() {
    let dir = tempdir().expect("create temp asset dir");
    write_asset(dir.path(), "dummy");
    write_asset(dir.path(), "other");
    std::fs::write(dir.path().join("README.md"), "not json").expect("write non-json file");

    let loader = StaticAssetLoader::load(dir.path()).expect("load asset directory");
    assert_eq!(loader.listings().len(), 2);
    assert!(loader.description("dummy").is_some());
    assert!(loader.description("other").is_some());
    assert!(loader.description("missing").is_none());
}

#[test]
fn listing_validity_window_spans_seven_days() {
    let dir = tempdir().expect("create temp asset dir");
    write_asset(dir.path(), "dummy");

    let loader = StaticAssetLoader::load(dir.path()).expect("load asset directory");
    let listing = &loader.listings()[0];
    assert_eq!(listing.end_date - listing.start_date, chrono::Duration::days(7));
}

#[test]
fn load_fails_on_missing_directory() {
    let err = StaticAssetLoader::load(Path::new("/nonexistent/assets/dir"))
        .expect_err("missing directory is an error");
    assert!(matches!(err, DaemonError::Config(_)));
}
