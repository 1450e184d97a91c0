// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::time::Duration;

use tempfile::tempdir;
use wf_cluster::{BackendConfig, FakeClusterAdapter, JobStorageType};
use wf_core::Phase;
use wf_engine::WorkflowRegistry;
use wf_objectstore::FakeObjectStore;

use super::*;

fn write_asset(dir: &std::path::Path, body: serde_json::Value) {
    let id = body["service_id"].as_str().expect("service_id").to_string();
    let mut file = std::fs::File::create(dir.join(format!("{id}.json"))).expect("create asset file");
    file.write_all(body.to_string().as_bytes()).expect("write asset file");
}

fn daemon_config() -> DaemonConfig {
    DaemonConfig {
        workflow_api_user: "gx4ki".to_string(),
        access_token: "secret-token".to_string(),
        instant_removal: true,
        cleanup_grace: Duration::from_secs(0),
        backend_config: BackendConfig {
            kubeconfig_path: None,
            in_cluster: true,
            image_pull_secret: "regcred".to_string(),
            side_car_image: "registry.example/side-car:latest".to_string(),
            job_storage_type: JobStorageType::EmptyDir,
            job_storage_size: "1Gi".to_string(),
            namespace: "workflows".to_string(),
            api_config_secret: "workflow-api-config".to_string(),
        },
        object_store_config: wf_objectstore::ObjectStoreConfig {
            endpoint: "minio.internal:9000".to_string(),
            access_key: "ak".to_string(),
            secret_key: "sk".to_string(),
            secure: false,
        },
    }
}

fn build_facade(
    dir: &std::path::Path,
) -> (ServiceFacade, Arc<FakeClusterAdapter>, Arc<FakeObjectStore>) {
    let cluster = Arc::new(FakeClusterAdapter::new());
    let object_store = Arc::new(FakeObjectStore::new());
    let registry = Arc::new(WorkflowRegistry::new());
    let config = daemon_config();
    let engine = Arc::new(LifecycleEngine::new(
        cluster.clone(),
        registry,
        config.backend_config.clone(),
        "workflow-api",
    ));
    let facade = ServiceFacade::bootstrap(config, dir, object_store.clone(), engine).expect("bootstrap facade");
    (facade, cluster, object_store)
}

fn dummy_service(service_id: &str) -> serde_json::Value {
    serde_json::json!({
        "service_id": service_id,
        "input_resources": [{"name": "env", "kind": "environment"}],
        "output_resources": [{"name": "result", "kind": "data"}],
        "workflow_resource_spec": {
            "worker_image": "registry.example/worker:latest",
            "worker_output_directory": "/output",
        },
    })
}

#[tokio::test]
async fn put_input_rejects_undeclared_resource() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, _store) = build_facade(dir.path());

    let err = facade.put_input("dummy", "not-declared", vec![1]).await.unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn put_input_writes_to_declared_key() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, store) = build_facade(dir.path());

    facade.put_input("dummy", "env", b"A=1\nB=2".to_vec()).await.expect("put_input succeeds");

    let bytes = store.get_file("gx4ki-storage", "dummy/inputs/env").await.expect("seeded file");
    assert_eq!(bytes, b"A=1\nB=2");
}

#[tokio::test]
async fn execute_rejects_when_inputs_missing() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, _store) = build_facade(dir.path());

    let err = facade.execute("dummy").await.unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn happy_path_single_environment_input_reaches_finished() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, cluster, store) = build_facade(dir.path());

    store.put_file("gx4ki-storage", "dummy/inputs/env", b"A=1\nB=2".to_vec()).await.unwrap();

    let workflow_id = facade.execute("dummy").await.expect("execute succeeds");
    assert!(facade.list_workflows().contains(&workflow_id));

    // The background submission task (handle_input, then commit_workflow)
    // runs on its own spawned task; none of its steps ever actually
    // suspend against this fake, so give the executor a few scheduling
    // turns to drive it to completion before asserting on its effects.
    // Driving the pod past RUNNING is covered at the engine level
    // (`lifecycle_tests.rs`, `monitor_tests.rs`) where the test task
    // controls `script_events` ordering directly; at the facade layer the
    // job id isn't known until the spawned task mints it, so this test
    // only verifies that submission reaches the cluster.
    let mut job_name = None;
    for _ in 0..50 {
        tokio::time::sleep(Duration::from_millis(10)).await;
        job_name = cluster.calls().into_iter().find_map(|c| match c {
            wf_cluster::ClusterCall::CreatePod { name } => Some(name),
            _ => None,
        });
        if job_name.is_some() {
            break;
        }
    }
    let job_name = job_name.expect("pod created");
    assert!(cluster.has_pod(&job_name));

    let calls = cluster.calls();
    assert!(calls.iter().any(|c| matches!(c, wf_cluster::ClusterCall::CreateConfigMap { .. })));
}

#[tokio::test]
async fn get_output_requires_declared_resource() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, _store) = build_facade(dir.path());

    let err = facade.get_output("dummy", "not-declared").await.unwrap_err();
    assert_eq!(err.status(), 400);
}

#[tokio::test]
async fn get_output_not_found_when_not_produced() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, _store) = build_facade(dir.path());

    let err = facade.get_output("dummy", "result").await.unwrap_err();
    assert_eq!(err.status(), 404);
}

#[tokio::test]
async fn stop_unknown_workflow_is_validation_error() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, _store) = build_facade(dir.path());

    let err = facade.stop("dummy", wf_core::WorkflowId::new()).await.unwrap_err();
    assert_eq!(err.status(), 400);
}

#[test]
fn service_description_unknown_service_is_validation_error() {
    let dir = tempdir().expect("tempdir");
    write_asset(dir.path(), dummy_service("dummy"));
    let (facade, _cluster, _store) = build_facade(dir.path());

    let err = facade.service_description("unknown").unwrap_err();
    assert_eq!(err.status(), 400);
}
