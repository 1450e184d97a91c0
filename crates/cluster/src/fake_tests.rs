// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::BTreeMap;

fn backend_config() -> BackendConfig {
    BackendConfig {
        kubeconfig_path: None,
        in_cluster: false,
        image_pull_secret: "regcred".to_string(),
        side_car_image: "example/sidecar:latest".to_string(),
        job_storage_type: crate::config::JobStorageType::EmptyDir,
        job_storage_size: "1Gi".to_string(),
        namespace: "default".to_string(),
        api_config_secret: "workflow-api-config".to_string(),
    }
}

#[tokio::test]
async fn create_config_map_rejects_duplicates() {
    let adapter = FakeClusterAdapter::new();
    adapter.setup(backend_config()).await.expect("setup");
    adapter
        .create_config_map("cm-1", "default", BTreeMap::new(), BTreeMap::new())
        .await
        .expect("first create succeeds");
    let second = adapter
        .create_config_map("cm-1", "default", BTreeMap::new(), BTreeMap::new())
        .await;
    assert!(matches!(second, Err(ClusterError::AlreadyExists(_))));
}

#[tokio::test]
async fn delete_config_map_is_tolerant_of_missing() {
    let adapter = FakeClusterAdapter::new();
    assert!(adapter.delete_config_map("missing", "default").await.is_ok());
}

#[tokio::test]
async fn watch_pod_events_plays_back_the_script_and_stops_on_true() {
    let adapter = FakeClusterAdapter::new();
    let snapshot = |phase: &str| PodStateSnapshot {
        event_type: "MODIFIED".to_string(),
        pod_phase: phase.to_string(),
        pod_conditions: vec![],
        containers: BTreeMap::new(),
    };
    adapter.script_events("pod-1", vec![snapshot("Pending"), snapshot("Running")]);

    let observed = Arc::new(Mutex::new(Vec::new()));
    let observed2 = observed.clone();
    adapter
        .watch_pod_events(
            "pod-1",
            "default",
            Box::new(move |s: PodStateSnapshot| {
                observed2.lock().push(s.pod_phase.clone());
                true
            }),
        )
        .await
        .expect("watch succeeds");

    assert_eq!(*observed.lock(), vec!["Pending".to_string()]);
}

#[tokio::test]
async fn port_forward_post_returns_scripted_status() {
    let adapter = FakeClusterAdapter::new();
    adapter.set_port_forward_status(500);
    let status = adapter
        .port_forward_post("pod-1", "default", 9999, b"{}".to_vec())
        .await
        .expect("fake never errors");
    assert_eq!(status, 500);
    assert_eq!(
        adapter.calls(),
        vec![ClusterCall::PortForwardPost {
            pod_name: "pod-1".to_string(),
            port: 9999
        }]
    );
}
