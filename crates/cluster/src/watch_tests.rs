// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use k8s_openapi::api::core::v1::{
    ContainerState as K8sContainerState, ContainerStatus, PodCondition, PodStatus,
};

fn pod_with_status(status: PodStatus) -> Pod {
    Pod {
        status: Some(status),
        ..Default::default()
    }
}

#[test]
fn snapshot_with_no_container_statuses() {
    let pod = pod_with_status(PodStatus {
        phase: Some("Pending".to_string()),
        ..Default::default()
    });
    let snapshot = pod_to_snapshot("MODIFIED", &pod);
    assert_eq!(snapshot.pod_phase, "Pending");
    assert!(snapshot.containers.is_empty());
}

#[test]
fn snapshot_maps_running_worker() {
    let pod = pod_with_status(PodStatus {
        phase: Some("Running".to_string()),
        conditions: Some(vec![PodCondition {
            type_: "Ready".to_string(),
            status: "True".to_string(),
            ..Default::default()
        }]),
        container_statuses: Some(vec![ContainerStatus {
            name: "worker".to_string(),
            state: Some(K8sContainerState {
                running: Some(Default::default()),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    });
    let snapshot = pod_to_snapshot("MODIFIED", &pod);
    assert_eq!(snapshot.pod_conditions, vec!["Ready".to_string()]);
    assert!(snapshot.worker().is_some_and(ContainerState::is_running));
}

#[test]
fn snapshot_maps_terminated_worker() {
    let pod = pod_with_status(PodStatus {
        phase: Some("Succeeded".to_string()),
        container_statuses: Some(vec![ContainerStatus {
            name: "worker".to_string(),
            state: Some(K8sContainerState {
                terminated: Some(ContainerStateTerminated {
                    exit_code: 0,
                    reason: Some("Completed".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    });
    let snapshot = pod_to_snapshot("MODIFIED", &pod);
    assert!(snapshot.worker().is_some_and(ContainerState::is_terminated));
}

#[test]
fn snapshot_maps_image_pull_failure() {
    let pod = pod_with_status(PodStatus {
        phase: Some("Pending".to_string()),
        container_statuses: Some(vec![ContainerStatus {
            name: "worker".to_string(),
            state: Some(K8sContainerState {
                waiting: Some(ContainerStateWaiting {
                    reason: Some("ErrImagePull".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }]),
        ..Default::default()
    });
    let snapshot = pod_to_snapshot("MODIFIED", &pod);
    assert_eq!(snapshot.worker().and_then(ContainerState::details), Some("ErrImagePull"));
}
