// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Translates Kubernetes pod watch events into the `PodStateSnapshot` shape
//! the Pod Monitor consumes.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{ContainerStateTerminated, ContainerStateWaiting, Pod};
use wf_core::{ContainerState, PodStateSnapshot};

/// Convert a live `Pod` resource into the snapshot shape the Pod Monitor
/// consumes. Pure, no I/O.
pub fn pod_to_snapshot(event_type: &str, pod: &Pod) -> PodStateSnapshot {
    let pod_phase = pod
        .status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    let pod_conditions = pod
        .status
        .as_ref()
        .and_then(|s| s.conditions.as_ref())
        .map(|conditions| conditions.iter().map(|c| c.type_.clone()).collect())
        .unwrap_or_default();

    let mut containers = BTreeMap::new();
    if let Some(statuses) = pod.status.as_ref().and_then(|s| s.container_statuses.as_ref()) {
        for status in statuses {
            if let Some(state) = convert_container_state(status) {
                containers.insert(status.name.clone(), state);
            }
        }
    }

    PodStateSnapshot {
        event_type: event_type.to_string(),
        pod_phase,
        pod_conditions,
        containers,
    }
}

fn convert_container_state(
    status: &k8s_openapi::api::core::v1::ContainerStatus,
) -> Option<ContainerState> {
    let state = status.state.as_ref()?;
    if state.running.is_some() {
        return Some(ContainerState::Running);
    }
    if let Some(ContainerStateWaiting { reason, .. }) = state.waiting.as_ref() {
        return Some(ContainerState::Waiting {
            reason: reason.clone(),
        });
    }
    if let Some(ContainerStateTerminated {
        exit_code, reason, ..
    }) = state.terminated.as_ref()
    {
        return Some(ContainerState::Terminated {
            exit_code: *exit_code,
            reason: reason.clone(),
        });
    }
    None
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
