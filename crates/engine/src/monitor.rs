// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Pod Monitor: one supervisor task per active workflow, translating a
//! pod event stream into `WorkflowRegistry` writes and invoking the finish
//! callback on terminal success.

use std::sync::Arc;

use tokio::task::JoinHandle;
use wf_cluster::ClusterAdapter;
use wf_core::{ContainerState, JobId, Phase, PodStateSnapshot, WorkflowId};

use crate::lifecycle::FinishCallback;
use crate::registry::{MonitorHandle, WorkflowRegistry};

/// Spawn the monitor task for one workflow's pod. Must run after the
/// workflow's `job_id` has been recorded.
pub fn spawn(
    cluster: Arc<dyn ClusterAdapter>,
    registry: Arc<WorkflowRegistry>,
    workflow_id: WorkflowId,
    job_id: JobId,
    namespace: String,
    handle: MonitorHandle,
    on_finished: FinishCallback,
) -> JoinHandle<()> {
    tokio::spawn(run(cluster, registry, workflow_id, job_id, namespace, handle, on_finished))
}

async fn run(
    cluster: Arc<dyn ClusterAdapter>,
    registry: Arc<WorkflowRegistry>,
    workflow_id: WorkflowId,
    job_id: JobId,
    namespace: String,
    handle: MonitorHandle,
    on_finished: FinishCallback,
) {
    let cancel = handle.cancel.clone();
    let observer_registry = registry.clone();
    let observer = move |snapshot: PodStateSnapshot| -> bool {
        // Checked first: cancellation is observed by the *next* event, not
        // a hard interrupt of a blocked stream read.
        if cancel.is_cancelled() {
            observer_registry.set_phase(workflow_id, Phase::Canceled);
            return true;
        }

        observer_registry.set_worker_state(workflow_id, snapshot.clone());
        match snapshot.worker() {
            None => {
                observer_registry.set_phase(workflow_id, Phase::Preparing);
                false
            }
            Some(ContainerState::Running) => {
                observer_registry.set_phase(workflow_id, Phase::Running);
                false
            }
            Some(ContainerState::Terminated { .. }) => {
                observer_registry.set_phase(workflow_id, Phase::Storing);
                true
            }
            Some(ContainerState::Waiting { .. }) => {
                observer_registry.set_phase(workflow_id, Phase::Preparing);
                false
            }
        }
    };

    if let Err(err) = cluster
        .watch_pod_events(&job_id.to_string(), &namespace, Box::new(observer))
        .await
    {
        tracing::error!(%workflow_id, %job_id, %err, "pod event stream ended with an error");
    }

    // Only a terminal worker observation (STORING) triggers the finish
    // callback; a cancellation races it out.
    let final_phase = registry.get(workflow_id).map(|s| s.phase);
    if final_phase == Some(Phase::Storing) {
        tracing::info!(%workflow_id, %job_id, "worker terminated, invoking finish callback");
        on_finished(workflow_id).await;
    }

    handle.exited.cancel();
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
