// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Workflow Registry: the process-local mapping from workflow id to
//! its aggregate state. The Lifecycle Engine owns every field except
//! `phase` and `worker_state`, which the Pod Monitor also writes.

use std::collections::HashMap;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use wf_core::{ConfigMapId, InputConfig, JobId, Phase, PodStateSnapshot, PvcId, WorkflowId, WorkflowInputRecord, WorkflowState};

/// The monitor-side handle recorded against a workflow once
/// `commit_workflow` spawns its supervisor task.
///
/// `cancel` is the "please stop" signal the Lifecycle Engine raises from
/// `stop_workflow`; `exited` is raised by the monitor task itself right
/// before it returns, on either the cancellation or the natural-completion
/// path, so a waiter never races the signal.
#[derive(Debug, Clone)]
pub struct MonitorHandle {
    pub cancel: CancellationToken,
    pub exited: CancellationToken,
}

impl MonitorHandle {
    pub fn new() -> Self {
        Self {
            cancel: CancellationToken::new(),
            exited: CancellationToken::new(),
        }
    }
}

impl Default for MonitorHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct Entry {
    state: WorkflowState,
    monitor: Option<MonitorHandle>,
}

/// Process-local mapping from workflow id to its aggregate state. Missing
/// keys create an empty record on appending writes; reads return `None`
/// for an absent workflow.
#[derive(Default)]
pub struct WorkflowRegistry {
    entries: Mutex<HashMap<WorkflowId, Entry>>,
}

impl WorkflowRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot of the workflow's current state, or `None` if it has
    /// never been touched.
    pub fn get(&self, id: WorkflowId) -> Option<WorkflowState> {
        self.entries.lock().get(&id).map(|e| e.state.clone())
    }

    /// Insert a fresh, default-initialized entry if one does not already
    /// exist. Idempotent.
    pub fn upsert(&self, id: WorkflowId) {
        self.entries.lock().entry(id).or_default();
    }

    pub fn append_config_map(&self, id: WorkflowId, config_map_id: ConfigMapId) {
        self.entries
            .lock()
            .entry(id)
            .or_default()
            .state
            .config_map_ids
            .push(config_map_id);
    }

    /// Append a non-environment input record, creating `input_config` with
    /// a fresh id if this is the first one.
    pub fn append_input_resource(&self, id: WorkflowId, record: WorkflowInputRecord) {
        let mut entries = self.entries.lock();
        let entry = entries.entry(id).or_default();
        let input_config = entry.state.input_config.get_or_insert_with(|| InputConfig {
            id: uuid::Uuid::new_v4().to_string(),
            entries: Vec::new(),
        });
        input_config.entries.push(record);
    }

    pub fn set_volume_claim(&self, id: WorkflowId, pvc_id: PvcId) {
        self.entries.lock().entry(id).or_default().state.volume_claim_id = Some(pvc_id);
    }

    pub fn set_job_id(&self, id: WorkflowId, job_id: JobId) {
        self.entries.lock().entry(id).or_default().state.job_id = Some(job_id);
    }

    pub fn set_phase(&self, id: WorkflowId, phase: Phase) {
        self.entries.lock().entry(id).or_default().state.phase = phase;
    }

    pub fn set_worker_state(&self, id: WorkflowId, snapshot: PodStateSnapshot) {
        self.entries.lock().entry(id).or_default().state.worker_state = Some(snapshot);
    }

    pub fn set_monitor_handle(&self, id: WorkflowId, handle: MonitorHandle) {
        self.entries.lock().entry(id).or_default().monitor = Some(handle);
    }

    pub fn monitor_handle(&self, id: WorkflowId) -> Option<MonitorHandle> {
        self.entries.lock().get(&id).and_then(|e| e.monitor.clone())
    }

    /// Transition the workflow to `FINISHED`. Does not remove the entry —
    /// terminal state remains queryable.
    pub fn mark_finished(&self, id: WorkflowId) {
        self.set_phase(id, Phase::Finished);
    }

    /// Drop the registry entry entirely. Not invoked by `cleanup` itself;
    /// exposed for callers that want to reclaim memory once a terminal
    /// workflow's status has been retrieved for the last time.
    pub fn forget(&self, id: WorkflowId) {
        self.entries.lock().remove(&id);
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
