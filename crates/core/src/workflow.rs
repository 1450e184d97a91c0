// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The per-workflow data model owned by the Workflow Registry: phases,
//! input records, observed pod state, and the aggregate `WorkflowState`.

use serde::{Deserialize, Serialize};

use crate::id::{ConfigMapId, JobId, PvcId};
use crate::service::ResourceKind;

/// The five phases a workflow moves through. `FINISHED` and `CANCELED` are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    Preparing,
    Running,
    Storing,
    Finished,
    Canceled,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Finished | Phase::Canceled)
    }
}

/// One non-environment input recorded against a workflow, consumed later by
/// the input-init container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowInputRecord {
    pub name: String,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
}

/// The lazily created registry of non-environment inputs, materialized as a
/// single config map keyed `input-init.json` on commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub id: String,
    pub entries: Vec<WorkflowInputRecord>,
}

/// The observed state of one container within the worker pod.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContainerState {
    Running,
    Waiting { reason: Option<String> },
    Terminated { exit_code: i32, reason: Option<String> },
}

impl ContainerState {
    pub fn is_terminated(&self) -> bool {
        matches!(self, ContainerState::Terminated { .. })
    }

    pub fn is_running(&self) -> bool {
        matches!(self, ContainerState::Running)
    }

    /// Free-text detail useful for surfacing fatal errors (e.g. `ErrImagePull`).
    pub fn details(&self) -> Option<&str> {
        match self {
            ContainerState::Waiting { reason } | ContainerState::Terminated { reason, .. } => {
                reason.as_deref()
            }
            ContainerState::Running => None,
        }
    }
}

/// One event observed from `watch_pod_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PodStateSnapshot {
    pub event_type: String,
    pub pod_phase: String,
    pub pod_conditions: Vec<String>,
    pub containers: std::collections::BTreeMap<String, ContainerState>,
}

impl PodStateSnapshot {
    pub fn worker(&self) -> Option<&ContainerState> {
        self.containers.get("worker")
    }
}

/// The full per-workflow aggregate owned by the Workflow Registry.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub config_map_ids: Vec<ConfigMapId>,
    pub input_config: Option<InputConfig>,
    pub volume_claim_id: Option<PvcId>,
    pub job_id: Option<JobId>,
    pub phase: Phase,
    pub worker_state: Option<PodStateSnapshot>,
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            config_map_ids: Vec::new(),
            input_config: None,
            volume_claim_id: None,
            job_id: None,
            phase: Phase::Preparing,
            worker_state: None,
        }
    }
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
