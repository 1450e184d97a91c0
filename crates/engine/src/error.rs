// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle Engine error kinds, wrapping the Cluster Adapter's own.

use thiserror::Error;
use wf_cluster::ClusterError;
use wf_core::WorkflowId;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Cluster(#[from] ClusterError),

    #[error("unknown workflow: {0}")]
    UnknownWorkflow(WorkflowId),

    #[error("failed to serialize store payload: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl EngineError {
    /// `true` for a cluster-level not-found, surfaced unchanged rather than
    /// wrapped, matching `ClusterError::is_not_found`.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::Cluster(e) if e.is_not_found())
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
