// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Identifier newtypes used throughout the workflow lifecycle engine.
//!
//! Every id here is a v4 uuid rather than a prefixed nanoid: cluster object
//! names, config map names, and PVC names all need to be valid Kubernetes
//! object names, and the caller-supplied `workflow_id` is itself an
//! externally minted uuid per the data model, so keeping every sibling id
//! in the same format avoids a parallel convention.

use crate::define_uuid_id;

define_uuid_id! {
    /// Identifies a single workflow submission.
    pub struct WorkflowId;
}

define_uuid_id! {
    /// Identifies the pod running a workflow. Interchangeable with "job id".
    pub struct JobId;
}

define_uuid_id! {
    /// Identifies a single config map created on behalf of a workflow.
    pub struct ConfigMapId;
}

define_uuid_id! {
    /// Identifies a persistent-volume claim created on behalf of a workflow.
    pub struct PvcId;
}

/// `JobId` doubles as the pod name; this alias documents call sites that
/// pass it to cluster operations expecting a pod name rather than an
/// opaque identifier.
pub type PodName = JobId;

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
