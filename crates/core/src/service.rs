// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The read-only service description model loaded at startup and shared
//! by the Lifecycle Engine and the Service Facade.

use serde::{Deserialize, Serialize};

/// The kind of an input or output resource a service declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Environment,
    Data,
    DataArchive,
}

impl ResourceKind {
    pub fn is_environment(self) -> bool {
        matches!(self, ResourceKind::Environment)
    }
}

/// One declared input or output of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResource {
    pub name: String,
    pub kind: ResourceKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mount_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// The worker container shape a service wants when executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowResourceSpec {
    pub worker_image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_output_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_command: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_args: Option<Vec<String>>,
    #[serde(default)]
    pub gpu_required: bool,
}

/// A full service description, as loaded from a single JSON file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    pub service_id: String,
    #[serde(default)]
    pub input_resources: Vec<ServiceResource>,
    #[serde(default)]
    pub output_resources: Vec<ServiceResource>,
    pub workflow_resource_spec: WorkflowResourceSpec,
}

impl ServiceDescription {
    pub fn input(&self, name: &str) -> Option<&ServiceResource> {
        self.input_resources.iter().find(|r| r.name == name)
    }

    pub fn output(&self, name: &str) -> Option<&ServiceResource> {
        self.output_resources.iter().find(|r| r.name == name)
    }

    /// Names of every declared output, in declaration order.
    pub fn output_names(&self) -> Vec<String> {
        self.output_resources.iter().map(|r| r.name.clone()).collect()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
