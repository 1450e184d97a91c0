// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The one-time process configuration passed to `ClusterAdapter::setup`.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Storage mode for a workflow's shared job volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStorageType {
    EmptyDir,
    PersistentVolumeClaim,
}

/// Recognized configuration for `ClusterAdapter::setup`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Path to a kubeconfig file. `None` means "load in-cluster credentials".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubeconfig_path: Option<PathBuf>,
    pub in_cluster: bool,
    pub image_pull_secret: String,
    pub side_car_image: String,
    pub job_storage_type: JobStorageType,
    pub job_storage_size: String,
    /// Cluster namespace every workflow-scoped object is created in.
    pub namespace: String,
    /// Secret carrying the ambient API configuration the input-init
    /// container reads (mounted at `/opt/config/workflow-api.cfg`).
    pub api_config_secret: String,
}
