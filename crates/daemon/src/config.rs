// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! File-based, section-keyed configuration loaded with `toml` + `serde`:
//! `[workflow_api]` and `[minio]`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use wf_cluster::{BackendConfig, JobStorageType};
use wf_objectstore::ObjectStoreConfig;

use crate::error::DaemonError;

fn default_true() -> bool {
    true
}

fn default_job_storage_type() -> JobStorageType {
    JobStorageType::EmptyDir
}

fn default_job_storage_size() -> String {
    "1Gi".to_string()
}

fn default_api_config_secret() -> String {
    "workflow-api-config".to_string()
}

/// 15 minutes.
fn default_cleanup_grace_secs() -> u64 {
    900
}

#[derive(Debug, Clone, Deserialize)]
struct WorkflowApiSection {
    workflow_api_user: String,
    workflow_api_access_token: String,
    workflow_backend: String,
    #[serde(default)]
    workflow_backend_kubeconfig: Option<PathBuf>,
    workflow_backend_namespace: String,
    workflow_backend_image_pull_secret: String,
    workflow_backend_data_side_car_image: String,
    #[serde(default = "default_true")]
    workflow_api_instant_removal: bool,
    #[serde(default = "default_job_storage_type")]
    job_storage_type: JobStorageType,
    #[serde(default = "default_job_storage_size")]
    job_storage_size: String,
    #[serde(default = "default_api_config_secret")]
    api_config_secret: String,
    #[serde(default = "default_cleanup_grace_secs")]
    cleanup_grace_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct MinioSection {
    endpoint: String,
    access_key: String,
    secret_key: String,
    #[serde(default)]
    secure: bool,
}

#[derive(Debug, Clone, Deserialize)]
struct RawConfig {
    workflow_api: WorkflowApiSection,
    minio: MinioSection,
}

/// Everything the daemon needs to start: cluster backend configuration,
/// object-store configuration, and the facade-level settings (the
/// configured user, access token, and instant-removal flag).
#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub workflow_api_user: String,
    pub access_token: String,
    pub instant_removal: bool,
    pub cleanup_grace: Duration,
    pub backend_config: BackendConfig,
    pub object_store_config: ObjectStoreConfig,
}

impl DaemonConfig {
    /// Bucket every object-store key lives under, `<user>-storage`.
    pub fn result_bucket(&self) -> String {
        format!("{}-storage", self.workflow_api_user)
    }

    pub fn load(path: &Path) -> Result<Self, DaemonError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| DaemonError::Config(format!("reading {}: {err}", path.display())))?;
        let raw: RawConfig = toml::from_str(&text)
            .map_err(|err| DaemonError::Config(format!("parsing {}: {err}", path.display())))?;

        if raw.workflow_api.workflow_backend != "kubernetes" {
            return Err(DaemonError::Config(format!(
                "unsupported workflow_backend {:?}, only \"kubernetes\" is implemented",
                raw.workflow_api.workflow_backend
            )));
        }

        let kubeconfig_path = raw.workflow_api.workflow_backend_kubeconfig;
        let backend_config = BackendConfig {
            in_cluster: kubeconfig_path.is_none(),
            kubeconfig_path,
            image_pull_secret: raw.workflow_api.workflow_backend_image_pull_secret,
            side_car_image: raw.workflow_api.workflow_backend_data_side_car_image,
            job_storage_type: raw.workflow_api.job_storage_type,
            job_storage_size: raw.workflow_api.job_storage_size,
            namespace: raw.workflow_api.workflow_backend_namespace,
            api_config_secret: raw.workflow_api.api_config_secret,
        };

        Ok(Self {
            workflow_api_user: raw.workflow_api.workflow_api_user,
            access_token: raw.workflow_api.workflow_api_access_token,
            instant_removal: raw.workflow_api.workflow_api_instant_removal,
            cleanup_grace: Duration::from_secs(raw.workflow_api.cleanup_grace_secs),
            backend_config,
            object_store_config: ObjectStoreConfig {
                endpoint: raw.minio.endpoint,
                access_key: raw.minio.access_key,
                secret_key: raw.minio.secret_key,
                secure: raw.minio.secure,
            },
        })
    }
}

/// Resolve the config file path: `WORKFLOW_API_CONFIG` env var, else a
/// default path.
pub fn config_path() -> PathBuf {
    std::env::var("WORKFLOW_API_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./config/workflow-api.cfg"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
