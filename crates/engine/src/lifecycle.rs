// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Lifecycle Engine: `handle_input`, `commit_workflow`, `store_result`,
//! `cleanup`, `stop_workflow`, `get_status`. Owns every transition between
//! phases except the ones the Pod Monitor itself makes.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use wf_cluster::{BackendConfig, ClusterAdapter, ClusterError, JobStorageType};
use wf_core::{
    JobId, PvcId, ServiceResource, WorkflowId, WorkflowInputRecord, WorkflowResourceSpec,
    WorkflowState,
};

use crate::error::EngineError;
use crate::manifest::{build_pod_manifest, ManifestInput};
use crate::monitor;
use crate::registry::{MonitorHandle, WorkflowRegistry};
use crate::store_info::WorkflowStoreInfo;

/// Invoked by the Pod Monitor at most once per workflow, strictly after a
/// terminal worker-container observation and only if `CANCELED` was not
/// reached first. The Service Facade supplies the closure that performs
/// store-then-cleanup.
pub type FinishCallback = Arc<dyn Fn(WorkflowId) -> BoxFuture<'static, ()> + Send + Sync>;

/// The result of `get_status` at a given verbosity.
#[derive(Debug, Clone)]
pub enum StatusResponse {
    /// Verbose level 0: the current aggregate state.
    State(WorkflowState),
    /// Verbose level 1 or 2: the worker container's log, tail or full.
    Log(String),
}

/// Orchestrates per-workflow operations against a `ClusterAdapter` and a
/// `WorkflowRegistry`.
pub struct LifecycleEngine {
    cluster: Arc<dyn ClusterAdapter>,
    registry: Arc<WorkflowRegistry>,
    backend_config: BackendConfig,
    app_name: String,
}

impl LifecycleEngine {
    pub fn new(
        cluster: Arc<dyn ClusterAdapter>,
        registry: Arc<WorkflowRegistry>,
        backend_config: BackendConfig,
        app_name: impl Into<String>,
    ) -> Self {
        Self {
            cluster,
            registry,
            backend_config,
            app_name: app_name.into(),
        }
    }

    pub fn registry(&self) -> &Arc<WorkflowRegistry> {
        &self.registry
    }

    fn namespace(&self) -> &str {
        &self.backend_config.namespace
    }

    /// Materialize an `environment` input as a config map immediately;
    /// register anything else for the input-init container.
    pub async fn handle_input<F, Fut>(
        &self,
        workflow_id: WorkflowId,
        input_resource: &ServiceResource,
        get_data: F,
    ) -> Result<(), EngineError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<u8>, EngineError>>,
    {
        if input_resource.kind.is_environment() {
            let bytes = get_data().await?;
            let text = String::from_utf8_lossy(&bytes);
            let parsed = wf_core::env_file::parse(&text);
            let cm_id = wf_core::ConfigMapId::new();
            let labels = wf_core::workflow_labels(&self.app_name, workflow_id, None);

            match self
                .cluster
                .create_config_map(&cm_id.to_string(), self.namespace(), parsed, labels)
                .await
            {
                Ok(()) => {}
                Err(ClusterError::AlreadyExists(_)) => {}
                Err(err) => return Err(err.into()),
            }
            self.registry.append_config_map(workflow_id, cm_id);
        } else {
            let record = WorkflowInputRecord {
                name: input_resource.name.clone(),
                kind: input_resource.kind,
                mount_path: input_resource.mount_path.clone(),
                source_reference: input_resource.source_reference.clone(),
            };
            self.registry.append_input_resource(workflow_id, record);
        }
        Ok(())
    }

    /// Mint a job id, materialize accumulated resources onto the cluster
    /// in order, create the pod, and spawn its monitor.
    pub async fn commit_workflow(
        &self,
        workflow_id: WorkflowId,
        workflow_resource_spec: &WorkflowResourceSpec,
        on_finished: FinishCallback,
    ) -> Result<JobId, EngineError> {
        let job_id = JobId::new();
        let labels = wf_core::workflow_labels(&self.app_name, workflow_id, Some(job_id));

        let state = self.registry.get(workflow_id).unwrap_or_default();

        if let Some(input_config) = state.input_config.as_ref() {
            let payload = serde_json::to_string(&input_config.entries)?;
            let mut data = std::collections::BTreeMap::new();
            data.insert("input-init.json".to_string(), payload);
            self.cluster
                .create_config_map(&input_config.id, self.namespace(), data, labels.clone())
                .await?;
        }

        let pvc_id = match self.backend_config.job_storage_type {
            JobStorageType::PersistentVolumeClaim => {
                let pvc_id = PvcId::new();
                self.cluster
                    .create_persistent_volume_claim(
                        &pvc_id.to_string(),
                        self.namespace(),
                        &self.backend_config.job_storage_size,
                        labels.clone(),
                    )
                    .await?;
                self.registry.set_volume_claim(workflow_id, pvc_id);
                Some(pvc_id)
            }
            JobStorageType::EmptyDir => None,
        };

        let input_config_ref = state.input_config.as_ref().map(|c| c.id.as_str());
        let input_resources: Vec<WorkflowInputRecord> = state
            .input_config
            .as_ref()
            .map(|c| c.entries.clone())
            .unwrap_or_default();

        let manifest = build_pod_manifest(&ManifestInput {
            job_id,
            namespace: self.namespace(),
            workflow_resource_spec,
            config_map_refs: &state.config_map_ids,
            input_config_ref,
            input_resources: &input_resources,
            persistent_volume_claim_id: pvc_id,
            labels,
            backend_config: &self.backend_config,
        });

        self.cluster.create_pod(manifest, self.namespace()).await?;
        self.registry.set_job_id(workflow_id, job_id);

        let handle = MonitorHandle::new();
        self.registry.set_monitor_handle(workflow_id, handle.clone());
        monitor::spawn(
            self.cluster.clone(),
            self.registry.clone(),
            workflow_id,
            job_id,
            self.namespace().to_string(),
            handle,
            on_finished,
        );

        Ok(job_id)
    }

    /// Tell the pod's side-car to upload outputs. A refusal (status >= 400)
    /// is logged and swallowed — the workflow is still finished.
    pub async fn store_result(
        &self,
        workflow_id: WorkflowId,
        store_info: &WorkflowStoreInfo,
    ) -> Result<(), EngineError> {
        let state = self
            .registry
            .get(workflow_id)
            .ok_or(EngineError::UnknownWorkflow(workflow_id))?;
        let job_id = state
            .job_id
            .ok_or(EngineError::UnknownWorkflow(workflow_id))?;

        let body = store_info.to_json()?;
        let status = self
            .cluster
            .port_forward_post(&job_id.to_string(), self.namespace(), 9999, body)
            .await?;
        if status >= 400 {
            tracing::warn!(%workflow_id, %job_id, status, "side-car refused store request");
        }
        Ok(())
    }

    /// Idempotent teardown of every cluster-side resource, then mark the
    /// workflow `FINISHED`.
    pub async fn cleanup(&self, workflow_id: WorkflowId) -> Result<(), EngineError> {
        let state = self
            .registry
            .get(workflow_id)
            .ok_or(EngineError::UnknownWorkflow(workflow_id))?;

        for config_map_id in &state.config_map_ids {
            self.cluster
                .delete_config_map(&config_map_id.to_string(), self.namespace())
                .await?;
        }
        if let Some(input_config) = &state.input_config {
            self.cluster
                .delete_config_map(&input_config.id, self.namespace())
                .await?;
        }
        if let Some(pvc_id) = state.volume_claim_id {
            self.cluster
                .delete_persistent_volume_claim(&pvc_id.to_string(), self.namespace())
                .await?;
        }
        if let Some(job_id) = state.job_id {
            self.cluster.delete_pod(&job_id.to_string(), self.namespace()).await?;
        }
        if let Some(handle) = self.registry.monitor_handle(workflow_id) {
            handle.cancel.cancel();
        }
        // CANCELED is itself terminal — cleanup must not overwrite it with
        // FINISHED, only tear down resources.
        if state.phase != wf_core::Phase::Canceled {
            self.registry.mark_finished(workflow_id);
        }
        Ok(())
    }

    /// Signal cancellation, wait for the monitor to acknowledge it, then
    /// clean up.
    pub async fn stop_workflow(&self, workflow_id: WorkflowId) -> Result<(), EngineError> {
        if self.registry.get(workflow_id).is_none() {
            return Err(EngineError::UnknownWorkflow(workflow_id));
        }
        if let Some(handle) = self.registry.monitor_handle(workflow_id) {
            handle.cancel.cancel();
            handle.exited.cancelled().await;
        }
        self.cleanup(workflow_id).await
    }

    /// State snapshot at verbosity 0, worker log tail at 1, full worker
    /// log at 2.
    pub async fn get_status(
        &self,
        workflow_id: WorkflowId,
        verbose_level: u8,
    ) -> Result<StatusResponse, EngineError> {
        let state = self
            .registry
            .get(workflow_id)
            .ok_or(EngineError::UnknownWorkflow(workflow_id))?;

        if verbose_level == 0 {
            return Ok(StatusResponse::State(state));
        }

        let job_id = state
            .job_id
            .ok_or(EngineError::UnknownWorkflow(workflow_id))?;
        let tail_lines = if verbose_level == 1 { Some(100) } else { None };
        let log = self
            .cluster
            .get_pod_log(&job_id.to_string(), "worker", self.namespace(), tail_lines)
            .await?;
        Ok(StatusResponse::Log(log))
    }
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
