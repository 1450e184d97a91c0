// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Service Facade: binds inbound requests and object-store access to
//! the Lifecycle Engine, and wires the `on_finished` callback that stores
//! results then cleans up. Contains no cluster-orchestration logic of its
//! own — everything here is marshalling plus the bookkeeping a service-level
//! facade needs: tracking which workflow ids belong to the configured user.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use wf_core::{ServiceDescription, WorkflowId};
use wf_engine::{LifecycleEngine, StatusResponse, WorkflowStoreInfo};
use wf_objectstore::{ObjectStore, ObjectStoreEndpoint};

use crate::assets::{ServiceListing, StaticAssetLoader};
use crate::config::DaemonConfig;
use crate::error::DaemonError;

/// Output side-car mount path: the side-car is only created when
/// `worker_output_directory` is set, and it always mounts the job volume
/// at this fixed path.
const RESULT_DIRECTORY: &str = "/output";

pub struct ServiceFacade {
    config: DaemonConfig,
    assets: StaticAssetLoader,
    object_store: Arc<dyn ObjectStore>,
    engine: Arc<LifecycleEngine>,
    /// Workflow ids submitted so far for the single configured
    /// `workflow_api_user` (this system has no multi-tenant auth).
    workflow_ids: Mutex<Vec<WorkflowId>>,
}

impl ServiceFacade {
    pub fn new(
        config: DaemonConfig,
        assets: StaticAssetLoader,
        object_store: Arc<dyn ObjectStore>,
        engine: Arc<LifecycleEngine>,
    ) -> Self {
        Self {
            config,
            assets,
            object_store,
            engine,
            workflow_ids: Mutex::new(Vec::new()),
        }
    }

    fn bucket(&self) -> String {
        self.config.result_bucket()
    }

    pub fn list_services(&self) -> &[ServiceListing] {
        self.assets.listings()
    }

    pub fn service_description(&self, service_id: &str) -> Result<&ServiceDescription, DaemonError> {
        self.assets
            .description(service_id)
            .ok_or_else(|| DaemonError::validation("no valid service_id"))
    }

    fn workflow_exists(&self, workflow_id: WorkflowId) -> bool {
        self.workflow_ids.lock().contains(&workflow_id)
    }

    /// `PUT /services/{id}/input/{resource}`.
    pub async fn put_input(
        &self,
        service_id: &str,
        resource_name: &str,
        content: Vec<u8>,
    ) -> Result<(), DaemonError> {
        let description = self.service_description(service_id)?;
        if description.input(resource_name).is_none() {
            return Err(DaemonError::validation("no valid resource provided"));
        }
        self.object_store
            .put_file(&self.bucket(), &format!("{service_id}/inputs/{resource_name}"), content)
            .await?;
        Ok(())
    }

    /// `GET /services/{id}/output/{resource}`: a flat, service-scoped read
    /// (the side-car's own upload target has no workflow-id segment).
    pub async fn get_output(&self, service_id: &str, resource_name: &str) -> Result<Vec<u8>, DaemonError> {
        let description = self.service_description(service_id)?;
        if description.output(resource_name).is_none() {
            return Err(DaemonError::validation("no valid resource provided"));
        }
        let prefix = format!("{service_id}/outputs/");
        let key = format!("{prefix}{resource_name}");
        let objects = self.object_store.get_objects_list(&self.bucket(), Some(&prefix)).await?;
        if !objects.contains(&key) {
            return Err(DaemonError::not_found("requested resource not exists"));
        }
        Ok(self.object_store.get_file(&self.bucket(), &key).await?)
    }

    /// `GET /services/{id}/workflow/`.
    pub fn list_workflows(&self) -> Vec<WorkflowId> {
        self.workflow_ids.lock().clone()
    }

    fn inputs_fulfilled(&self, service_id: &str, description: &ServiceDescription, objects: &[String]) -> bool {
        description
            .input_resources
            .iter()
            .all(|resource| objects.contains(&format!("{service_id}/inputs/{}", resource.name)))
    }

    /// `POST /services/{id}/workflow/execute`: validates declared inputs
    /// were uploaded, mints a workflow id, and spawns the background
    /// submission task.
    pub async fn execute(&self, service_id: &str) -> Result<WorkflowId, DaemonError> {
        let description = self.service_description(service_id)?.clone();

        let prefix = format!("{service_id}/inputs");
        let objects = self.object_store.get_objects_list(&self.bucket(), Some(&prefix)).await?;
        if !self.inputs_fulfilled(service_id, &description, &objects) {
            return Err(DaemonError::validation("service input not fulfilled"));
        }

        let workflow_id = WorkflowId::new();
        self.workflow_ids.lock().push(workflow_id);

        let engine = self.engine.clone();
        let object_store = self.object_store.clone();
        let bucket = self.bucket();
        let service_id = service_id.to_string();
        let object_store_config = self.config.object_store_config.clone();
        let instant_removal = self.config.instant_removal;
        let cleanup_grace = self.config.cleanup_grace;

        tokio::spawn(async move {
            for resource in &description.input_resources {
                let resource = resource.clone();
                let object_store = object_store.clone();
                let bucket = bucket.clone();
                let key = format!("{service_id}/inputs/{}", resource.name);
                let result = engine
                    .handle_input(workflow_id, &resource, || async move {
                        object_store
                            .get_file(&bucket, &key)
                            .await
                            .map_err(|err| wf_engine::EngineError::from(wf_cluster::ClusterError::TransportError(err.to_string())))
                    })
                    .await;
                if let Err(err) = result {
                    tracing::error!(%workflow_id, resource = %resource.name, error = %err, "handle_input failed");
                    return;
                }
            }

            let store_info = WorkflowStoreInfo {
                minio: ObjectStoreEndpoint {
                    endpoint: object_store_config.endpoint,
                    access_key: object_store_config.access_key,
                    secret_key: object_store_config.secret_key,
                    secure: object_store_config.secure,
                },
                destination_bucket: bucket,
                destination_path: format!("{service_id}/outputs"),
                result_directory: RESULT_DIRECTORY.to_string(),
                result_files: description.output_names(),
            };

            let on_finished: wf_engine::FinishCallback = {
                let engine = engine.clone();
                Arc::new(move |finished_workflow_id: WorkflowId| {
                    let engine = engine.clone();
                    let store_info = store_info.clone();
                    Box::pin(async move {
                        if let Err(err) = engine.store_result(finished_workflow_id, &store_info).await {
                            tracing::warn!(%finished_workflow_id, error = %err, "store_result failed");
                        }
                        if !instant_removal {
                            tokio::time::sleep(cleanup_grace).await;
                        }
                        if let Err(err) = engine.cleanup(finished_workflow_id).await {
                            tracing::error!(%finished_workflow_id, error = %err, "cleanup failed");
                        }
                    })
                })
            };

            if let Err(err) = engine
                .commit_workflow(workflow_id, &description.workflow_resource_spec, on_finished)
                .await
            {
                tracing::error!(%workflow_id, error = %err, "commit_workflow failed");
            }
        });

        Ok(workflow_id)
    }

    /// `POST /services/{id}/workflow/stop/{wf_id}`.
    pub async fn stop(&self, service_id: &str, workflow_id: WorkflowId) -> Result<(), DaemonError> {
        self.service_description(service_id)?;
        if !self.workflow_exists(workflow_id) {
            return Err(DaemonError::validation("invalid workflow_id"));
        }
        self.engine.stop_workflow(workflow_id).await?;
        Ok(())
    }

    /// `GET /services/{id}/workflow/status/{wf_id}`.
    pub async fn status(
        &self,
        service_id: &str,
        workflow_id: WorkflowId,
        verbose_level: u8,
    ) -> Result<StatusResponse, DaemonError> {
        self.service_description(service_id)?;
        if !self.workflow_exists(workflow_id) {
            return Err(DaemonError::validation("invalid workflow_id"));
        }
        Ok(self.engine.get_status(workflow_id, verbose_level).await?)
    }

    /// `GET /services/{id}/workflow/results/{wf_id}`, no `result_file`:
    /// lists the workflow-scoped result prefix.
    pub async fn list_results(&self, service_id: &str, workflow_id: WorkflowId) -> Result<Vec<String>, DaemonError> {
        self.service_description(service_id)?;
        let prefix = format!("{service_id}/outputs/{workflow_id}/");
        Ok(self.object_store.get_objects_list(&self.bucket(), Some(&prefix)).await?)
    }

    /// `GET /services/{id}/workflow/results/{wf_id}?result_file=…`.
    pub async fn get_result(
        &self,
        service_id: &str,
        workflow_id: WorkflowId,
        result_file: &str,
    ) -> Result<Vec<u8>, DaemonError> {
        let objects = self.list_results(service_id, workflow_id).await?;
        let key = format!("{service_id}/outputs/{workflow_id}/{result_file}");
        if !objects.contains(&key) {
            return Err(DaemonError::validation(format!("unknown result_file {result_file}")));
        }
        Ok(self.object_store.get_file(&self.bucket(), &key).await?)
    }

    pub fn access_token(&self) -> &str {
        &self.config.access_token
    }

    /// Loads assets from `directory` and builds the facade in one step —
    /// convenience constructor for `main`.
    pub fn bootstrap(
        config: DaemonConfig,
        asset_directory: &Path,
        object_store: Arc<dyn ObjectStore>,
        engine: Arc<LifecycleEngine>,
    ) -> Result<Self, DaemonError> {
        let assets = StaticAssetLoader::load(asset_directory)?;
        Ok(Self::new(config, assets, object_store, engine))
    }
}

#[cfg(test)]
#[path = "facade_tests.rs"]
mod tests;
