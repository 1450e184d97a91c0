// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Kubernetes implementation of [`ClusterAdapter`]: a thin wrapper
//! around a `kube::Client`, with tolerant deletes and a poll-until-ready
//! helper for anything the control plane settles asynchronously.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use k8s_openapi::api::core::v1::{
    ConfigMap, PersistentVolumeClaim, PersistentVolumeClaimSpec, Pod, ResourceRequirements,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::api::{Api, DeleteParams, LogParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::runtime::watcher::{self, Config as WatcherConfig, Event as WatchEvent};
use kube::Client;
use parking_lot::Mutex;

use crate::adapter::{ClusterAdapter, PodEventObserver};
use crate::config::BackendConfig;
use crate::dialer;
use crate::error::ClusterError;
use crate::http_client;
use crate::retry::retry;
use crate::watch::pod_to_snapshot;

const PORT_FORWARD_ATTEMPTS: usize = 5;
const PORT_FORWARD_RETRY_DELAY: Duration = Duration::from_millis(500);

/// `ClusterAdapter` implementation backed by a live `kube::Client`.
pub struct KubeClusterAdapter {
    client: Client,
    config: Mutex<Option<BackendConfig>>,
}

impl KubeClusterAdapter {
    /// Build an adapter from an already-constructed client. `setup` must
    /// still be called before any other operation.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            config: Mutex::new(None),
        }
    }

    /// Build a client from the given backend config's credential source and
    /// construct the adapter in one step.
    pub async fn connect(config: BackendConfig) -> Result<Self, ClusterError> {
        let client = build_client(&config).await?;
        let adapter = Self::new(client);
        adapter.setup(config).await?;
        Ok(adapter)
    }

    fn namespace(&self) -> Result<String, ClusterError> {
        self.config
            .lock()
            .as_ref()
            .map(|c| c.namespace.clone())
            .ok_or_else(|| ClusterError::Invalid("setup() was not called".to_string()))
    }

    fn require_configured(&self) -> Result<(), ClusterError> {
        self.namespace().map(|_| ())
    }
}

async fn build_client(config: &BackendConfig) -> Result<Client, ClusterError> {
    if let Some(path) = config.kubeconfig_path.as_ref() {
        let kubeconfig = Kubeconfig::read_from(path)
            .map_err(|e| ClusterError::Invalid(format!("invalid kubeconfig {}: {e}", path.display())))?;
        let client_config = kube::Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
            .await
            .map_err(|e| ClusterError::TransportError(e.to_string()))?;
        Client::try_from(client_config).map_err(|e| ClusterError::TransportError(e.to_string()))
    } else if config.in_cluster {
        Client::try_default()
            .await
            .map_err(|e| ClusterError::TransportError(e.to_string()))
    } else {
        Err(ClusterError::Invalid(
            "no kubeconfig_path given and in_cluster is false".to_string(),
        ))
    }
}

#[async_trait]
impl ClusterAdapter for KubeClusterAdapter {
    async fn setup(&self, config: BackendConfig) -> Result<(), ClusterError> {
        *self.config.lock() = Some(config);
        Ok(())
    }

    fn backend_config(&self) -> Option<BackendConfig> {
        self.config.lock().clone()
    }

    async fn create_config_map(
        &self,
        name: &str,
        namespace: &str,
        data: BTreeMap<String, String>,
        labels: BTreeMap<String, String>,
    ) -> Result<(), ClusterError> {
        self.require_configured()?;
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        let manifest = ConfigMap {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            data: Some(data),
            ..Default::default()
        };
        api.create(&PostParams::default(), &manifest)
            .await
            .map(|_| ())
            .map_err(ClusterError::from)
    }

    async fn delete_config_map(&self, name: &str, namespace: &str) -> Result<(), ClusterError> {
        let api: Api<ConfigMap> = Api::namespaced(self.client.clone(), namespace);
        tolerant_delete(api.delete(name, &DeleteParams::default()).await)
    }

    async fn create_pod(&self, manifest: Pod, namespace: &str) -> Result<(), ClusterError> {
        self.require_configured()?;
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        api.create(&PostParams::default(), &manifest)
            .await
            .map(|_| ())
            .map_err(ClusterError::from)
    }

    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        tolerant_delete(api.delete(name, &DeleteParams::default()).await)
    }

    async fn create_persistent_volume_claim(
        &self,
        name: &str,
        namespace: &str,
        size: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<(), ClusterError> {
        self.require_configured()?;
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        let mut requests = BTreeMap::new();
        requests.insert("storage".to_string(), Quantity(size.to_string()));
        let manifest = PersistentVolumeClaim {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some(namespace.to_string()),
                labels: Some(labels),
                ..Default::default()
            },
            spec: Some(PersistentVolumeClaimSpec {
                access_modes: Some(vec!["ReadWriteOnce".to_string()]),
                resources: Some(ResourceRequirements {
                    requests: Some(requests),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        api.create(&PostParams::default(), &manifest)
            .await
            .map(|_| ())
            .map_err(ClusterError::from)
    }

    async fn delete_persistent_volume_claim(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<(), ClusterError> {
        let api: Api<PersistentVolumeClaim> = Api::namespaced(self.client.clone(), namespace);
        tolerant_delete(api.delete(name, &DeleteParams::default()).await)
    }

    async fn watch_pod_events(
        &self,
        pod_name: &str,
        namespace: &str,
        mut observer: Box<dyn PodEventObserver>,
    ) -> Result<(), ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let watcher_config = WatcherConfig::default().fields(&format!("metadata.name={pod_name}"));
        let mut stream = Box::pin(watcher::watcher(api, watcher_config));

        while let Some(event) = stream
            .try_next()
            .await
            .map_err(|e| ClusterError::TransportError(e.to_string()))?
        {
            let snapshot = match event {
                WatchEvent::Init | WatchEvent::InitDone => continue,
                WatchEvent::InitApply(pod) => pod_to_snapshot("ADDED", &pod),
                WatchEvent::Apply(pod) => pod_to_snapshot("MODIFIED", &pod),
                WatchEvent::Delete(pod) => pod_to_snapshot("DELETED", &pod),
            };
            if observer(snapshot) {
                break;
            }
        }
        Ok(())
    }

    async fn get_pod_log(
        &self,
        pod_name: &str,
        container: &str,
        namespace: &str,
        tail_lines: Option<i64>,
    ) -> Result<String, ClusterError> {
        let api: Api<Pod> = Api::namespaced(self.client.clone(), namespace);
        let params = LogParams {
            container: Some(container.to_string()),
            tail_lines,
            ..Default::default()
        };
        api.logs(pod_name, &params).await.map_err(ClusterError::from)
    }

    async fn port_forward_post(
        &self,
        pod_name: &str,
        namespace: &str,
        port: u16,
        body: Vec<u8>,
    ) -> Result<u16, ClusterError> {
        let host = format!("{pod_name}.pod.{namespace}.{}", dialer::SENTINEL_MARKER);
        retry(PORT_FORWARD_ATTEMPTS, PORT_FORWARD_RETRY_DELAY, |_attempt| {
            let client = self.client.clone();
            let host = host.clone();
            let body = body.clone();
            async move {
                let mut stream = dialer::dial_pod(&client, pod_name, namespace, port).await?;
                http_client::post(&mut stream, &host, "/store", &body).await
            }
        })
        .await
    }

    async fn healthz(&self) -> Result<(), ClusterError> {
        self.client
            .apiserver_version()
            .await
            .map(|_| ())
            .map_err(ClusterError::from)
    }
}

fn tolerant_delete<K>(
    result: Result<
        kube::core::either::Either<K, k8s_openapi::apimachinery::pkg::apis::meta::v1::Status>,
        kube::Error,
    >,
) -> Result<(), ClusterError> {
    match result {
        Ok(_) => Ok(()),
        Err(err) => {
            let err = ClusterError::from(err);
            if err.is_not_found() {
                tracing::debug!(%err, "tolerating not-found on delete");
                Ok(())
            } else {
                Err(err)
            }
        }
    }
}

#[cfg(test)]
#[path = "kube_adapter_tests.rs"]
mod tests;
