// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The `ClusterAdapter` trait: typed operations against the
//! container-orchestration control plane.

use std::collections::BTreeMap;

use async_trait::async_trait;
use wf_core::PodStateSnapshot;

use crate::config::BackendConfig;
use crate::error::ClusterError;

/// Observer invoked once per pod event by `watch_pod_events`. Returns
/// whether the stream should end.
pub trait PodEventObserver: FnMut(PodStateSnapshot) -> bool + Send {}
impl<F> PodEventObserver for F where F: FnMut(PodStateSnapshot) -> bool + Send {}

/// Typed operations against the container-orchestration control plane.
///
/// `setup` must be called before any other operation; implementations are
/// otherwise stateless apart from the configuration singleton it installs.
#[async_trait]
pub trait ClusterAdapter: Send + Sync + 'static {
    /// One-time process initialization.
    async fn setup(&self, config: BackendConfig) -> Result<(), ClusterError>;

    /// The backend configuration installed by `setup`, or `None` if `setup`
    /// has not been called yet.
    fn backend_config(&self) -> Option<BackendConfig>;

    async fn create_config_map(
        &self,
        name: &str,
        namespace: &str,
        data: BTreeMap<String, String>,
        labels: BTreeMap<String, String>,
    ) -> Result<(), ClusterError>;

    /// Tolerant of `NotFound`.
    async fn delete_config_map(&self, name: &str, namespace: &str) -> Result<(), ClusterError>;

    async fn create_pod(
        &self,
        manifest: k8s_openapi::api::core::v1::Pod,
        namespace: &str,
    ) -> Result<(), ClusterError>;

    /// Tolerant of `NotFound`.
    async fn delete_pod(&self, name: &str, namespace: &str) -> Result<(), ClusterError>;

    async fn create_persistent_volume_claim(
        &self,
        name: &str,
        namespace: &str,
        size: &str,
        labels: BTreeMap<String, String>,
    ) -> Result<(), ClusterError>;

    /// Tolerant of `NotFound`.
    async fn delete_persistent_volume_claim(
        &self,
        name: &str,
        namespace: &str,
    ) -> Result<(), ClusterError>;

    /// Opens an event stream filtered by pod name, invoking `observer` for
    /// each snapshot until it returns `true` or the stream ends.
    async fn watch_pod_events(
        &self,
        pod_name: &str,
        namespace: &str,
        observer: Box<dyn PodEventObserver>,
    ) -> Result<(), ClusterError>;

    async fn get_pod_log(
        &self,
        pod_name: &str,
        container: &str,
        namespace: &str,
        tail_lines: Option<i64>,
    ) -> Result<String, ClusterError>;

    /// Opens a port-forward tunnel to `pod_name:port` and issues an HTTP
    /// POST with `body`, retrying up to five times with a constant delay,
    /// surfacing the last observed response status.
    async fn port_forward_post(
        &self,
        pod_name: &str,
        namespace: &str,
        port: u16,
        body: Vec<u8>,
    ) -> Result<u16, ClusterError>;

    /// Operational health check passthrough; not used by the lifecycle
    /// engine itself.
    async fn healthz(&self) -> Result<(), ClusterError>;
}
