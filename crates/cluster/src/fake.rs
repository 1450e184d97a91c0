// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory `ClusterAdapter` test double: a call log plus canned
//! responses. `wf-engine`'s own test suite depends on this (via the
//! `test-support` feature) rather than talking to a live cluster.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use wf_core::PodStateSnapshot;

use crate::adapter::{ClusterAdapter, PodEventObserver};
use crate::config::BackendConfig;
use crate::error::ClusterError;

/// One recorded call against a `FakeClusterAdapter`, for assertions in
/// tests that care about call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClusterCall {
    CreateConfigMap { name: String },
    DeleteConfigMap { name: String },
    CreatePod { name: String },
    DeletePod { name: String },
    CreatePvc { name: String },
    DeletePvc { name: String },
    PortForwardPost { pod_name: String, port: u16 },
}

#[derive(Default)]
struct FakeState {
    config_maps: BTreeSet<String>,
    pods: BTreeSet<String>,
    pvcs: BTreeSet<String>,
    calls: Vec<ClusterCall>,
}

/// A `ClusterAdapter` double that tracks created object names in memory
/// and records every call. `watch_pod_events` plays back a scripted
/// sequence of snapshots instead of opening a live stream.
pub struct FakeClusterAdapter {
    state: Arc<Mutex<FakeState>>,
    config: Mutex<Option<BackendConfig>>,
    scripted_events: Mutex<BTreeMap<String, Vec<PodStateSnapshot>>>,
    port_forward_status: Mutex<u16>,
}

impl FakeClusterAdapter {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState::default())),
            config: Mutex::new(None),
            scripted_events: Mutex::new(BTreeMap::new()),
            port_forward_status: Mutex::new(200),
        }
    }

    /// Script the sequence of snapshots `watch_pod_events` will play back
    /// for a given pod name.
    pub fn script_events(&self, pod_name: &str, events: Vec<PodStateSnapshot>) {
        self.scripted_events
            .lock()
            .insert(pod_name.to_string(), events);
    }

    /// Control the status `port_forward_post` returns.
    pub fn set_port_forward_status(&self, status: u16) {
        *self.port_forward_status.lock() = status;
    }

    pub fn calls(&self) -> Vec<ClusterCall> {
        self.state.lock().calls.clone()
    }

    pub fn has_config_map(&self, name: &str) -> bool {
        self.state.lock().config_maps.contains(name)
    }

    pub fn has_pod(&self, name: &str) -> bool {
        self.state.lock().pods.contains(name)
    }

    pub fn has_pvc(&self, name: &str) -> bool {
        self.state.lock().pvcs.contains(name)
    }
}

impl Default for FakeClusterAdapter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterAdapter for FakeClusterAdapter {
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
        _namespace: &str,
        _data: BTreeMap<String, String>,
        _labels: BTreeMap<String, String>,
    ) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        if !state.config_maps.insert(name.to_string()) {
            return Err(ClusterError::AlreadyExists(name.to_string()));
        }
        state.calls.push(ClusterCall::CreateConfigMap {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn delete_config_map(&self, name: &str, _namespace: &str) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        state.config_maps.remove(name);
        state.calls.push(ClusterCall::DeleteConfigMap {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn create_pod(
        &self,
        manifest: k8s_openapi::api::core::v1::Pod,
        _namespace: &str,
    ) -> Result<(), ClusterError> {
        let name = manifest
            .metadata
            .name
            .ok_or_else(|| ClusterError::Invalid("pod manifest has no name".to_string()))?;
        let mut state = self.state.lock();
        if !state.pods.insert(name.clone()) {
            return Err(ClusterError::AlreadyExists(name));
        }
        state.calls.push(ClusterCall::CreatePod { name });
        Ok(())
    }

    async fn delete_pod(&self, name: &str, _namespace: &str) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        state.pods.remove(name);
        state.calls.push(ClusterCall::DeletePod {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn create_persistent_volume_claim(
        &self,
        name: &str,
        _namespace: &str,
        _size: &str,
        _labels: BTreeMap<String, String>,
    ) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        if !state.pvcs.insert(name.to_string()) {
            return Err(ClusterError::AlreadyExists(name.to_string()));
        }
        state.calls.push(ClusterCall::CreatePvc {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn delete_persistent_volume_claim(
        &self,
        name: &str,
        _namespace: &str,
    ) -> Result<(), ClusterError> {
        let mut state = self.state.lock();
        state.pvcs.remove(name);
        state.calls.push(ClusterCall::DeletePvc {
            name: name.to_string(),
        });
        Ok(())
    }

    async fn watch_pod_events(
        &self,
        pod_name: &str,
        _namespace: &str,
        mut observer: Box<dyn PodEventObserver>,
    ) -> Result<(), ClusterError> {
        let events = self
            .scripted_events
            .lock()
            .remove(pod_name)
            .unwrap_or_default();
        for event in events {
            if observer(event) {
                break;
            }
        }
        Ok(())
    }

    async fn get_pod_log(
        &self,
        _pod_name: &str,
        _container: &str,
        _namespace: &str,
        _tail_lines: Option<i64>,
    ) -> Result<String, ClusterError> {
        Ok(String::new())
    }

    async fn port_forward_post(
        &self,
        pod_name: &str,
        _namespace: &str,
        port: u16,
        _body: Vec<u8>,
    ) -> Result<u16, ClusterError> {
        self.state.lock().calls.push(ClusterCall::PortForwardPost {
            pod_name: pod_name.to_string(),
            port,
        });
        Ok(*self.port_forward_status.lock())
    }

    async fn healthz(&self) -> Result<(), ClusterError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
