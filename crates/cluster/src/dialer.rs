// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! DNS-suffix sentinel interception: hostnames ending
//! `<name>.pod.<namespace>.<marker>` or `<name>.svc.<namespace>.<marker>`
//! are redirected through the cluster's port-forward API instead of the OS
//! resolver, using `kube`'s native portforward support (`Api::portforward` +
//! `take_stream`) rather than a monkey-patched HTTP library hook.

use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{Api, ListParams};
use kube::Client;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ClusterError;

/// The sentinel suffix marking a hostname for port-forward interception
/// rather than ordinary DNS resolution.
pub const SENTINEL_MARKER: &str = "cluster.local.wf-internal";

/// A sentinel hostname's resolved target, before the pod/port lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentinelTarget {
    Pod { name: String, namespace: String },
    Svc { name: String, namespace: String },
}

/// Parse a hostname against the sentinel suffix convention. Returns `None`
/// for any hostname that should resolve normally.
pub fn parse_sentinel_host(host: &str, marker: &str) -> Option<SentinelTarget> {
    let suffix = format!(".{marker}");
    let prefix = host.strip_suffix(&suffix)?;
    let mut parts = prefix.rsplitn(3, '.');
    let namespace = parts.next()?;
    let kind = parts.next()?;
    let name = parts.next()?;
    if !name.is_empty() && !namespace.is_empty() {
        match kind {
            "pod" => Some(SentinelTarget::Pod {
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
            "svc" => Some(SentinelTarget::Svc {
                name: name.to_string(),
                namespace: namespace.to_string(),
            }),
            _ => None,
        }
    } else {
        None
    }
}

/// Resolve a service sentinel target to a concrete `(pod_name, port)` pair:
/// read the service's selector, list matching pods, pick the first, and map
/// the service's target port through the chosen pod's container port
/// definitions.
pub async fn resolve_svc_target(
    client: &Client,
    name: &str,
    namespace: &str,
) -> Result<(String, u16), ClusterError> {
    let services: Api<Service> = Api::namespaced(client.clone(), namespace);
    let svc = services
        .get(name)
        .await
        .map_err(ClusterError::from)?;
    let spec = svc
        .spec
        .ok_or_else(|| ClusterError::Invalid(format!("service {name} has no spec")))?;
    let selector = spec
        .selector
        .ok_or_else(|| ClusterError::Invalid(format!("service {name} has no selector")))?;
    let port_spec = spec
        .ports
        .as_ref()
        .and_then(|ports| ports.first())
        .ok_or_else(|| ClusterError::Invalid(format!("service {name} declares no ports")))?;

    let label_selector = selector
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",");
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let list = pods
        .list(&ListParams::default().labels(&label_selector))
        .await
        .map_err(ClusterError::from)?;
    let pod = list
        .items
        .into_iter()
        .next()
        .ok_or_else(|| ClusterError::NotFound(format!("no pods match service {name} selector")))?;
    let pod_name = pod
        .metadata
        .name
        .clone()
        .ok_or_else(|| ClusterError::Invalid("matched pod has no name".to_string()))?;

    let target_port = resolve_target_port(&pod, port_spec);
    Ok((pod_name, target_port))
}

fn resolve_target_port(
    pod: &Pod,
    port_spec: &k8s_openapi::api::core::v1::ServicePort,
) -> u16 {
    use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

    match port_spec.target_port.as_ref() {
        Some(IntOrString::Int(port)) => *port as u16,
        Some(IntOrString::String(named)) => pod
            .spec
            .as_ref()
            .and_then(|spec| spec.containers.iter().find_map(|c| c.ports.as_ref()))
            .and_then(|ports| {
                ports
                    .iter()
                    .find(|p| p.name.as_deref() == Some(named.as_str()))
            })
            .map(|p| p.container_port as u16)
            .unwrap_or(port_spec.port as u16),
        None => port_spec.port as u16,
    }
}

/// Open a port-forward tunnel directly to a pod, returning a duplex stream.
pub async fn dial_pod(
    client: &Client,
    pod_name: &str,
    namespace: &str,
    port: u16,
) -> Result<impl AsyncRead + AsyncWrite + Unpin, ClusterError> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let mut forwarder = pods
        .portforward(pod_name, &[port])
        .await
        .map_err(ClusterError::from)?;
    forwarder
        .take_stream(port)
        .ok_or_else(|| ClusterError::TransportError(format!("no forwarded stream for port {port}")))
}

#[cfg(test)]
#[path = "dialer_tests.rs"]
mod tests;
