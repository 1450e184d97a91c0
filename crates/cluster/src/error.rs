// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cluster Adapter error kinds.

use thiserror::Error;

/// Error kinds the Cluster Adapter can fail with. Every operation either
/// succeeds or fails with one of these.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("already exists: {0}")]
    AlreadyExists(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("transport error: {0}")]
    TransportError(String),
    #[error("invalid: {0}")]
    Invalid(String),
}

impl ClusterError {
    /// `true` for errors that are safe to treat as a successful no-op in a
    /// tolerant delete.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClusterError::NotFound(_))
    }
}

impl From<kube::Error> for ClusterError {
    fn from(err: kube::Error) -> Self {
        match &err {
            kube::Error::Api(resp) if resp.code == 404 => ClusterError::NotFound(resp.message.clone()),
            kube::Error::Api(resp) if resp.code == 409 => {
                ClusterError::AlreadyExists(resp.message.clone())
            }
            kube::Error::Api(resp) if resp.code == 401 || resp.code == 403 => {
                ClusterError::PermissionDenied(resp.message.clone())
            }
            _ => ClusterError::TransportError(err.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
