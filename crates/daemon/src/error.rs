// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon-level error kinds: `Validation`/`Auth` map to HTTP 400/403 JSON
//! bodies `{"detail": string}`; everything else from the core crates is
//! wrapped and surfaced as 500.

use thiserror::Error;
use wf_engine::EngineError;
use wf_objectstore::ObjectStoreError;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("{0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("access denied")]
    Auth,

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    ObjectStore(#[from] ObjectStoreError),
}

impl DaemonError {
    pub fn validation(detail: impl Into<String>) -> Self {
        DaemonError::Validation(detail.into())
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        DaemonError::NotFound(detail.into())
    }

    /// HTTP status this error maps to.
    pub fn status(&self) -> u16 {
        match self {
            DaemonError::Validation(_) => 400,
            DaemonError::NotFound(_) => 404,
            DaemonError::Auth => 403,
            DaemonError::ObjectStore(err) if err.is_not_found() => 404,
            DaemonError::Engine(err) if err.is_not_found() => 404,
            DaemonError::Engine(EngineError::UnknownWorkflow(_)) => 400,
            DaemonError::Config(_) | DaemonError::Engine(_) | DaemonError::ObjectStore(_) => 500,
        }
    }

    pub fn detail(&self) -> String {
        self.to_string()
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
