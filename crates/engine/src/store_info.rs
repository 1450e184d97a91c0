// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The JSON payload posted to a workflow's side-car over the port-forward
//! tunnel.

use serde::Serialize;

/// Object-store endpoint and credentials, embedded verbatim in the
/// side-car request.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectStoreEndpoint {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub secure: bool,
}

/// Body of the side-car's `POST /store`.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowStoreInfo {
    pub minio: ObjectStoreEndpoint,
    pub destination_bucket: String,
    pub destination_path: String,
    pub result_directory: String,
    pub result_files: Vec<String>,
}

impl WorkflowStoreInfo {
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}
