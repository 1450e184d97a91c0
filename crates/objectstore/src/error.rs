// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Object-store adapter error kinds, mirroring `wf-cluster`'s `ClusterError`
//! shape: one variant per failure kind the Lifecycle Engine's
//! result-delivery handshake needs to distinguish.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    TransportError(String),

    #[error("invalid: {0}")]
    Invalid(String),
}

impl ObjectStoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ObjectStoreError::NotFound(_))
    }
}

impl From<aws_sdk_s3::Error> for ObjectStoreError {
    fn from(err: aws_sdk_s3::Error) -> Self {
        match &err {
            aws_sdk_s3::Error::NoSuchBucket(_) | aws_sdk_s3::Error::NoSuchKey(_) => {
                ObjectStoreError::NotFound(err.to_string())
            }
            _ => ObjectStoreError::TransportError(err.to_string()),
        }
    }
}

impl From<aws_sdk_s3::primitives::ByteStreamError> for ObjectStoreError {
    fn from(err: aws_sdk_s3::primitives::ByteStreamError) -> Self {
        ObjectStoreError::TransportError(err.to_string())
    }
}

impl From<aws_sdk_s3::presigning::PresigningConfigError> for ObjectStoreError {
    fn from(err: aws_sdk_s3::presigning::PresigningConfigError) -> Self {
        ObjectStoreError::Invalid(err.to_string())
    }
}
