// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! wf-objectstore: the object-store adapter (`[minio]` section) — bucket
//! and object CRUD plus presigned URLs against an S3-compatible endpoint,
//! via `aws-sdk-s3` configured for a custom (MinIO) endpoint. Its contract
//! is load-bearing for the Lifecycle Engine's result-delivery handshake.

pub mod config;
pub mod error;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use config::ObjectStoreConfig;
pub use error::ObjectStoreError;
pub use store::{ObjectStore, S3ObjectStore};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeObjectStore;
