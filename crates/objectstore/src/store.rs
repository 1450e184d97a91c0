// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The object-store adapter: bucket/object CRUD and presigned URLs against
//! an S3-compatible endpoint.

use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use futures_util::StreamExt;

use crate::config::ObjectStoreConfig;
use crate::error::ObjectStoreError;

/// Presigned URLs are valid for one hour thirty minutes.
const PRESIGNED_URL_TTL: Duration = Duration::from_secs(90 * 60);

/// Typed operations against an S3-compatible object store.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// `true` if `bucket` exists.
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ObjectStoreError>;

    /// Creates `bucket`. Fails if it already exists.
    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError>;

    /// Uploads `content` to `bucket/resource`, overwriting any existing
    /// object at that key.
    async fn put_file(
        &self,
        bucket: &str,
        resource: &str,
        content: Vec<u8>,
    ) -> Result<(), ObjectStoreError>;

    /// Downloads `bucket/resource` in full. `NotFound` if absent.
    async fn get_file(&self, bucket: &str, resource: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Lists every object key under `bucket`, optionally filtered by
    /// `prefix`, recursively.
    async fn get_objects_list(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, ObjectStoreError>;

    /// A presigned `GET` URL for `bucket/resource`, valid for
    /// [`PRESIGNED_URL_TTL`].
    async fn get_download_url(
        &self,
        bucket: &str,
        resource: &str,
    ) -> Result<String, ObjectStoreError>;

    /// A presigned `PUT` URL for `bucket/resource`, valid for
    /// [`PRESIGNED_URL_TTL`].
    async fn get_upload_url(
        &self,
        bucket: &str,
        resource: &str,
    ) -> Result<String, ObjectStoreError>;
}

/// An `ObjectStore` backed by `aws-sdk-s3`, configured for a custom
/// (MinIO) endpoint: path-style addressing, a static credential pair, and
/// no region discovery.
pub struct S3ObjectStore {
    client: Client,
}

/// Builds the endpoint URL the `aws-sdk-s3` client connects to, honoring
/// `secure` the way `Minio(..., secure=...)` picks `http` vs `https`.
fn endpoint_url(config: &ObjectStoreConfig) -> String {
    let scheme = if config.secure { "https" } else { "http" };
    format!("{scheme}://{}", config.endpoint)
}

impl S3ObjectStore {
    /// Connects to `config.endpoint` and ensures `result_bucket` exists.
    pub async fn new(
        config: &ObjectStoreConfig,
        result_bucket: &str,
    ) -> Result<Self, ObjectStoreError> {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "wf-objectstore",
        );
        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url(endpoint_url(config))
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();
        let client = Client::from_conf(s3_config);
        let store = Self { client };
        if !store.bucket_exists(result_bucket).await? {
            tracing::info!(bucket = result_bucket, "result bucket absent, creating it");
            store.create_bucket(result_bucket).await?;
        }
        Ok(store)
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ObjectStoreError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(err) => {
                let err = aws_sdk_s3::Error::from(err);
                if matches!(err, aws_sdk_s3::Error::NotFound(_)) {
                    Ok(false)
                } else {
                    Err(err.into())
                }
            }
        }
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(())
    }

    async fn put_file(
        &self,
        bucket: &str,
        resource: &str,
        content: Vec<u8>,
    ) -> Result<(), ObjectStoreError> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(resource)
            .body(ByteStream::from(content))
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(())
    }

    async fn get_file(&self, bucket: &str, resource: &str) -> Result<Vec<u8>, ObjectStoreError> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(resource)
            .send()
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        let body = output.body.collect().await?;
        Ok(body.into_bytes().to_vec())
    }

    async fn get_objects_list(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, ObjectStoreError> {
        let mut names = Vec::new();
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .set_prefix(prefix.map(str::to_string))
            .into_paginator()
            .send();
        while let Some(page) = pages.next().await {
            let page = page.map_err(aws_sdk_s3::Error::from)?;
            for object in page.contents() {
                if let Some(key) = object.key() {
                    names.push(key.to_string());
                }
            }
        }
        Ok(names)
    }

    async fn get_download_url(
        &self,
        bucket: &str,
        resource: &str,
    ) -> Result<String, ObjectStoreError> {
        let presigning_config = PresigningConfig::expires_in(PRESIGNED_URL_TTL)?;
        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(resource)
            .presigned(presigning_config)
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(presigned.uri().to_string())
    }

    async fn get_upload_url(
        &self,
        bucket: &str,
        resource: &str,
    ) -> Result<String, ObjectStoreError> {
        let presigning_config = PresigningConfig::expires_in(PRESIGNED_URL_TTL)?;
        let presigned = self
            .client
            .put_object()
            .bucket(bucket)
            .key(resource)
            .presigned(presigning_config)
            .await
            .map_err(aws_sdk_s3::Error::from)?;
        Ok(presigned.uri().to_string())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
