// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! An in-memory `ObjectStore` test double, following the same shape as
//! `wf-cluster`'s `FakeClusterAdapter`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::ObjectStoreError;
use crate::store::ObjectStore;

#[derive(Default)]
pub struct FakeObjectStore {
    buckets: Mutex<BTreeMap<String, BTreeMap<String, Vec<u8>>>>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds `bucket/resource` directly, bypassing `put_file`, for tests
    /// that want to assert a read without exercising the write path too.
    pub fn seed(&self, bucket: &str, resource: &str, content: Vec<u8>) {
        self.buckets
            .lock()
            .entry(bucket.to_string())
            .or_default()
            .insert(resource.to_string(), content);
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn bucket_exists(&self, bucket: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.buckets.lock().contains_key(bucket))
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), ObjectStoreError> {
        self.buckets.lock().entry(bucket.to_string()).or_default();
        Ok(())
    }

    async fn put_file(
        &self,
        bucket: &str,
        resource: &str,
        content: Vec<u8>,
    ) -> Result<(), ObjectStoreError> {
        self.buckets
            .lock()
            .entry(bucket.to_string())
            .or_default()
            .insert(resource.to_string(), content);
        Ok(())
    }

    async fn get_file(&self, bucket: &str, resource: &str) -> Result<Vec<u8>, ObjectStoreError> {
        self.buckets
            .lock()
            .get(bucket)
            .and_then(|objects| objects.get(resource))
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound(format!("{bucket}/{resource}")))
    }

    async fn get_objects_list(
        &self,
        bucket: &str,
        prefix: Option<&str>,
    ) -> Result<Vec<String>, ObjectStoreError> {
        let buckets = self.buckets.lock();
        let Some(objects) = buckets.get(bucket) else {
            return Ok(Vec::new());
        };
        Ok(objects
            .keys()
            .filter(|key| prefix.map_or(true, |p| key.starts_with(p)))
            .cloned()
            .collect())
    }

    async fn get_download_url(
        &self,
        bucket: &str,
        resource: &str,
    ) -> Result<String, ObjectStoreError> {
        Ok(format!("https://fake-object-store.invalid/{bucket}/{resource}?op=download"))
    }

    async fn get_upload_url(
        &self,
        bucket: &str,
        resource: &str,
    ) -> Result<String, ObjectStoreError> {
        Ok(format!("https://fake-object-store.invalid/{bucket}/{resource}?op=upload"))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
