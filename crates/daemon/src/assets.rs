// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The static asset loader: reads `ServiceDescription` JSON files from a
//! directory at startup, keyed by file stem.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use wf_core::ServiceDescription;

use crate::error::DaemonError;

/// A listing entry returned by `GET /services/`: the asset id plus the
/// validity window computed once at load time (`start_date=now`,
/// `end_date=now+7d`).
#[derive(Debug, Clone, Serialize)]
pub struct ServiceListing {
    pub id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

pub struct StaticAssetLoader {
    listings: Vec<ServiceListing>,
    descriptions: BTreeMap<String, ServiceDescription>,
}

impl StaticAssetLoader {
    /// Reads every `*.json` file directly under `directory`, keyed by its
    /// file stem (splitting on the first `.` in the filename).
    pub fn load(directory: &Path) -> Result<Self, DaemonError> {
        let mut listings = Vec::new();
        let mut descriptions = BTreeMap::new();
        let now = Utc::now();

        let entries = std::fs::read_dir(directory).map_err(|err| {
            DaemonError::Config(format!("reading asset directory {}: {err}", directory.display()))
        })?;
        for entry in entries {
            let entry = entry
                .map_err(|err| DaemonError::Config(format!("reading asset directory entry: {err}")))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let Some(asset_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let text = std::fs::read_to_string(&path)
                .map_err(|err| DaemonError::Config(format!("reading {}: {err}", path.display())))?;
            let description: ServiceDescription = serde_json::from_str(&text)
                .map_err(|err| DaemonError::Config(format!("parsing {}: {err}", path.display())))?;

            listings.push(ServiceListing {
                id: asset_id.to_string(),
                start_date: now,
                end_date: now + chrono::Duration::days(7),
            });
            descriptions.insert(asset_id.to_string(), description);
        }

        Ok(Self { listings, descriptions })
    }

    pub fn listings(&self) -> &[ServiceListing] {
        &self.listings
    }

    pub fn description(&self, service_id: &str) -> Option<&ServiceDescription> {
        self.descriptions.get(service_id)
    }
}

#[cfg(test)]
#[path = "assets_tests.rs"]
mod tests;
