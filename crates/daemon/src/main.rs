// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `workflow-api`: the binary entrypoint. Loads configuration, builds the
//! Kubernetes cluster adapter and the MinIO object-store adapter, wires
//! them into the Lifecycle Engine, loads the service-description assets
//! from disk, and serves the HTTP surface. Contains no orchestration
//! logic of its own.

mod assets;
mod config;
mod error;
mod facade;
mod http;

use std::path::PathBuf;
use std::sync::Arc;

use wf_cluster::KubeClusterAdapter;
use wf_engine::{LifecycleEngine, WorkflowRegistry};
use wf_objectstore::S3ObjectStore;

use crate::assets::StaticAssetLoader;
use crate::config::DaemonConfig;
use crate::facade::ServiceFacade;

/// Resolve the asset directory: `WORKFLOW_API_ASSETS` env var, else a
/// conventional default relative to the working directory.
fn asset_directory() -> PathBuf {
    std::env::var("WORKFLOW_API_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./config/services"))
}

fn bind_addr() -> String {
    let port = std::env::var("WORKFLOW_API_PORT").unwrap_or_else(|_| "8080".to_string());
    format!("0.0.0.0:{port}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = DaemonConfig::load(&config::config_path())?;
    tracing::info!(namespace = %config.backend_config.namespace, "loaded daemon configuration");

    let cluster = Arc::new(KubeClusterAdapter::connect(config.backend_config.clone()).await?);
    let object_store = Arc::new(S3ObjectStore::new(&config.object_store_config, &config.result_bucket()).await?);
    let registry = Arc::new(WorkflowRegistry::new());
    let engine = Arc::new(LifecycleEngine::new(
        cluster,
        registry,
        config.backend_config.clone(),
        "workflow-api",
    ));

    let facade = Arc::new(ServiceFacade::bootstrap(config, &asset_directory(), object_store, engine)?);
    let app = http::router(facade);

    let addr = bind_addr();
    tracing::info!(%addr, "starting workflow-api server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("workflow-api server stopped gracefully");
    Ok(())
}

/// Ctrl-C / SIGTERM graceful-shutdown future, matching the `axum::serve`
/// convention every HTTP-serving example in the pack uses.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {}
            Err(err) => tracing::error!(%err, "failed to install Ctrl+C handler"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
