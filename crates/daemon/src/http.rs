// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The HTTP surface: routes, the `access-token` header check, and
//! multipart upload parsing. Every handler here does no more than marshal
//! requests into `ServiceFacade` calls and shape their responses.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use wf_core::WorkflowId;

use crate::error::DaemonError;
use crate::facade::ServiceFacade;

impl IntoResponse for DaemonError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody { detail: self.detail() })).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

/// `access-token` header check. A plain `axum::middleware::from_fn_with_state`
/// function rather than a tower layer — the comparison needs only the
/// configured token, no shared mutable state.
async fn require_access_token(
    State(facade): State<Arc<ServiceFacade>>,
    headers: HeaderMap,
    request: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    match headers.get("access-token").and_then(|v| v.to_str().ok()) {
        Some(token) if token == facade.access_token() => next.run(request).await,
        _ => DaemonError::Auth.into_response(),
    }
}

pub fn router(facade: Arc<ServiceFacade>) -> Router {
    Router::new()
        .route("/services/", get(list_services))
        .route("/services/{service_id}/info", get(service_info))
        .route("/services/{service_id}/input/{resource}", put(put_input))
        .route("/services/{service_id}/output/{resource}", get(get_output))
        .route("/services/{service_id}/workflow/", get(list_workflows))
        .route("/services/{service_id}/workflow/execute", post(execute))
        .route("/services/{service_id}/workflow/stop/{wf_id}", post(stop))
        .route("/services/{service_id}/workflow/status/{wf_id}", get(status))
        .route("/services/{service_id}/workflow/results/{wf_id}", get(results))
        .layer(axum::middleware::from_fn_with_state(facade.clone(), require_access_token))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(facade)
}

/// `GET /services/`.
async fn list_services(State(facade): State<Arc<ServiceFacade>>) -> impl IntoResponse {
    Json(facade.list_services().to_vec())
}

/// `GET /services/{id}/info`.
async fn service_info(
    State(facade): State<Arc<ServiceFacade>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, DaemonError> {
    Ok(Json(facade.service_description(&service_id)?.clone()))
}

/// `PUT /services/{id}/input/{resource}`: multipart file `input_file`.
async fn put_input(
    State(facade): State<Arc<ServiceFacade>>,
    Path((service_id, resource)): Path<(String, String)>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, DaemonError> {
    let mut content: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| DaemonError::validation(format!("invalid multipart body: {err}")))?
    {
        if field.name() == Some("input_file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|err| DaemonError::validation(format!("invalid multipart body: {err}")))?;
            content = Some(bytes.to_vec());
        }
    }
    let content = content.ok_or_else(|| DaemonError::validation("missing input_file field"))?;
    facade.put_input(&service_id, &resource, content).await?;
    Ok(Json(serde_json::json!({})))
}

/// `GET /services/{id}/output/{resource}`: binary stream.
async fn get_output(
    State(facade): State<Arc<ServiceFacade>>,
    Path((service_id, resource)): Path<(String, String)>,
) -> Result<impl IntoResponse, DaemonError> {
    let bytes = facade.get_output(&service_id, &resource).await?;
    Ok(Bytes::from(bytes))
}

/// `GET /services/{id}/workflow/`.
async fn list_workflows(
    State(facade): State<Arc<ServiceFacade>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, DaemonError> {
    facade.service_description(&service_id)?;
    Ok(Json(facade.list_workflows()))
}

#[derive(Debug, Serialize)]
struct ExecuteResponse {
    workflow_id: WorkflowId,
}

/// `POST /services/{id}/workflow/execute`.
async fn execute(
    State(facade): State<Arc<ServiceFacade>>,
    Path(service_id): Path<String>,
) -> Result<impl IntoResponse, DaemonError> {
    let workflow_id = facade.execute(&service_id).await?;
    Ok(Json(ExecuteResponse { workflow_id }))
}

fn parse_workflow_id(raw: &str) -> Result<WorkflowId, DaemonError> {
    WorkflowId::parse(raw).map_err(|_| DaemonError::validation("invalid workflow_id"))
}

/// `POST /services/{id}/workflow/stop/{wf_id}`.
async fn stop(
    State(facade): State<Arc<ServiceFacade>>,
    Path((service_id, wf_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, DaemonError> {
    let workflow_id = parse_workflow_id(&wf_id)?;
    facade.stop(&service_id, workflow_id).await?;
    Ok(Json(serde_json::json!({})))
}

#[derive(Debug, Deserialize)]
struct StatusQuery {
    #[serde(default)]
    verbose_level: u8,
}

/// `GET /services/{id}/workflow/status/{wf_id}?verbose_level={0,1,2}`:
/// JSON state at level 0, plain-text log at 1 or 2.
async fn status(
    State(facade): State<Arc<ServiceFacade>>,
    Path((service_id, wf_id)): Path<(String, String)>,
    Query(query): Query<StatusQuery>,
) -> Result<Response, DaemonError> {
    let workflow_id = parse_workflow_id(&wf_id)?;
    let response = facade.status(&service_id, workflow_id, query.verbose_level).await?;
    Ok(match response {
        wf_engine::StatusResponse::State(state) => Json(state).into_response(),
        wf_engine::StatusResponse::Log(log) => log.into_response(),
    })
}

#[derive(Debug, Deserialize)]
struct ResultsQuery {
    result_file: Option<String>,
}

/// `GET /services/{id}/workflow/results/{wf_id}?result_file=…`: a list of
/// produced files with no query param, else the binary stream of one.
async fn results(
    State(facade): State<Arc<ServiceFacade>>,
    Path((service_id, wf_id)): Path<(String, String)>,
    Query(query): Query<ResultsQuery>,
) -> Result<Response, DaemonError> {
    let workflow_id = parse_workflow_id(&wf_id)?;
    match query.result_file {
        None => Ok(Json(facade.list_results(&service_id, workflow_id).await?).into_response()),
        Some(result_file) => {
            let bytes = facade.get_result(&service_id, workflow_id, &result_file).await?;
            Ok(Bytes::from(bytes).into_response())
        }
    }
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;
