// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::BTreeMap;

use wf_cluster::{BackendConfig, JobStorageType};
use wf_core::{JobId, ResourceKind, WorkflowInputRecord, WorkflowResourceSpec};

use super::*;

fn backend_config() -> BackendConfig {
    BackendConfig {
        kubeconfig_path: None,
        in_cluster: true,
        image_pull_secret: "regcred".to_string(),
        side_car_image: "registry.example/side-car:latest".to_string(),
        job_storage_type: JobStorageType::EmptyDir,
        job_storage_size: "1Gi".to_string(),
        namespace: "workflows".to_string(),
        api_config_secret: "workflow-api-config".to_string(),
    }
}

fn labels(job_id: JobId) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), "workflow-api".to_string());
    labels.insert("workflow-id".to_string(), "wf-1".to_string());
    labels.insert("job-id".to_string(), job_id.to_string());
    labels
}

fn base_spec() -> WorkflowResourceSpec {
    WorkflowResourceSpec {
        worker_image: "registry.example/worker:latest".to_string(),
        worker_output_directory: None,
        worker_command: None,
        worker_args: None,
        gpu_required: false,
    }
}

#[test]
fn scenario_1_environment_only_manifest_has_env_from_and_no_side_car() {
    let job_id = JobId::new();
    let cm = wf_core::ConfigMapId::new();
    let backend = backend_config();
    let spec = base_spec();
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: std::slice::from_ref(&cm),
        input_config_ref: None,
        input_resources: &[],
        persistent_volume_claim_id: None,
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let pod_spec = pod.spec.expect("pod spec");
    assert_eq!(pod_spec.containers.len(), 1);
    let worker = &pod_spec.containers[0];
    assert_eq!(worker.name, "worker");
    let env_from = worker.env_from.as_ref().expect("env_from");
    assert_eq!(env_from.len(), 1);
    assert_eq!(
        env_from[0].config_map_ref.as_ref().unwrap().name,
        Some(cm.to_string())
    );
    assert!(pod_spec.init_containers.is_none());
    assert_eq!(pod.metadata.name, Some(job_id.to_string()));
}

#[test]
fn scenario_2_data_input_mounts_subpath_and_adds_init_container() {
    let job_id = JobId::new();
    let backend = backend_config();
    let spec = base_spec();
    let input_config_ref = "input-config-id".to_string();
    let records = vec![WorkflowInputRecord {
        name: "x".to_string(),
        kind: ResourceKind::Data,
        mount_path: Some("/in".to_string()),
        source_reference: None,
    }];
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: &[],
        input_config_ref: Some(&input_config_ref),
        input_resources: &records,
        persistent_volume_claim_id: None,
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let pod_spec = pod.spec.expect("pod spec");
    let init_containers = pod_spec.init_containers.expect("init containers");
    assert_eq!(init_containers.len(), 1);
    assert_eq!(init_containers[0].name, "data-input-init");

    let worker = &pod_spec.containers[0];
    let mounts = worker.volume_mounts.as_ref().expect("mounts");
    let mount = mounts
        .iter()
        .find(|m| m.mount_path == "/in/x")
        .expect("mount at /in/x");
    assert_eq!(mount.sub_path.as_deref(), Some("x"));
    assert_eq!(mount.name, "job-volume");
}

#[test]
fn data_archive_input_mounts_without_subpath() {
    let job_id = JobId::new();
    let backend = backend_config();
    let spec = base_spec();
    let records = vec![WorkflowInputRecord {
        name: "bundle".to_string(),
        kind: ResourceKind::DataArchive,
        mount_path: Some("/archive".to_string()),
        source_reference: None,
    }];
    let input_config_ref = "input-config-id".to_string();
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: &[],
        input_config_ref: Some(&input_config_ref),
        input_resources: &records,
        persistent_volume_claim_id: None,
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let worker = &pod.spec.unwrap().containers[0];
    let mount = worker
        .volume_mounts
        .as_ref()
        .unwrap()
        .iter()
        .find(|m| m.mount_path == "/archive")
        .expect("mount at /archive");
    assert!(mount.sub_path.is_none());
}

#[test]
fn scenario_3_persistent_volume_claim_binds_job_volume() {
    let job_id = JobId::new();
    let backend = backend_config();
    let spec = base_spec();
    let pvc_id = wf_core::PvcId::new();
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: &[],
        input_config_ref: None,
        input_resources: &[],
        persistent_volume_claim_id: Some(pvc_id),
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let volumes = pod.spec.unwrap().volumes.unwrap();
    let job_volume = volumes.iter().find(|v| v.name == "job-volume").unwrap();
    let pvc = job_volume.persistent_volume_claim.as_ref().expect("pvc binding");
    assert_eq!(pvc.claim_name, pvc_id.to_string());
    assert!(job_volume.empty_dir.is_none());
}

#[test]
fn side_car_only_present_when_output_directory_set() {
    let job_id = JobId::new();
    let backend = backend_config();
    let mut spec = base_spec();
    spec.worker_output_directory = Some("/out".to_string());
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: &[],
        input_config_ref: None,
        input_resources: &[],
        persistent_volume_claim_id: None,
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let containers = pod.spec.unwrap().containers;
    assert_eq!(containers.len(), 2);
    let side_car = containers.iter().find(|c| c.name == "side-car").expect("side-car");
    assert_eq!(side_car.image_pull_policy.as_deref(), Some("Always"));
    let mounts = side_car.volume_mounts.as_ref().unwrap();
    assert_eq!(mounts[0].mount_path, "/output");
}

#[test]
fn gpu_required_adds_resource_limit() {
    let job_id = JobId::new();
    let backend = backend_config();
    let mut spec = base_spec();
    spec.gpu_required = true;
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: &[],
        input_config_ref: None,
        input_resources: &[],
        persistent_volume_claim_id: None,
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let worker = &pod.spec.unwrap().containers[0];
    let limits = worker.resources.as_ref().unwrap().limits.as_ref().unwrap();
    assert_eq!(limits.get("nvidia.com/gpu").unwrap().0, "1");
}

#[test]
fn property_manifest_determinism() {
    let job_id = JobId::new();
    let backend = backend_config();
    let spec = base_spec();
    let cm = wf_core::ConfigMapId::new();
    let build = || {
        build_pod_manifest(&ManifestInput {
            job_id,
            namespace: "workflows",
            workflow_resource_spec: &spec,
            config_map_refs: std::slice::from_ref(&cm),
            input_config_ref: None,
            input_resources: &[],
            persistent_volume_claim_id: None,
            labels: labels(job_id),
            backend_config: &backend,
        })
    };

    let a = build();
    let b = build();
    assert_eq!(a, b);
}

#[test]
fn labels_include_app_workflow_id_job_id() {
    let job_id = JobId::new();
    let backend = backend_config();
    let spec = base_spec();
    let input = ManifestInput {
        job_id,
        namespace: "workflows",
        workflow_resource_spec: &spec,
        config_map_refs: &[],
        input_config_ref: None,
        input_resources: &[],
        persistent_volume_claim_id: None,
        labels: labels(job_id),
        backend_config: &backend,
    };

    let pod = build_pod_manifest(&input);
    let pod_labels = pod.metadata.labels.unwrap();
    assert_eq!(pod_labels.get("app").unwrap(), "workflow-api");
    assert_eq!(pod_labels.get("workflow-id").unwrap(), "wf-1");
    assert_eq!(pod_labels.get("job-id").unwrap(), &job_id.to_string());
}
