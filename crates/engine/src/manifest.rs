// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The Manifest Builder: a pure function from a workflow's accumulated
//! resources to a pod specification. No I/O, no cluster calls — a worker
//! container plus an optional side-car and an optional input-init init
//! container, all sharing one job volume.

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::{
    ConfigMapEnvSource, ConfigMapVolumeSource, Container, EmptyDirVolumeSource, EnvFromSource,
    EnvVar, KeyToPath, LocalObjectReference, PersistentVolumeClaimVolumeSource, Pod, PodSpec,
    ResourceRequirements, SecretVolumeSource, Volume, VolumeMount,
};
use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use wf_cluster::BackendConfig;
use wf_core::{ConfigMapId, JobId, PvcId, WorkflowInputRecord, WorkflowResourceSpec};

const JOB_VOLUME: &str = "job-volume";
const INPUT_CONFIG_VOLUME: &str = "input-config";
const API_CONFIG_VOLUME: &str = "api-config";
const INPUT_CONFIG_KEY: &str = "input-init.json";
const API_CONFIG_KEY: &str = "workflow-api.cfg";
const GPU_RESOURCE_KEY: &str = "nvidia.com/gpu";

/// Everything the builder needs to synthesize one workflow's pod manifest.
pub struct ManifestInput<'a> {
    pub job_id: JobId,
    pub namespace: &'a str,
    pub workflow_resource_spec: &'a WorkflowResourceSpec,
    pub config_map_refs: &'a [ConfigMapId],
    pub input_config_ref: Option<&'a str>,
    pub input_resources: &'a [WorkflowInputRecord],
    pub persistent_volume_claim_id: Option<PvcId>,
    pub labels: BTreeMap<String, String>,
    pub backend_config: &'a BackendConfig,
}

/// Synthesize the pod specification for a workflow. Pure: identical inputs
/// yield structurally identical output.
pub fn build_pod_manifest(input: &ManifestInput<'_>) -> Pod {
    let mut volumes = vec![job_volume(input)];
    let mut init_containers = Vec::new();

    if let Some(input_config_ref) = input.input_config_ref {
        volumes.push(Volume {
            name: INPUT_CONFIG_VOLUME.to_string(),
            config_map: Some(ConfigMapVolumeSource {
                name: Some(input_config_ref.to_string()),
                items: Some(vec![KeyToPath {
                    key: INPUT_CONFIG_KEY.to_string(),
                    path: INPUT_CONFIG_KEY.to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        });
        volumes.push(Volume {
            name: API_CONFIG_VOLUME.to_string(),
            secret: Some(SecretVolumeSource {
                secret_name: Some(input.backend_config.api_config_secret.clone()),
                items: Some(vec![KeyToPath {
                    key: API_CONFIG_KEY.to_string(),
                    path: API_CONFIG_KEY.to_string(),
                    ..Default::default()
                }]),
                ..Default::default()
            }),
            ..Default::default()
        });
        init_containers.push(data_input_init_container(input));
    }

    let mut containers = vec![worker_container(input)];
    if input.workflow_resource_spec.worker_output_directory.is_some() {
        containers.push(side_car_container(input));
    }

    let pod_spec = PodSpec {
        containers,
        init_containers: if init_containers.is_empty() {
            None
        } else {
            Some(init_containers)
        },
        volumes: Some(volumes),
        restart_policy: Some("Never".to_string()),
        image_pull_secrets: Some(vec![LocalObjectReference {
            name: Some(input.backend_config.image_pull_secret.clone()),
        }]),
        ..Default::default()
    };

    Pod {
        metadata: ObjectMeta {
            name: Some(input.job_id.to_string()),
            namespace: Some(input.namespace.to_string()),
            labels: Some(input.labels.clone()),
            ..Default::default()
        },
        spec: Some(pod_spec),
        ..Default::default()
    }
}

fn job_volume(input: &ManifestInput<'_>) -> Volume {
    match input.persistent_volume_claim_id {
        Some(pvc_id) => Volume {
            name: JOB_VOLUME.to_string(),
            persistent_volume_claim: Some(PersistentVolumeClaimVolumeSource {
                claim_name: pvc_id.to_string(),
                ..Default::default()
            }),
            ..Default::default()
        },
        None => Volume {
            name: JOB_VOLUME.to_string(),
            empty_dir: Some(EmptyDirVolumeSource {
                size_limit: Some(Quantity(input.backend_config.job_storage_size.clone())),
                ..Default::default()
            }),
            ..Default::default()
        },
    }
}

fn worker_container(input: &ManifestInput<'_>) -> Container {
    let spec = input.workflow_resource_spec;
    let mut volume_mounts = Vec::new();

    if let Some(output_dir) = spec.worker_output_directory.as_ref() {
        volume_mounts.push(VolumeMount {
            name: JOB_VOLUME.to_string(),
            mount_path: output_dir.clone(),
            ..Default::default()
        });
    }

    for resource in input.input_resources {
        let Some(mount_path) = resource.mount_path.as_ref() else {
            continue;
        };
        match resource.kind {
            wf_core::ResourceKind::Data => volume_mounts.push(VolumeMount {
                name: JOB_VOLUME.to_string(),
                mount_path: format!("{}/{}", mount_path.trim_end_matches('/'), resource.name),
                sub_path: Some(resource.name.clone()),
                ..Default::default()
            }),
            wf_core::ResourceKind::DataArchive => volume_mounts.push(VolumeMount {
                name: JOB_VOLUME.to_string(),
                mount_path: mount_path.clone(),
                ..Default::default()
            }),
            wf_core::ResourceKind::Environment => {}
        }
    }

    let env_from = input
        .config_map_refs
        .iter()
        .map(|cm| EnvFromSource {
            config_map_ref: Some(ConfigMapEnvSource {
                name: Some(cm.to_string()),
                ..Default::default()
            }),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    Container {
        name: "worker".to_string(),
        image: Some(spec.worker_image.clone()),
        command: spec.worker_command.clone(),
        args: spec.worker_args.clone(),
        env_from: if env_from.is_empty() { None } else { Some(env_from) },
        volume_mounts: if volume_mounts.is_empty() {
            None
        } else {
            Some(volume_mounts)
        },
        resources: spec.gpu_required.then(gpu_resources),
        ..Default::default()
    }
}

fn gpu_resources() -> ResourceRequirements {
    let mut limits = BTreeMap::new();
    limits.insert(GPU_RESOURCE_KEY.to_string(), Quantity("1".to_string()));
    ResourceRequirements {
        limits: Some(limits),
        ..Default::default()
    }
}

fn side_car_container(input: &ManifestInput<'_>) -> Container {
    Container {
        name: "side-car".to_string(),
        image: Some(input.backend_config.side_car_image.clone()),
        image_pull_policy: Some("Always".to_string()),
        volume_mounts: Some(vec![VolumeMount {
            name: JOB_VOLUME.to_string(),
            mount_path: "/output".to_string(),
            ..Default::default()
        }]),
        ..Default::default()
    }
}

fn data_input_init_container(input: &ManifestInput<'_>) -> Container {
    Container {
        name: "data-input-init".to_string(),
        image: Some(input.backend_config.side_car_image.clone()),
        command: Some(vec!["init".to_string()]),
        env: Some(vec![
            EnvVar {
                name: "INPUT_INIT_CONFIG".to_string(),
                value: Some("/opt/config/input-init.json".to_string()),
                ..Default::default()
            },
            EnvVar {
                name: "DATA_DESTINATION".to_string(),
                value: Some("/data/".to_string()),
                ..Default::default()
            },
            EnvVar {
                name: "CONFIG_FILE_PATH".to_string(),
                value: Some("/opt/config/workflow-api.cfg".to_string()),
                ..Default::default()
            },
        ]),
        volume_mounts: Some(vec![
            VolumeMount {
                name: INPUT_CONFIG_VOLUME.to_string(),
                mount_path: "/opt/config/input-init.json".to_string(),
                sub_path: Some(INPUT_CONFIG_KEY.to_string()),
                read_only: Some(true),
                ..Default::default()
            },
            VolumeMount {
                name: API_CONFIG_VOLUME.to_string(),
                mount_path: "/opt/config/workflow-api.cfg".to_string(),
                sub_path: Some(API_CONFIG_KEY.to_string()),
                read_only: Some(true),
                ..Default::default()
            },
            VolumeMount {
                name: JOB_VOLUME.to_string(),
                mount_path: "/data/".to_string(),
                ..Default::default()
            },
        ]),
        ..Default::default()
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
