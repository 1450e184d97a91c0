// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn config(secure: bool) -> ObjectStoreConfig {
    ObjectStoreConfig {
        endpoint: "minio.internal:9000".to_string(),
        access_key: "ak".to_string(),
        secret_key: "sk".to_string(),
        secure,
    }
}

#[test]
fn endpoint_url_honors_secure_flag() {
    assert_eq!(endpoint_url(&config(false)), "http://minio.internal:9000");
    assert_eq!(endpoint_url(&config(true)), "https://minio.internal:9000");
}

#[tokio::test]
async fn presigned_urls_do_not_require_network_access() {
    // `presigned()` only signs a request locally; it never contacts the
    // endpoint, so this exercises the real client end-to-end without a
    // live MinIO instance.
    let credentials = Credentials::new("ak", "sk", None, None, "test");
    let s3_config = aws_sdk_s3::Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .endpoint_url(endpoint_url(&config(false)))
        .credentials_provider(credentials)
        .force_path_style(true)
        .build();
    let store = S3ObjectStore {
        client: Client::from_conf(s3_config),
    };

    let download = store
        .get_download_url("user-storage", "svc/outputs/wf/result.tar")
        .await
        .expect("presigning succeeds offline");
    assert!(download.contains("user-storage"));
    assert!(download.contains("result.tar"));

    let upload = store
        .get_upload_url("user-storage", "svc/inputs/a.json")
        .await
        .expect("presigning succeeds offline");
    assert!(upload.contains("svc/inputs/a.json"));
}
