// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_pod_sentinel() {
    let target = parse_sentinel_host("my-pod.pod.my-ns.cluster.local.wf-internal", SENTINEL_MARKER);
    assert_eq!(
        target,
        Some(SentinelTarget::Pod {
            name: "my-pod".to_string(),
            namespace: "my-ns".to_string(),
        })
    );
}

#[test]
fn parses_svc_sentinel() {
    let target = parse_sentinel_host("my-svc.svc.my-ns.cluster.local.wf-internal", SENTINEL_MARKER);
    assert_eq!(
        target,
        Some(SentinelTarget::Svc {
            name: "my-svc".to_string(),
            namespace: "my-ns".to_string(),
        })
    );
}

#[test]
fn rejects_ordinary_hostnames() {
    assert_eq!(parse_sentinel_host("example.com", SENTINEL_MARKER), None);
    assert_eq!(parse_sentinel_host("foo.bar.baz", SENTINEL_MARKER), None);
}

#[test]
fn rejects_unknown_kind_segment() {
    assert_eq!(
        parse_sentinel_host("my-thing.svcx.my-ns.cluster.local.wf-internal", SENTINEL_MARKER),
        None
    );
}
