// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Parses `KEY=VALUE`-per-line environment file payloads into a mapping,
//! the format an `environment`-kind input resource's bytes are decoded
//! with before being materialized as a config map.

use std::collections::BTreeMap;

/// Parse `content` as a sequence of `KEY=VALUE` lines.
///
/// Blank lines and lines whose first non-whitespace character is `#` are
/// ignored. A value wrapped in matching single or double quotes has the
/// quotes stripped. Lines without an `=` are skipped rather than treated
/// as an error, since a malformed line shouldn't fail an entire environment
/// input over one stray entry.
pub fn parse(content: &str) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = trimmed.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        map.insert(key.to_string(), unquote(value.trim()));
    }
    map
}

fn unquote(value: &str) -> String {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let first = bytes[0];
        let last = bytes[bytes.len() - 1];
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return value[1..value.len() - 1].to_string();
        }
    }
    value.to_string()
}

#[cfg(test)]
#[path = "env_file_tests.rs"]
mod tests;
