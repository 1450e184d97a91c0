// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! A minimal HTTP/1.1 request/response exchange over an already-open duplex
//! stream (the port-forward tunnel). No connection pooling, chunked
//! encoding, or redirects — the side-car protocol needs none of that, and
//! pulling in a general-purpose HTTP client is not warranted for one POST.

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::ClusterError;

/// Send a single `POST {path}` with a JSON body over `stream` and return
/// the response status code.
pub async fn post<S>(stream: &mut S, host: &str, path: &str, body: &[u8]) -> Result<u16, ClusterError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let request = format!(
        "POST {path} HTTP/1.1\r\n\
         Host: {host}\r\n\
         Content-Type: application/json\r\n\
         Content-Length: {len}\r\n\
         Connection: close\r\n\
         \r\n",
        len = body.len(),
    );
    stream
        .write_all(request.as_bytes())
        .await
        .map_err(|e| ClusterError::TransportError(e.to_string()))?;
    stream
        .write_all(body)
        .await
        .map_err(|e| ClusterError::TransportError(e.to_string()))?;
    stream
        .flush()
        .await
        .map_err(|e| ClusterError::TransportError(e.to_string()))?;

    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .await
        .map_err(|e| ClusterError::TransportError(e.to_string()))?;

    parse_status_line(&buf)
}

fn parse_status_line(response: &[u8]) -> Result<u16, ClusterError> {
    let text = String::from_utf8_lossy(response);
    let line = text
        .lines()
        .next()
        .ok_or_else(|| ClusterError::TransportError("empty response".to_string()))?;
    let mut parts = line.split_whitespace();
    let _version = parts
        .next()
        .ok_or_else(|| ClusterError::TransportError(format!("malformed status line: {line}")))?;
    let status = parts
        .next()
        .ok_or_else(|| ClusterError::TransportError(format!("malformed status line: {line}")))?;
    status
        .parse::<u16>()
        .map_err(|_| ClusterError::TransportError(format!("non-numeric status: {status}")))
}

#[cfg(test)]
#[path = "http_client_tests.rs"]
mod tests;
