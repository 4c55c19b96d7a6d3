use crate::api::error_response;
use axum::{
    body::{Body, Bytes},
    extract::Request,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use rand::Rng;
use std::fmt::Write;
use std::time::Instant;

pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Request-scoped trace id, inserted as a request extension.
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl std::ops::Deref for TraceId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

/// 16 lowercase hex chars.
fn generate_trace_id() -> String {
    let bytes: [u8; 8] = rand::thread_rng().gen();
    bytes.iter().fold(String::with_capacity(16), |mut s, b| {
        let _ = write!(s, "{b:02x}");
        s
    })
}

const MAX_BODY_LOG_BYTES: usize = 200;
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

fn snippet(bytes: &[u8]) -> String {
    let Ok(s) = std::str::from_utf8(bytes) else {
        return "<non-utf8 body>".to_string();
    };
    if s.len() <= MAX_BODY_LOG_BYTES {
        return s.to_string();
    }
    let mut end = MAX_BODY_LOG_BYTES;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

fn format_elapsed(elapsed_us: u128) -> String {
    match elapsed_us {
        0..=999 => format!("{elapsed_us}µs"),
        1_000..=999_999 => format!("{}ms", elapsed_us / 1000),
        _ => format!("{:.1}s", elapsed_us as f64 / 1_000_000.0),
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"))
}

/// Buffers a request body so it can be logged and still reach the handler.
/// Fails when the body exceeds `MAX_REQUEST_BODY_BYTES` or cannot be read.
async fn buffer_request(req: Request) -> Result<(Request, Bytes), axum::Error> {
    let (parts, body) = req.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_REQUEST_BODY_BYTES).await?;
    Ok((Request::from_parts(parts, Body::from(bytes.clone())), bytes))
}

fn with_trace_header(mut response: Response, trace_id: &str) -> Response {
    if let Ok(val) = HeaderValue::from_str(trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, val);
    }
    response
}

/// Logs every request and response with a fresh trace id and echoes the id
/// in the `X-Trace-Id` response header. Swagger UI assets are not logged.
pub async fn request_logging(mut req: Request, next: Next) -> Response {
    let trace_id = generate_trace_id();
    req.extensions_mut().insert(TraceId(trace_id.clone()));

    if req.uri().path().starts_with("/docs") {
        return next.run(req).await;
    }

    let method = req.method().clone();
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    let req = if matches!(method, Method::POST | Method::PUT | Method::PATCH) {
        let (req, bytes) = match buffer_request(req).await {
            Ok(buffered) => buffered,
            Err(e) => {
                tracing::warn!(trace_id = %trace_id, method = %method, path = %url, error = %e, "--> request body rejected");
                let response = error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    &trace_id,
                    "payload_too_large",
                    &format!("Request body exceeds {MAX_REQUEST_BODY_BYTES} bytes"),
                );
                return with_trace_header(response, &trace_id);
            }
        };
        if bytes.is_empty() {
            tracing::info!(trace_id = %trace_id, method = %method, path = %url, "--> request");
        } else {
            tracing::info!(
                trace_id = %trace_id,
                method = %method,
                path = %url,
                body = %snippet(&bytes),
                "--> request"
            );
        }
        req
    } else {
        tracing::info!(trace_id = %trace_id, method = %method, path = %url, "--> request");
        req
    };

    let start = Instant::now();
    let response = next.run(req).await;
    let elapsed = format_elapsed(start.elapsed().as_micros());

    let status = response.status();
    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .unwrap_or_default();
    let body_log = if is_json(&parts.headers) && !bytes.is_empty() {
        snippet(&bytes)
    } else {
        String::new()
    };

    let code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(trace_id = %trace_id, status = code, elapsed = %elapsed, body = %body_log, "<-- response");
    } else if status.is_client_error() {
        tracing::warn!(trace_id = %trace_id, status = code, elapsed = %elapsed, body = %body_log, "<-- response");
    } else {
        tracing::info!(trace_id = %trace_id, status = code, elapsed = %elapsed, "<-- response");
    }

    with_trace_header(Response::from_parts(parts, Body::from(bytes)), &trace_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trace_ids_are_16_hex_chars() {
        let id = generate_trace_id();
        assert_eq!(id.len(), 16);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(id, generate_trace_id());
    }

    #[test]
    fn snippet_truncates_on_char_boundary() {
        let long = "€".repeat(100);
        let s = snippet(long.as_bytes());
        assert!(s.ends_with("..."));
        assert!(s.len() <= MAX_BODY_LOG_BYTES + 3);
        assert_eq!(snippet(&[0xff, 0xfe]), "<non-utf8 body>");
    }

    #[test]
    fn elapsed_units() {
        assert_eq!(format_elapsed(12), "12µs");
        assert_eq!(format_elapsed(12_500), "12ms");
        assert_eq!(format_elapsed(2_500_000), "2.5s");
    }
}
