//! HTTP response building module
//!
//! Provides builders for the status code responses the dev server emits,
//! decoupled from request routing.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use super::cache::CachePolicy;

/// Build 200 response for a resolved file
pub fn build_file_response(
    content: Bytes,
    content_type: &str,
    cache: CachePolicy,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head { Bytes::new() } else { content };

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length);

    if let Some(directive) = cache.to_header_value() {
        builder = builder.header("Cache-Control", directive);
    }

    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error("200", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Build bare 200 response for CORS preflight
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 403 Forbidden response
pub fn build_403_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::FORBIDDEN, "Forbidden")
}

/// Build 404 response for a missing file
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "File not found")
}

/// Build 404 response for a reserved path
pub fn build_blocked_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "Not found")
}

/// Build 500 Internal Server Error response
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}

fn build_text_response(status: StatusCode, message: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from_static(message.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(Full::new(Bytes::from_static(message.as_bytes())));
            *resp.status_mut() = status;
            resp
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_response_headers() {
        let resp = build_file_response(
            Bytes::from_static(b"console.log(1)"),
            "application/javascript; charset=utf-8",
            CachePolicy::for_extension(Some("js")),
            false,
        );
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Length"], "14");
        assert_eq!(
            resp.headers()["Cache-Control"],
            "public, max-age=31536000, immutable"
        );
    }

    #[test]
    fn test_head_response_keeps_length() {
        let resp = build_file_response(
            Bytes::from_static(b"<html></html>"),
            "text/html",
            CachePolicy::Unspecified,
            true,
        );
        assert_eq!(resp.headers()["Content-Length"], "13");
        assert!(resp.headers().get("Cache-Control").is_none());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_403_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(build_404_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(build_blocked_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(
            build_500_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(build_options_response().status(), StatusCode::OK);
    }
}
