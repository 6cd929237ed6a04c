//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: preflight short-circuit, reserved
//! paths, delegation to the static resolver, and site-wide headers.

use crate::config::AppState;
use crate::handler::static_files::ResolveError;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Main entry point for HTTP request handling
///
/// Generic over the request body: the body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method();
    let path = req.uri().path();

    if state.access_log {
        logger::log_request(method, path);
    }

    let mut response = route_request(method, path, &state).await;
    state.site_headers.apply(response.headers_mut());
    Ok(response)
}

async fn route_request(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    // 1. CORS preflight
    if method == Method::OPTIONS {
        return http::build_options_response();
    }

    // 2. Reserved paths
    if state.is_blocked(path) {
        return http::build_blocked_response();
    }

    // 3. Static files
    match state.resolver.resolve(path).await {
        Ok(file) => http::build_file_response(
            file.content,
            file.content_type,
            file.cache,
            method == Method::HEAD,
        ),
        Err(ResolveError::Forbidden(_)) => http::build_403_response(),
        Err(ResolveError::NotFound(_)) => http::build_404_response(),
        Err(ResolveError::Server { .. }) => http::build_500_response(),
    }
}
