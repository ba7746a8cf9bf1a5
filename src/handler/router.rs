//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method
//! validation, route matching, and access logging.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response, Version};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Paths browsers request for the site icon regardless of page markup
const FAVICON_PATHS: &[&str] = &["/favicon.ico", "/favicon.svg"];

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

/// Main entry point for HTTP request handling
pub async fn handle_request(
    req: Request<hyper::body::Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // 1. Check HTTP method, then dispatch
    let response = match check_http_method(&method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head: method == Method::HEAD,
                if_none_match: header_value(&req, "if-none-match"),
            };
            route_request(&ctx, &state)
        }
    };

    // 2. Emit one access log line per request
    if state.config.logging.access_log {
        let entry = AccessLogEntry {
            remote_addr: peer_addr.ip().to_string(),
            time: chrono::Local::now(),
            method: method.to_string(),
            path,
            http_version: version_label(req.version()).to_string(),
            status: response.status().as_u16(),
            body_bytes: content_length(&response),
            referer: header_value(&req, "referer"),
            user_agent: header_value(&req, "user-agent"),
            request_time_us: u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
        };
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Route request based on path
///
/// The dashboard is the fallback for any path the asset routes do not
/// claim, so the root route behaves as a catch-all.
pub fn route_request(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    // 1. Site icon
    if FAVICON_PATHS.contains(&ctx.path) {
        return super::static_files::serve_favicon(ctx, state);
    }

    // 2. Public asset tree
    if let Some(asset_name) = strip_asset_prefix(ctx.path, &state.config.ui.asset_path) {
        return super::static_files::serve_asset(ctx, asset_name, state);
    }

    // 3. Everything else renders the dashboard
    super::dashboard::serve_dashboard(ctx, state)
}

/// Check HTTP method; only GET and HEAD reach the route table
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Strip the configured asset prefix, returning the store-relative name
fn strip_asset_prefix<'a>(path: &'a str, asset_path: &str) -> Option<&'a str> {
    let rest = path.strip_prefix(asset_path)?;
    if rest.is_empty() {
        return Some("");
    }
    rest.strip_prefix('/')
}

fn header_value(req: &Request<hyper::body::Incoming>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

fn content_length(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
