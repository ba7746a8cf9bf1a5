//! Static asset serving module
//!
//! Serves bytes from the asset store with MIME type detection and
//! conditional request handling.

use super::router::RequestContext;
use crate::config::AppState;
use crate::http::{self, cache, mime};
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Store name of the bundled site icon
const FAVICON_ASSET: &str = "favicon.svg";

/// Serve the bundled favicon
pub fn serve_favicon(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    respond_with_asset(ctx, FAVICON_ASSET, state)
}

/// Serve a file from the public asset tree
pub fn serve_asset(
    ctx: &RequestContext<'_>,
    name: &str,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    respond_with_asset(ctx, name, state)
}

fn respond_with_asset(
    ctx: &RequestContext<'_>,
    name: &str,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let data = match state.assets.store().read(name) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return http::build_404_response(),
        Err(e) => {
            logger::log_error(&format!("Failed to read asset '{name}': {e}"));
            return http::build_error_response(&format!("failed to read asset {name:?}: {e}"));
        }
    };

    let etag = cache::generate_etag(&data);
    if cache::check_etag_match(ctx.if_none_match.as_deref(), &etag) {
        return http::build_304_response(&etag);
    }

    let content_type =
        mime::get_content_type(Path::new(name).extension().and_then(|e| e.to_str()));

    http::build_cached_response(Bytes::from(data), content_type, &etag, ctx.is_head)
}
