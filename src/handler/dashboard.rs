//! Dashboard page handler
//!
//! Builds the dashboard view and maps render results onto HTTP responses.

use super::router::RequestContext;
use crate::config::AppState;
use crate::http;
use crate::logger;
use crate::render::View;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use minijinja::context;
use std::sync::Arc;

/// Render the dashboard view
///
/// Render failures surface verbatim as a 500 plain-text body; for a local
/// tool the raw template error is the most useful response.
pub fn serve_dashboard(ctx: &RequestContext<'_>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    let view = View::parse(
        "dashboard",
        context! {
            view => "dashboard",
            title => "Dashboard",
        },
    );

    match state.renderer.render(&view) {
        Ok(html) => http::build_html_response(html, ctx.is_head),
        Err(err) => {
            logger::log_error(&format!("Dashboard render failed: {err}"));
            http::build_error_response(&err.to_string())
        }
    }
}
