//! Template rendering module
//!
//! Renders named views against a shared layout + partial set in one of two
//! modes. The development renderer rebuilds its template environment from
//! the filesystem on every call, so edits are visible without a restart.
//! The production renderer holds one environment built from the snapshot
//! embedded at compile time and clones it per render before binding the
//! requested view file, so no per-call state can leak between requests.

mod view;

pub use view::View;

use crate::assets::{self, AssetResolver};
use chrono::{DateTime, Utc};
use minijinja::{path_loader, Environment, UndefinedBehavior};
use rust_embed::RustEmbed;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Embedded snapshot of the `views/` template tree
#[derive(RustEmbed)]
#[folder = "views/"]
struct ViewSnapshot;

/// Errors surfaced by a render operation
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("view template {name:?} not found")]
    ViewNotFound { name: String },
    #[error("view template {name:?} is not valid UTF-8")]
    InvalidEncoding { name: String },
    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

/// Render capability over a view
pub trait Render: Send + Sync {
    fn render(&self, view: &View) -> Result<String, RenderError>;
}

/// Build the renderer for the configured mode
pub fn build_renderer(
    dev: bool,
    views_dir: &str,
    assets: &Arc<AssetResolver>,
) -> Result<Box<dyn Render>, RenderError> {
    if dev {
        Ok(Box::new(DevRenderer::new(views_dir, Arc::clone(assets))))
    } else {
        Ok(Box::new(EmbeddedRenderer::new(assets)?))
    }
}

/// Development renderer: fresh environment and filesystem reads per call
pub struct DevRenderer {
    views_dir: PathBuf,
    assets: Arc<AssetResolver>,
}

impl DevRenderer {
    pub fn new(views_dir: impl Into<PathBuf>, assets: Arc<AssetResolver>) -> Self {
        Self {
            views_dir: views_dir.into(),
            assets,
        }
    }
}

impl Render for DevRenderer {
    fn render(&self, view: &View) -> Result<String, RenderError> {
        let mut env = Environment::new();
        env.set_loader(path_loader(&self.views_dir));
        configure_environment(&mut env, &self.assets);
        execute(&env, view)
    }
}

/// Production renderer: one pre-parsed environment over the embedded
/// snapshot, cloned per render
pub struct EmbeddedRenderer {
    base: Environment<'static>,
}

impl EmbeddedRenderer {
    /// Parse the embedded layouts and partials exactly once
    pub fn new(assets: &Arc<AssetResolver>) -> Result<Self, RenderError> {
        let mut base = Environment::new();
        configure_environment(&mut base, assets);

        for name in ViewSnapshot::iter() {
            if name.starts_with("layouts/") || name.starts_with("partials/") {
                let source = embedded_source(&name)?;
                base.add_template_owned(name.to_string(), source)?;
            }
        }

        Ok(Self { base })
    }
}

impl Render for EmbeddedRenderer {
    fn render(&self, view: &View) -> Result<String, RenderError> {
        let mut env = self.base.clone();
        let file = view.template_file();
        let source = embedded_source(&file)?;
        env.add_template_owned(file, source)?;
        execute(&env, view)
    }
}

/// Load one template source from the embedded snapshot
fn embedded_source(name: &str) -> Result<String, RenderError> {
    let file = ViewSnapshot::get(name).ok_or_else(|| RenderError::ViewNotFound {
        name: name.to_string(),
    })?;
    String::from_utf8(file.data.into_owned()).map_err(|_| RenderError::InvalidEncoding {
        name: name.to_string(),
    })
}

/// Shared environment setup for both renderer modes
///
/// Undefined variables are hard errors so that a payload missing a field the
/// template expects fails the render instead of emitting blanks.
fn configure_environment(env: &mut Environment<'static>, assets: &Arc<AssetResolver>) {
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    assets::register_template_functions(env, assets);
    env.add_filter("format_iso_timestamp", format_iso_timestamp);
    env.add_filter("format_relative_time", format_relative_time);
}

/// Execute the view against a prepared environment
fn execute(env: &Environment<'_>, view: &View) -> Result<String, RenderError> {
    let template = env.get_template(&view.template_file())?;
    let output = match &view.block {
        Some(block) => {
            let mut state = template.eval_to_state(view.data.clone())?;
            state.render_block(block)?
        }
        None => template.render(view.data.clone())?,
    };
    Ok(output)
}

/// Format an epoch-seconds timestamp as RFC 3339
fn format_iso_timestamp(secs: i64) -> Result<String, minijinja::Error> {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339())
        .ok_or_else(|| {
            minijinja::Error::new(
                minijinja::ErrorKind::InvalidOperation,
                format!("timestamp {secs} is out of range"),
            )
        })
}

/// Format an epoch-seconds timestamp relative to now, e.g. `5m ago`
fn format_relative_time(secs: i64) -> Result<String, minijinja::Error> {
    let then = DateTime::<Utc>::from_timestamp(secs, 0).ok_or_else(|| {
        minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            format!("timestamp {secs} is out of range"),
        )
    })?;
    Ok(humanize(Utc::now().signed_duration_since(then)))
}

fn humanize(delta: chrono::Duration) -> String {
    let seconds = delta.num_seconds();
    if seconds < 0 {
        return format!("in {}", span(-seconds));
    }
    if seconds < 5 {
        return "just now".to_string();
    }
    format!("{} ago", span(seconds))
}

fn span(seconds: i64) -> String {
    if seconds < 60 {
        format!("{seconds}s")
    } else if seconds < 3600 {
        format!("{}m", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h", seconds / 3600)
    } else {
        format!("{}d", seconds / 86_400)
    }
}
