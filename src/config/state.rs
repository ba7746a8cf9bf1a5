// Application state module
// Holds the per-process wiring built once at startup

use std::sync::Arc;

use crate::assets::{AssetResolver, AssetStore};
use crate::render::{self, Render, RenderError};

use super::types::Config;

/// Application state shared by all request handlers
pub struct AppState {
    pub config: Config,
    pub assets: Arc<AssetResolver>,
    pub renderer: Box<dyn Render>,
}

impl AppState {
    /// Wire the asset store, resolver, and renderer for the configured mode
    ///
    /// The resolver's template functions are registered on the renderer's
    /// environment during construction, so views can call them by name.
    pub fn new(config: &Config) -> Result<Self, RenderError> {
        let store = if config.ui.dev {
            AssetStore::dir(&config.ui.public_dir)
        } else {
            AssetStore::embedded()
        };
        let assets = Arc::new(AssetResolver::new(config.ui.asset_path.clone(), store));
        let renderer = render::build_renderer(config.ui.dev, &config.ui.views_dir, &assets)?;

        Ok(Self {
            config: config.clone(),
            assets,
            renderer,
        })
    }
}
