//! Asset resolution module
//!
//! Produces public URLs and HTML markup for static assets, and registers the
//! resolution helpers as template functions so views can call them by name.

mod store;

pub use store::AssetStore;

use minijinja::value::Value;
use minijinja::{Environment, ErrorKind};
use std::io;
use std::sync::Arc;

/// Resolves logical asset filenames to public URLs and markup
pub struct AssetResolver {
    /// Public URL prefix the static route serves under
    public_path: String,
    store: AssetStore,
}

impl AssetResolver {
    pub fn new(public_path: impl Into<String>, store: AssetStore) -> Self {
        Self {
            public_path: public_path.into(),
            store,
        }
    }

    pub fn store(&self) -> &AssetStore {
        &self.store
    }

    /// Public URL for an asset: exact `{public_path}/{filename}` concatenation
    pub fn url(&self, filename: &str) -> String {
        format!("{}/{filename}", self.public_path)
    }

    /// Stylesheet link tag referencing the `dist/` build output
    pub fn stylesheet_tag(&self, filename: &str) -> String {
        format!(
            r#"<link rel="stylesheet" href="{}/dist/{}">"#,
            escape_attr(&self.public_path),
            escape_attr(filename),
        )
    }

    /// Deferred module script tag referencing the `dist/` build output
    pub fn script_tag(&self, filename: &str) -> String {
        format!(
            r#"<script defer type="module" src="{}/dist/{}"></script>"#,
            escape_attr(&self.public_path),
            escape_attr(filename),
        )
    }

    /// Inline SVG referencing the icon sprite sheet by fragment id
    ///
    /// Ids are trusted developer-supplied values and are not escaped.
    pub fn icon_svg(&self, id: &str) -> String {
        format!(
            r#"<svg class="icon" height="16" width="16"><use xlink:href="{}/icons.svg#{id}"></use></svg>"#,
            self.public_path,
        )
    }

    /// Existence check against the `dist/` build output the tags reference
    pub fn dist_exists(&self, filename: &str) -> io::Result<bool> {
        self.store.exists(&format!("dist/{filename}"))
    }
}

/// Escape a string for use inside a double-quoted HTML attribute
fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Register the asset helpers as template functions
///
/// Tag-producing helpers return safe strings so the engine's auto-escaping
/// leaves their markup intact; the `_if_exists` variants resolve to an empty
/// value when the build output is absent.
pub fn register_template_functions(env: &mut Environment<'static>, resolver: &Arc<AssetResolver>) {
    let r = Arc::clone(resolver);
    env.add_function("asset", move |filename: String| r.url(&filename));

    let r = Arc::clone(resolver);
    env.add_function("stylesheet", move |filename: String| {
        Value::from_safe_string(r.stylesheet_tag(&filename))
    });

    let r = Arc::clone(resolver);
    env.add_function("script", move |filename: String| {
        Value::from_safe_string(r.script_tag(&filename))
    });

    let r = Arc::clone(resolver);
    env.add_function("icon", move |id: String| {
        Value::from_safe_string(r.icon_svg(&id))
    });

    let r = Arc::clone(resolver);
    env.add_function(
        "asset_if_exists",
        move |filename: String| -> Result<Value, minijinja::Error> {
            if check_dist(&r, &filename)? {
                Ok(Value::from(r.url(&filename)))
            } else {
                Ok(Value::from(""))
            }
        },
    );

    let r = Arc::clone(resolver);
    env.add_function(
        "stylesheet_if_exists",
        move |filename: String| -> Result<Value, minijinja::Error> {
            if check_dist(&r, &filename)? {
                Ok(Value::from_safe_string(r.stylesheet_tag(&filename)))
            } else {
                Ok(Value::from(""))
            }
        },
    );

    let r = Arc::clone(resolver);
    env.add_function(
        "script_if_exists",
        move |filename: String| -> Result<Value, minijinja::Error> {
            if check_dist(&r, &filename)? {
                Ok(Value::from_safe_string(r.script_tag(&filename)))
            } else {
                Ok(Value::from(""))
            }
        },
    );
}

/// Map an existence-check I/O failure onto a template error
///
/// NotFound never reaches this point; anything else aborts the render.
fn check_dist(resolver: &AssetResolver, filename: &str) -> Result<bool, minijinja::Error> {
    resolver.dist_exists(filename).map_err(|e| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("asset existence check failed for {filename:?}"),
        )
        .with_source(e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn resolver() -> AssetResolver {
        AssetResolver::new("/assets", AssetStore::embedded())
    }

    #[test]
    fn test_url_is_exact_concatenation() {
        assert_eq!(resolver().url("dist/main.css"), "/assets/dist/main.css");

        // No slash normalization
        let trailing = AssetResolver::new("/assets/", AssetStore::embedded());
        assert_eq!(trailing.url("x.js"), "/assets//x.js");
    }

    #[test]
    fn test_stylesheet_tag() {
        assert_eq!(
            resolver().stylesheet_tag("main.css"),
            r#"<link rel="stylesheet" href="/assets/dist/main.css">"#
        );
    }

    #[test]
    fn test_script_tag() {
        assert_eq!(
            resolver().script_tag("main.js"),
            r#"<script defer type="module" src="/assets/dist/main.js"></script>"#
        );
    }

    #[test]
    fn test_tag_attributes_are_escaped() {
        let tag = resolver().stylesheet_tag(r#"a"b.css"#);
        assert!(tag.contains("a&quot;b.css"));
        assert!(!tag.contains(r#"a"b.css"#));
    }

    #[test]
    fn test_icon_markup() {
        assert_eq!(
            resolver().icon_svg("gauge"),
            r#"<svg class="icon" height="16" width="16"><use xlink:href="/assets/icons.svg#gauge"></use></svg>"#
        );
    }

    #[test]
    fn test_dist_exists_against_directory_store() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("dist")).unwrap();
        fs::write(root.path().join("dist/present.css"), b"x").unwrap();
        fs::create_dir(root.path().join("dist/nested")).unwrap();

        let resolver = AssetResolver::new("/assets", AssetStore::dir(root.path()));
        assert!(resolver.dist_exists("present.css").unwrap());
        assert!(!resolver.dist_exists("absent.css").unwrap());
        assert!(!resolver.dist_exists("nested").unwrap());
    }

    #[test]
    fn test_template_functions_render_markup_unescaped() {
        let mut env = Environment::new();
        register_template_functions(&mut env, &Arc::new(resolver()));
        env.add_template("t.html", r#"{{ stylesheet("main.css") }}|{{ asset("x.js") }}"#)
            .unwrap();

        let out = env
            .get_template("t.html")
            .unwrap()
            .render(minijinja::context! {})
            .unwrap();
        assert_eq!(
            out,
            r#"<link rel="stylesheet" href="/assets/dist/main.css">|/assets/x.js"#
        );
    }

    #[test]
    fn test_if_exists_functions_resolve_or_empty() {
        let mut env = Environment::new();
        register_template_functions(&mut env, &Arc::new(resolver()));
        env.add_template(
            "t.html",
            r#"{{ stylesheet_if_exists("main.css") }}|{{ stylesheet_if_exists("absent.css") }}"#,
        )
        .unwrap();

        let out = env
            .get_template("t.html")
            .unwrap()
            .render(minijinja::context! {})
            .unwrap();
        assert_eq!(
            out,
            r#"<link rel="stylesheet" href="/assets/dist/main.css">|"#
        );
    }
}
