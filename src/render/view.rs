//! View selection module
//!
//! A view names the template file to render and carries the data payload for
//! one render operation.

use minijinja::value::Value;

/// A named template selection plus its data payload
#[derive(Debug, Clone)]
pub struct View {
    /// Template identifier; backed by `{name}.html` in the views tree
    pub name: String,
    /// Named block to render within the view file; None renders the whole file
    pub block: Option<String>,
    /// Opaque payload handed to the template engine
    pub data: Value,
}

impl View {
    /// Create a view rendering the whole template file
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            block: None,
            data,
        }
    }

    /// Select a named block within the view file
    #[must_use]
    pub fn with_block(mut self, block: impl Into<String>) -> Self {
        self.block = Some(block.into());
        self
    }

    /// Parse a `name#block` view reference
    ///
    /// Without a `#` the whole file renders.
    pub fn parse(reference: &str, data: Value) -> Self {
        match reference.split_once('#') {
            Some((name, block)) => Self::new(name, data).with_block(block),
            None => Self::new(reference, data),
        }
    }

    /// Template file backing this view
    pub fn template_file(&self) -> String {
        format!("{}.html", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_file_by_default() {
        let view = View::new("dashboard", Value::UNDEFINED);
        assert_eq!(view.name, "dashboard");
        assert_eq!(view.block, None);
        assert_eq!(view.template_file(), "dashboard.html");
    }

    #[test]
    fn test_with_block() {
        let view = View::new("dashboard", Value::UNDEFINED).with_block("content");
        assert_eq!(view.block.as_deref(), Some("content"));
    }

    #[test]
    fn test_parse_reference() {
        let view = View::parse("dashboard#content", Value::UNDEFINED);
        assert_eq!(view.name, "dashboard");
        assert_eq!(view.block.as_deref(), Some("content"));

        let view = View::parse("dashboard", Value::UNDEFINED);
        assert_eq!(view.block, None);
    }
}
