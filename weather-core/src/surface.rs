use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::PathBuf,
};

use crate::render::{Markup, escape};

/// Where rendered markup ends up. The widget only ever replaces an element's content.
pub trait OutputSurface {
    /// Overwrite the content of the element addressed by `selector`.
    fn replace(&mut self, selector: &str, markup: &Markup) -> Result<()>;

    /// Current content of the element addressed by `selector`, if any.
    fn read(&self, selector: &str) -> Option<String>;
}

/// In-memory surface keyed by selector.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    elements: HashMap<String, String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSurface for MemorySurface {
    fn replace(&mut self, selector: &str, markup: &Markup) -> Result<()> {
        self.elements.insert(selector.to_string(), markup.as_str().to_string());
        Ok(())
    }

    fn read(&self, selector: &str) -> Option<String> {
        self.elements.get(selector).cloned()
    }
}

/// Opening and closing tags for the element a simple selector addresses.
///
/// `#id` becomes `<div id="id">`, `.class` becomes `<div class="class">`, and
/// anything else is used as a tag name (falling back to `div`).
fn element_tags(selector: &str) -> (String, String) {
    let selector = selector.trim();

    if let Some(id) = selector.strip_prefix('#') {
        (format!(r#"<div id="{}">"#, escape(id)), "</div>".to_string())
    } else if let Some(class) = selector.strip_prefix('.') {
        (format!(r#"<div class="{}">"#, escape(class)), "</div>".to_string())
    } else if !selector.is_empty() && selector.chars().all(|c| c.is_ascii_alphanumeric()) {
        (format!("<{selector}>"), format!("</{selector}>"))
    } else {
        ("<div>".to_string(), "</div>".to_string())
    }
}

/// Wrap markup in the element addressed by `selector`.
pub fn wrap_in_element(selector: &str, markup: &Markup) -> String {
    let (open, close) = element_tags(selector);
    format!("{open}{markup}{close}")
}

/// Inverse of [`wrap_in_element`]: the inner content, if `html` is that element.
pub fn unwrap_element(selector: &str, html: &str) -> Option<String> {
    let (open, close) = element_tags(selector);
    html.trim_end()
        .strip_prefix(open.as_str())?
        .strip_suffix(close.as_str())
        .map(str::to_string)
}

/// Prints each render to stdout, wrapped in its target element.
#[derive(Debug, Default)]
pub struct StdoutSurface {
    last: HashMap<String, String>,
}

impl StdoutSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSurface for StdoutSurface {
    fn replace(&mut self, selector: &str, markup: &Markup) -> Result<()> {
        let html = wrap_in_element(selector, markup);

        let mut out = io::stdout().lock();
        writeln!(out, "{html}").context("Failed to write markup to stdout")?;

        self.last.insert(selector.to_string(), markup.as_str().to_string());
        Ok(())
    }

    fn read(&self, selector: &str) -> Option<String> {
        self.last.get(selector).cloned()
    }
}

/// Writes the wrapped element to a file, overwriting it on every render.
///
/// `read` unwraps the element again, so it returns the same inner content the
/// other surfaces do, and `None` when the file holds a different element.
#[derive(Debug, Clone)]
pub struct FileSurface {
    path: PathBuf,
}

impl FileSurface {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl OutputSurface for FileSurface {
    fn replace(&mut self, selector: &str, markup: &Markup) -> Result<()> {
        let html = wrap_in_element(selector, markup);

        fs::write(&self.path, format!("{html}\n"))
            .with_context(|| format!("Failed to write output file: {}", self.path.display()))?;

        tracing::debug!(path = %self.path.display(), "Wrote widget markup");
        Ok(())
    }

    fn read(&self, selector: &str) -> Option<String> {
        let html = fs::read_to_string(&self.path).ok()?;
        unwrap_element(selector, &html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::error_markup;

    #[test]
    fn memory_surface_overwrites_content() {
        let mut surface = MemorySurface::new();
        surface.replace("#app", &error_markup("first")).unwrap();
        surface.replace("#app", &error_markup("second")).unwrap();

        assert_eq!(surface.read("#app").as_deref(), Some("<p>second</p>"));
        assert_eq!(surface.read("#other"), None);
    }

    #[test]
    fn wraps_by_selector_kind() {
        let m = error_markup("hi");
        assert_eq!(wrap_in_element("#app", &m), r#"<div id="app"><p>hi</p></div>"#);
        assert_eq!(wrap_in_element(".wx", &m), r#"<div class="wx"><p>hi</p></div>"#);
        assert_eq!(wrap_in_element("aside", &m), "<aside><p>hi</p></aside>");
        assert_eq!(wrap_in_element("main > p", &m), "<div><p>hi</p></div>");
    }

    #[test]
    fn selector_is_escaped_in_attributes() {
        let m = error_markup("hi");
        let html = wrap_in_element(r#"#a"><script>"#, &m);
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn file_surface_overwrites_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.html");
        let mut surface = FileSurface::new(&path);

        surface.replace("#app", &error_markup("one")).unwrap();
        surface.replace("#app", &error_markup("two")).unwrap();

        assert_eq!(surface.read("#app").as_deref(), Some("<p>two</p>"));
        assert_eq!(surface.read("#other"), None);

        let on_disk = fs::read_to_string(&path).unwrap();
        assert_eq!(on_disk, "<div id=\"app\"><p>two</p></div>\n");
    }

    #[test]
    fn unwrap_element_matches_only_its_selector() {
        let html = wrap_in_element(".wx", &error_markup("hi"));
        assert_eq!(unwrap_element(".wx", &html).as_deref(), Some("<p>hi</p>"));
        assert_eq!(unwrap_element("#wx", &html), None);
    }
}
