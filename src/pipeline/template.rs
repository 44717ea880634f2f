//! Template loading and content injection.
//!
//! The template is kept as text and mutated through streaming `lol_html`
//! rewrite passes. Each pass re-parses the current document, lets selector
//! handlers edit the matching nodes, and re-serializes; everything the
//! handlers do not touch (doctype, comments, whitespace) comes out exactly
//! as it went in.
//!
//! The converter fragment is the exception: it goes through a full HTML5
//! fragment parse first, so stray or missing end tags cannot escape the
//! placeholder.

use crate::error::RenderError;
use lol_html::html_content::ContentType;
use lol_html::{element, rewrite_str, ElementContentHandlers, RewriteStrSettings, Selector};
use scraper::Html;
use std::borrow::Cow;
use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;
use tracing::debug;

/// Selector of the placeholder that receives the converted fragment.
pub const CONTENT_SELECTOR: &str = "#content";

/// A mutable HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlDocument {
    html: String,
}

/// Handler list accepted by [`HtmlDocument::rewrite`].
pub type Handlers<'h> = Vec<(Cow<'h, Selector>, ElementContentHandlers<'h>)>;

impl HtmlDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Current serialized form of the document.
    pub fn as_str(&self) -> &str {
        &self.html
    }

    pub fn into_string(self) -> String {
        self.html
    }

    /// Run one rewrite pass over the document, replacing it in place.
    pub fn rewrite(&mut self, handlers: Handlers<'_>) -> Result<(), RenderError> {
        let rewritten = rewrite_str(
            &self.html,
            RewriteStrSettings {
                element_content_handlers: handlers,
                ..RewriteStrSettings::default()
            },
        )
        .map_err(|err| RenderError::Rewrite {
            message: err.to_string(),
        })?;
        self.html = rewritten;
        Ok(())
    }
}

/// Read the template file at `path`.
pub fn load_template(path: &Path) -> Result<HtmlDocument, RenderError> {
    let html = std::fs::read_to_string(path).map_err(|source| RenderError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Loaded template {} ({} bytes)", path.display(), html.len());
    Ok(HtmlDocument::new(html))
}

/// Parse `fragment` as the children of a `<body>` and serialize the
/// resulting subtree.
///
/// Unmatched end tags are dropped and open elements are closed, the same
/// way an `innerHTML` assignment builds its nodes.
pub fn balance_fragment(fragment: &str) -> String {
    Html::parse_fragment(fragment).root_element().inner_html()
}

/// Replace the inner content of the first `#content` element with
/// `fragment`, inserted as markup.
///
/// The fragment is balanced with [`balance_fragment`] first, so all of it
/// stays inside the placeholder. Inserted markup is not matched by the same
/// pass, so a fragment that itself contains `id="content"` is left alone.
pub fn inject_content(doc: &mut HtmlDocument, fragment: &str) -> Result<(), RenderError> {
    let fragment = balance_fragment(fragment);
    let fragment = fragment.as_str();
    let replaced = Rc::new(Cell::new(false));

    doc.rewrite(vec![element!(CONTENT_SELECTOR, {
        let replaced = Rc::clone(&replaced);
        move |el| {
            if !replaced.get() {
                el.set_inner_content(fragment, ContentType::Html);
                replaced.set(true);
            }
            Ok(())
        }
    })])?;

    if !replaced.get() {
        return Err(RenderError::MissingElement {
            selector: CONTENT_SELECTOR,
        });
    }
    debug!("Injected {} bytes into {}", fragment.len(), CONTENT_SELECTOR);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "<!DOCTYPE html>\n<html><head><title>x</title></head>\
<body><main id=\"content\"><p>placeholder</p></main></body></html>";

    #[test]
    fn injects_fragment_as_markup() {
        let mut doc = HtmlDocument::new(TEMPLATE);
        inject_content(&mut doc, "<h1>Hi &amp; bye</h1>").unwrap();
        assert_eq!(
            doc.as_str(),
            "<!DOCTYPE html>\n<html><head><title>x</title></head>\
<body><main id=\"content\"><h1>Hi &amp; bye</h1></main></body></html>"
        );
    }

    #[test]
    fn only_first_content_element_is_replaced() {
        let mut doc = HtmlDocument::new(
            "<div id=\"content\">a</div><div id=\"content\">b</div>",
        );
        inject_content(&mut doc, "<p>x</p>").unwrap();
        assert_eq!(
            doc.as_str(),
            "<div id=\"content\"><p>x</p></div><div id=\"content\">b</div>"
        );
    }

    #[test]
    fn fragment_containing_content_id_is_not_reprocessed() {
        let mut doc = HtmlDocument::new("<div id=\"content\"></div>");
        inject_content(&mut doc, "<div id=\"content\">inner</div>").unwrap();
        assert_eq!(
            doc.as_str(),
            "<div id=\"content\"><div id=\"content\">inner</div></div>"
        );
    }

    #[test]
    fn stray_end_tag_cannot_close_placeholder() {
        let mut doc = HtmlDocument::new(
            "<body><main id=\"content\"></main><footer>f</footer></body>",
        );
        inject_content(&mut doc, "<p>a</p></main><h1>x</h1>").unwrap();
        assert_eq!(
            doc.as_str(),
            "<body><main id=\"content\"><p>a</p><h1>x</h1></main><footer>f</footer></body>"
        );
    }

    #[test]
    fn unclosed_elements_are_closed_inside_placeholder() {
        let mut doc = HtmlDocument::new("<div id=\"content\"></div><p>after</p>");
        inject_content(&mut doc, "<blockquote><p>open").unwrap();
        assert_eq!(
            doc.as_str(),
            "<div id=\"content\"><blockquote><p>open</p></blockquote></div><p>after</p>"
        );
    }

    #[test]
    fn balanced_fragment_is_unchanged() {
        let fragment = "<h1>Title</h1>\n<pre style=\"color:#fff;\"><code class=\"language-rust\">\
<span>fn</span> main() {}</code></pre>\n";
        assert_eq!(balance_fragment(fragment), fragment);
    }

    #[test]
    fn missing_placeholder_is_an_error() {
        let mut doc = HtmlDocument::new("<html><body><div id=\"main\"></div></body></html>");
        let err = inject_content(&mut doc, "<p>x</p>").unwrap_err();
        assert!(matches!(
            err,
            RenderError::MissingElement {
                selector: "#content"
            }
        ));
    }

    #[test]
    fn missing_template_file_is_reported_with_path() {
        let err = load_template(Path::new("/nonexistent/template.html")).unwrap_err();
        match err {
            RenderError::TemplateRead { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/template.html"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
