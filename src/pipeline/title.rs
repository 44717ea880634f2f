//! Page title: read the first `<h1>`, write it into `<title>`.

use super::template::HtmlDocument;
use crate::error::RenderError;
use crate::html::unescape;
use lol_html::html_content::ContentType;
use lol_html::{element, text};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::debug;

/// Selector of the element whose text becomes the page title.
pub const HEADING_SELECTOR: &str = "h1";

/// Selector of the element that receives the page title.
pub const TITLE_SELECTOR: &str = "title";

/// Text content of the first `<h1>` in the document, or `None` if there is
/// no `<h1>`.
///
/// Like DOM `textContent`, text of nested elements is included, character
/// references are decoded, and whitespace is kept as written.
pub fn first_heading_text(doc: &mut HtmlDocument) -> Result<Option<String>, RenderError> {
    let seen = Rc::new(Cell::new(0usize));
    let raw = Rc::new(RefCell::new(String::new()));

    doc.rewrite(vec![
        element!(HEADING_SELECTOR, {
            let seen = Rc::clone(&seen);
            move |_el| {
                seen.set(seen.get() + 1);
                Ok(())
            }
        }),
        text!(HEADING_SELECTOR, {
            let seen = Rc::clone(&seen);
            let raw = Rc::clone(&raw);
            move |chunk| {
                // Text only reaches this handler while an h1 is open; the
                // counter tells the first one apart from later ones.
                if seen.get() == 1 {
                    raw.borrow_mut().push_str(chunk.as_str());
                }
                Ok(())
            }
        }),
    ])?;

    if seen.get() == 0 {
        return Ok(None);
    }
    let raw = raw.borrow();
    Ok(Some(unescape(&raw).into_owned()))
}

/// Set the text content of the first `<title>` element.
pub fn set_title(doc: &mut HtmlDocument, title: &str) -> Result<(), RenderError> {
    let done = Rc::new(Cell::new(false));

    doc.rewrite(vec![element!(TITLE_SELECTOR, {
        let done = Rc::clone(&done);
        move |el| {
            if !done.get() {
                el.set_inner_content(title, ContentType::Text);
                done.set(true);
            }
            Ok(())
        }
    })])?;

    if !done.get() {
        return Err(RenderError::MissingElement {
            selector: TITLE_SELECTOR,
        });
    }
    debug!("Set page title to {:?}", title);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(html: &str) -> Option<String> {
        first_heading_text(&mut HtmlDocument::new(html)).unwrap()
    }

    #[test]
    fn plain_heading() {
        assert_eq!(
            heading("<div><h1>Example Title</h1><p>body</p></div>"),
            Some("Example Title".to_string())
        );
    }

    #[test]
    fn nested_markup_and_entities() {
        assert_eq!(
            heading("<h1>Rust <code>&amp;str</code> &lt;3</h1>"),
            Some("Rust &str <3".to_string())
        );
    }

    #[test]
    fn only_first_heading_counts() {
        assert_eq!(
            heading("<h1>First</h1><p>between</p><h1>Second</h1>"),
            Some("First".to_string())
        );
    }

    #[test]
    fn whitespace_is_preserved() {
        assert_eq!(heading("<h1>\n  Spaced\n</h1>"), Some("\n  Spaced\n".to_string()));
    }

    #[test]
    fn no_heading() {
        assert_eq!(heading("<h2>Not it</h2><p>text</p>"), None);
    }

    #[test]
    fn empty_heading_is_some_empty() {
        assert_eq!(heading("<h1></h1>"), Some(String::new()));
    }

    #[test]
    fn heading_lookup_leaves_document_unchanged() {
        let html = "<!-- c --><h1 class=\"t\">A</h1>";
        let mut doc = HtmlDocument::new(html);
        first_heading_text(&mut doc).unwrap();
        assert_eq!(doc.as_str(), html);
    }

    #[test]
    fn title_text_is_escaped() {
        let mut doc = HtmlDocument::new("<head><title>old</title></head>");
        set_title(&mut doc, "A & <B>").unwrap();
        assert_eq!(doc.as_str(), "<head><title>A &amp; &lt;B&gt;</title></head>");
    }

    #[test]
    fn empty_title() {
        let mut doc = HtmlDocument::new("<head><title>old</title></head>");
        set_title(&mut doc, "").unwrap();
        assert_eq!(doc.as_str(), "<head><title></title></head>");
    }

    #[test]
    fn missing_title_is_an_error() {
        let mut doc = HtmlDocument::new("<head></head>");
        let err = set_title(&mut doc, "x").unwrap_err();
        assert!(matches!(err, RenderError::MissingElement { selector: "title" }));
    }
}
