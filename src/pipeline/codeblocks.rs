//! Post-processing hook for code blocks.
//!
//! Runs once per page, after the title is set and before the document is
//! serialized. The hook sees the whole document, not just the injected
//! fragment.
//!
//! The default [`CustomCodeblocks`] hook tags every `<pre>` so the page
//! stylesheet and scripts can target code blocks by language:
//!
//! ```text
//! <pre lang="rust"><code>…</code></pre>
//!   ↓
//! <pre lang="rust" class="codeblock" data-language="rust" role="region"
//!      aria-label="Code block in rust"><code data-lang="rust">…</code></pre>
//! ```
//!
//! The language comes from the `lang` attribute the converter puts on
//! `<pre>`, or from a `language-*` class on the inner `<code>`.

use super::template::HtmlDocument;
use crate::error::RenderError;
use lol_html::element;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

/// Class added to every code block.
pub const CODEBLOCK_CLASS: &str = "codeblock";

/// Mutates a rendered document in place.
pub trait PostProcessHook {
    /// Apply the hook. Returns the number of code blocks it processed.
    fn apply(&self, document: &mut HtmlDocument) -> Result<usize, RenderError>;
}

/// Hook that leaves the document untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl PostProcessHook for NoopHook {
    fn apply(&self, _document: &mut HtmlDocument) -> Result<usize, RenderError> {
        Ok(0)
    }
}

/// The default code-block hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomCodeblocks;

static RE_LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)language-(\S+)").unwrap());

impl PostProcessHook for CustomCodeblocks {
    fn apply(&self, document: &mut HtmlDocument) -> Result<usize, RenderError> {
        let blocks = Rc::new(Cell::new(0usize));

        document.rewrite(vec![
            element!("pre", {
                let blocks = Rc::clone(&blocks);
                move |el| {
                    blocks.set(blocks.get() + 1);

                    let class = merge_class(el.get_attribute("class"), CODEBLOCK_CLASS);
                    el.set_attribute("class", &class)?;

                    if let Some(lang) = el.get_attribute("lang") {
                        let lang = lang.trim();
                        if !lang.is_empty() {
                            el.set_attribute("data-language", lang)?;
                            if el.get_attribute("role").is_none() {
                                el.set_attribute("role", "region")?;
                            }
                            if el.get_attribute("aria-label").is_none() {
                                el.set_attribute("aria-label", &format!("Code block in {lang}"))?;
                            }
                        }
                    }
                    Ok(())
                }
            }),
            element!("pre > code", |el| {
                if let Some(lang) = el.get_attribute("class").as_deref().and_then(language_from_class)
                {
                    el.set_attribute("data-lang", &lang)?;
                }
                Ok(())
            }),
        ])?;

        debug!("Processed {} code blocks", blocks.get());
        Ok(blocks.get())
    }
}

/// Language named by a `language-*` token in a class attribute.
fn language_from_class(class: &str) -> Option<String> {
    RE_LANGUAGE_CLASS
        .captures(class)
        .map(|caps| caps[1].to_string())
}

/// Add `token` to a space-separated class list unless it is already there.
fn merge_class(existing: Option<String>, token: &str) -> String {
    let existing = existing.unwrap_or_default();
    if existing.split_whitespace().any(|t| t == token) {
        return existing;
    }
    let trimmed = existing.trim();
    if trimmed.is_empty() {
        token.to_string()
    } else {
        format!("{trimmed} {token}")
    }
}
