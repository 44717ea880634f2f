//! Error types for the md2page library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RenderError`] — **Fatal**: the page cannot be produced at all
//!   (converter failed, template missing, placeholder element absent).
//!   Returned as `Err(RenderError)` from the top-level `render*` functions.
//!
//! * [`PageError`] — **Non-fatal**: in site mode a single page failed but
//!   the remaining pages are still rendered. Reported through
//!   [`crate::progress::SiteProgressCallback`] and counted in
//!   [`crate::output::SiteStats`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the md2page library.
#[derive(Debug, Error)]
pub enum RenderError {
    // ── Converter errors ──────────────────────────────────────────────────
    /// The converter binary could not be started (missing, not executable).
    #[error("Failed to run converter '{program}': {source}\nCheck the path exists and is executable.")]
    ConverterSpawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The converter ran but reported failure.
    ///
    /// `stderr` holds the converter's diagnostics byte-for-byte so the CLI
    /// can relay them unchanged.
    #[error("Converter exited with status {}", display_status(.status))]
    ConverterFailed { status: Option<i32>, stderr: Vec<u8> },

    // ── Template errors ───────────────────────────────────────────────────
    /// The template file could not be read.
    #[error("Failed to read template '{path}': {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An element the pipeline must mutate is absent from the document.
    #[error("Template has no element matching '{selector}'")]
    MissingElement { selector: &'static str },

    /// The HTML rewriter rejected the document or a handler failed.
    #[error("HTML rewrite failed: {message}")]
    Rewrite { message: String },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output HTML file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Site errors ───────────────────────────────────────────────────────
    /// The site root could not be listed.
    #[error("Failed to scan site directory '{path}': {source}")]
    SiteScan {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A page's markdown could not be read, or its body could not be staged
    /// for the converter.
    #[error("Failed to read page source '{path}': {source}")]
    PageSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML block at the top of a page did not parse.
    #[error("Invalid front matter in '{path}': {source}")]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RenderError {
    /// Process exit code to use when this error ends the program.
    ///
    /// A failed converter propagates its own status; a missing status
    /// (killed by a signal) or a zero status that still counts as a failure
    /// maps to 1, as does every other error.
    pub fn exit_code(&self) -> i32 {
        match self {
            RenderError::ConverterFailed {
                status: Some(code), ..
            } if *code != 0 => *code,
            _ => 1,
        }
    }
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "<terminated by signal>".to_string(),
    }
}

/// A non-fatal error for a single page in site mode.
#[derive(Debug, Clone, Error, serde::Serialize)]
pub enum PageError {
    /// The converter rejected the page's markdown.
    #[error("{page}: converter exited with status {status}: {stderr}")]
    ConverterFailed {
        page: String,
        status: i32,
        stderr: String,
    },

    /// Any other failure while rendering or writing the page.
    #[error("{page}: {detail}")]
    Failed { page: String, detail: String },
}

impl PageError {
    /// Wrap a fatal render error as a per-page failure.
    pub fn from_render(page: impl Into<String>, err: &RenderError) -> Self {
        let page = page.into();
        match err {
            RenderError::ConverterFailed { stderr, .. } => PageError::ConverterFailed {
                page,
                status: err.exit_code(),
                stderr: String::from_utf8_lossy(stderr).trim_end().to_string(),
            },
            other => PageError::Failed {
                page,
                detail: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converter_failed_propagates_status() {
        let e = RenderError::ConverterFailed {
            status: Some(2),
            stderr: b"parse error".to_vec(),
        };
        assert_eq!(e.exit_code(), 2);
        assert!(e.to_string().contains("status 2"), "got: {e}");
    }

    #[test]
    fn converter_failed_without_status_exits_one() {
        let e = RenderError::ConverterFailed {
            status: None,
            stderr: Vec::new(),
        };
        assert_eq!(e.exit_code(), 1);
        assert!(e.to_string().contains("signal"));
    }

    #[test]
    fn converter_failed_with_zero_status_exits_one() {
        let e = RenderError::ConverterFailed {
            status: Some(0),
            stderr: Vec::new(),
        };
        assert_eq!(e.exit_code(), 1);
    }

    #[test]
    fn other_errors_exit_one() {
        let e = RenderError::MissingElement {
            selector: "#content",
        };
        assert_eq!(e.exit_code(), 1);
        assert!(e.to_string().contains("#content"));
    }

    #[test]
    fn page_error_keeps_converter_diagnostics() {
        let e = RenderError::ConverterFailed {
            status: Some(3),
            stderr: b"bad fence\n".to_vec(),
        };
        let page = PageError::from_render("intro", &e);
        let msg = page.to_string();
        assert!(msg.contains("intro"), "got: {msg}");
        assert!(msg.contains("status 3"), "got: {msg}");
        assert!(msg.ends_with("bad fence"), "got: {msg}");
    }

    #[test]
    fn page_error_serialises_for_json_output() {
        let err = PageError::Failed {
            page: "intro".to_string(),
            detail: "disk full".to_string(),
        };
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["Failed"]["page"], "intro");
        assert_eq!(value["Failed"]["detail"], "disk full");
    }
}
