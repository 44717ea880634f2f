//! Result types returned by the render entry points.

use serde::{Deserialize, Serialize};

/// A fully rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOutput {
    /// The serialized HTML document.
    pub html: String,
    /// Text placed in `<title>`; empty when the page has no `<h1>`.
    pub title: String,
    pub stats: RenderStats,
}

/// Timing and size figures for one render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Bytes of HTML the converter produced.
    pub fragment_bytes: usize,
    /// Bytes of the final document.
    pub output_bytes: usize,
    /// Code blocks seen by the post-processing hook.
    pub code_blocks: usize,
    pub converter_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Summary of a site run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteStats {
    /// Pages found (directories with an `index.md`).
    pub total_pages: usize,
    pub updated_pages: usize,
    /// Pages whose HTML was already newer than their markdown.
    pub skipped_pages: usize,
    pub failed_pages: usize,
    /// Pages with `post` front matter.
    pub posts: usize,
    /// The post index page was (re)written.
    pub index_written: bool,
    pub feed_written: bool,
    pub total_duration_ms: u64,
}
