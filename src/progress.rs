//! Progress-callback trait for site-mode events.
//!
//! Pass an implementation to [`crate::site::render_site`] to receive an
//! event for every page as the site is processed. All methods have no-op
//! defaults so callers only override what they care about.
//!
//! # Example
//!
//! ```rust
//! use md2page::SiteProgressCallback;
//! use std::cell::Cell;
//!
//! struct CountingCallback {
//!     updated: Cell<usize>,
//! }
//!
//! impl SiteProgressCallback for CountingCallback {
//!     fn on_page_updated(&self, name: &str, html_bytes: usize) {
//!         self.updated.set(self.updated.get() + 1);
//!         eprintln!("{name}: {html_bytes} bytes");
//!     }
//! }
//! ```

use crate::error::PageError;
use crate::output::SiteStats;
use std::path::Path;

/// Called by [`crate::site::render_site`] as it processes each page.
///
/// Pages are processed one after another on the calling thread, so
/// implementations need no synchronisation.
pub trait SiteProgressCallback {
    /// Called once after the site has been scanned.
    ///
    /// # Arguments
    /// * `total_pages` — pages found
    /// * `stale_pages` — pages that will be rendered
    fn on_site_start(&self, total_pages: usize, stale_pages: usize) {
        let _ = (total_pages, stale_pages);
    }

    /// Called when a page was rendered and written.
    fn on_page_updated(&self, name: &str, html_bytes: usize) {
        let _ = (name, html_bytes);
    }

    /// Called when a page was up to date and left alone.
    fn on_page_skipped(&self, name: &str) {
        let _ = name;
    }

    /// Called when a page failed; the run continues with the next page.
    fn on_page_error(&self, name: &str, error: &PageError) {
        let _ = (name, error);
    }

    /// Called after the post index page was written.
    fn on_index_written(&self, path: &Path, posts: usize) {
        let _ = (path, posts);
    }

    /// Called after the RSS feed was written.
    fn on_feed_written(&self, path: &Path, items: usize) {
        let _ = (path, items);
    }

    /// Called once after every page was handled.
    fn on_site_complete(&self, stats: &SiteStats) {
        let _ = stats;
    }
}

/// A callback that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSiteProgress;

impl SiteProgressCallback for NoopSiteProgress {}
