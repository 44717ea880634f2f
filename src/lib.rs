//! # md2page
//!
//! Render a Markdown document into a static HTML page.
//!
//! The Markdown itself is handled by an external converter binary
//! (`./bin/comrak` by default). This crate runs it, drops the HTML it
//! prints into a fixed template, titles the page after its first heading,
//! tags code blocks, and writes out the finished document.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document.md
//!  │
//!  ├─ 1. Convert  comrak --unsafe --syntax-highlighting base16-ocean.dark <path>
//!  ├─ 2. Load     ./template.html
//!  ├─ 3. Inject   converter output → inner HTML of #content
//!  ├─ 4. Title    text of first <h1> → <title>
//!  ├─ 5. Hook     code-block post-processing
//!  └─ 6. Output   serialized document
//! ```
//!
//! If the converter exits non-zero the pipeline stops with
//! [`RenderError::ConverterFailed`], which carries the converter's stderr
//! and status so the caller can relay them unchanged.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use md2page::{render, RenderConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenderConfig::default();
//!     let output = render(Some("posts/intro.md"), &config)?;
//!     print!("{}", output.html);
//!     eprintln!("title: {:?}", output.title);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `md2page` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod html;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod render;
pub mod site;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{FeedConfig, RenderConfig, RenderConfigBuilder, SiteOptions, SiteOptionsBuilder};
pub use error::{PageError, RenderError};
pub use output::{RenderOutput, RenderStats, SiteStats};
pub use pipeline::codeblocks::{CustomCodeblocks, NoopHook, PostProcessHook};
pub use pipeline::converter::{converter_args, CommandConverter, Converter, ConverterOutput};
pub use pipeline::template::HtmlDocument;
pub use progress::{NoopSiteProgress, SiteProgressCallback};
pub use render::{render, render_fragment, render_to_file, render_with};
pub use site::front_matter::{PageMeta, PostMeta};
pub use site::{collect_pages, render_site, render_site_with, PageEntry};
