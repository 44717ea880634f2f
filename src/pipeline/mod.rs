//! Pipeline stages for rendering a page.
//!
//! Each submodule implements exactly one step. The converter and the
//! post-processing hook are traits so the orchestration in
//! [`crate::render`] can run against fakes.
//!
//! ## Data Flow
//!
//! ```text
//! converter ──▶ template ──▶ title ──▶ codeblocks
//! (subprocess)  (inject)     (h1→title) (hook)
//! ```
//!
//! 1. [`converter`]  — run the external converter, capture its output
//! 2. [`template`]   — load the template, put the fragment into `#content`
//! 3. [`title`]      — copy the first `<h1>` text into `<title>`
//! 4. [`codeblocks`] — post-process code blocks across the whole page

pub mod codeblocks;
pub mod converter;
pub mod template;
pub mod title;
