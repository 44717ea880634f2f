//! Render entry points.
//!
//! [`render`] is the whole pipeline with the production collaborators:
//! the converter binary named in the config and the [`CustomCodeblocks`]
//! hook. [`render_with`] takes both collaborators as trait objects, and
//! [`render_fragment`] runs only the in-memory half (inject, title, hook,
//! serialize) on a fragment that is already converted.

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::output::{RenderOutput, RenderStats};
use crate::pipeline::codeblocks::{CustomCodeblocks, PostProcessHook};
use crate::pipeline::converter::{converter_args, CommandConverter, Converter};
use crate::pipeline::template::{self, HtmlDocument};
use crate::pipeline::title;
use std::borrow::Cow;
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Render a markdown document into the configured template.
///
/// # Arguments
/// * `document` — path handed to the converter; `None` passes an empty string
/// * `config`   — converter, template and theme settings
///
/// # Errors
/// * [`RenderError::ConverterSpawn`] — the converter could not be started
/// * [`RenderError::ConverterFailed`] — the converter exited non-zero; its
///   stderr is carried in the error
/// * [`RenderError::TemplateRead`] / [`RenderError::MissingElement`] — the
///   template is unusable
pub fn render(
    document: Option<&str>,
    config: &RenderConfig,
) -> Result<RenderOutput, RenderError> {
    let converter = CommandConverter::new(&config.converter);
    render_with(document, config, &converter, &CustomCodeblocks)
}

/// Render with explicit converter and post-processing hook.
pub fn render_with(
    document: Option<&str>,
    config: &RenderConfig,
    converter: &dyn Converter,
    hook: &dyn PostProcessHook,
) -> Result<RenderOutput, RenderError> {
    render_with_header(document, "", config, converter, hook)
}

/// [`render_with`], placing `header` markup ahead of the converted
/// fragment inside `#content`.
pub(crate) fn render_with_header(
    document: Option<&str>,
    header: &str,
    config: &RenderConfig,
    converter: &dyn Converter,
    hook: &dyn PostProcessHook,
) -> Result<RenderOutput, RenderError> {
    let total_start = Instant::now();
    info!("Rendering {:?}", document.unwrap_or_default());

    // ── Step 1: Convert ──────────────────────────────────────────────────
    let args = converter_args(document, config);
    let converter_start = Instant::now();
    let stdout = converter.run(&args)?.into_stdout()?;
    let converter_duration_ms = converter_start.elapsed().as_millis() as u64;
    let fragment = String::from_utf8_lossy(&stdout);
    let fragment = if header.is_empty() {
        fragment
    } else {
        Cow::Owned(format!("{header}{fragment}"))
    };

    // ── Step 2: Load template ────────────────────────────────────────────
    let template = template::load_template(&config.template)?;

    // ── Steps 3–6: Inject, title, hook, serialize ────────────────────────
    let mut output = merge(&fragment, template, hook)?;
    output.stats.converter_duration_ms = converter_duration_ms;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Rendered page {:?}: {} bytes in {}ms",
        output.title, output.stats.output_bytes, output.stats.total_duration_ms
    );
    Ok(output)
}

/// Merge an already converted fragment into `template_html`.
///
/// Pure and deterministic: identical inputs give byte-identical output.
pub fn render_fragment(
    fragment: &str,
    template_html: &str,
    hook: &dyn PostProcessHook,
) -> Result<RenderOutput, RenderError> {
    let start = Instant::now();
    let mut output = merge(fragment, HtmlDocument::new(template_html), hook)?;
    output.stats.total_duration_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Render a document and write it to `output_path`.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn render_to_file(
    document: Option<&str>,
    output_path: impl AsRef<Path>,
    config: &RenderConfig,
) -> Result<RenderStats, RenderError> {
    let output = render(document, config)?;
    write_atomic(output_path.as_ref(), &output.html)?;
    Ok(output.stats)
}

fn merge(
    fragment: &str,
    mut doc: HtmlDocument,
    hook: &dyn PostProcessHook,
) -> Result<RenderOutput, RenderError> {
    template::inject_content(&mut doc, fragment)?;

    let title = title::first_heading_text(&mut doc)?.unwrap_or_else(|| {
        debug!("No <h1> in page; title left empty");
        String::new()
    });
    title::set_title(&mut doc, &title)?;

    let code_blocks = hook.apply(&mut doc)?;

    let html = doc.into_string();
    Ok(RenderOutput {
        stats: RenderStats {
            fragment_bytes: fragment.len(),
            output_bytes: html.len(),
            code_blocks,
            ..RenderStats::default()
        },
        html,
        title,
    })
}

/// Write `contents` to `path` via a sibling temp file and rename.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), RenderError> {
    let write_err = |source: std::io::Error| RenderError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(write_err)?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
    tmp.write_all(contents.as_bytes()).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;

    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}
