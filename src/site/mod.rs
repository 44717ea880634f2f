//! Site mode: render every page of a directory tree in one run.
//!
//! A site is a root directory whose immediate subdirectories are pages.
//! A page directory holds `index.md`; its rendered form goes next to it as
//! `index.html`. Pages whose `index.html` is newer than `index.md` are
//! skipped unless the run is forced.
//!
//! ```text
//! site/
//!  ├─ about/index.md   → about/index.html
//!  ├─ intro/index.md   → intro/index.html
//!  ├─ shared/          (no index.md: not a page)
//!  └─ writing/         post index (index.html) and feed (rss.xml)
//! ```
//!
//! Pages may start with YAML front matter (see [`front_matter`]). Its title
//! is rendered as the page heading, and `post` pages are collected into the
//! post index and the RSS feed after every page was handled.

pub mod front_matter;
pub mod index;

use crate::config::{RenderConfig, SiteOptions};
use crate::error::{PageError, RenderError};
use crate::output::{RenderOutput, SiteStats};
use crate::pipeline::codeblocks::{CustomCodeblocks, PostProcessHook};
use crate::pipeline::converter::{CommandConverter, Converter};
use crate::pipeline::template::load_template;
use crate::progress::SiteProgressCallback;
use crate::render::{render_fragment, render_with, render_with_header, write_atomic};
use front_matter::{split_front_matter, PageMeta};
use index::{index_fragment, rss_feed, sort_posts, Post, FEED_FILE};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Markdown source file name inside a page directory.
pub const PAGE_SOURCE: &str = "index.md";

/// Rendered file name inside a page directory.
pub const PAGE_OUTPUT: &str = "index.html";

/// One page of a site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageEntry {
    /// Directory name, used in progress output.
    pub name: String,
    pub markdown_path: PathBuf,
    pub html_path: PathBuf,
    /// `index.html` is missing or older than `index.md`.
    pub needs_update: bool,
}

/// Scan `root` for page directories, sorted by name.
pub fn collect_pages(root: &Path) -> Result<Vec<PageEntry>, RenderError> {
    let scan_err = |source: std::io::Error| RenderError::SiteScan {
        path: root.to_path_buf(),
        source,
    };

    let mut pages = Vec::new();
    for entry in fs::read_dir(root).map_err(scan_err)? {
        let entry = entry.map_err(scan_err)?;
        let path = entry.path();
        if !entry.file_type().map_err(scan_err)?.is_dir() {
            continue;
        }

        let markdown_path = path.join(PAGE_SOURCE);
        if !markdown_path.is_file() {
            continue;
        }
        let html_path = path.join(PAGE_OUTPUT);
        let needs_update = is_stale(&markdown_path, &html_path);

        pages.push(PageEntry {
            name: entry.file_name().to_string_lossy().into_owned(),
            markdown_path,
            html_path,
            needs_update,
        });
    }

    pages.sort_by(|a, b| a.name.cmp(&b.name));
    debug!("Found {} pages under {}", pages.len(), root.display());
    Ok(pages)
}

/// An output is stale when it is missing, older than its source, or either
/// timestamp cannot be read.
fn is_stale(source: &Path, output: &Path) -> bool {
    let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified());
    match (modified(source), modified(output)) {
        (Ok(src), Ok(out)) => src > out,
        _ => true,
    }
}

/// Render every stale page under `root` (every page with
/// [`SiteOptions::force`]), then write the post index and feed.
///
/// A page that fails is reported through `progress` and counted in
/// [`SiteStats::failed_pages`]; the remaining pages are still rendered.
/// A failing index or feed is counted the same way under the index
/// directory's name. Only a failure to scan `root` itself is returned as
/// an error.
pub fn render_site(
    root: &Path,
    config: &RenderConfig,
    options: &SiteOptions,
    progress: &dyn SiteProgressCallback,
) -> Result<SiteStats, RenderError> {
    let converter = CommandConverter::new(&config.converter);
    render_site_with(root, config, options, &converter, &CustomCodeblocks, progress)
}

/// [`render_site`] with explicit collaborators.
pub fn render_site_with(
    root: &Path,
    config: &RenderConfig,
    options: &SiteOptions,
    converter: &dyn Converter,
    hook: &dyn PostProcessHook,
    progress: &dyn SiteProgressCallback,
) -> Result<SiteStats, RenderError> {
    let start = Instant::now();
    let pages = collect_pages(root)?;
    let stale = pages
        .iter()
        .filter(|p| options.force || p.needs_update)
        .count();
    info!(
        "Site {}: {} pages, {} to render",
        root.display(),
        pages.len(),
        stale
    );
    progress.on_site_start(pages.len(), stale);

    let mut stats = SiteStats {
        total_pages: pages.len(),
        ..SiteStats::default()
    };
    let mut posts = Vec::new();

    for page in &pages {
        let result = read_front_matter(page).and_then(|front| {
            if !options.force && !page.needs_update {
                return Ok((front, None));
            }
            let output = render_page(page, front.as_ref(), config, converter, hook)?;
            Ok((front, Some(output)))
        });

        let front = match result {
            Ok((front, Some(output))) => {
                stats.updated_pages += 1;
                progress.on_page_updated(&page.name, output.html.len());
                front
            }
            Ok((front, None)) => {
                debug!("{} is up to date", page.name);
                stats.skipped_pages += 1;
                progress.on_page_skipped(&page.name);
                front
            }
            Err(err) => {
                report_failure(&page.name, &err, &mut stats, progress);
                continue;
            }
        };

        if let Some(FrontMatter {
            meta: PageMeta::Post(post),
            ..
        }) = front
        {
            posts.push(Post {
                name: page.name.clone(),
                meta: post,
            });
        }
    }

    sort_posts(&mut posts);
    stats.posts = posts.len();
    if !posts.is_empty() {
        if let Err(err) = write_post_index(root, config, options, &posts, hook, progress, &mut stats)
        {
            let name = options.index_dir.to_string_lossy();
            report_failure(&name, &err, &mut stats, progress);
        }
    }

    stats.total_duration_ms = start.elapsed().as_millis() as u64;
    progress.on_site_complete(&stats);
    Ok(stats)
}

fn report_failure(
    name: &str,
    err: &RenderError,
    stats: &mut SiteStats,
    progress: &dyn SiteProgressCallback,
) {
    let page_err = PageError::from_render(name, err);
    warn!("{}", page_err);
    stats.failed_pages += 1;
    progress.on_page_error(name, &page_err);
}

/// Parsed front matter of a page and the markdown that follows it.
struct FrontMatter {
    meta: PageMeta,
    body: String,
}

/// Read a page's markdown and split off its front matter, if any.
fn read_front_matter(page: &PageEntry) -> Result<Option<FrontMatter>, RenderError> {
    let source =
        fs::read_to_string(&page.markdown_path).map_err(|source| RenderError::PageSource {
            path: page.markdown_path.clone(),
            source,
        })?;
    let (meta, body) =
        split_front_matter(&source).map_err(|source| RenderError::FrontMatter {
            path: page.markdown_path.clone(),
            source,
        })?;
    Ok(meta.map(|meta| FrontMatter {
        meta,
        body: body.to_string(),
    }))
}

/// Render one page and write its `index.html`.
///
/// Pages without front matter go to the converter as they are. Otherwise
/// the body alone is staged in a temporary file for the converter, and the
/// metadata header is placed ahead of the converted HTML.
fn render_page(
    page: &PageEntry,
    front: Option<&FrontMatter>,
    config: &RenderConfig,
    converter: &dyn Converter,
    hook: &dyn PostProcessHook,
) -> Result<RenderOutput, RenderError> {
    let output = match front {
        None => {
            let document = page.markdown_path.to_string_lossy();
            render_with(Some(&*document), config, converter, hook)?
        }
        Some(front) => {
            let staged = stage_body(page, &front.body)?;
            let document = staged.path().to_string_lossy().into_owned();
            let header = front.meta.header_html();
            render_with_header(Some(&document), &header, config, converter, hook)?
        }
    };
    write_atomic(&page.html_path, &output.html)?;
    Ok(output)
}

fn stage_body(page: &PageEntry, body: &str) -> Result<tempfile::NamedTempFile, RenderError> {
    let stage_err = |source: std::io::Error| RenderError::PageSource {
        path: page.markdown_path.clone(),
        source,
    };
    let mut staged = tempfile::Builder::new()
        .prefix("md2page-")
        .suffix(".md")
        .tempfile()
        .map_err(stage_err)?;
    staged.write_all(body.as_bytes()).map_err(stage_err)?;
    staged.flush().map_err(stage_err)?;
    Ok(staged)
}

/// Write `<index_dir>/index.html` and, when configured, the feed.
fn write_post_index(
    root: &Path,
    config: &RenderConfig,
    options: &SiteOptions,
    posts: &[Post],
    hook: &dyn PostProcessHook,
    progress: &dyn SiteProgressCallback,
    stats: &mut SiteStats,
) -> Result<(), RenderError> {
    let dir = root.join(&options.index_dir);

    if dir.join(PAGE_SOURCE).is_file() {
        warn!(
            "{} is a page of its own; post index not written",
            dir.display()
        );
    } else {
        let template = load_template(&config.template)?;
        let fragment = index_fragment(&options.index_title, posts);
        let output = render_fragment(&fragment, template.as_str(), hook)?;
        let path = dir.join(PAGE_OUTPUT);
        write_atomic(&path, &output.html)?;
        info!("Wrote post index {} ({} posts)", path.display(), posts.len());
        stats.index_written = true;
        progress.on_index_written(&path, posts.len());
    }

    if let Some(feed) = &options.feed {
        let path = dir.join(FEED_FILE);
        write_atomic(&path, &rss_feed(feed, posts))?;
        info!("Wrote feed {} ({} items)", path.display(), posts.len());
        stats.feed_written = true;
        progress.on_feed_written(&path, posts.len());
    }
    Ok(())
}
