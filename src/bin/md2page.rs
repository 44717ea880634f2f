//! CLI binary for md2page.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `RenderConfig`, relays converter failures, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use md2page::{
    render, render_site, render_to_file, FeedConfig, PageError, RenderConfig, RenderError,
    SiteOptions, SiteProgressCallback, SiteStats,
};
use std::cell::Cell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Site progress callback using indicatif ───────────────────────────────────

/// Terminal progress for site mode: one log line per page above a bar.
struct CliSiteProgress {
    bar: ProgressBar,
    quiet: bool,
    errors: Cell<usize>,
}

impl CliSiteProgress {
    fn new(show_bar: bool, quiet: bool) -> Self {
        let bar = if show_bar {
            ProgressBar::new(0)
        } else {
            ProgressBar::hidden()
        };
        Self {
            bar,
            quiet,
            errors: Cell::new(0),
        }
    }

    fn line(&self, msg: String) {
        if !self.quiet {
            self.bar.suspend(|| eprintln!("{msg}"));
        }
    }
}

impl SiteProgressCallback for CliSiteProgress {
    fn on_site_start(&self, total_pages: usize, stale_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");
        self.bar.set_style(style);
        self.bar.set_length(total_pages as u64);
        self.bar.set_prefix("Rendering");
        self.bar.enable_steady_tick(Duration::from_millis(80));
        self.line(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{total_pages} pages, {stale_pages} to update…"))
        ));
    }

    fn on_page_updated(&self, name: &str, html_bytes: usize) {
        self.line(format!(
            "  {} [UPDATED] {:<24} {}",
            green("✓"),
            name,
            dim(&format!("{html_bytes:>7} bytes"))
        ));
        self.bar.inc(1);
    }

    fn on_page_skipped(&self, name: &str) {
        self.line(format!("  {} [SKIPPED] {:<24} {}", dim("·"), name, dim("up to date")));
        self.bar.inc(1);
    }

    fn on_page_error(&self, name: &str, error: &PageError) {
        self.errors.set(self.errors.get() + 1);
        self.line(format!(
            "  {} [ERRORED] {:<24} {}",
            red("✗"),
            name,
            red(&error.to_string())
        ));
        self.bar.inc(1);
    }

    fn on_index_written(&self, path: &Path, posts: usize) {
        self.line(format!(
            "  {} [INDEXED] {:<24} {}",
            cyan("◆"),
            path.display(),
            dim(&format!("{posts} posts"))
        ));
    }

    fn on_feed_written(&self, path: &Path, items: usize) {
        self.line(format!(
            "  {} [FEED]    {:<24} {}",
            cyan("◆"),
            path.display(),
            dim(&format!("{items} items"))
        ));
    }

    fn on_site_complete(&self, stats: &SiteStats) {
        self.bar.finish_and_clear();
        if self.quiet {
            return;
        }
        let mark = if self.errors.get() == 0 {
            green("✔")
        } else {
            red("✘")
        };
        eprintln!(
            "{mark} {} updated, {} skipped, {} failed  {}",
            bold(&stats.updated_pages.to_string()),
            stats.skipped_pages,
            stats.failed_pages,
            dim(&format!("{}ms", stats.total_duration_ms)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render a page to stdout (uses ./bin/comrak and ./template.html)
  md2page posts/intro.md > posts/intro.html

  # Render to a file (written atomically)
  md2page posts/intro.md -o public/intro.html

  # Use a different converter, template, or theme
  md2page --converter /usr/local/bin/comrak --template site/page.html --theme InspiredGitHub doc.md

  # Render every stale <dir>/index.md under a site root
  md2page --site .

  # Re-render every page regardless of timestamps
  md2page --site . --force

  # Also write writing/rss.xml for posts (pages with `post:` front matter)
  md2page --site . --site-url https://example.org/site --feed-title "My Writing"

EXIT STATUS:
  0   success
  N   the converter failed with status N (its stderr is copied verbatim)
  1   any other failure

ENVIRONMENT VARIABLES:
  MD2PAGE_CONVERTER   Converter executable (default ./bin/comrak)
  MD2PAGE_TEMPLATE    Page template (default ./template.html)
  MD2PAGE_THEME       Syntax-highlighting theme (default base16-ocean.dark)
  MD2PAGE_SITE_URL    Public site URL; enables the RSS feed in site mode
  RUST_LOG            Override the log filter (e.g. md2page=debug)
"#;

/// Render a Markdown document into the page template.
#[derive(Parser, Debug)]
#[command(
    name = "md2page",
    version,
    about = "Render a Markdown document into the page template",
    long_about = "Run the external Markdown converter on a document, place its HTML inside \
the template's #content element, title the page after its first <h1>, tag code blocks, \
and print the finished page.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Markdown document handed to the converter (empty when omitted).
    document: Option<String>,

    /// Write the page to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Converter executable.
    #[arg(long, env = "MD2PAGE_CONVERTER", default_value = md2page::config::DEFAULT_CONVERTER)]
    converter: PathBuf,

    /// HTML template with a #content element and a <title>.
    #[arg(long, env = "MD2PAGE_TEMPLATE", default_value = md2page::config::DEFAULT_TEMPLATE)]
    template: PathBuf,

    /// Syntax-highlighting theme passed to the converter.
    #[arg(long, env = "MD2PAGE_THEME", default_value = md2page::config::DEFAULT_THEME)]
    theme: String,

    /// Escape raw HTML in the Markdown instead of passing it through.
    #[arg(long)]
    safe: bool,

    /// Output structured JSON (RenderOutput / SiteStats) instead of HTML.
    #[arg(long)]
    json: bool,

    /// Render every <dir>/index.md under this site root.
    #[arg(long, value_name = "DIR", conflicts_with_all = ["document", "output"])]
    site: Option<PathBuf>,

    /// With --site: re-render pages that are already up to date.
    #[arg(long, requires = "site")]
    force: bool,

    /// With --site: directory, under the site root, of the post index and feed.
    #[arg(long, value_name = "DIR", default_value = md2page::config::DEFAULT_INDEX_DIR)]
    index_dir: PathBuf,

    /// With --site: heading and title of the post index page.
    #[arg(long, default_value = md2page::config::DEFAULT_INDEX_TITLE)]
    index_title: String,

    /// With --site: public URL of the site; writes an RSS feed of posts.
    #[arg(long, value_name = "URL", env = "MD2PAGE_SITE_URL")]
    site_url: Option<String>,

    /// RSS channel title (defaults to the index title).
    #[arg(long)]
    feed_title: Option<String>,

    /// RSS channel description (defaults to the feed title).
    #[arg(long)]
    feed_description: Option<String>,

    /// RSS channel language.
    #[arg(long, default_value = md2page::config::DEFAULT_FEED_LANGUAGE)]
    feed_language: String,

    /// Disable the site-mode progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Stderr is reserved for converter diagnostics, so library logs stay
    // off unless asked for.
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "off"
    } else {
        "error"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{} {err:#}", red("error:"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let config = build_config(cli)?;

    if let Some(ref root) = cli.site {
        return run_site(cli, root, &config);
    }

    let document = cli.document.as_deref();

    if let Some(ref output_path) = cli.output {
        let stats = match render_to_file(document, output_path, &config) {
            Ok(stats) => stats,
            Err(err @ RenderError::ConverterFailed { .. }) => return relay_converter_failure(&err),
            Err(err) => return Err(err).context("Render failed"),
        };
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
            );
        } else if cli.verbose {
            eprintln!(
                "{}  {} bytes  {}ms  →  {}",
                green("✔"),
                stats.output_bytes,
                stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(ExitCode::SUCCESS);
    }

    let output = match render(document, &config) {
        Ok(output) => output,
        Err(err @ RenderError::ConverterFailed { .. }) => return relay_converter_failure(&err),
        Err(err) => return Err(err).context("Render failed"),
    };

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        writeln!(handle, "{json}").context("Failed to write to stdout")?;
    } else {
        handle
            .write_all(output.html.as_bytes())
            .context("Failed to write to stdout")?;
    }
    handle.flush().context("Failed to write to stdout")?;

    Ok(ExitCode::SUCCESS)
}

fn run_site(cli: &Cli, root: &Path, config: &RenderConfig) -> Result<ExitCode> {
    let options = build_site_options(cli)?;
    let show_bar = !cli.quiet && !cli.no_progress && !cli.json;
    let progress = CliSiteProgress::new(show_bar, cli.quiet || cli.json);

    let stats = render_site(root, config, &options, &progress)
        .with_context(|| format!("Failed to render site {}", root.display()))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    }

    Ok(if stats.failed_pages == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Copy the converter's stderr through unchanged and exit with its status.
fn relay_converter_failure(err: &RenderError) -> Result<ExitCode> {
    if let RenderError::ConverterFailed { stderr, .. } = err {
        let mut handle = io::stderr().lock();
        handle
            .write_all(stderr)
            .and_then(|_| handle.flush())
            .context("Failed to write to stderr")?;
    }
    let code = u8::try_from(err.exit_code()).unwrap_or(1);
    Ok(ExitCode::from(code))
}

/// Map CLI args to `RenderConfig`.
fn build_config(cli: &Cli) -> Result<RenderConfig> {
    RenderConfig::builder()
        .converter(&cli.converter)
        .template(&cli.template)
        .theme(&cli.theme)
        .unsafe_html(!cli.safe)
        .build()
        .context("Invalid configuration")
}

/// Map the site-mode CLI args to `SiteOptions`.
fn build_site_options(cli: &Cli) -> Result<SiteOptions> {
    let mut builder = SiteOptions::builder()
        .force(cli.force)
        .index_dir(&cli.index_dir)
        .index_title(&cli.index_title);

    if let Some(ref site_url) = cli.site_url {
        let title = cli
            .feed_title
            .clone()
            .unwrap_or_else(|| cli.index_title.clone());
        builder = builder.feed(FeedConfig {
            site_url: site_url.clone(),
            description: cli.feed_description.clone().unwrap_or_else(|| title.clone()),
            title,
            language: cli.feed_language.clone(),
        });
    }

    builder.build().context("Invalid site options")
}
