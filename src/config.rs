//! Configuration types for page rendering.
//!
//! All rendering behaviour is controlled through [`RenderConfig`], built via
//! its [`RenderConfigBuilder`]. The defaults reproduce the fixed deployment
//! layout: a converter at `./bin/comrak`, a template at `./template.html`,
//! raw HTML passthrough on, and the `base16-ocean.dark` highlighting theme.
//!
//! Site runs take an additional [`SiteOptions`] (staleness override, post
//! index location, optional RSS feed).

use crate::error::RenderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default location of the converter binary, relative to the working directory.
pub const DEFAULT_CONVERTER: &str = "./bin/comrak";

/// Default location of the page template, relative to the working directory.
pub const DEFAULT_TEMPLATE: &str = "./template.html";

/// Default syntax-highlighting theme passed to the converter.
pub const DEFAULT_THEME: &str = "base16-ocean.dark";

/// Default directory, relative to the site root, of the post index and feed.
pub const DEFAULT_INDEX_DIR: &str = "writing";

/// Default heading of the post index page.
pub const DEFAULT_INDEX_TITLE: &str = "Writing";

/// Default feed language.
pub const DEFAULT_FEED_LANGUAGE: &str = "en";

/// Configuration for a single render.
///
/// Built via [`RenderConfig::builder()`] or using [`RenderConfig::default()`].
///
/// # Example
/// ```rust
/// use md2page::RenderConfig;
///
/// let config = RenderConfig::builder()
///     .converter("/usr/local/bin/comrak")
///     .template("site/template.html")
///     .build()
///     .unwrap();
/// assert_eq!(config.theme, "base16-ocean.dark");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Path of the converter executable. Default: `./bin/comrak`.
    pub converter: PathBuf,

    /// Path of the HTML template. Default: `./template.html`.
    ///
    /// The template must contain an element with id `content` and a
    /// `title` element.
    pub template: PathBuf,

    /// Syntax-highlighting theme name handed to the converter.
    pub theme: String,

    /// Let raw HTML in the markdown through unescaped (`--unsafe`). Default: true.
    pub unsafe_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            converter: PathBuf::from(DEFAULT_CONVERTER),
            template: PathBuf::from(DEFAULT_TEMPLATE),
            theme: DEFAULT_THEME.to_string(),
            unsafe_html: true,
        }
    }
}

impl RenderConfig {
    /// Create a new builder for `RenderConfig`.
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RenderConfig`].
#[derive(Debug)]
pub struct RenderConfigBuilder {
    config: RenderConfig,
}

impl RenderConfigBuilder {
    pub fn converter(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.converter = path.into();
        self
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template = path.into();
        self
    }

    pub fn theme(mut self, theme: impl Into<String>) -> Self {
        self.config.theme = theme.into();
        self
    }

    pub fn unsafe_html(mut self, v: bool) -> Self {
        self.config.unsafe_html = v;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RenderConfig, RenderError> {
        let c = &self.config;
        if c.converter.as_os_str().is_empty() {
            return Err(RenderError::InvalidConfig(
                "converter path must not be empty".into(),
            ));
        }
        if c.template.as_os_str().is_empty() {
            return Err(RenderError::InvalidConfig(
                "template path must not be empty".into(),
            ));
        }
        if c.theme.trim().is_empty() {
            return Err(RenderError::InvalidConfig(
                "syntax-highlighting theme must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// Options for [`crate::site::render_site`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteOptions {
    /// Re-render pages whose HTML is already up to date.
    pub force: bool,

    /// Directory under the site root that receives the post index
    /// (`index.html`) and the feed. Default: `writing`.
    pub index_dir: PathBuf,

    /// `<h1>` of the post index page, and therefore its title.
    pub index_title: String,

    /// RSS feed settings; no feed is written when `None`.
    pub feed: Option<FeedConfig>,
}

impl Default for SiteOptions {
    fn default() -> Self {
        Self {
            force: false,
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
            index_title: DEFAULT_INDEX_TITLE.to_string(),
            feed: None,
        }
    }
}

impl SiteOptions {
    /// Create a new builder for `SiteOptions`.
    pub fn builder() -> SiteOptionsBuilder {
        SiteOptionsBuilder {
            options: Self::default(),
        }
    }
}

/// RSS channel settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Public base URL of the site; item links are `<site_url>/<page>/`.
    pub site_url: String,
    pub title: String,
    pub description: String,
    pub language: String,
}

impl FeedConfig {
    /// Feed for `site_url` titled after the default index heading.
    pub fn new(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            title: DEFAULT_INDEX_TITLE.to_string(),
            description: DEFAULT_INDEX_TITLE.to_string(),
            language: DEFAULT_FEED_LANGUAGE.to_string(),
        }
    }
}

/// Builder for [`SiteOptions`].
#[derive(Debug)]
pub struct SiteOptionsBuilder {
    options: SiteOptions,
}

impl SiteOptionsBuilder {
    pub fn force(mut self, v: bool) -> Self {
        self.options.force = v;
        self
    }

    pub fn index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.index_dir = dir.into();
        self
    }

    pub fn index_title(mut self, title: impl Into<String>) -> Self {
        self.options.index_title = title.into();
        self
    }

    pub fn feed(mut self, feed: FeedConfig) -> Self {
        self.options.feed = Some(feed);
        self
    }

    /// Build the options, validating constraints.
    pub fn build(self) -> Result<SiteOptions, RenderError> {
        let o = &self.options;
        if o.index_dir.as_os_str().is_empty() || o.index_dir.is_absolute() {
            return Err(RenderError::InvalidConfig(
                "index directory must be a relative path inside the site".into(),
            ));
        }
        if let Some(feed) = &o.feed {
            if feed.site_url.trim().is_empty() {
                return Err(RenderError::InvalidConfig(
                    "feed site URL must not be empty".into(),
                ));
            }
            if feed.title.trim().is_empty() {
                return Err(RenderError::InvalidConfig(
                    "feed title must not be empty".into(),
                ));
            }
        }
        Ok(self.options)
    }
}
