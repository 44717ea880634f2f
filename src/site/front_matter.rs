//! YAML front matter at the top of a page's `index.md`.
//!
//! ```text
//! ---
//! post:
//!   title: Writing a chess engine
//!   author: Analog
//!   date: 2023-02-14
//!   desc: Notes on move ordering.
//! ---
//! Markdown body handed to the converter.
//! ```
//!
//! A page either has no front matter, a `basic` block (title only) or a
//! `post` block. Posts are listed in the site's post index and feed.

use chrono::NaiveDate;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

/// Line that opens and closes the front matter block.
pub const DELIMITER: &str = "---";

/// Metadata of one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMeta {
    Basic(BasicMeta),
    Post(PostMeta),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicMeta {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMeta {
    pub title: String,
    pub author: String,
    pub date: NaiveDate,
    /// One-line summary shown in the index and the feed.
    pub desc: String,
}

impl PageMeta {
    pub fn title(&self) -> &str {
        match self {
            PageMeta::Basic(basic) => &basic.title,
            PageMeta::Post(post) => &post.title,
        }
    }

    pub fn post(&self) -> Option<&PostMeta> {
        match self {
            PageMeta::Post(post) => Some(post),
            PageMeta::Basic(_) => None,
        }
    }

    /// Markup rendered ahead of the page body: the title as `<h1>`, and
    /// for posts a byline with author and date.
    pub fn header_html(&self) -> String {
        let mut html = format!("<h1>{}</h1>\n", escape(self.title()));
        if let Some(post) = self.post() {
            html.push_str(&byline_html(post));
        }
        html
    }
}

/// `<p class="byline">` with the post's author and date.
pub(crate) fn byline_html(post: &PostMeta) -> String {
    format!(
        "<p class=\"byline\"><span class=\"author\">{}</span> <time datetime=\"{date}\">{date}</time></p>\n",
        escape(&post.author),
        date = post.date,
    )
}

/// Split `source` into its front matter and the markdown body.
///
/// Front matter must start on the first line with [`DELIMITER`] and end at
/// the next line consisting of [`DELIMITER`] alone. Without an opening or a
/// closing delimiter the whole source is body.
pub fn split_front_matter(source: &str) -> Result<(Option<PageMeta>, &str), serde_yaml::Error> {
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return Ok((None, source));
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == DELIMITER {
            let meta = serde_yaml::from_str(&rest[..offset])?;
            return Ok((Some(meta), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Ok((None, source))
}
