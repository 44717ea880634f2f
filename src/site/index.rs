//! Post index page and RSS feed for a site.
//!
//! Both list every page whose front matter is a `post`, newest first.

use super::front_matter::{byline_html, PostMeta};
use crate::config::FeedConfig;
use quick_xml::escape::escape;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use std::cmp::Reverse;

/// File name of the feed inside the index directory.
pub const FEED_FILE: &str = "rss.xml";

/// A post page: its directory name and metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub name: String,
    pub meta: PostMeta,
}

/// Newest first; posts from the same day by title.
pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        (Reverse(a.meta.date), &a.meta.title).cmp(&(Reverse(b.meta.date), &b.meta.title))
    });
}

/// Fragment for the index page, rendered through the page template.
///
/// Links are relative to the index directory, which sits next to the page
/// directories.
pub fn index_fragment(heading: &str, posts: &[Post]) -> String {
    let mut html = format!("<h1>{}</h1>\n", escape(heading));
    for post in posts {
        html.push_str(&format!(
            "<h2><a href=\"../{}/\">{}</a></h2>\n",
            escape(&post.name),
            escape(&post.meta.title)
        ));
        html.push_str(&byline_html(&post.meta));
        html.push_str(&format!("<p>{}</p>\n", escape(&post.meta.desc)));
    }
    html
}

/// RSS 2.0 document for `posts`.
pub fn rss_feed(feed: &FeedConfig, posts: &[Post]) -> String {
    let base_url = feed.site_url.trim_end_matches('/');

    let items: Vec<_> = posts
        .iter()
        .map(|post| {
            let link = format!("{base_url}/{}/", post.name);
            let pub_date = post
                .meta
                .date
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc().to_rfc2822());
            ItemBuilder::default()
                .title(post.meta.title.clone())
                .link(link.clone())
                .guid(GuidBuilder::default().permalink(true).value(link).build())
                .description(post.meta.desc.clone())
                .pub_date(pub_date)
                .build()
        })
        .collect();

    ChannelBuilder::default()
        .title(&feed.title)
        .link(format!("{base_url}/"))
        .description(&feed.description)
        .language(Some(feed.language.clone()))
        .generator("md2page".to_string())
        .items(items)
        .build()
        .to_string()
}
