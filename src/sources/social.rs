// src/sources/social.rs
//! Social adapter: JSON post feeds. Posts carry no headline, so `title` is
//! left empty and the normalizer derives one from the content. Hashtags in
//! the body are lifted into tags alongside any the feed declares.

use async_trait::async_trait;
use metrics::{counter, histogram};
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;

use crate::error::SourceError;
use crate::model::{RawItem, SourceType};
use crate::sources::{apply_limit_hint, Mode, SourceAdapter};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Feed {
    Wrapped { posts: Vec<Post> },
    Bare(Vec<Post>),
}

#[derive(Debug, Deserialize)]
struct Post {
    id: Option<String>,
    content: Option<String>,
    permalink: Option<String>,
    created_at: Option<String>,
    #[serde(default)]
    hashtags: Vec<String>,
}

/// Extract `#tags` from post text: distinct, lowercased, without the `#`.
pub fn parse_hashtags(input: &str) -> Vec<String> {
    static RE_TAG: OnceCell<Regex> = OnceCell::new();
    let re = RE_TAG.get_or_init(|| Regex::new(r"(?i)(?P<tag>#[a-z0-9_]+)\b").unwrap());
    let mut tags = Vec::new();
    for caps in re.captures_iter(input) {
        if let Some(m) = caps.name("tag") {
            tags.push(m.as_str()[1..].to_ascii_lowercase());
        }
    }
    tags.sort();
    tags.dedup();
    tags
}

pub struct SocialAdapter {
    mode: Mode,
}

impl SocialAdapter {
    pub fn from_fixture(s: &str) -> Self {
        Self {
            mode: Mode::Fixture(s.to_string()),
        }
    }

    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            mode: Mode::http(url),
        }
    }

    fn parse_items_from_str(s: &str) -> Result<Vec<RawItem>, SourceError> {
        let t0 = std::time::Instant::now();
        let feed: Feed = serde_json::from_str(s)
            .map_err(|e| SourceError::Malformed(format!("social json: {e}")))?;
        let posts = match feed {
            Feed::Wrapped { posts } => posts,
            Feed::Bare(posts) => posts,
        };

        let mut out = Vec::with_capacity(posts.len());
        for post in posts {
            let mut tags: Vec<String> = post
                .hashtags
                .iter()
                .map(|t| t.trim_start_matches('#').to_ascii_lowercase())
                .collect();
            for tag in parse_hashtags(post.content.as_deref().unwrap_or_default()) {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            out.push(RawItem {
                external_id: post.id,
                title: None,
                text: post.content,
                link: post.permalink,
                published: post.created_at,
                tags,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("trends_parse_ms").record(ms);
        counter!("trends_fetched_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for SocialAdapter {
    async fn fetch(
        &self,
        topic: Option<&str>,
        limit_hint: usize,
    ) -> Result<Vec<RawItem>, SourceError> {
        let mut query = vec![("limit", limit_hint.to_string())];
        if let Some(t) = topic {
            query.push(("q", t.to_string()));
        }
        let body = self.mode.body(self.name(), &query).await?;
        let mut items = Self::parse_items_from_str(&body)?;
        apply_limit_hint(&mut items, limit_hint);
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "social-feed"
    }

    fn source_type(&self) -> SourceType {
        SourceType::Social
    }
}
