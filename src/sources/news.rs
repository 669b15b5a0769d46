// src/sources/news.rs
//! News adapter: RSS 2.0 feeds. `<item>` entries map onto the raw envelope
//! with `pubDate` carried through verbatim for the normalizer to parse.

use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::error::SourceError;
use crate::model::{RawItem, SourceType};
use crate::sources::{apply_limit_hint, Mode, SourceAdapter};

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    guid: Option<String>,
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
    #[serde(rename = "category", default)]
    category: Vec<String>,
}

pub struct NewsAdapter {
    mode: Mode,
}

impl NewsAdapter {
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
        let xml_clean = scrub_html_entities_for_xml(s);
        let rss: Rss = from_str(&xml_clean)
            .map_err(|e| SourceError::Malformed(format!("news rss xml: {e}")))?;

        let mut out = Vec::with_capacity(rss.channel.item.len());
        for it in rss.channel.item {
            out.push(RawItem {
                external_id: it.guid,
                title: it.title,
                text: it.description,
                link: it.link,
                published: it.pub_date,
                tags: it.category,
            });
        }

        let ms = t0.elapsed().as_secs_f64() * 1_000.0;
        histogram!("trends_parse_ms").record(ms);
        counter!("trends_fetched_total").increment(out.len() as u64);
        Ok(out)
    }
}

#[async_trait]
impl SourceAdapter for NewsAdapter {
    async fn fetch(
        &self,
        topic: Option<&str>,
        limit_hint: usize,
    ) -> Result<Vec<RawItem>, SourceError> {
        let mut query = Vec::new();
        if let Some(t) = topic {
            query.push(("q", t.to_string()));
        }
        let body = self.mode.body(self.name(), &query).await?;
        let mut items = Self::parse_items_from_str(&body)?;
        apply_limit_hint(&mut items, limit_hint);
        Ok(items)
    }

    fn name(&self) -> &'static str {
        "news-rss"
    }

    fn source_type(&self) -> SourceType {
        SourceType::News
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0"?>
<rss version="2.0"><channel>
  <title>Wire</title>
  <item>
    <guid>n-1</guid>
    <title>Markets rally on rate pause</title>
    <link>https://news.test/a</link>
    <pubDate>Mon, 03 Aug 2026 09:00:00 GMT</pubDate>
    <description>Stocks climbed after the&nbsp;announcement.</description>
    <category>markets</category>
    <category>rates</category>
  </item>
  <item>
    <title>Quiet day elsewhere</title>
    <link>https://news.test/b</link>
    <pubDate>Mon, 03 Aug 2026 08:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;

    #[tokio::test]
    async fn parses_rss_items_into_raw_envelopes() {
        let adapter = NewsAdapter::from_fixture(FEED);
        let items = adapter.fetch(None, 10).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].external_id.as_deref(), Some("n-1"));
        assert_eq!(items[0].title.as_deref(), Some("Markets rally on rate pause"));
        assert_eq!(items[0].link.as_deref(), Some("https://news.test/a"));
        assert_eq!(items[0].tags, vec!["markets", "rates"]);
        assert!(items[1].external_id.is_none());
    }

    #[tokio::test]
    async fn unparsable_body_is_malformed() {
        let adapter = NewsAdapter::from_fixture("this is not xml at all {");
        let err = adapter.fetch(None, 10).await.unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }
}
