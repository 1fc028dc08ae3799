use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::app::Result;
use crate::domain::{Article, Language};
use crate::fetcher::{ArticleFetcher, ArticleFilter};

pub const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const EXTRACT_SENTENCES: u32 = 5;
const THUMBNAIL_SIZE: u32 = 800;

/// Fetches random articles from the public MediaWiki query API.
pub struct WikipediaFetcher {
    client: Client,
    filter: ArticleFilter,
    base_url: Option<Url>,
}

impl WikipediaFetcher {
    pub fn new(filter: ArticleFilter) -> Result<Self> {
        Self::with_options(filter, None, DEFAULT_USER_AGENT)
    }

    pub fn with_options(
        filter: ArticleFilter,
        timeout: Option<Duration>,
        user_agent: &str,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .user_agent(user_agent);

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            filter,
            base_url: None,
        })
    }

    /// Send every query to `base_url` instead of the language's own host.
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn filter(&self) -> ArticleFilter {
        self.filter
    }
}

#[async_trait]
impl ArticleFetcher for WikipediaFetcher {
    async fn fetch_random(&self, count: usize, language: &Language) -> Result<Vec<Article>> {
        let url = match &self.base_url {
            Some(base) => with_query(base.clone(), count, language),
            None => api_url(count, language)?,
        };
        tracing::debug!("Requesting {} random articles: {}", count, url);

        let response = self.client.get(url).send().await?;
        response.error_for_status_ref()?;
        let body = response.bytes().await?;

        let articles = parse_articles(&body, language)?;
        let total = articles.len();
        let kept = select_articles(articles, &self.filter, count);

        tracing::info!(
            "Fetched {} articles from {} ({} filtered out)",
            kept.len(),
            language.wikipedia_host(),
            total - kept.len()
        );

        Ok(kept)
    }
}

/// Build the random-pages query for `language`.
pub fn api_url(count: usize, language: &Language) -> Result<Url> {
    let url = Url::parse(&format!("https://{}/w/api.php", language.wikipedia_host()))?;
    Ok(with_query(url, count, language))
}

fn with_query(mut url: Url, count: usize, language: &Language) -> Url {
    url.query_pairs_mut()
        .append_pair("action", "query")
        .append_pair("format", "json")
        .append_pair("generator", "random")
        .append_pair("grnnamespace", "0")
        .append_pair("prop", "extracts|info|pageimages")
        .append_pair("inprop", "url|varianttitles")
        .append_pair("grnlimit", &count.to_string())
        .append_pair("exintro", "1")
        .append_pair("exlimit", "max")
        .append_pair("exsentences", &EXTRACT_SENTENCES.to_string())
        .append_pair("explaintext", "1")
        .append_pair("piprop", "thumbnail")
        .append_pair("pithumbsize", &THUMBNAIL_SIZE.to_string())
        .append_pair("origin", "*")
        .append_pair("variant", &language.code);

    url
}

/// Keep the articles `filter` accepts, at most `count` of them, in order.
pub fn select_articles(articles: Vec<Article>, filter: &ArticleFilter, count: usize) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|a| filter.keeps(a))
        .take(count)
        .collect()
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: BTreeMap<String, Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    pageid: Option<i64>,
    title: Option<String>,
    extract: Option<String>,
    fullurl: Option<String>,
    thumbnail: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    source: Option<String>,
}

/// Turn a query response body into articles, without filtering.
///
/// Missing fields fall back to placeholders: id 0, title "Unknown", an
/// empty extract and a `curid` link.
pub fn parse_articles(body: &[u8], language: &Language) -> Result<Vec<Article>> {
    let response: QueryResponse = serde_json::from_slice(body)?;

    let pages = match response.query {
        Some(query) => query.pages,
        None => return Ok(Vec::new()),
    };

    let articles = pages
        .into_values()
        .map(|page| {
            let id = page.pageid.unwrap_or(0);
            let url = page.fullurl.unwrap_or_else(|| {
                format!("https://{}/wiki?curid={}", language.wikipedia_host(), id)
            });

            Article {
                id,
                title: page.title.unwrap_or_else(|| "Unknown".to_string()),
                url,
                extract: page.extract.unwrap_or_default(),
                thumbnail: page.thumbnail.and_then(|t| t.source),
                language: language.clone(),
            }
        })
        .collect();

    Ok(articles)
}
