use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{AlertError, Result};
use crate::market::TickerQuery;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewsArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewsArticle {
    pub fn new(title: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

/// Parameters for one headline search.
#[derive(Debug, Clone, PartialEq)]
pub struct NewsQuery {
    pub title_query: String,
    pub from: DateTime<Utc>,
}

impl NewsQuery {
    pub fn for_ticker(
        query: &TickerQuery,
        lookback_hours: i64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let from = Duration::try_hours(lookback_hours)
            .and_then(|window| now.checked_sub_signed(window))
            .ok_or_else(|| {
                AlertError::InvalidInput(format!("news window of {lookback_hours} hours is out of range"))
            })?;
        Ok(Self {
            title_query: format!("{} OR {}", query.company_name, query.base_symbol()),
            from,
        })
    }
}

pub trait NewsCollector {
    fn collect_news(&self, query: &NewsQuery) -> Result<Vec<NewsArticle>>;
}

/// newsapi.org `/v2/everything`.
pub struct NewsApiCollector {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl NewsApiCollector {
    pub fn new(client: reqwest::blocking::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl NewsCollector for NewsApiCollector {
    fn collect_news(&self, query: &NewsQuery) -> Result<Vec<NewsArticle>> {
        let url = format!("{}/v2/everything", self.base_url);
        let from = query.from.to_rfc3339_opts(SecondsFormat::Secs, true);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("qInTitle", query.title_query.as_str()),
                ("from", from.as_str()),
                ("sortBy", "publishedAt"),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        let articles = articles_from_body(&text);
        info!(
            status = status.as_u16(),
            found = articles.len(),
            q = %query.title_query,
            "news search response"
        );
        Ok(articles)
    }
}

/// A body without a readable `articles` list counts as no news.
fn articles_from_body(text: &str) -> Vec<NewsArticle> {
    let body: Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            warn!("news response is not JSON: {e}");
            return vec![];
        }
    };
    if let Some(msg) = body.get("message").and_then(Value::as_str) {
        warn!("news provider said: {msg}");
    }
    match body.get("articles") {
        Some(list) => match serde_json::from_value(list.clone()) {
            Ok(articles) => articles,
            Err(e) => {
                warn!("unreadable news articles: {e}");
                vec![]
            }
        },
        None => vec![],
    }
}

/// Keeps the first `limit` articles in provider order.
pub fn top_articles(mut articles: Vec<NewsArticle>, limit: usize) -> Vec<NewsArticle> {
    articles.truncate(limit);
    articles
}
