mod common;

use chrono::{TimeZone, Utc};
use httpmock::Method::GET;
use serde_json::json;
use tickerwatch::market::TickerQuery;
use tickerwatch::news::{NewsApiCollector, NewsCollector, NewsQuery};

fn query() -> NewsQuery {
    let now = Utc.with_ymd_and_hms(2024, 5, 10, 15, 30, 0).unwrap();
    NewsQuery::for_ticker(&TickerQuery::new("TCS.NS", "Tata Consultancy Services"), 2, now).unwrap()
}

#[test]
fn search_sends_title_query_window_and_key() {
    let server = common::setup_server();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/v2/everything")
            .query_param("qInTitle", "Tata Consultancy Services OR TCS")
            .query_param("from", "2024-05-10T13:30:00Z")
            .query_param("sortBy", "publishedAt")
            .query_param("apiKey", "news-key");
        then.status(200)
            .header("content-type", "application/json")
            .body(
                json!({
                    "status": "ok",
                    "totalResults": 2,
                    "articles": [
                        {"source": {"name": "Mint"}, "title": "TCS wins deal", "description": "Large contract", "url": "https://a"},
                        {"source": {"name": "ET"}, "title": "TCS shares jump", "description": null, "url": "https://b"}
                    ]
                })
                .to_string(),
            );
    });

    let collector = NewsApiCollector::new(common::http(), &server.base_url(), "news-key");
    let articles = collector.collect_news(&query()).unwrap();
    mock.assert();
    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title(), "TCS wins deal");
    assert_eq!(articles[0].description(), "Large contract");
    assert_eq!(articles[1].description(), "");
}

#[test]
fn error_body_yields_no_articles() {
    let server = common::setup_server();
    server.mock(|when, then| {
        when.method(GET).path("/v2/everything");
        then.status(401)
            .header("content-type", "application/json")
            .body(json!({"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."}).to_string());
    });

    let collector = NewsApiCollector::new(common::http(), &server.base_url(), "bad-key");
    assert!(collector.collect_news(&query()).unwrap().is_empty());
}
