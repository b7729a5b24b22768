use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{Config, HISTORY_LOOKBACK_DAYS};
use crate::error::{AlertError, Result};
use crate::market::{Market, PriceObservation, TickerQuery};

pub trait PriceCollector {
    fn latest_closes(&self, symbol: &str) -> Result<PriceObservation>;
}

/// One collector per market, picked by ticker suffix.
pub struct MarketData {
    pub india: Box<dyn PriceCollector>,
    pub global: Box<dyn PriceCollector>,
}

impl MarketData {
    pub fn from_config(cfg: &Config, client: reqwest::blocking::Client) -> Self {
        Self {
            india: Box::new(YahooChartCollector::new(
                client.clone(),
                &cfg.endpoints.yahoo_chart,
            )),
            global: Box::new(AlphaVantageCollector::new(
                client,
                &cfg.endpoints.alpha_vantage,
                &cfg.credentials.stock_api_key,
            )),
        }
    }

    pub fn collector_for(&self, market: Market) -> &dyn PriceCollector {
        match market {
            Market::India => self.india.as_ref(),
            Market::Global => self.global.as_ref(),
        }
    }

    pub fn latest_closes(&self, query: &TickerQuery) -> Result<PriceObservation> {
        let market = query.market();
        debug!(symbol = %query.symbol, ?market, "selecting price collector");
        self.collector_for(market).latest_closes(&query.symbol)
    }
}

#[derive(Debug, Deserialize)]
struct YahooResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    description: String,
    code: String,
}

#[derive(Debug, Deserialize)]
struct YahooResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    quote: Vec<YahooQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooQuote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

/// Daily unadjusted closes from the Yahoo chart endpoint.
pub struct YahooChartCollector {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl YahooChartCollector {
    pub fn new(client: reqwest::blocking::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl PriceCollector for YahooChartCollector {
    fn latest_closes(&self, symbol: &str) -> Result<PriceObservation> {
        let end = Utc::now();
        let start = end - Duration::days(HISTORY_LOOKBACK_DAYS);
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", start.timestamp().to_string()),
                ("period2", end.timestamp().to_string()),
                ("interval", "1d".to_string()),
                ("includePrePost", "false".to_string()),
            ])
            .send()?;

        let status = resp.status();
        info!(symbol, status = status.as_u16(), "yahoo chart response");
        let text = resp.text()?;

        // Unknown symbols come back as 404 with a chart.error body.
        let parsed: YahooResponse = match serde_json::from_str(&text) {
            Ok(p) => p,
            Err(e) if status.is_success() => {
                return Err(AlertError::malformed("Yahoo chart", e.to_string()))
            }
            Err(_) => {
                return Err(AlertError::Status {
                    service: "Yahoo chart",
                    status: status.as_u16(),
                    message: text,
                })
            }
        };

        if let Some(err) = parsed.chart.error {
            debug!(symbol, code = %err.code, description = %err.description, "yahoo chart error");
            return Err(AlertError::NoData {
                symbol: symbol.to_string(),
            });
        }

        let closes = parsed
            .chart
            .result
            .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
            .map(daily_closes)
            .unwrap_or_default();

        last_two(symbol, &closes)
    }
}

fn daily_closes(data: YahooResult) -> Vec<f64> {
    if data.timestamp.as_ref().map_or(true, |t| t.is_empty()) {
        return vec![];
    }
    data.indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close.into_iter().flatten().collect())
        .unwrap_or_default()
}

/// Chronological closes -> (latest, previous).
fn last_two(symbol: &str, closes: &[f64]) -> Result<PriceObservation> {
    match closes {
        [] => Err(AlertError::NoData {
            symbol: symbol.to_string(),
        }),
        [_] => Err(AlertError::InsufficientHistory {
            symbol: symbol.to_string(),
            found: 1,
        }),
        [.., previous, latest] => Ok(PriceObservation {
            latest_close: *latest,
            previous_close: *previous,
        }),
    }
}

pub const TIME_SERIES_KEY: &str = "Time Series (Daily)";
pub const CLOSE_FIELD: &str = "4. close";

/// TIME_SERIES_DAILY from Alpha Vantage.
pub struct AlphaVantageCollector {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageCollector {
    pub fn new(client: reqwest::blocking::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

impl PriceCollector for AlphaVantageCollector {
    fn latest_closes(&self, symbol: &str) -> Result<PriceObservation> {
        let url = format!("{}/query", self.base_url);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("function", "TIME_SERIES_DAILY"),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ])
            .send()?;

        let status = resp.status();
        info!(symbol, status = status.as_u16(), "alpha vantage response");
        if !status.is_success() {
            return Err(AlertError::Status {
                service: "Alpha Vantage",
                status: status.as_u16(),
                message: resp.text().unwrap_or_default(),
            });
        }

        let body: Value = resp
            .json()
            .map_err(|e| AlertError::malformed("Alpha Vantage", e.to_string()))?;
        parse_time_series(symbol, &body)
    }
}

fn parse_time_series(symbol: &str, body: &Value) -> Result<PriceObservation> {
    let series = match body.get(TIME_SERIES_KEY).and_then(Value::as_object) {
        Some(s) => s,
        None => {
            // Throttled keys get a "Note" or "Information" instead of data.
            if let Some(note) = ["Note", "Information"]
                .iter()
                .find_map(|k| body.get(*k).and_then(Value::as_str))
            {
                return Err(AlertError::RateLimited {
                    service: "Alpha Vantage",
                    message: note.to_string(),
                });
            }
            return Err(AlertError::MissingTimeSeries {
                symbol: symbol.to_string(),
            });
        }
    };

    // Date keys are ISO so lexical order is chronological.
    let mut dates: Vec<&String> = series.keys().collect();
    dates.sort_unstable_by(|a, b| b.cmp(a));
    debug!(symbol, days = dates.len(), "alpha vantage series");

    let close_on = |date: &str| -> Result<f64> {
        let raw = series
            .get(date)
            .and_then(|day| day.get(CLOSE_FIELD))
            .ok_or_else(|| {
                AlertError::malformed("Alpha Vantage", format!("{date} has no {CLOSE_FIELD:?}"))
            })?;
        let parsed = match raw {
            Value::String(s) => s.trim().parse::<f64>().ok(),
            Value::Number(n) => n.as_f64(),
            _ => None,
        };
        parsed.ok_or_else(|| {
            AlertError::malformed("Alpha Vantage", format!("{date} close {raw} is not a number"))
        })
    };

    match dates.as_slice() {
        [latest, previous, ..] => Ok(PriceObservation {
            latest_close: close_on(latest)?,
            previous_close: close_on(previous)?,
        }),
        other => Err(AlertError::InsufficientHistory {
            symbol: symbol.to_string(),
            found: other.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_two_takes_chronological_tail() {
        let o = last_two("TCS.NS", &[3900.0, 3950.5, 4001.25]).unwrap();
        assert_eq!(o.latest_close, 4001.25);
        assert_eq!(o.previous_close, 3950.5);
    }

    #[test]
    fn last_two_on_empty_is_no_data() {
        let err = last_two("TCS.NS", &[]).unwrap_err();
        assert_eq!(err.to_string(), "No data found for this ticker.");
        assert!(matches!(
            last_two("TCS.NS", &[1.0]),
            Err(AlertError::InsufficientHistory { found: 1, .. })
        ));
    }

    #[test]
    fn time_series_reads_most_recent_first() {
        let body = json!({
            "Meta Data": {"2. Symbol": "AAPL"},
            "Time Series (Daily)": {
                "2024-05-08": {"4. close": "182.74"},
                "2024-05-10": {"4. close": "183.05"},
                "2024-05-09": {"4. close": "184.57"}
            }
        });
        let o = parse_time_series("AAPL", &body).unwrap();
        assert_eq!(o.latest_close, 183.05);
        assert_eq!(o.previous_close, 184.57);
    }

    #[test]
    fn note_without_series_is_rate_limited() {
        let body = json!({"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute"});
        let err = parse_time_series("AAPL", &body).unwrap_err();
        assert!(err.is_rate_limited());
    }

    #[test]
    fn error_message_is_missing_series() {
        let body = json!({"Error Message": "Invalid API call."});
        let err = parse_time_series("NOPE", &body).unwrap_err();
        assert!(matches!(err, AlertError::MissingTimeSeries { .. }));
        assert!(err.is_no_data());
    }

    #[test]
    fn unparseable_close_is_malformed() {
        let body = json!({
            "Time Series (Daily)": {
                "2024-05-10": {"4. close": "n/a"},
                "2024-05-09": {"4. close": "184.57"}
            }
        });
        assert!(matches!(
            parse_time_series("AAPL", &body),
            Err(AlertError::Malformed { .. })
        ));
    }

    #[test]
    fn yahoo_nulls_are_skipped() {
        let data: YahooResult = serde_json::from_value(json!({
            "timestamp": [1, 2, 3],
            "indicators": {"quote": [{"close": [10.0, 11.0, null]}]}
        }))
        .unwrap();
        assert_eq!(daily_closes(data), vec![10.0, 11.0]);
    }
}
