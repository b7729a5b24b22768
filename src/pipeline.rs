//! The whole alert run: resolve ticker, fetch closes, compute the move,
//! search news when the move is large enough, text each headline.

use chrono::Utc;
use tracing::{info, warn};

use crate::advisor::{GeminiAdvisor, TickerAdvisor};
use crate::change::{self, ChangeResult};
use crate::config::{Config, MAX_ARTICLES};
use crate::console::Console;
use crate::error::Result;
use crate::fetcher::MarketData;
use crate::input::{self, Resolution};
use crate::market::{PriceObservation, TickerQuery};
use crate::news::{self, NewsApiCollector, NewsArticle, NewsCollector, NewsQuery};
use crate::sms::{AlertMessage, MessageSender, TwilioSender};

pub const NO_ALERT_MESSAGE: &str = "No significant stock price change or no recent news found.";

/// External services one run talks to.
pub struct Services {
    pub advisor: Box<dyn TickerAdvisor>,
    pub market_data: MarketData,
    pub news: Box<dyn NewsCollector>,
    pub sender: Box<dyn MessageSender>,
}

impl Services {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let client = cfg.http_client()?;
        let ep = &cfg.endpoints;
        let creds = &cfg.credentials;
        Ok(Self {
            advisor: Box::new(GeminiAdvisor::new(
                client.clone(),
                &ep.gemini,
                &ep.gemini_model,
                &creds.gemini_api_key,
            )),
            market_data: MarketData::from_config(cfg, client.clone()),
            news: Box::new(NewsApiCollector::new(
                client.clone(),
                &ep.news_api,
                &creds.news_api_key,
            )),
            sender: Box::new(TwilioSender::new(client, &ep.twilio, creds)),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    Declined,
    NoAlert {
        query: TickerQuery,
        change: ChangeResult,
    },
    Alerted {
        query: TickerQuery,
        change: ChangeResult,
        message_ids: Vec<String>,
    },
}

pub fn run(
    console: &mut dyn Console,
    services: &Services,
    from_number: &str,
    to_number: &str,
) -> Result<RunOutcome> {
    let query = match input::resolve_query(console, services.advisor.as_ref())? {
        Resolution::Query(q) => q,
        Resolution::Declined => return Ok(RunOutcome::Declined),
    };
    let settings = input::ask_settings(console)?;
    info!(
        symbol = %query.symbol,
        threshold = settings.threshold,
        hours = settings.lookback_hours,
        "starting alert run"
    );

    let obs: PriceObservation = services.market_data.latest_closes(&query)?;
    let change = change::compute(&obs)?;
    console.say(&change::summary_line(&query.symbol, &obs, &change));

    let articles: Vec<NewsArticle> = if change.exceeds(settings.threshold) {
        let news_query = NewsQuery::for_ticker(&query, settings.lookback_hours, Utc::now())?;
        let found = services.news.collect_news(&news_query)?;
        news::top_articles(found, MAX_ARTICLES)
    } else {
        info!(
            pct = change.percent_change,
            threshold = settings.threshold,
            "move below threshold, skipping news"
        );
        Vec::new()
    };

    if articles.is_empty() {
        console.say(NO_ALERT_MESSAGE);
        return Ok(RunOutcome::NoAlert { query, change });
    }

    let mut message_ids = Vec::with_capacity(articles.len());
    for article in &articles {
        let message =
            AlertMessage::for_article(&query.symbol, &change, article, from_number, to_number);
        let sid = services.sender.send(&message).map_err(|e| {
            warn!(sent = message_ids.len(), "alert dispatch stopped: {e}");
            e
        })?;
        console.say(&format!("Message sent: {}", sid));
        message_ids.push(sid);
    }

    Ok(RunOutcome::Alerted {
        query,
        change,
        message_ids,
    })
}
