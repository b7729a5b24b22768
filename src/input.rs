use tracing::debug;

use crate::advisor::TickerAdvisor;
use crate::console::Console;
use crate::error::{AlertError, Result};
use crate::market::TickerQuery;

pub const DECLINED_MESSAGE: &str = "Can't proceed without a stock ticker.";

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Query(TickerQuery),
    /// User neither knew the ticker nor wanted an AI lookup.
    Declined,
}

/// Alert settings collected after the ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlertSettings {
    pub threshold: f64,
    pub lookback_hours: i64,
}

fn ask_yes_no(console: &mut dyn Console, prompt: &str) -> Result<bool> {
    Ok(console.ask(prompt)?.trim().eq_ignore_ascii_case("yes"))
}

/// Walks the ticker decision tree: manual entry, AI-assisted lookup, or give up.
pub fn resolve_query(
    console: &mut dyn Console,
    advisor: &dyn TickerAdvisor,
) -> Result<Resolution> {
    let query = if ask_yes_no(console, "Do you know the stock ticker? (yes/no): ")? {
        read_ticker(console, "Enter stock ticker (e.g., TSLA, AAPL, ZOMATO.NS): ")?
    } else if ask_yes_no(console, "Do you want me to search it using AI? (yes/no): ")? {
        let description = console.ask("Enter company name or description: ")?;
        let reply = advisor.suggest(&description)?;
        console.say("");
        console.say("Gemini suggests:");
        console.say(&reply);
        console.say("");
        read_ticker(console, "Enter the stock ticker you want to track: ")?
    } else {
        console.say(DECLINED_MESSAGE);
        return Ok(Resolution::Declined);
    };

    let query = apply_market_suffix(console, query)?;
    debug!(symbol = %query.symbol, company = %query.company_name, "ticker resolved");
    Ok(Resolution::Query(query))
}

fn read_ticker(console: &mut dyn Console, prompt: &str) -> Result<TickerQuery> {
    let symbol = console.ask(prompt)?.trim().to_uppercase();
    if symbol.is_empty() {
        return Err(AlertError::InvalidInput("Ticker cannot be empty".to_string()));
    }
    let company = console.ask(&format!("Enter full company name for {}: ", symbol))?;
    Ok(TickerQuery::new(&symbol, &company))
}

/// Bare tickers may be Indian listings; dotted ones are taken as-is.
pub fn apply_market_suffix(console: &mut dyn Console, query: TickerQuery) -> Result<TickerQuery> {
    if query.has_exchange_suffix() {
        return Ok(query);
    }
    if ask_yes_no(console, "Is this an Indian stock? (yes/no): ")? {
        Ok(query.with_nse_suffix())
    } else {
        Ok(query)
    }
}

pub fn ask_settings(console: &mut dyn Console) -> Result<AlertSettings> {
    let raw = console.ask("Enter % change threshold for alerts (e.g., 1.5): ")?;
    let threshold = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| AlertError::InvalidInput(format!("threshold {raw:?} is not a number")))?;

    let raw = console.ask("Enter news time window in hours (e.g., 2): ")?;
    let lookback_hours = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| AlertError::InvalidInput(format!("hours {raw:?} is not a whole number")))?;

    Ok(AlertSettings {
        threshold,
        lookback_hours,
    })
}
