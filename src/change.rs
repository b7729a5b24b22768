use std::fmt;

use crate::error::{AlertError, Result};
use crate::market::{format_number, PriceObservation};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn glyph(self) -> &'static str {
        match self {
            Direction::Up => "🔺",
            Direction::Down => "🔻",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeResult {
    /// Percent move relative to the previous close, rounded to 2 decimals.
    pub percent_change: f64,
    pub direction: Direction,
}

impl ChangeResult {
    pub fn exceeds(&self, threshold: f64) -> bool {
        self.percent_change.abs() > threshold
    }
}

/// Glyph and percentage, e.g. "🔺2.0%".
impl fmt::Display for ChangeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}%",
            self.direction.glyph(),
            format_number(self.percent_change)
        )
    }
}

/// Rounds the exact binary value to 2 decimals, ties to even.
pub fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Zero change counts as down.
pub fn compute(obs: &PriceObservation) -> Result<ChangeResult> {
    if obs.previous_close == 0.0 {
        return Err(AlertError::ZeroPreviousClose);
    }
    let difference = obs.latest_close - obs.previous_close;
    let direction = if difference > 0.0 {
        Direction::Up
    } else {
        Direction::Down
    };
    Ok(ChangeResult {
        percent_change: round2(difference / obs.previous_close * 100.0),
        direction,
    })
}

pub fn summary_line(symbol: &str, obs: &PriceObservation, change: &ChangeResult) -> String {
    format!(
        "{} moved {} (from {} to {})",
        symbol,
        change,
        format_number(obs.previous_close),
        format_number(obs.latest_close)
    )
}
