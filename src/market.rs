/// Suffixes routed to the Indian exchange data source.
pub const INDIAN_SUFFIXES: [&str; 2] = [".NS", ".BO"];

/// Suffix appended when the user says a bare ticker is Indian.
pub const NSE_SUFFIX: &str = ".NS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerQuery {
    pub symbol: String,
    pub company_name: String,
}

impl TickerQuery {
    pub fn new(symbol: &str, company_name: &str) -> Self {
        Self {
            symbol: symbol.trim().to_uppercase(),
            company_name: company_name.trim().to_string(),
        }
    }

    pub fn market(&self) -> Market {
        Market::classify(&self.symbol)
    }

    /// Symbol without any exchange suffix ("TCS.NS" -> "TCS").
    pub fn base_symbol(&self) -> &str {
        self.symbol.split('.').next().unwrap_or(&self.symbol)
    }

    pub fn has_exchange_suffix(&self) -> bool {
        self.symbol.contains('.')
    }

    pub fn with_nse_suffix(mut self) -> Self {
        self.symbol.push_str(NSE_SUFFIX);
        self
    }
}

/// Which data source serves a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    India,
    Global,
}

impl Market {
    pub fn classify(symbol: &str) -> Self {
        if INDIAN_SUFFIXES.iter().any(|s| symbol.ends_with(s)) {
            Market::India
        } else {
            Market::Global
        }
    }
}

/// Two most recent daily closes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceObservation {
    pub latest_close: f64,
    pub previous_close: f64,
}

/// Renders a float in shortest round-trip form, keeping one decimal for whole numbers.
pub fn format_number(value: f64) -> String {
    let s = value.to_string();
    if value.is_finite() && !s.contains('.') && !s.contains('e') {
        format!("{s}.0")
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_suffix() {
        assert_eq!(Market::classify("TCS.NS"), Market::India);
        assert_eq!(Market::classify("RELIANCE.BO"), Market::India);
        assert_eq!(Market::classify("AAPL"), Market::Global);
        assert_eq!(Market::classify("BMW.DE"), Market::Global);
    }

    #[test]
    fn query_uppercases_symbol() {
        let q = TickerQuery::new(" tcs ", "Tata Consultancy Services");
        assert_eq!(q.symbol, "TCS");
        assert!(!q.has_exchange_suffix());
        let q = q.with_nse_suffix();
        assert_eq!(q.symbol, "TCS.NS");
        assert_eq!(q.market(), Market::India);
        assert_eq!(q.base_symbol(), "TCS");
    }

    #[test]
    fn numbers_keep_a_decimal() {
        assert_eq!(format_number(2.0), "2.0");
        assert_eq!(format_number(-1.5), "-1.5");
        assert_eq!(format_number(153.25), "153.25");
        assert_eq!(format_number(150.0), "150.0");
    }
}
