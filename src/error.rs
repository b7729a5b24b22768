use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlertError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned HTTP {status}: {message}")]
    Status {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("{service} rate limit reached: {message}")]
    RateLimited {
        service: &'static str,
        message: String,
    },

    #[error("Malformed {service} response: {detail}")]
    Malformed {
        service: &'static str,
        detail: String,
    },

    #[error("No data found for this ticker.")]
    NoData { symbol: String },

    #[error("Error fetching stock data. Possibly wrong ticker or API limit reached.")]
    MissingTimeSeries { symbol: String },

    #[error("Need two daily closes for {symbol}, found {found}")]
    InsufficientHistory { symbol: String, found: usize },

    #[error("Previous close is zero, percentage change is undefined")]
    ZeroPreviousClose,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AlertError {
    pub fn malformed(service: &'static str, detail: impl Into<String>) -> Self {
        AlertError::Malformed {
            service,
            detail: detail.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AlertError::RateLimited { .. })
    }

    /// True for the "ticker has no usable market data" family.
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            AlertError::NoData { .. }
                | AlertError::MissingTimeSeries { .. }
                | AlertError::InsufficientHistory { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AlertError>;
