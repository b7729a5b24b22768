//! Price-move alerts: compare a ticker's last two daily closes and text
//! recent headlines when the move crosses a threshold.

pub mod advisor;
pub mod change;
pub mod config;
pub mod console;
pub mod error;
pub mod fetcher;
pub mod input;
pub mod market;
pub mod news;
pub mod pipeline;
pub mod sms;

pub use error::{AlertError, Result};
