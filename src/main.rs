use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use tickerwatch::config::Config;
use tickerwatch::console::StdConsole;
use tickerwatch::pipeline::{self, RunOutcome, Services};

/// Interactive stock move alerter. All run settings are asked for at the prompt.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Read secrets from this file instead of ./.env
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Log filter, overrides LOG_LEVEL (logs go to stderr)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() {
    let args = Args::parse();

    let cfg = match Config::load(args.env_file.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let level = args.log_level.as_deref().unwrap_or(&cfg.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cfg) {
        report_fatal(&e, &mut std::io::stderr());
        std::process::exit(1);
    }
}

fn run(cfg: &Config) -> Result<()> {
    let services = Services::from_config(cfg).context("failed to set up HTTP clients")?;
    let mut console = StdConsole;
    let outcome = pipeline::run(
        &mut console,
        &services,
        &cfg.credentials.twilio_from,
        &cfg.credentials.recipient,
    )?;

    if let RunOutcome::Alerted { message_ids, .. } = &outcome {
        tracing::info!(sent = message_ids.len(), "alerts delivered");
    }
    Ok(())
}

/// One line per fatal error, nothing else.
fn report_fatal(err: &anyhow::Error, out: &mut dyn Write) {
    let _ = writeln!(out, "{err:#}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerwatch::AlertError;

    #[test]
    fn fatal_error_is_reported_once() {
        let err = anyhow::Error::from(AlertError::NoData {
            symbol: "TCS.NS".to_string(),
        });
        let mut out = Vec::new();
        report_fatal(&err, &mut out);
        assert_eq!(String::from_utf8(out).unwrap(), "No data found for this ticker.\n");
    }
}
