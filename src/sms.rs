use reqwest::StatusCode;
use serde::Deserialize;
use tracing::info;

use crate::change::ChangeResult;
use crate::config::Credentials;
use crate::error::{AlertError, Result};
use crate::news::NewsArticle;

#[derive(Debug, Clone, PartialEq)]
pub struct AlertMessage {
    pub body: String,
    pub to_number: String,
    pub from_number: String,
}

impl AlertMessage {
    pub fn for_article(
        symbol: &str,
        change: &ChangeResult,
        article: &NewsArticle,
        from_number: &str,
        to_number: &str,
    ) -> Self {
        Self {
            body: format!(
                "{}: {}\nHeadline: {}\nBrief: {}",
                symbol,
                change,
                article.title(),
                article.description()
            ),
            to_number: to_number.to_string(),
            from_number: from_number.to_string(),
        }
    }
}

pub trait MessageSender {
    /// Returns the provider's message identifier.
    fn send(&self, message: &AlertMessage) -> Result<String>;
}

#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    #[serde(default)]
    message: Option<String>,
}

pub struct TwilioSender {
    client: reqwest::blocking::Client,
    base_url: String,
    account_sid: String,
    auth_token: String,
}

impl TwilioSender {
    pub fn new(client: reqwest::blocking::Client, base_url: &str, creds: &Credentials) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            account_sid: creds.twilio_sid.clone(),
            auth_token: creds.twilio_auth_token.clone(),
        }
    }
}

impl MessageSender for TwilioSender {
    fn send(&self, message: &AlertMessage) -> Result<String> {
        let url = format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.base_url, self.account_sid
        );
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("Body", message.body.as_str()),
                ("From", message.from_number.as_str()),
                ("To", message.to_number.as_str()),
            ])
            .send()?;

        let status = resp.status();
        let text = resp.text()?;
        info!(status = status.as_u16(), to = %message.to_number, "twilio response");

        if !status.is_success() {
            let detail = serde_json::from_str::<TwilioError>(&text)
                .ok()
                .and_then(|e| e.message)
                .unwrap_or(text);
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(AlertError::RateLimited {
                    service: "Twilio",
                    message: detail,
                });
            }
            return Err(AlertError::Status {
                service: "Twilio",
                status: status.as_u16(),
                message: detail,
            });
        }

        let sent: TwilioMessage = serde_json::from_str(&text)
            .map_err(|e| AlertError::malformed("Twilio", e.to_string()))?;
        Ok(sent.sid)
    }
}
