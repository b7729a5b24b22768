#![allow(dead_code)]

use httpmock::MockServer;
use tickerwatch::config::Credentials;

pub fn setup_server() -> MockServer {
    MockServer::start()
}

pub fn http() -> reqwest::blocking::Client {
    reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap()
}

pub fn credentials() -> Credentials {
    Credentials {
        news_api_key: "news-key".to_string(),
        stock_api_key: "stock-key".to_string(),
        twilio_sid: "AC123".to_string(),
        twilio_auth_token: "secret-token".to_string(),
        twilio_from: "+15550001111".to_string(),
        recipient: "+15552223333".to_string(),
        gemini_api_key: "gemini-key".to_string(),
    }
}
