use serde::Deserialize;
use std::fs;

/// Affiliate tag values handed to the extractor. An absent or empty tag
/// disables rewriting for that platform.
#[derive(Debug, Clone, Default)]
pub struct AffiliateTags {
    pub amazon: Option<String>,
    pub flipkart: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub telegram_bot_token: String,
    #[serde(default)]
    pub amazon_affiliate_tag: Option<String>,
    #[serde(default)]
    pub flipkart_affiliate_tag: Option<String>,
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_api_bind_addr")]
    pub api_bind_addr: String,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    #[serde(default = "default_poll_jitter")]
    pub poll_jitter_ms: u64,
}

impl AppConfig {
    pub fn affiliate_tags(&self) -> AffiliateTags {
        AffiliateTags {
            amazon: self.amazon_affiliate_tag.clone(),
            flipkart: self.flipkart_affiliate_tag.clone(),
        }
    }
}

fn default_db_path() -> String {
    "deals.db".to_string()
}
fn default_api_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}
fn default_poll_interval() -> u64 {
    2
}
fn default_poll_jitter() -> u64 {
    500
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
