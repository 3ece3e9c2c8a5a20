// Core structs: DealRecord, StoredDeal
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shopping venue a deal link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Amazon,
    Flipkart,
    Unknown,
}

impl Platform {
    /// Classifies a link by its domain tokens. No link means `Unknown`.
    pub fn from_link(link: &str) -> Self {
        let link = link.to_lowercase();
        if link.contains("amzn") || link.contains("amazon") {
            Platform::Amazon
        } else if link.contains("flipkart") || link.contains("fkrt") {
            Platform::Flipkart
        } else {
            Platform::Unknown
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Amazon => "Amazon",
            Platform::Flipkart => "Flipkart",
            Platform::Unknown => "Unknown",
        }
    }
}

/// One extracted deal, built fresh per incoming message. Fields the
/// heuristics could not fill stay at their defaults.
#[derive(Debug, Clone)]
pub struct DealRecord {
    pub product_name: String,
    pub deal_price: Option<f64>,
    pub original_price: Option<f64>,
    pub link: Option<String>,
    pub card_offer: Option<String>,
    pub platform: Platform,
    pub category: String,
}

impl Default for DealRecord {
    fn default() -> Self {
        Self {
            product_name: "Unknown Product".to_string(),
            deal_price: None,
            original_price: None,
            link: None,
            card_offer: None,
            platform: Platform::Unknown,
            category: "uncategorized".to_string(),
        }
    }
}

impl DealRecord {
    /// A record is only worth persisting when both the link and the deal
    /// price were found. The extractor itself never enforces this.
    pub fn is_persistable(&self) -> bool {
        self.link.is_some() && self.deal_price.is_some()
    }
}

/// A persisted deal row as returned by the read API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDeal {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub product_name: String,
    pub deal_price: Option<f64>,
    pub original_price: Option<f64>,
    pub link: String,
    pub card_offer: Option<String>,
    pub platform: String,
    pub category: String,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("telegram api error: {0}")]
    Api(String),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_from_domain_tokens() {
        assert_eq!(Platform::from_link("https://www.amazon.in/dp/B07X"), Platform::Amazon);
        assert_eq!(Platform::from_link("https://amzn.to/3xYz"), Platform::Amazon);
        assert_eq!(Platform::from_link("https://www.flipkart.com/p/x"), Platform::Flipkart);
        assert_eq!(Platform::from_link("https://fkrt.it/abc"), Platform::Flipkart);
        assert_eq!(Platform::from_link("https://example.com/deal"), Platform::Unknown);
    }

    #[test]
    fn platform_match_is_case_insensitive() {
        assert_eq!(Platform::from_link("https://AMAZON.in/x"), Platform::Amazon);
    }

    #[test]
    fn defaults_use_sentinels() {
        let record = DealRecord::default();
        assert_eq!(record.product_name, "Unknown Product");
        assert_eq!(record.category, "uncategorized");
        assert_eq!(record.platform, Platform::Unknown);
        assert!(record.link.is_none());
    }

    #[test]
    fn gate_requires_link_and_deal_price() {
        let mut record = DealRecord::default();
        assert!(!record.is_persistable());

        record.link = Some("https://amzn.to/x".to_string());
        assert!(!record.is_persistable());

        record.deal_price = Some(799.0);
        assert!(record.is_persistable());
    }
}
