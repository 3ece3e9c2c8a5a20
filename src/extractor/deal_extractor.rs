// Heuristic extraction of deal records from raw promo messages
use crate::config::AffiliateTags;
use crate::model::{DealRecord, Platform};
use crate::normalizer;
use regex::Regex;
use std::sync::LazyLock;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"₹\s?([0-9][0-9,]*)").unwrap());

static PRODUCT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[🔥⭐✨💥]?\s*(.+?)\s*[🔥⭐✨💥]?\s*(?:is now just|at\s*₹)").unwrap()
});

static CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(get extra.*?card|bank offer:.*)").unwrap());

/// Longest first line still trusted as a product name.
const MAX_TITLE_LEN: usize = 100;

pub trait Extractor {
    /// Builds a best-effort record from one message. Never fails; a field
    /// with no pattern match stays at its default.
    fn extract(&self, text: &str) -> DealRecord;
}

pub struct DealExtractor {
    tags: AffiliateTags,
}

impl DealExtractor {
    pub fn new(tags: AffiliateTags) -> Self {
        Self { tags }
    }
}

impl Extractor for DealExtractor {
    fn extract(&self, text: &str) -> DealRecord {
        let mut record = DealRecord::default();

        // Link first: the platform is derived from it, nothing else.
        if let Some(m) = URL_RE.find(text) {
            let link = m.as_str().trim_end_matches(['.', ')']);
            record.platform = Platform::from_link(link);
            record.link = Some(link.to_string());
        }

        // First currency token is the deal price, second the strike-through
        // original. Anything after that is noise.
        let mut prices = PRICE_RE
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| m.as_str().replace(',', "").parse::<f64>().ok());
        record.deal_price = prices.next();
        record.original_price = prices.next();

        // The marker-pattern branch wins even when its capture trims down
        // to nothing; only the first-line fallback gets a length check.
        if let Some(caps) = PRODUCT_RE.captures(text) {
            if let Some(m) = caps.get(1) {
                record.product_name = m.as_str().trim().to_string();
            }
        } else {
            let first_line = text.lines().next().unwrap_or("").trim();
            if first_line.chars().count() < MAX_TITLE_LEN {
                record.product_name = first_line.to_string();
            }
        }

        if let Some(m) = CARD_RE.find(text) {
            record.card_offer = Some(m.as_str().trim().to_string());
        }

        if let Some(link) = record.link.take() {
            record.link = Some(normalizer::normalize(&link, record.platform, &self.tags));
        }

        record
    }
}
