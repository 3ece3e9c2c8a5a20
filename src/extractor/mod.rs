pub mod deal_extractor;

pub use deal_extractor::{DealExtractor, Extractor};
