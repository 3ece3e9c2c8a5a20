pub mod telegram;
pub mod traits;

pub use telegram::TelegramIngestor;
pub use traits::{IncomingMessage, MessageSource};
