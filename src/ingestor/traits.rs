use crate::model::SourceError;

/// A single text message pulled from the feed.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub text: String,
}

#[async_trait::async_trait]
pub trait MessageSource: Send + Sync {
    /// Fetches whatever messages arrived since the last poll.
    async fn poll(&self) -> Result<Vec<IncomingMessage>, SourceError>;
}
