// Telegram Bot API long polling
use crate::ingestor::traits::{IncomingMessage, MessageSource};
use crate::model::SourceError;
use reqwest::Client;
use serde::Deserialize;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    result: Vec<Update>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
    channel_post: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

pub struct TelegramIngestor {
    client: Client,
    bot_token: String,
    offset: AtomicI64,
}

impl TelegramIngestor {
    pub fn new(bot_token: String) -> Self {
        // client timeout must outlive the long-poll window
        let client = Client::builder()
            .timeout(Duration::from_secs(35))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            bot_token,
            offset: AtomicI64::new(0),
        }
    }

    fn updates_url(&self) -> String {
        format!("https://api.telegram.org/bot{}/getUpdates", self.bot_token)
    }
}

#[async_trait::async_trait]
impl MessageSource for TelegramIngestor {
    async fn poll(&self) -> Result<Vec<IncomingMessage>, SourceError> {
        let offset = self.offset.load(Ordering::SeqCst);
        let response = self
            .client
            .get(self.updates_url())
            .query(&[
                ("offset", (offset + 1).to_string()),
                ("timeout", "25".to_string()),
            ])
            .send()
            .await?;
        let api: ApiResponse = response.json().await?;
        if !api.ok {
            return Err(SourceError::Api(
                api.description.unwrap_or_else(|| "unknown".to_string()),
            ));
        }

        let mut messages = Vec::new();
        for update in api.result {
            // deal feeds are channels, but direct messages work too
            if let Some(msg) = update.channel_post.or(update.message) {
                if let Some(text) = msg.text {
                    messages.push(IncomingMessage {
                        chat_id: msg.chat.id,
                        text,
                    });
                }
            }
            self.offset.store(update.update_id + 1, Ordering::SeqCst);
        }
        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_channel_post_updates() {
        let payload = r#"{"ok":true,"result":[{"update_id":7,"channel_post":{"chat":{"id":-100123},"text":"🔥 deal"}}]}"#;
        let api: ApiResponse = serde_json::from_str(payload).unwrap();
        assert!(api.ok);
        assert_eq!(api.result[0].update_id, 7);
        let post = api.result[0].channel_post.as_ref().unwrap();
        assert_eq!(post.chat.id, -100123);
        assert_eq!(post.text.as_deref(), Some("🔥 deal"));
    }

    #[test]
    fn parses_error_response() {
        let payload = r#"{"ok":false,"description":"Unauthorized"}"#;
        let api: ApiResponse = serde_json::from_str(payload).unwrap();
        assert!(!api.ok);
        assert!(api.result.is_empty());
        assert_eq!(api.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn updates_without_text_are_tolerated() {
        let payload = r#"{"ok":true,"result":[{"update_id":8,"message":{"chat":{"id":42}}}]}"#;
        let api: ApiResponse = serde_json::from_str(payload).unwrap();
        assert!(api.result[0].message.as_ref().unwrap().text.is_none());
    }
}
