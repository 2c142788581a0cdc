//! Support chat with a once-daily automated admin reply.

use std::sync::Arc;

use chrono::Utc;
use huddle_backend::{ChatMessage, Sender, Subscription, UserRecord, UserStore};
use huddle_common::{AppError, AppResult};

/// Chat service.
#[derive(Clone)]
pub struct ChatService {
    users: Arc<dyn UserStore>,
    auto_reply_text: String,
}

impl ChatService {
    /// Create a new chat service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>, auto_reply_text: impl Into<String>) -> Self {
        Self {
            users,
            auto_reply_text: auto_reply_text.into(),
        }
    }

    /// Live view of the user's record, which embeds the conversation.
    #[must_use]
    pub fn subscribe(&self, uid: &str) -> Subscription<Option<UserRecord>> {
        self.users.subscribe_user(uid)
    }

    /// The conversation in render order (by creation time).
    #[must_use]
    pub fn conversation(record: &UserRecord) -> Vec<ChatMessage> {
        let mut messages = record.messages.clone();
        messages.sort_by_key(|m| m.created_at);
        messages
    }

    /// Send a message and post the automated admin reply if none has been
    /// sent today.
    ///
    /// The reply decision re-reads the record after the append, so the
    /// second and later messages of a day see the reply the first one
    /// triggered. Two sends racing across sessions can still each observe
    /// no reply and both post one; the rule is at-least-once per day, not
    /// exactly-once.
    pub async fn send_message(&self, uid: &str, text: &str) -> AppResult<()> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Message text is required".to_string()));
        }

        let now = Utc::now();
        self.users
            .append_message(uid, ChatMessage::user(text, now))
            .await?;

        let record = self
            .users
            .find_user(uid)
            .await?
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;

        let today = now.date_naive();
        let replied_today = record
            .messages
            .iter()
            .any(|m| m.sender == Sender::Admin && m.date == today);

        if !replied_today {
            // Stamp the reply with the instant the check used, so both
            // messages carry the same calendar date even across midnight.
            self.users
                .append_message(uid, ChatMessage::admin(self.auto_reply_text.clone(), now))
                .await?;
            tracing::debug!(uid, "posted daily auto-reply");
        }

        Ok(())
    }
}
