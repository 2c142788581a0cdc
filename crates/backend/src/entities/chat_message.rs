//! Chat message entity.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Who sent a chat message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Admin,
}

/// A single support-chat message, embedded in the owning user's record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Creation time as epoch milliseconds; render order is by this field.
    pub created_at: i64,

    #[serde(rename = "message")]
    pub text: String,

    pub sender: Sender,

    /// Calendar date the message was sent; the once-daily auto-reply rule
    /// matches on this field, not on the timestamp.
    pub date: NaiveDate,
}

impl ChatMessage {
    /// Build a user-sent message stamped at `at`.
    #[must_use]
    pub fn user(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            created_at: at.timestamp_millis(),
            text: text.into(),
            sender: Sender::User,
            date: at.date_naive(),
        }
    }

    /// Build an admin message stamped at `at`.
    #[must_use]
    pub fn admin(text: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            created_at: at.timestamp_millis(),
            text: text.into(),
            sender: Sender::Admin,
            date: at.date_naive(),
        }
    }
}
