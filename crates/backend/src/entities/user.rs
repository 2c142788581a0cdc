//! User record entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chat_message::ChatMessage;

/// Account lifecycle status, set to pending at sign-up and flipped to
/// approved by the admin side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[default]
    Pending,
    Approved,
}

/// A user document, keyed by the auth uid.
///
/// The support-chat transcript is embedded as an append-only message list
/// rather than stored in its own collection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Auth uid; doubles as the document key.
    pub id: String,

    pub email: String,

    pub fullname: String,

    pub birthdate: DateTime<Utc>,

    pub contact_number: String,

    pub occupation: String,

    #[serde(default)]
    pub status: AccountStatus,

    #[serde(default)]
    pub messages: Vec<ChatMessage>,

    /// URL of the generated document, attached by the admin side.
    #[serde(default, rename = "pdfUrl", skip_serializing_if = "Option::is_none")]
    pub document_url: Option<String>,

    pub created_at: DateTime<Utc>,
}
