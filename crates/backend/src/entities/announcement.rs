//! Announcement entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An announcement post. Created by the admin side; read-only for clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: String,

    pub title: String,

    /// Body text.
    pub content: String,

    /// Thumbnail shown in the feed card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumb: Option<String>,

    /// Full-size image shown in the detail view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Display label of the posting account.
    pub author: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating an announcement.
#[derive(Clone, Debug, Deserialize)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub thumb: Option<String>,
    pub image: Option<String>,
    pub author: String,
}
