//! Comment entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on one announcement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,

    pub text: String,

    /// Display label of the commenting account.
    pub author: String,

    /// Uid of the commenting account, when it was known at post time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,

    pub created_at: DateTime<Utc>,
}

/// Input for posting a comment.
#[derive(Clone, Debug, Deserialize)]
pub struct NewComment {
    pub text: String,
    pub author: String,
    pub author_id: Option<String>,
}
