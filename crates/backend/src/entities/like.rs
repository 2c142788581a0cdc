//! Like entity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A like on one announcement.
///
/// Keyed by `user_id` within the announcement, so its identity is exactly
/// (announcement, user) and re-liking overwrites rather than duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user_id: String,

    pub user_email: String,

    pub liked_at: DateTime<Utc>,
}
