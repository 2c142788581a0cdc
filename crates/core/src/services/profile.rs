//! Profile view over the user record.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use huddle_backend::{AccountStatus, Subscription, UserRecord, UserStore};
use huddle_common::{AppError, AppResult};

/// Profile fields shown to the account owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProfileView {
    pub fullname: String,
    pub email: String,
    pub birthdate: DateTime<Utc>,
    pub contact_number: String,
    pub occupation: String,
    pub status: AccountStatus,
    pub document_url: Option<String>,
}

impl From<UserRecord> for ProfileView {
    fn from(record: UserRecord) -> Self {
        Self {
            fullname: record.fullname,
            email: record.email,
            birthdate: record.birthdate,
            contact_number: record.contact_number,
            occupation: record.occupation,
            status: record.status,
            document_url: record.document_url,
        }
    }
}

/// Profile service.
#[derive(Clone)]
pub struct ProfileService {
    users: Arc<dyn UserStore>,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Fetch the profile once.
    pub async fn load(&self, uid: &str) -> AppResult<ProfileView> {
        let record = self
            .users
            .find_user(uid)
            .await?
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;
        Ok(record.into())
    }

    /// Live view of the user record backing the profile.
    #[must_use]
    pub fn subscribe(&self, uid: &str) -> Subscription<Option<UserRecord>> {
        self.users.subscribe_user(uid)
    }
}
