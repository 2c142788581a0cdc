//! Backend gateway traits.
//!
//! The hosted backend is consumed, never defined, by this crate. Services
//! receive these traits as explicitly constructed `Arc<dyn …>` objects
//! rather than reaching for a process-wide singleton, which keeps every
//! consumer testable against [`MemoryBackend`](crate::memory::MemoryBackend).

use async_trait::async_trait;
use huddle_common::AppResult;
use serde::{Deserialize, Serialize};

use crate::entities::{
    AccountStatus, Announcement, ChatMessage, Comment, Like, NewAnnouncement, NewComment,
    UserRecord,
};
use crate::subscription::Subscription;

/// Authenticated identity issued by the auth service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Stable user id; doubles as the user document key.
    pub uid: String,
    pub email: String,
}

/// Authentication service operations.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create an account and sign the new user in.
    async fn create_account(&self, email: &str, password: &str) -> AppResult<AuthUser>;

    /// Sign in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser>;

    /// End the current session.
    async fn sign_out(&self) -> AppResult<()>;

    /// The currently signed-in identity, if any.
    fn current_user(&self) -> Option<AuthUser>;

    /// Subscribe to auth-state changes; the current state is delivered
    /// immediately.
    fn subscribe_auth_state(&self) -> Subscription<Option<AuthUser>>;
}

/// User document operations.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Write a user document, overwriting any existing one with the same id.
    async fn create_user(&self, record: UserRecord) -> AppResult<()>;

    /// Fetch a user document.
    async fn find_user(&self, uid: &str) -> AppResult<Option<UserRecord>>;

    /// Append one chat message to the user's embedded message list.
    ///
    /// The append must be atomic with respect to concurrent appends from
    /// other sessions; implementations must not read-modify-write.
    async fn append_message(&self, uid: &str, message: ChatMessage) -> AppResult<()>;

    /// Set the account lifecycle status (admin side).
    async fn set_status(&self, uid: &str, status: AccountStatus) -> AppResult<()>;

    /// Attach the generated-document URL (admin side).
    async fn set_document_url(&self, uid: &str, url: &str) -> AppResult<()>;

    /// Live subscription to one user document. `None` until the document
    /// exists.
    fn subscribe_user(&self, uid: &str) -> Subscription<Option<UserRecord>>;
}

/// Announcement, comment, and like operations.
#[async_trait]
pub trait AnnouncementStore: Send + Sync {
    /// Create an announcement (admin side; the client never calls this).
    async fn create_announcement(&self, input: NewAnnouncement) -> AppResult<Announcement>;

    /// Live subscription to all announcements, newest first.
    fn subscribe_announcements(&self) -> Subscription<Vec<Announcement>>;

    /// Post a comment under one announcement.
    async fn add_comment(&self, announcement_id: &str, input: NewComment) -> AppResult<Comment>;

    /// Live subscription to one announcement's comments, oldest first.
    fn subscribe_comments(&self, announcement_id: &str) -> Subscription<Vec<Comment>>;

    /// Store a like keyed by its user id; re-liking overwrites in place.
    async fn set_like(&self, announcement_id: &str, like: Like) -> AppResult<()>;

    /// Delete a like by user id; deleting an absent like is a no-op.
    async fn remove_like(&self, announcement_id: &str, user_id: &str) -> AppResult<()>;

    /// Live subscription to one announcement's likes. Zero likes is
    /// delivered as an empty list, never as silence.
    fn subscribe_likes(&self, announcement_id: &str) -> Subscription<Vec<Like>>;
}
