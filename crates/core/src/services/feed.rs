//! Announcement feed: subscriptions, comments, and like toggling.

use std::sync::Arc;

use chrono::Utc;
use huddle_backend::{
    Announcement, AnnouncementStore, AuthUser, Comment, Like, NewComment, Subscription,
};
use huddle_common::{AppError, AppResult};

use crate::services::likes::{LikeAction, OptimisticLikes};

/// Feed service.
#[derive(Clone)]
pub struct FeedService {
    store: Arc<dyn AnnouncementStore>,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub fn new(store: Arc<dyn AnnouncementStore>) -> Self {
        Self { store }
    }

    /// Live feed of all announcements, newest first.
    #[must_use]
    pub fn subscribe_announcements(&self) -> Subscription<Vec<Announcement>> {
        self.store.subscribe_announcements()
    }

    /// Live comments for one announcement, oldest first.
    #[must_use]
    pub fn subscribe_comments(&self, announcement_id: &str) -> Subscription<Vec<Comment>> {
        self.store.subscribe_comments(announcement_id)
    }

    /// Live likes for one announcement.
    #[must_use]
    pub fn subscribe_likes(&self, announcement_id: &str) -> Subscription<Vec<Like>> {
        self.store.subscribe_likes(announcement_id)
    }

    /// Post a comment as the signed-in user.
    pub async fn add_comment(
        &self,
        announcement_id: &str,
        user: &AuthUser,
        text: &str,
    ) -> AppResult<Comment> {
        let text = text.trim();
        if text.is_empty() {
            return Err(AppError::Validation("Comment text is required".to_string()));
        }

        self.store
            .add_comment(
                announcement_id,
                NewComment {
                    text: text.to_string(),
                    author: user.email.clone(),
                    author_id: Some(user.uid.clone()),
                },
            )
            .await
    }

    /// Store the user's like on an announcement. Idempotent by user id.
    pub async fn like(&self, announcement_id: &str, user: &AuthUser) -> AppResult<()> {
        self.store
            .set_like(
                announcement_id,
                Like {
                    user_id: user.uid.clone(),
                    user_email: user.email.clone(),
                    liked_at: Utc::now(),
                },
            )
            .await
    }

    /// Remove the user's like. Removing an absent like is a no-op.
    pub async fn unlike(&self, announcement_id: &str, user_id: &str) -> AppResult<()> {
        self.store.remove_like(announcement_id, user_id).await
    }

    /// Flip the user's like on an announcement.
    ///
    /// The flip is applied to `likes` before the backend write so the caller
    /// can render it immediately; a failed write reverts the flip and
    /// returns the error. Returns whether the announcement is liked after
    /// the toggle.
    pub async fn toggle_like(
        &self,
        announcement_id: &str,
        likes: &mut OptimisticLikes,
        user: &AuthUser,
    ) -> AppResult<bool> {
        match likes.toggle(&user.uid, &user.email, Utc::now()) {
            LikeAction::Liked(like) => {
                if let Err(e) = self.store.set_like(announcement_id, like).await {
                    tracing::warn!(error = %e, announcement_id, "like write failed, reverting");
                    likes.revert(&user.uid);
                    return Err(e);
                }
                Ok(true)
            }
            LikeAction::Unliked => {
                if let Err(e) = self.store.remove_like(announcement_id, &user.uid).await {
                    tracing::warn!(error = %e, announcement_id, "unlike write failed, reverting");
                    likes.revert(&user.uid);
                    return Err(e);
                }
                Ok(false)
            }
        }
    }
}
