//! In-memory backend.
//!
//! Implements every gateway trait over one mutex-guarded state, with the
//! same observable semantics the hosted service provides: argon2-hashed
//! accounts unique by email, per-query snapshot fan-out, likes keyed by user
//! id, and an atomic append for embedded chat messages. Serves as the
//! injectable fake in tests and as the reference behavior for a remote
//! implementation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use chrono::Utc;
use huddle_common::{AppError, AppResult, IdGenerator};

use crate::entities::{
    AccountStatus, Announcement, ChatMessage, Comment, Like, NewAnnouncement, NewComment,
    UserRecord,
};
use crate::gateway::{AnnouncementStore, AuthGateway, AuthUser, UserStore};
use crate::subscription::{SubscriberSet, Subscription};

struct Account {
    uid: String,
    email: String,
    password_hash: String,
}

#[derive(Default)]
struct State {
    /// Accounts keyed by lowercase email.
    accounts: HashMap<String, Account>,
    current_user: Option<AuthUser>,
    /// User documents keyed by uid.
    users: HashMap<String, UserRecord>,
    /// Announcements in insertion order; snapshots are emitted newest first.
    announcements: Vec<Announcement>,
    /// Comments per announcement id, in insertion order.
    comments: HashMap<String, Vec<Comment>>,
    /// Likes per announcement id, unique by user id.
    likes: HashMap<String, Vec<Like>>,
}

/// In-memory implementation of all three backend gateways.
pub struct MemoryBackend {
    state: Mutex<State>,
    auth_subs: SubscriberSet<Option<AuthUser>>,
    user_subs: Mutex<HashMap<String, SubscriberSet<Option<UserRecord>>>>,
    announcement_subs: SubscriberSet<Vec<Announcement>>,
    comment_subs: Mutex<HashMap<String, SubscriberSet<Vec<Comment>>>>,
    like_subs: Mutex<HashMap<String, SubscriberSet<Vec<Like>>>>,
    id_gen: IdGenerator,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            auth_subs: SubscriberSet::new(),
            user_subs: Mutex::new(HashMap::new()),
            announcement_subs: SubscriberSet::new(),
            comment_subs: Mutex::new(HashMap::new()),
            like_subs: Mutex::new(HashMap::new()),
            id_gen: IdGenerator::new(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn subs_for<T: Clone + Send + 'static>(
        map: &Mutex<HashMap<String, SubscriberSet<T>>>,
        key: &str,
    ) -> SubscriberSet<T> {
        map.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .clone()
    }

    /// Publish to the subscriber set for one key, dropping the set once its
    /// last subscriber has detached so the per-key maps stay bounded by the
    /// number of live subscriptions.
    fn publish_keyed<T: Clone + Send + 'static>(
        map: &Mutex<HashMap<String, SubscriberSet<T>>>,
        key: &str,
        value: &T,
    ) {
        let mut map = map.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(set) = map.get(key) {
            set.publish(value);
            if set.subscriber_count() == 0 {
                map.remove(key);
            }
        }
    }

    /// Publish the current user document to its subscribers.
    ///
    /// Called while the state lock is held so snapshots for one document are
    /// emitted in mutation order.
    fn publish_user(&self, state: &State, uid: &str) {
        let snapshot = state.users.get(uid).cloned();
        Self::publish_keyed(&self.user_subs, uid, &snapshot);
    }

    fn publish_announcements(&self, state: &State) {
        self.announcement_subs
            .publish(&announcements_snapshot(state));
    }

    fn publish_comments(&self, state: &State, announcement_id: &str) {
        let snapshot = comments_snapshot(state, announcement_id);
        Self::publish_keyed(&self.comment_subs, announcement_id, &snapshot);
    }

    fn publish_likes(&self, state: &State, announcement_id: &str) {
        let snapshot = likes_snapshot(state, announcement_id);
        Self::publish_keyed(&self.like_subs, announcement_id, &snapshot);
    }

    #[cfg(test)]
    fn keyed_like_sets(&self) -> usize {
        self.like_subs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Announcements, newest first. Ties keep insertion order.
fn announcements_snapshot(state: &State) -> Vec<Announcement> {
    let mut snapshot = state.announcements.clone();
    snapshot.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    snapshot
}

/// One announcement's comments, oldest first.
fn comments_snapshot(state: &State, announcement_id: &str) -> Vec<Comment> {
    let mut snapshot = state
        .comments
        .get(announcement_id)
        .cloned()
        .unwrap_or_default();
    snapshot.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    snapshot
}

fn likes_snapshot(state: &State, announcement_id: &str) -> Vec<Like> {
    state
        .likes
        .get(announcement_id)
        .cloned()
        .unwrap_or_default()
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[async_trait]
impl AuthGateway for MemoryBackend {
    async fn create_account(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        let key = normalize_email(email);
        let password_hash = hash_password(password)?;

        let user = {
            let mut state = self.state();
            if state.accounts.contains_key(&key) {
                return Err(AppError::Conflict("Email already in use".to_string()));
            }

            let user = AuthUser {
                uid: self.id_gen.generate(),
                email: key.clone(),
            };
            state.accounts.insert(
                key,
                Account {
                    uid: user.uid.clone(),
                    email: user.email.clone(),
                    password_hash,
                },
            );
            // Creating an account signs the new user in, as the hosted
            // auth service does.
            state.current_user = Some(user.clone());
            self.auth_subs.publish(&state.current_user);
            user
        };

        tracing::debug!(uid = %user.uid, "account created");
        Ok(user)
    }

    async fn sign_in(&self, email: &str, password: &str) -> AppResult<AuthUser> {
        let key = normalize_email(email);

        let mut state = self.state();
        // Unknown email and wrong password are indistinguishable on purpose.
        let account = state.accounts.get(&key).ok_or(AppError::Unauthorized)?;
        if !verify_password(password, &account.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let user = AuthUser {
            uid: account.uid.clone(),
            email: account.email.clone(),
        };
        state.current_user = Some(user.clone());
        self.auth_subs.publish(&state.current_user);
        Ok(user)
    }

    async fn sign_out(&self) -> AppResult<()> {
        let mut state = self.state();
        state.current_user = None;
        self.auth_subs.publish(&state.current_user);
        Ok(())
    }

    fn current_user(&self) -> Option<AuthUser> {
        self.state().current_user.clone()
    }

    fn subscribe_auth_state(&self) -> Subscription<Option<AuthUser>> {
        let state = self.state();
        self.auth_subs.subscribe(state.current_user.clone())
    }
}

#[async_trait]
impl UserStore for MemoryBackend {
    async fn create_user(&self, record: UserRecord) -> AppResult<()> {
        let mut state = self.state();
        let uid = record.id.clone();
        state.users.insert(uid.clone(), record);
        self.publish_user(&state, &uid);
        Ok(())
    }

    async fn find_user(&self, uid: &str) -> AppResult<Option<UserRecord>> {
        Ok(self.state().users.get(uid).cloned())
    }

    async fn append_message(&self, uid: &str, message: ChatMessage) -> AppResult<()> {
        let mut state = self.state();
        let record = state
            .users
            .get_mut(uid)
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;
        record.messages.push(message);
        self.publish_user(&state, uid);
        Ok(())
    }

    async fn set_status(&self, uid: &str, status: AccountStatus) -> AppResult<()> {
        let mut state = self.state();
        let record = state
            .users
            .get_mut(uid)
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;
        record.status = status;
        self.publish_user(&state, uid);
        Ok(())
    }

    async fn set_document_url(&self, uid: &str, url: &str) -> AppResult<()> {
        let mut state = self.state();
        let record = state
            .users
            .get_mut(uid)
            .ok_or_else(|| AppError::UserNotFound(uid.to_string()))?;
        record.document_url = Some(url.to_string());
        self.publish_user(&state, uid);
        Ok(())
    }

    fn subscribe_user(&self, uid: &str) -> Subscription<Option<UserRecord>> {
        let state = self.state();
        Self::subs_for(&self.user_subs, uid).subscribe(state.users.get(uid).cloned())
    }
}

#[async_trait]
impl AnnouncementStore for MemoryBackend {
    async fn create_announcement(&self, input: NewAnnouncement) -> AppResult<Announcement> {
        let announcement = Announcement {
            id: self.id_gen.generate(),
            title: input.title,
            content: input.content,
            thumb: input.thumb,
            image: input.image,
            author: input.author,
            created_at: Utc::now(),
        };

        let mut state = self.state();
        state.announcements.push(announcement.clone());
        self.publish_announcements(&state);
        Ok(announcement)
    }

    fn subscribe_announcements(&self) -> Subscription<Vec<Announcement>> {
        let state = self.state();
        self.announcement_subs
            .subscribe(announcements_snapshot(&state))
    }

    async fn add_comment(&self, announcement_id: &str, input: NewComment) -> AppResult<Comment> {
        let comment = Comment {
            id: self.id_gen.generate(),
            text: input.text,
            author: input.author,
            author_id: input.author_id,
            created_at: Utc::now(),
        };

        // The hosted store accepts subcollection writes without checking the
        // parent document, so an unknown announcement id is not an error.
        let mut state = self.state();
        state
            .comments
            .entry(announcement_id.to_string())
            .or_default()
            .push(comment.clone());
        self.publish_comments(&state, announcement_id);
        Ok(comment)
    }

    fn subscribe_comments(&self, announcement_id: &str) -> Subscription<Vec<Comment>> {
        let state = self.state();
        Self::subs_for(&self.comment_subs, announcement_id)
            .subscribe(comments_snapshot(&state, announcement_id))
    }

    async fn set_like(&self, announcement_id: &str, like: Like) -> AppResult<()> {
        let mut state = self.state();
        let likes = state.likes.entry(announcement_id.to_string()).or_default();
        likes.retain(|l| l.user_id != like.user_id);
        likes.push(like);
        self.publish_likes(&state, announcement_id);
        Ok(())
    }

    async fn remove_like(&self, announcement_id: &str, user_id: &str) -> AppResult<()> {
        let mut state = self.state();
        let Some(likes) = state.likes.get_mut(announcement_id) else {
            return Ok(());
        };
        let before = likes.len();
        likes.retain(|l| l.user_id != user_id);
        if likes.len() != before {
            self.publish_likes(&state, announcement_id);
        }
        Ok(())
    }

    fn subscribe_likes(&self, announcement_id: &str) -> Subscription<Vec<Like>> {
        let state = self.state();
        Self::subs_for(&self.like_subs, announcement_id)
            .subscribe(likes_snapshot(&state, announcement_id))
    }
}
