//! Backend layer for huddle.
//!
//! The hosted backend (authentication service plus a document database with
//! live queries) is consumed through the gateway traits in this crate. An
//! in-memory implementation, [`MemoryBackend`], provides the same observable
//! semantics for tests and local development: full-result-set snapshot
//! delivery per subscription, likes keyed by user id, and an atomic append
//! for the embedded chat message list.

pub mod entities;
pub mod gateway;
pub mod memory;
pub mod subscription;

pub use entities::{
    AccountStatus, Announcement, ChatMessage, Comment, Like, NewAnnouncement, NewComment, Sender,
    UserRecord,
};
pub use gateway::{AnnouncementStore, AuthGateway, AuthUser, UserStore};
pub use memory::MemoryBackend;
pub use subscription::{SubscriberSet, Subscription};
