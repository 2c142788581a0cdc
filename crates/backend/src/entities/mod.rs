//! Document entities.
//!
//! Plain serde structs mirroring the documents the backend stores. Wire
//! names are camelCase to match the hosted collections.

pub mod announcement;
pub mod chat_message;
pub mod comment;
pub mod like;
pub mod user;

pub use announcement::{Announcement, NewAnnouncement};
pub use chat_message::{ChatMessage, Sender};
pub use comment::{Comment, NewComment};
pub use like::Like;
pub use user::{AccountStatus, UserRecord};
