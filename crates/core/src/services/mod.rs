//! Service layer.

pub mod account;
pub mod chat;
pub mod feed;
pub mod likes;
pub mod profile;
pub mod session;
