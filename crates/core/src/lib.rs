//! Core services for huddle.
//!
//! Each service wraps the backend gateways it needs and carries the rules
//! the backend does not enforce: sign-up validation, the once-daily chat
//! auto-reply, optimistic like toggling, and auth-state routing.

pub mod services;

pub use services::account::{AccountService, SignUpInput};
pub use services::chat::ChatService;
pub use services::feed::FeedService;
pub use services::likes::{LikeAction, OptimisticLikes};
pub use services::profile::{ProfileService, ProfileView};
pub use services::session::{Route, RouteSubscription, SessionService};
