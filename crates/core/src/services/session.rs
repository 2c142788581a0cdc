//! Session routing derived from auth state.

use std::sync::Arc;

use huddle_backend::{AuthGateway, AuthUser, Subscription};

/// Top-level destination for the current session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// No signed-in user; show the sign-in flow.
    SignIn,
    /// Signed in; show the main tabs.
    Main,
}

impl Route {
    /// The route a given auth state resolves to.
    #[must_use]
    pub const fn for_user(user: Option<&AuthUser>) -> Self {
        match user {
            Some(_) => Self::Main,
            None => Self::SignIn,
        }
    }
}

/// Live routing decisions, one per auth-state change.
///
/// The first value arrives without waiting for a change, so a consumer that
/// subscribes at startup lands on the right route immediately.
pub struct RouteSubscription {
    inner: Subscription<Option<AuthUser>>,
}

impl RouteSubscription {
    /// Next routing decision. Returns `None` once the auth feed is gone.
    pub async fn next(&mut self) -> Option<Route> {
        self.inner
            .recv()
            .await
            .map(|user| Route::for_user(user.as_ref()))
    }

    /// Detach from the auth feed.
    pub fn cancel(self) {
        self.inner.cancel();
    }
}

/// Session service.
#[derive(Clone)]
pub struct SessionService {
    auth: Arc<dyn AuthGateway>,
}

impl SessionService {
    /// Create a new session service.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthGateway>) -> Self {
        Self { auth }
    }

    /// The route matching the auth state right now.
    #[must_use]
    pub fn current_route(&self) -> Route {
        Route::for_user(self.auth.current_user().as_ref())
    }

    /// Subscribe to routing decisions.
    #[must_use]
    pub fn subscribe_route(&self) -> RouteSubscription {
        RouteSubscription {
            inner: self.auth.subscribe_auth_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for_user() {
        assert_eq!(Route::for_user(None), Route::SignIn);

        let user = AuthUser {
            uid: "u1".to_string(),
            email: "a@b.com".to_string(),
        };
        assert_eq!(Route::for_user(Some(&user)), Route::Main);
    }
}
