//! Optimistic like state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use huddle_backend::Like;

/// The write a toggle decided on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LikeAction {
    /// Store this like.
    Liked(Like),
    /// Remove the caller's like.
    Unliked,
}

/// Like state for one announcement, with local toggles layered over the
/// last confirmed backend snapshot.
///
/// A toggle flips the visible state immediately and records the flip as
/// pending; the pending entry is retired when a snapshot confirms it, or
/// removed by [`revert`](Self::revert) when the write fails. The visible
/// state therefore never shows a like the user has already taken back, even
/// while snapshots are in flight.
#[derive(Default)]
pub struct OptimisticLikes {
    confirmed: Vec<Like>,
    pending: HashMap<String, Pending>,
}

enum Pending {
    Like(Like),
    Unlike,
}

impl OptimisticLikes {
    /// Create empty like state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the confirmed state with a backend snapshot, retiring every
    /// pending flip the snapshot agrees with.
    pub fn apply_snapshot(&mut self, likes: Vec<Like>) {
        self.pending.retain(|user_id, pending| match pending {
            Pending::Like(_) => !likes.iter().any(|l| &l.user_id == user_id),
            Pending::Unlike => likes.iter().any(|l| &l.user_id == user_id),
        });
        self.confirmed = likes;
    }

    /// Flip the caller's like and return the write to perform.
    pub fn toggle(&mut self, user_id: &str, user_email: &str, at: DateTime<Utc>) -> LikeAction {
        if self.is_liked_by(user_id) {
            self.pending.insert(user_id.to_string(), Pending::Unlike);
            LikeAction::Unliked
        } else {
            let like = Like {
                user_id: user_id.to_string(),
                user_email: user_email.to_string(),
                liked_at: at,
            };
            self.pending
                .insert(user_id.to_string(), Pending::Like(like.clone()));
            LikeAction::Liked(like)
        }
    }

    /// Drop the caller's pending flip after its write failed, restoring the
    /// last confirmed state.
    pub fn revert(&mut self, user_id: &str) {
        self.pending.remove(user_id);
    }

    /// Whether this user's like is visible, pending flips included.
    #[must_use]
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        match self.pending.get(user_id) {
            Some(Pending::Like(_)) => true,
            Some(Pending::Unlike) => false,
            None => self.confirmed.iter().any(|l| l.user_id == user_id),
        }
    }

    /// The likes to render: confirmed state with pending flips applied.
    #[must_use]
    pub fn visible(&self) -> Vec<Like> {
        let mut likes: Vec<Like> = self
            .confirmed
            .iter()
            .filter(|l| !matches!(self.pending.get(&l.user_id), Some(Pending::Unlike)))
            .cloned()
            .collect();
        for pending in self.pending.values() {
            if let Pending::Like(like) = pending {
                if !likes.iter().any(|l| l.user_id == like.user_id) {
                    likes.push(like.clone());
                }
            }
        }
        likes
    }

    /// Visible like count.
    #[must_use]
    pub fn count(&self) -> usize {
        self.visible().len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips_visible_state() {
        let mut likes = OptimisticLikes::new();
        assert!(!likes.is_liked_by("u1"));

        let action = likes.toggle("u1", "a@b.com", Utc::now());
        assert!(matches!(action, LikeAction::Liked(_)));
        assert!(likes.is_liked_by("u1"));
        assert_eq!(likes.count(), 1);
    }

    #[test]
    fn test_double_toggle_restores_state() {
        let mut likes = OptimisticLikes::new();
        likes.toggle("u1", "a@b.com", Utc::now());
        let action = likes.toggle("u1", "a@b.com", Utc::now());

        assert_eq!(action, LikeAction::Unliked);
        assert!(!likes.is_liked_by("u1"));
        assert_eq!(likes.count(), 0);
    }

    #[test]
    fn test_snapshot_retires_confirmed_pending() {
        let mut likes = OptimisticLikes::new();
        let action = likes.toggle("u1", "a@b.com", Utc::now());
        let LikeAction::Liked(like) = action else {
            panic!("expected a like");
        };

        likes.apply_snapshot(vec![like]);
        assert!(likes.is_liked_by("u1"));

        // A later snapshot without the like wins once nothing is pending.
        likes.apply_snapshot(vec![]);
        assert!(!likes.is_liked_by("u1"));
    }

    #[test]
    fn test_stale_snapshot_does_not_undo_pending_flip() {
        let mut likes = OptimisticLikes::new();
        likes.toggle("u1", "a@b.com", Utc::now());

        // Snapshot from before the write landed.
        likes.apply_snapshot(vec![]);
        assert!(likes.is_liked_by("u1"));
        assert_eq!(likes.count(), 1);
    }

    #[test]
    fn test_revert_restores_confirmed_state() {
        let mut likes = OptimisticLikes::new();
        likes.toggle("u1", "a@b.com", Utc::now());
        assert!(likes.is_liked_by("u1"));

        likes.revert("u1");
        assert!(!likes.is_liked_by("u1"));
    }

    #[test]
    fn test_visible_merges_confirmed_and_pending() {
        let confirmed = Like {
            user_id: "u1".to_string(),
            user_email: "a@b.com".to_string(),
            liked_at: Utc::now(),
        };
        let mut likes = OptimisticLikes::new();
        likes.apply_snapshot(vec![confirmed]);
        likes.toggle("u2", "c@d.com", Utc::now());

        assert_eq!(likes.count(), 2);
        assert!(likes.is_liked_by("u1"));
        assert!(likes.is_liked_by("u2"));
    }
}
