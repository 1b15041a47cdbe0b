//! Social action ledger: follow/unfollow and like/unlike.
//!
//! All four actions are idempotent. Repeating one reports a no-op through
//! the return value rather than an error, and never duplicates an edge.

use super::models::{LikeOutcome, LikeToggle, UnlikeOutcome};
use crate::error::{Result, SocialError};
use crate::neo4j::models::{LikeTarget, RelType};
use crate::neo4j::GraphStore;
use std::sync::Arc;
use uuid::Uuid;

pub struct ActionLedger {
    store: Arc<dyn GraphStore>,
}

impl ActionLedger {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Create `actor -[FOLLOWS]-> target`.
    ///
    /// Returns `false` when the edge already existed or when `actor` targets
    /// themselves (a user never follows themselves).
    pub async fn follow(&self, actor: Uuid, target: Uuid) -> Result<bool> {
        self.require_users(actor, target).await?;
        if actor == target {
            tracing::debug!(%actor, "Ignoring self-follow");
            return Ok(false);
        }
        let created = self
            .store
            .create_edge_if_absent(actor, RelType::Follows, target)
            .await?;
        tracing::debug!(%actor, %target, created, "follow");
        Ok(created)
    }

    /// Remove `actor -[FOLLOWS]-> target`; `false` when there was none
    pub async fn unfollow(&self, actor: Uuid, target: Uuid) -> Result<bool> {
        self.require_users(actor, target).await?;
        if actor == target {
            return Ok(false);
        }
        let removed = self
            .store
            .delete_edge_if_present(actor, RelType::Follows, target)
            .await?;
        tracing::debug!(%actor, %target, removed, "unfollow");
        Ok(removed)
    }

    pub async fn like(&self, actor: Uuid, target: LikeTarget) -> Result<LikeOutcome> {
        self.require_like_target(actor, target).await?;
        let created = self
            .store
            .create_edge_if_absent(actor, RelType::Likes, target.id())
            .await?;
        Ok(if created {
            LikeOutcome::Created
        } else {
            LikeOutcome::AlreadyLiked
        })
    }

    pub async fn unlike(&self, actor: Uuid, target: LikeTarget) -> Result<UnlikeOutcome> {
        self.require_like_target(actor, target).await?;
        let removed = self
            .store
            .delete_edge_if_present(actor, RelType::Likes, target.id())
            .await?;
        Ok(if removed {
            UnlikeOutcome::Removed
        } else {
            UnlikeOutcome::NotLiked
        })
    }

    /// Like when not liked yet, otherwise unlike
    pub async fn toggle_like(&self, actor: Uuid, target: LikeTarget) -> Result<LikeToggle> {
        match self.like(actor, target).await? {
            LikeOutcome::Created => Ok(LikeToggle::Liked),
            LikeOutcome::AlreadyLiked => {
                self.unlike(actor, target).await?;
                Ok(LikeToggle::Unliked)
            }
        }
    }

    async fn require_users(&self, actor: Uuid, target: Uuid) -> Result<()> {
        for id in [actor, target] {
            if self.store.get_user(id).await?.is_none() {
                return Err(SocialError::user_not_found(id));
            }
        }
        Ok(())
    }

    async fn require_like_target(&self, actor: Uuid, target: LikeTarget) -> Result<()> {
        if self.store.get_user(actor).await?.is_none() {
            return Err(SocialError::user_not_found(actor));
        }
        match target {
            LikeTarget::Post(id) => {
                if self.store.get_post(id).await?.is_none() {
                    return Err(SocialError::post_not_found(id));
                }
            }
            LikeTarget::Comment(id) => {
                if self.store.get_comment(id).await?.is_none() {
                    return Err(SocialError::comment_not_found(id));
                }
            }
        }
        Ok(())
    }
}
