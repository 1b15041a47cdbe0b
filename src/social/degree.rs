//! Connection degree resolution.
//!
//! `degree(viewer, target)` answers "does a directed FOLLOWS walk of exactly
//! k hops exist" for k = 1, 2, 3 in that order; the first k that holds wins.
//! Each hop count is tested on its own layer, so a node reachable at several
//! lengths is reported at the smallest one.

use crate::error::{Result, SocialError};
use crate::neo4j::models::{Direction, RelType};
use crate::neo4j::GraphStore;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Degree reported when viewer and target are the same user
pub const SELF_DEGREE: u8 = 0;
/// Sentinel degree: no walk of length 1..=3 exists
pub const UNCONNECTED_DEGREE: u8 = 4;

/// Resolves the directed FOLLOWS distance between two users
pub struct DegreeResolver {
    store: Arc<dyn GraphStore>,
}

impl DegreeResolver {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Connection degree from `viewer` to `target`: 0 for identity, 1..=3 for
    /// the shortest walk length found, 4 when none of 1..=3 holds.
    pub async fn degree(&self, viewer: Uuid, target: Uuid) -> Result<u8> {
        if viewer == target {
            self.require_user(viewer).await?;
            return Ok(SELF_DEGREE);
        }
        self.require_user(viewer).await?;
        self.require_user(target).await?;

        let degree = self.resolve(viewer, target).await?;
        tracing::debug!(%viewer, %target, degree, "Resolved connection degree");
        Ok(degree)
    }

    async fn resolve(&self, viewer: Uuid, target: Uuid) -> Result<u8> {
        // Hop 1
        let layer1: HashSet<Uuid> = self
            .store
            .neighbors(viewer, RelType::Follows, Direction::Outgoing)
            .await?
            .into_iter()
            .collect();
        if layer1.contains(&target) {
            return Ok(1);
        }
        if layer1.is_empty() {
            return Ok(UNCONNECTED_DEGREE);
        }

        // The last hop of any walk must land on one of target's followers
        let target_followers: HashSet<Uuid> = self
            .store
            .neighbors(target, RelType::Follows, Direction::Incoming)
            .await?
            .into_iter()
            .collect();
        if target_followers.is_empty() {
            return Ok(UNCONNECTED_DEGREE);
        }

        // Hop 2: viewer -> x -> target
        if layer1.iter().any(|x| target_followers.contains(x)) {
            return Ok(2);
        }

        // Hop 3: viewer -> x -> y -> target
        let mut layer2 = HashSet::new();
        for x in &layer1 {
            layer2.extend(
                self.store
                    .neighbors(*x, RelType::Follows, Direction::Outgoing)
                    .await?,
            );
        }
        if layer2.iter().any(|y| target_followers.contains(y)) {
            return Ok(3);
        }

        Ok(UNCONNECTED_DEGREE)
    }

    async fn require_user(&self, id: Uuid) -> Result<()> {
        match self.store.get_user(id).await? {
            Some(_) => Ok(()),
            None => Err(SocialError::user_not_found(id)),
        }
    }
}
