//! Friend-of-friend connection suggestions.
//!
//! Candidates are users two or three FOLLOWS hops away from the viewer that
//! the viewer does not already follow. A user reachable at both depths is
//! reported once, at degree 2. Results are ordered by (degree, first name),
//! with the user id as the final tie-break.

use super::models::{CreatorSummary, Suggestion};
use super::paging::{paginate, PageRequest, PageResult};
use crate::error::{Result, SocialError};
use crate::neo4j::models::{Direction, RelType};
use crate::neo4j::GraphStore;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Generates suggested connections for a viewer
pub struct SuggestionEngine {
    store: Arc<dyn GraphStore>,
}

impl SuggestionEngine {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// One page of suggestions for `viewer`
    pub async fn suggest(&self, viewer: Uuid, page: PageRequest) -> Result<PageResult<Suggestion>> {
        if self.store.get_user(viewer).await?.is_none() {
            return Err(SocialError::user_not_found(viewer));
        }

        let candidates = self.candidates(viewer).await?;
        let followers: HashSet<Uuid> = self
            .store
            .neighbors(viewer, RelType::Follows, Direction::Incoming)
            .await?
            .into_iter()
            .collect();

        let mut suggestions = Vec::with_capacity(candidates.len());
        for (user_id, degree) in candidates {
            // A candidate id with no user node behind it is dropped
            let Some(user) = self.store.get_user(user_id).await? else {
                continue;
            };
            suggestions.push(Suggestion {
                user: CreatorSummary::from(&user),
                degree,
                follows_me: followers.contains(&user_id),
            });
        }

        suggestions.sort_by(|a, b| {
            a.degree
                .cmp(&b.degree)
                .then_with(|| a.user.first_name.cmp(&b.user.first_name))
                .then_with(|| a.user.id.cmp(&b.user.id))
        });

        tracing::debug!(
            %viewer,
            total = suggestions.len(),
            page = page.page(),
            "Computed connection suggestions"
        );

        Ok(paginate(suggestions, page))
    }

    /// Deduplicated (user, degree) candidates, degree 2 before degree 3
    async fn candidates(&self, viewer: Uuid) -> Result<Vec<(Uuid, u8)>> {
        let following: Vec<Uuid> = self
            .store
            .neighbors(viewer, RelType::Follows, Direction::Outgoing)
            .await?;
        let following_set: HashSet<Uuid> = following.iter().copied().collect();
        let excluded = |id: &Uuid| *id == viewer || following_set.contains(id);

        // Everything one hop past the viewer's followings
        let mut layer2: BTreeSet<Uuid> = BTreeSet::new();
        for friend in &following {
            layer2.extend(
                self.store
                    .neighbors(*friend, RelType::Follows, Direction::Outgoing)
                    .await?,
            );
        }

        let second: BTreeSet<Uuid> = layer2.iter().copied().filter(|id| !excluded(id)).collect();

        // The third layer expands from every second-hop node, including ones
        // the viewer already follows, since walks may pass through them.
        let mut third: BTreeSet<Uuid> = BTreeSet::new();
        for hop in &layer2 {
            for id in self
                .store
                .neighbors(*hop, RelType::Follows, Direction::Outgoing)
                .await?
            {
                if !excluded(&id) && !second.contains(&id) {
                    third.insert(id);
                }
            }
        }

        Ok(second
            .into_iter()
            .map(|id| (id, 2))
            .chain(third.into_iter().map(|id| (id, 3)))
            .collect())
    }
}
