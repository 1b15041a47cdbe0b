//! Personalized feed ranking.
//!
//! Every candidate creator gets an affinity tier relative to the viewer
//! (first match wins):
//! - **followed**: the viewer follows the creator, or the creator is the viewer
//! - **second degree**: followed by someone the viewer follows
//! - **extended**: follows someone who follows the viewer
//!
//! Creators outside every tier are excluded. Each post is scored
//! `priority = tier - age_seconds / decay_seconds`, ordered by priority
//! descending (post id ascending on ties), then paginated. Only the page that
//! is returned gets enriched with counts and creator summaries, since the
//! ordering depends on tier and age alone.

use super::enrich::enrich_posts;
use super::models::{age_seconds, EnrichedPost, FeedItem};
use super::paging::{paginate, PageRequest, PageResult};
use crate::error::{Result, SocialError};
use crate::neo4j::models::{Direction, PostNode, RelType, UserNode};
use crate::neo4j::GraphStore;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Affinity of a creator relative to the viewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffinityTier {
    Followed,
    SecondDegree,
    Extended,
}

/// Ranking policy constants
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Score of followed creators and of the viewer's own posts (default: 100)
    pub followed_tier: f64,
    /// Score of second-degree creators (default: 98)
    pub second_degree_tier: f64,
    /// Score of extended-network creators (default: 90)
    pub extended_tier: f64,
    /// Seconds of age that cost one tier point (default: 120)
    pub decay_seconds: f64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            followed_tier: 100.0,
            second_degree_tier: 98.0,
            extended_tier: 90.0,
            decay_seconds: 120.0,
        }
    }
}

impl FeedConfig {
    pub fn tier_score(&self, tier: AffinityTier) -> f64 {
        match tier {
            AffinityTier::Followed => self.followed_tier,
            AffinityTier::SecondDegree => self.second_degree_tier,
            AffinityTier::Extended => self.extended_tier,
        }
    }

    /// `tier - age_seconds / decay_seconds`
    pub fn priority(&self, tier: AffinityTier, age_seconds: f64) -> f64 {
        self.tier_score(tier) - age_seconds / self.decay_seconds
    }

    /// Reject a policy that cannot rank (zero or negative decay)
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(self.decay_seconds.is_finite() && self.decay_seconds > 0.0) {
            return Err(format!(
                "feed decay_seconds must be positive, got {}",
                self.decay_seconds
            ));
        }
        Ok(())
    }
}

/// Assembles ranked feeds and the other creator-set post streams
pub struct FeedRanker {
    store: Arc<dyn GraphStore>,
    config: FeedConfig,
}

impl FeedRanker {
    pub fn new(store: Arc<dyn GraphStore>, config: FeedConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Ranked feed of `viewer` as of now
    pub async fn feed(&self, viewer: Uuid, page: PageRequest) -> Result<PageResult<FeedItem>> {
        self.feed_at(viewer, page, Utc::now()).await
    }

    /// Ranked feed of `viewer`, ages measured against `now`
    pub async fn feed_at(
        &self,
        viewer: Uuid,
        page: PageRequest,
        now: DateTime<Utc>,
    ) -> Result<PageResult<FeedItem>> {
        self.require_user(viewer).await?;

        let tiers = self.classify(viewer).await?;
        let creators: Vec<Uuid> = tiers.keys().copied().collect();

        let posts = self.store.list_posts_by_creators(&creators).await?;
        let total = self.store.count_posts_by_creators(&creators).await?;

        let mut scored: Vec<(f64, Uuid, PostNode)> = posts
            .into_iter()
            .filter_map(|(creator, post)| {
                let tier = tiers.get(&creator)?;
                let priority = self
                    .config
                    .priority(*tier, age_seconds(post.created_at, now));
                Some((priority, creator, post))
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.2.id.cmp(&b.2.id)));

        let window: Vec<(f64, Uuid, PostNode)> = scored
            .into_iter()
            .skip(page.offset())
            .take(page.limit())
            .collect();
        let priorities: Vec<f64> = window.iter().map(|(p, _, _)| *p).collect();
        let enriched = self
            .enrich_window(
                viewer,
                window.into_iter().map(|(_, c, post)| (c, post)).collect(),
            )
            .await?;

        tracing::debug!(
            %viewer,
            creators = creators.len(),
            total,
            page = page.page(),
            "Ranked feed"
        );

        let results = enriched
            .into_iter()
            .zip(priorities)
            .map(|(post, priority)| FeedItem { post, priority })
            .collect();
        Ok(PageResult::from_store_page(page, results, total))
    }

    /// Posts by the users the viewer follows and by the viewer, newest first
    pub async fn following_posts(
        &self,
        viewer: Uuid,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedPost>> {
        self.require_user(viewer).await?;
        let mut creators = self
            .store
            .neighbors(viewer, RelType::Follows, Direction::Outgoing)
            .await?;
        creators.push(viewer);
        self.newest_first(viewer, &creators, page).await
    }

    /// Posts by second-degree creators only, newest first
    pub async fn second_degree_posts(
        &self,
        viewer: Uuid,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedPost>> {
        self.require_user(viewer).await?;
        let creators: Vec<Uuid> = self
            .classify(viewer)
            .await?
            .into_iter()
            .filter(|(_, tier)| *tier == AffinityTier::SecondDegree)
            .map(|(id, _)| id)
            .collect();
        self.newest_first(viewer, &creators, page).await
    }

    /// Affinity tier of every creator that qualifies for the viewer's feed
    pub async fn classify(&self, viewer: Uuid) -> Result<HashMap<Uuid, AffinityTier>> {
        let mut tiers = HashMap::new();
        tiers.insert(viewer, AffinityTier::Followed);

        let following = self
            .store
            .neighbors(viewer, RelType::Follows, Direction::Outgoing)
            .await?;
        for creator in &following {
            tiers.insert(*creator, AffinityTier::Followed);
        }

        for friend in &following {
            for creator in self
                .store
                .neighbors(*friend, RelType::Follows, Direction::Outgoing)
                .await?
            {
                tiers.entry(creator).or_insert(AffinityTier::SecondDegree);
            }
        }

        for follower in self
            .store
            .neighbors(viewer, RelType::Follows, Direction::Incoming)
            .await?
        {
            for creator in self
                .store
                .neighbors(follower, RelType::Follows, Direction::Incoming)
                .await?
            {
                tiers.entry(creator).or_insert(AffinityTier::Extended);
            }
        }

        Ok(tiers)
    }

    async fn newest_first(
        &self,
        viewer: Uuid,
        creators: &[Uuid],
        page: PageRequest,
    ) -> Result<PageResult<EnrichedPost>> {
        let mut posts = self.store.list_posts_by_creators(creators).await?;
        posts.sort_by(|a, b| {
            b.1.created_at
                .cmp(&a.1.created_at)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        let window = paginate(posts, page);
        let total = window.total;
        let enriched = self.enrich_window(viewer, window.results).await?;
        Ok(PageResult::from_store_page(page, enriched, total))
    }

    async fn enrich_window(
        &self,
        viewer: Uuid,
        window: Vec<(Uuid, PostNode)>,
    ) -> Result<Vec<EnrichedPost>> {
        let mut creators: HashMap<Uuid, UserNode> = HashMap::new();
        let mut pairs = Vec::with_capacity(window.len());
        for (creator_id, post) in window {
            if !creators.contains_key(&creator_id) {
                let creator = self
                    .store
                    .get_user(creator_id)
                    .await?
                    .ok_or_else(|| SocialError::user_not_found(creator_id))?;
                creators.insert(creator_id, creator);
            }
            pairs.push((post, creators[&creator_id].clone()));
        }
        enrich_posts(self.store.as_ref(), viewer, pairs).await
    }

    async fn require_user(&self, id: Uuid) -> Result<()> {
        match self.store.get_user(id).await? {
            Some(_) => Ok(()),
            None => Err(SocialError::user_not_found(id)),
        }
    }
}
