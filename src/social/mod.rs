//! Social graph query and ranking engine.
//!
//! [`SocialEngine`] bundles the per-concern services over one shared
//! `GraphStore` handle. Services are stateless between calls.

pub mod actions;
pub mod content;
pub mod degree;
mod enrich;
pub mod feed;
pub mod models;
pub mod paging;
pub mod suggestions;
pub mod users;

pub use actions::ActionLedger;
pub use content::ContentService;
pub use degree::{DegreeResolver, SELF_DEGREE, UNCONNECTED_DEGREE};
pub use feed::{AffinityTier, FeedConfig, FeedRanker};
pub use models::*;
pub use paging::{paginate, PageRequest, PageResult};
pub use suggestions::SuggestionEngine;
pub use users::UserService;

use crate::neo4j::GraphStore;
use std::sync::Arc;

pub struct SocialEngine {
    degree: DegreeResolver,
    suggestions: SuggestionEngine,
    feed: FeedRanker,
    actions: ActionLedger,
    users: UserService,
    content: ContentService,
}

impl SocialEngine {
    pub fn new(store: Arc<dyn GraphStore>, feed_config: FeedConfig) -> Self {
        Self {
            degree: DegreeResolver::new(store.clone()),
            suggestions: SuggestionEngine::new(store.clone()),
            feed: FeedRanker::new(store.clone(), feed_config),
            actions: ActionLedger::new(store.clone()),
            users: UserService::new(store.clone()),
            content: ContentService::new(store),
        }
    }

    pub fn degree(&self) -> &DegreeResolver {
        &self.degree
    }

    pub fn suggestions(&self) -> &SuggestionEngine {
        &self.suggestions
    }

    pub fn feed(&self) -> &FeedRanker {
        &self.feed
    }

    pub fn actions(&self) -> &ActionLedger {
        &self.actions
    }

    pub fn users(&self) -> &UserService {
        &self.users
    }

    pub fn content(&self) -> &ContentService {
        &self.content
    }
}
