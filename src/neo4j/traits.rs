//! GraphStore trait definition
//!
//! Defines the abstract interface the social engine issues against the graph
//! store. Traversal algorithms only rely on the adjacency primitives at the
//! bottom of the trait (`neighbors`, `has_edge`, ...); entity and listing
//! methods let a backend push ordering and slicing into its own query
//! language when the sort key is stored on the node.

use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Abstract interface for all graph database operations.
///
/// Implemented by `Neo4jClient` and by the in-memory `MockGraphStore` used in tests.
#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a new user node unless the email is taken; returns whether it was created
    async fn create_user(&self, user: &UserNode) -> Result<bool>;

    /// Get a user by ID
    async fn get_user(&self, id: Uuid) -> Result<Option<UserNode>>;

    /// Apply a partial profile update
    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<()>;

    /// List every user except `exclude`, filtered, ordered by first name.
    ///
    /// Returns (page of users, total matching)
    async fn list_users_filtered(
        &self,
        exclude: Uuid,
        filter: &UserFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<UserNode>, usize)>;

    /// List the FOLLOWS neighbors of a user (outgoing = following,
    /// incoming = followers), ordered by first name.
    ///
    /// Returns (page of users, total)
    async fn list_follow_users(
        &self,
        user_id: Uuid,
        direction: Direction,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<UserNode>, usize)>;

    // ========================================================================
    // Skill operations
    // ========================================================================

    /// Create a skill node unless one with the same name exists; returns the stored id
    async fn create_skill(&self, skill: &SkillNode) -> Result<Uuid>;

    /// Skill names of a user, most recently attached first
    async fn get_user_skills(&self, user_id: Uuid) -> Result<Vec<String>>;

    // ========================================================================
    // Post operations
    // ========================================================================

    /// Create a post and its CREATED_POST edge from the creator
    async fn create_post(&self, creator_id: Uuid, post: &PostNode) -> Result<()>;

    /// Get a post by ID
    async fn get_post(&self, id: Uuid) -> Result<Option<PostNode>>;

    /// Get the creator of a post
    async fn get_post_creator(&self, post_id: Uuid) -> Result<Option<UserNode>>;

    /// Update post text and/or images
    async fn update_post(
        &self,
        id: Uuid,
        text: Option<String>,
        images: Option<Vec<String>>,
        updated_at: DateTime<Utc>,
    ) -> Result<()>;

    /// Delete a post together with its comments and their replies
    async fn delete_post(&self, id: Uuid) -> Result<()>;

    /// Posts of one user, newest first.
    ///
    /// Returns (page of posts, total)
    async fn list_user_posts(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<PostNode>, usize)>;

    /// Every post created by any of the given users, as (creator_id, post)
    async fn list_posts_by_creators(&self, creator_ids: &[Uuid]) -> Result<Vec<(Uuid, PostNode)>>;

    /// Count posts created by any of the given users
    async fn count_posts_by_creators(&self, creator_ids: &[Uuid]) -> Result<usize>;

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// Create a comment with its CREATED_COMMENT edge and its anchor edge
    async fn create_comment(
        &self,
        creator_id: Uuid,
        comment: &CommentNode,
        anchor: CommentAnchor,
    ) -> Result<()>;

    /// Get a comment by ID
    async fn get_comment(&self, id: Uuid) -> Result<Option<CommentNode>>;

    /// Where a comment is attached (ON a post or REPLY_TO a comment)
    async fn get_comment_anchor(&self, id: Uuid) -> Result<Option<CommentAnchor>>;

    /// Get the creator of a comment
    async fn get_comment_creator(&self, id: Uuid) -> Result<Option<UserNode>>;

    /// Delete a comment together with its replies
    async fn delete_comment(&self, id: Uuid) -> Result<()>;

    /// Comments attached to an anchor target, newest first.
    ///
    /// Returns (page of comments, total)
    async fn list_comments(
        &self,
        anchor: CommentAnchor,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<CommentNode>, usize)>;

    // ========================================================================
    // Adjacency operations
    // ========================================================================

    /// Ids of the nodes one `rel` hop away from `node_id` in `direction`
    async fn neighbors(&self, node_id: Uuid, rel: RelType, direction: Direction)
        -> Result<Vec<Uuid>>;

    /// Number of `rel` edges touching `node_id` in `direction`
    async fn count_neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> Result<usize>;

    /// Whether `(from)-[rel]->(to)` exists
    async fn has_edge(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool>;

    /// Create `(from)-[rel]->(to)` unless present. Returns true if created.
    async fn create_edge_if_absent(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool>;

    /// Delete `(from)-[rel]->(to)` if present. Returns true if removed.
    async fn delete_edge_if_present(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool>;

    /// Whether the backend answers a trivial query
    async fn health_check(&self) -> Result<bool>;
}
