//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on `Neo4jClient`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;

#[async_trait]
impl GraphStore for Neo4jClient {
    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_user(&self, user: &UserNode) -> anyhow::Result<bool> {
        self.create_user(user).await
    }

    async fn get_user(&self, id: Uuid) -> anyhow::Result<Option<UserNode>> {
        self.get_user(id).await
    }

    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> anyhow::Result<()> {
        self.update_user(id, update).await
    }

    async fn list_users_filtered(
        &self,
        exclude: Uuid,
        filter: &UserFilter,
        limit: usize,
        offset: usize,
    ) -> anyhow::Result<(Vec<UserNode>, usize)> {
        self.list_users_filtered(exclude, filter, limit, offset).await
    }

    async fn list_follow_users(
        &self,
        user_id: Uuid,
        direction: Direction,
        limit: usize,
        offset: usize,
    ) -> anyhow::Result<(Vec<UserNode>, usize)> {
        self.list_follow_users(user_id, direction, limit, offset).await
    }

    // ========================================================================
    // Skill operations
    // ========================================================================

    async fn create_skill(&self, skill: &SkillNode) -> anyhow::Result<Uuid> {
        self.create_skill(skill).await
    }

    async fn get_user_skills(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        self.get_user_skills(user_id).await
    }

    // ========================================================================
    // Post operations
    // ========================================================================

    async fn create_post(&self, creator_id: Uuid, post: &PostNode) -> anyhow::Result<()> {
        self.create_post(creator_id, post).await
    }

    async fn get_post(&self, id: Uuid) -> anyhow::Result<Option<PostNode>> {
        self.get_post(id).await
    }

    async fn get_post_creator(&self, post_id: Uuid) -> anyhow::Result<Option<UserNode>> {
        self.get_post_creator(post_id).await
    }

    async fn update_post(
        &self,
        id: Uuid,
        text: Option<String>,
        images: Option<Vec<String>>,
        updated_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        self.update_post(id, text, images, updated_at).await
    }

    async fn delete_post(&self, id: Uuid) -> anyhow::Result<()> {
        self.delete_post(id).await
    }

    async fn list_user_posts(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> anyhow::Result<(Vec<PostNode>, usize)> {
        self.list_user_posts(user_id, limit, offset).await
    }

    async fn list_posts_by_creators(
        &self,
        creator_ids: &[Uuid],
    ) -> anyhow::Result<Vec<(Uuid, PostNode)>> {
        self.list_posts_by_creators(creator_ids).await
    }

    async fn count_posts_by_creators(&self, creator_ids: &[Uuid]) -> anyhow::Result<usize> {
        self.count_posts_by_creators(creator_ids).await
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    async fn create_comment(
        &self,
        creator_id: Uuid,
        comment: &CommentNode,
        anchor: CommentAnchor,
    ) -> anyhow::Result<()> {
        self.create_comment(creator_id, comment, anchor).await
    }

    async fn get_comment(&self, id: Uuid) -> anyhow::Result<Option<CommentNode>> {
        self.get_comment(id).await
    }

    async fn get_comment_anchor(&self, id: Uuid) -> anyhow::Result<Option<CommentAnchor>> {
        self.get_comment_anchor(id).await
    }

    async fn get_comment_creator(&self, id: Uuid) -> anyhow::Result<Option<UserNode>> {
        self.get_comment_creator(id).await
    }

    async fn delete_comment(&self, id: Uuid) -> anyhow::Result<()> {
        self.delete_comment(id).await
    }

    async fn list_comments(
        &self,
        anchor: CommentAnchor,
        limit: usize,
        offset: usize,
    ) -> anyhow::Result<(Vec<CommentNode>, usize)> {
        self.list_comments(anchor, limit, offset).await
    }

    // ========================================================================
    // Adjacency operations
    // ========================================================================

    async fn neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> anyhow::Result<Vec<Uuid>> {
        self.neighbors(node_id, rel, direction).await
    }

    async fn count_neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> anyhow::Result<usize> {
        self.count_neighbors(node_id, rel, direction).await
    }

    async fn has_edge(&self, from: Uuid, rel: RelType, to: Uuid) -> anyhow::Result<bool> {
        self.has_edge(from, rel, to).await
    }

    async fn create_edge_if_absent(
        &self,
        from: Uuid,
        rel: RelType,
        to: Uuid,
    ) -> anyhow::Result<bool> {
        self.create_edge_if_absent(from, rel, to).await
    }

    async fn delete_edge_if_present(
        &self,
        from: Uuid,
        rel: RelType,
        to: Uuid,
    ) -> anyhow::Result<bool> {
        self.delete_edge_if_present(from, rel, to).await
    }

    // ========================================================================
    // Health
    // ========================================================================

    async fn health_check(&self) -> anyhow::Result<bool> {
        self.health_check().await
    }
}
