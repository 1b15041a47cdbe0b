//! Posts and the comment tree.
//!
//! A comment is anchored either ON a post (top level) or REPLY_TO a top-level
//! comment; replies to replies are refused. Only the owner of a post or
//! comment may edit or delete it, and deleting cascades down the tree.

use super::enrich::{enrich_comment, enrich_posts, post_engagement};
use super::models::{
    CommentDetail, CreateCommentRequest, CreatePostRequest, EnrichedComment, EnrichedPost,
    UpdatePostRequest,
};
use super::paging::{PageRequest, PageResult};
use crate::error::{Result, SocialError};
use crate::neo4j::models::{CommentAnchor, CommentNode, PostNode, UserNode};
use crate::neo4j::GraphStore;
use chrono::Utc;
use futures::future::try_join_all;
use std::sync::Arc;
use uuid::Uuid;

pub struct ContentService {
    store: Arc<dyn GraphStore>,
}

impl ContentService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    // ========================================================================
    // Posts
    // ========================================================================

    pub async fn create_post(&self, author: Uuid, req: CreatePostRequest) -> Result<EnrichedPost> {
        let post = PostNode::new(req.text, req.images)?;
        let creator = self.require_user(author).await?;
        self.store.create_post(author, &post).await?;
        tracing::info!(post_id = %post.id, %author, "Created post");
        Ok(EnrichedPost::new(post, Default::default(), &creator))
    }

    pub async fn get_post(&self, viewer: Uuid, post_id: Uuid) -> Result<EnrichedPost> {
        let post = self.require_post(post_id).await?;
        let creator = self.post_creator(post_id).await?;
        let engagement = post_engagement(self.store.as_ref(), post_id, viewer).await?;
        Ok(EnrichedPost::new(post, engagement, &creator))
    }

    /// Edit text and/or images of a post; owner only
    pub async fn update_post(
        &self,
        actor: Uuid,
        post_id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<EnrichedPost> {
        if req.text.is_none() && req.images.is_none() {
            return Err(SocialError::InvalidInput(
                "Nothing to update: provide text and/or images".to_string(),
            ));
        }
        let post = self.require_post(post_id).await?;
        let creator = self.post_creator(post_id).await?;
        if creator.id != actor {
            return Err(SocialError::Forbidden(
                "Only the creator can edit this post".to_string(),
            ));
        }

        let text = req.text.unwrap_or_else(|| post.text.clone());
        let images = req.images.unwrap_or_else(|| post.images.clone());
        if text.trim().is_empty() && images.is_empty() {
            return Err(SocialError::InvalidInput(
                "A post must have text and/or images".to_string(),
            ));
        }

        self.store
            .update_post(post_id, Some(text), Some(images), Utc::now())
            .await?;
        self.get_post(actor, post_id).await
    }

    /// Delete a post and its whole comment tree; owner only
    pub async fn delete_post(&self, actor: Uuid, post_id: Uuid) -> Result<()> {
        self.require_post(post_id).await?;
        let creator = self.post_creator(post_id).await?;
        if creator.id != actor {
            return Err(SocialError::Forbidden(
                "Only the creator can delete this post".to_string(),
            ));
        }
        self.store.delete_post(post_id).await?;
        tracing::info!(%post_id, %actor, "Deleted post");
        Ok(())
    }

    /// Posts created by `owner`, newest first
    pub async fn user_posts(
        &self,
        owner: Uuid,
        viewer: Uuid,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedPost>> {
        let creator = self.require_user(owner).await?;
        let (posts, total) = self
            .store
            .list_user_posts(owner, page.limit(), page.offset())
            .await?;
        let pairs = posts.into_iter().map(|p| (p, creator.clone())).collect();
        let results = enrich_posts(self.store.as_ref(), viewer, pairs).await?;
        Ok(PageResult::from_store_page(page, results, total))
    }

    // ========================================================================
    // Comments
    // ========================================================================

    pub async fn create_comment(
        &self,
        author: Uuid,
        req: CreateCommentRequest,
    ) -> Result<EnrichedComment> {
        // Shape checks come before any store access
        let anchor = CommentAnchor::from_parts(req.post_id, req.parent_id)?;
        let comment = CommentNode::new(req.text)?;

        let creator = self.require_user(author).await?;
        self.require_anchor(anchor).await?;

        self.store.create_comment(author, &comment, anchor).await?;
        tracing::debug!(comment_id = %comment.id, ?anchor, "Created comment");
        enrich_comment(self.store.as_ref(), author, comment, &creator).await
    }

    pub async fn get_comment(&self, viewer: Uuid, comment_id: Uuid) -> Result<CommentDetail> {
        let comment = self.require_comment(comment_id).await?;
        let anchor = self
            .store
            .get_comment_anchor(comment_id)
            .await?
            .ok_or_else(|| SocialError::comment_not_found(comment_id))?;
        let creator = self.comment_creator(comment_id).await?;
        let comment = enrich_comment(self.store.as_ref(), viewer, comment, &creator).await?;
        Ok(CommentDetail { comment, anchor })
    }

    /// Delete a comment and its replies; creator only
    pub async fn delete_comment(&self, actor: Uuid, comment_id: Uuid) -> Result<()> {
        self.require_comment(comment_id).await?;
        let creator = self.comment_creator(comment_id).await?;
        if creator.id != actor {
            return Err(SocialError::Forbidden(
                "Only the creator can delete this comment".to_string(),
            ));
        }
        self.store.delete_comment(comment_id).await?;
        Ok(())
    }

    /// Top-level comments of a post, or replies of a comment; newest first
    pub async fn comments(
        &self,
        anchor: CommentAnchor,
        viewer: Uuid,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedComment>> {
        match anchor {
            CommentAnchor::Post(id) => {
                self.require_post(id).await?;
            }
            CommentAnchor::Reply(id) => {
                self.require_comment(id).await?;
            }
        }
        let (comments, total) = self
            .store
            .list_comments(anchor, page.limit(), page.offset())
            .await?;

        let results = try_join_all(comments.into_iter().map(|comment| async move {
            let creator = self.comment_creator(comment.id).await?;
            enrich_comment(self.store.as_ref(), viewer, comment, &creator).await
        }))
        .await?;
        Ok(PageResult::from_store_page(page, results, total))
    }

    async fn require_anchor(&self, anchor: CommentAnchor) -> Result<()> {
        match anchor {
            CommentAnchor::Post(post_id) => {
                self.require_post(post_id).await?;
            }
            CommentAnchor::Reply(parent_id) => {
                self.require_comment(parent_id).await?;
                if let Some(CommentAnchor::Reply(_)) =
                    self.store.get_comment_anchor(parent_id).await?
                {
                    return Err(SocialError::InvalidInput(
                        "Cannot reply to a reply".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }

    async fn require_user(&self, id: Uuid) -> Result<UserNode> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| SocialError::user_not_found(id))
    }

    async fn require_post(&self, id: Uuid) -> Result<PostNode> {
        self.store
            .get_post(id)
            .await?
            .ok_or_else(|| SocialError::post_not_found(id))
    }

    async fn require_comment(&self, id: Uuid) -> Result<CommentNode> {
        self.store
            .get_comment(id)
            .await?
            .ok_or_else(|| SocialError::comment_not_found(id))
    }

    async fn post_creator(&self, post_id: Uuid) -> Result<UserNode> {
        // A post always has exactly one creator; a missing one means a dangling post
        self.store
            .get_post_creator(post_id)
            .await?
            .ok_or_else(|| SocialError::post_not_found(post_id))
    }

    async fn comment_creator(&self, comment_id: Uuid) -> Result<UserNode> {
        self.store
            .get_comment_creator(comment_id)
            .await?
            .ok_or_else(|| SocialError::comment_not_found(comment_id))
    }
}
