//! Read-time enrichment of posts and comments (counts, viewer flags,
//! creator summaries). Counts are never cached on nodes.

use super::models::{CreatorSummary, EnrichedComment, EnrichedPost};
use crate::error::{Result, SocialError};
use crate::neo4j::models::{CommentNode, Direction, Engagement, PostNode, RelType, UserNode};
use crate::neo4j::GraphStore;
use futures::future::try_join_all;
use uuid::Uuid;

/// Comment count, like count and viewer like flag of a post
pub(crate) async fn post_engagement(
    store: &dyn GraphStore,
    post_id: Uuid,
    viewer: Uuid,
) -> Result<Engagement> {
    let (comments_count, likes_count, liked) = futures::try_join!(
        store.count_neighbors(post_id, RelType::On, Direction::Incoming),
        store.count_neighbors(post_id, RelType::Likes, Direction::Incoming),
        store.has_edge(viewer, RelType::Likes, post_id),
    )?;
    Ok(Engagement {
        comments_count,
        likes_count,
        liked,
    })
}

/// Enrich a batch of (post, creator) pairs, preserving order
pub(crate) async fn enrich_posts(
    store: &dyn GraphStore,
    viewer: Uuid,
    posts: Vec<(PostNode, UserNode)>,
) -> Result<Vec<EnrichedPost>> {
    try_join_all(posts.into_iter().map(|(post, creator)| async move {
        let engagement = post_engagement(store, post.id, viewer).await?;
        Ok::<_, SocialError>(EnrichedPost::new(post, engagement, &creator))
    }))
    .await
}

/// Enrich one comment with likes, replies, viewer flag and creator
pub(crate) async fn enrich_comment(
    store: &dyn GraphStore,
    viewer: Uuid,
    comment: CommentNode,
    creator: &UserNode,
) -> Result<EnrichedComment> {
    let (likes_count, replies_count, liked) = futures::try_join!(
        store.count_neighbors(comment.id, RelType::Likes, Direction::Incoming),
        store.count_neighbors(comment.id, RelType::ReplyTo, Direction::Incoming),
        store.has_edge(viewer, RelType::Likes, comment.id),
    )?;
    Ok(EnrichedComment {
        comment,
        likes_count,
        replies_count,
        liked,
        created_by: CreatorSummary::from(creator),
    })
}
