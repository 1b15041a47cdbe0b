//! Output and request DTOs of the social engine.
//!
//! Derived fields (counts, viewer flags, creator summaries) are carried in
//! these explicit structs next to the entity, never grafted onto it.

use crate::neo4j::models::{CommentAnchor, CommentNode, Engagement, PostNode, UserNode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public summary of a content creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorSummary {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
    pub title: Option<String>,
}

impl From<&UserNode> for CreatorSummary {
    fn from(user: &UserNode) -> Self {
        Self {
            id: user.id,
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            profile_image: user.profile_image.clone(),
            title: user.title.clone(),
        }
    }
}

/// A post with its read-time engagement and creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedPost {
    #[serde(flatten)]
    pub post: PostNode,
    pub comments_count: usize,
    pub likes_count: usize,
    pub liked: bool,
    pub created_by: CreatorSummary,
}

impl EnrichedPost {
    pub fn new(post: PostNode, engagement: Engagement, creator: &UserNode) -> Self {
        Self {
            post,
            comments_count: engagement.comments_count,
            likes_count: engagement.likes_count,
            liked: engagement.liked,
            created_by: CreatorSummary::from(creator),
        }
    }
}

/// A feed entry: an enriched post plus its ranking priority
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(flatten)]
    pub post: EnrichedPost,
    pub priority: f64,
}

/// A user entry in followers / following lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedUser {
    #[serde(flatten)]
    pub user: CreatorSummary,
    pub followers_count: usize,
    pub following_count: usize,
    pub is_following: bool,
    pub follows_me: bool,
}

/// A user entry in the user directory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectoryUser {
    #[serde(flatten)]
    pub user: CreatorSummary,
    pub email: String,
    pub is_following: bool,
    pub follows_me: bool,
    pub skills: Vec<String>,
}

/// A suggested connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub user: CreatorSummary,
    /// 2 or 3 FOLLOWS hops away
    pub degree: u8,
    pub follows_me: bool,
}

/// Full profile of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(flatten)]
    pub user: UserNode,
    pub followers_count: usize,
    pub following_count: usize,
    pub skills: Vec<String>,
}

/// A comment with its read-time engagement and creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedComment {
    #[serde(flatten)]
    pub comment: CommentNode,
    pub likes_count: usize,
    pub replies_count: usize,
    pub liked: bool,
    pub created_by: CreatorSummary,
}

/// A single comment with the node it is attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentDetail {
    #[serde(flatten)]
    pub comment: EnrichedComment,
    pub anchor: CommentAnchor,
}

// ============================================================================
// Requests
// ============================================================================

/// Request to register a user node (credentials are hashed upstream)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub title: Option<String>,
    pub profile_image: Option<String>,
}

/// Partial profile update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub profile_image: Option<String>,
    /// Skill names to attach (existing skills are kept)
    pub skills: Option<Vec<String>>,
}

/// Request to create a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Request to edit a post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub text: Option<String>,
    pub images: Option<Vec<String>>,
}

/// Request to create a comment; exactly one of `post_id` / `parent_id`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    pub post_id: Option<Uuid>,
    pub parent_id: Option<Uuid>,
}

// ============================================================================
// Action outcomes
// ============================================================================

/// Result of `like`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeOutcome {
    Created,
    AlreadyLiked,
}

/// Result of `unlike`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlikeOutcome {
    Removed,
    NotLiked,
}

/// Result of `toggle_like`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LikeToggle {
    Liked,
    Unliked,
}

/// Connection degree between two users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DegreeResponse {
    pub viewer: Uuid,
    pub target: Uuid,
    /// 0 = same user, 1..=3 = hops, 4 = not connected within 3 hops
    pub degree: u8,
}

/// Age of a timestamp relative to `now`, in fractional seconds
pub(crate) fn age_seconds(created_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - created_at).num_milliseconds() as f64 / 1000.0
}
