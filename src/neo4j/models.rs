//! Neo4j graph models for the social graph: users, posts, comments, skills
//! and the typed relationships between them.

use crate::error::SocialError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// User / Skill Nodes
// ============================================================================

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNode {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub title: Option<String>,
    pub profile_image: Option<String>,
}

impl UserNode {
    /// Create a new user, rejecting empty required fields
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Result<Self, SocialError> {
        let user = Self {
            id: Uuid::new_v4(),
            first_name: first_name.into().trim().to_string(),
            last_name: last_name.into().trim().to_string(),
            email: email.into().trim().to_lowercase(),
            password_hash: password_hash.into(),
            title: None,
            profile_image: None,
        };

        require_non_empty("first_name", &user.first_name)?;
        require_non_empty("last_name", &user.last_name)?;
        require_non_empty("email", &user.email)?;
        require_non_empty("password_hash", &user.password_hash)?;

        Ok(user)
    }
}

/// A skill label that users attach to their profile (unique by name)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    pub id: Uuid,
    pub name: String,
}

impl SkillNode {
    pub fn new(name: impl Into<String>) -> Result<Self, SocialError> {
        let name = name.into().trim().to_string();
        require_non_empty("skill name", &name)?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
        })
    }
}

/// Partial profile update applied by the store
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub title: Option<String>,
    pub profile_image: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.title.is_none()
            && self.profile_image.is_none()
    }
}

// ============================================================================
// Content Nodes
// ============================================================================

/// A post owned by exactly one user (via CREATED_POST)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostNode {
    pub id: Uuid,
    pub text: String,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostNode {
    /// Create a new post. A post needs text and/or images.
    pub fn new(text: impl Into<String>, images: Vec<String>) -> Result<Self, SocialError> {
        let text = text.into();
        if text.trim().is_empty() && images.is_empty() {
            return Err(SocialError::InvalidInput(
                "A post must have text and/or images".to_string(),
            ));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            text,
            images,
            created_at: now,
            updated_at: now,
        })
    }

    /// Override the creation time (seeding and tests)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self.updated_at = at;
        self
    }
}

/// A comment, anchored either on a post or on a top-level comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentNode {
    pub id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl CommentNode {
    pub fn new(text: impl Into<String>) -> Result<Self, SocialError> {
        let text = text.into().trim().to_string();
        if text.is_empty() {
            return Err(SocialError::InvalidInput(
                "Comment text is required".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            text,
            created_at: Utc::now(),
        })
    }

    /// Override the creation time (seeding and tests)
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}

/// The single relationship that places a comment in the content tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum CommentAnchor {
    /// `(comment)-[:ON]->(post)`
    Post(Uuid),
    /// `(comment)-[:REPLY_TO]->(parent)`
    Reply(Uuid),
}

impl CommentAnchor {
    /// Build an anchor from the two optional targets; exactly one must be set.
    pub fn from_parts(post: Option<Uuid>, parent: Option<Uuid>) -> Result<Self, SocialError> {
        match (post, parent) {
            (Some(post), None) => Ok(Self::Post(post)),
            (None, Some(parent)) => Ok(Self::Reply(parent)),
            (Some(_), Some(_)) => Err(SocialError::InvalidInput(
                "Provide either a post or a parent comment, not both".to_string(),
            )),
            (None, None) => Err(SocialError::InvalidInput(
                "Either a post or a parent comment must be provided".to_string(),
            )),
        }
    }

    pub fn target(&self) -> Uuid {
        match self {
            Self::Post(id) | Self::Reply(id) => *id,
        }
    }

    pub fn rel(&self) -> RelType {
        match self {
            Self::Post(_) => RelType::On,
            Self::Reply(_) => RelType::ReplyTo,
        }
    }
}

/// Something a user can like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LikeTarget {
    Post(Uuid),
    Comment(Uuid),
}

impl LikeTarget {
    pub fn id(&self) -> Uuid {
        match self {
            Self::Post(id) | Self::Comment(id) => *id,
        }
    }
}

// ============================================================================
// Relationships
// ============================================================================

/// Relationship types of the social graph (all directed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelType {
    /// User -> User
    Follows,
    /// User -> Post | Comment
    Likes,
    /// User -> Post
    CreatedPost,
    /// User -> Comment
    CreatedComment,
    /// Comment -> Post
    On,
    /// Comment -> Comment
    ReplyTo,
    /// User -> Skill
    HasSkill,
}

impl RelType {
    /// The Neo4j relationship type name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Follows => "FOLLOWS",
            Self::Likes => "LIKES",
            Self::CreatedPost => "CREATED_POST",
            Self::CreatedComment => "CREATED_COMMENT",
            Self::On => "ON",
            Self::ReplyTo => "REPLY_TO",
            Self::HasSkill => "HAS_SKILL",
        }
    }
}

impl std::fmt::Display for RelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction of a relationship relative to the node being expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// Engagement counters computed on read for a post or comment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub comments_count: usize,
    pub likes_count: usize,
    pub liked: bool,
}

/// Filters for the user directory listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    /// Exact title match
    pub title: Option<String>,
    /// Match users having any of these skills
    pub skills: Option<Vec<String>>,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), SocialError> {
    if value.trim().is_empty() {
        return Err(SocialError::InvalidInput(format!("{} is required", field)));
    }
    Ok(())
}
