//! In-memory mock implementation of GraphStore for testing.
//!
//! Nodes live in `tokio::sync::RwLock<HashMap<Uuid, _>>` collections and every
//! relationship is an entry of a single insertion-ordered edge list, which is
//! the adjacency-list simulation the engine is specified against.
//! Conditionally compiled with `#[cfg(test)]`.

use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

/// A stored relationship
#[derive(Debug, Clone)]
pub struct EdgeRecord {
    pub from: Uuid,
    pub rel: RelType,
    pub to: Uuid,
    pub created_at: DateTime<Utc>,
}

/// In-memory mock implementation of GraphStore for testing.
pub struct MockGraphStore {
    // Entity stores
    pub users: RwLock<HashMap<Uuid, UserNode>>,
    pub posts: RwLock<HashMap<Uuid, PostNode>>,
    pub comments: RwLock<HashMap<Uuid, CommentNode>>,
    pub skills: RwLock<HashMap<Uuid, SkillNode>>,

    // Relationships
    pub edges: RwLock<Vec<EdgeRecord>>,

    /// When set, every call fails as if the database were unreachable
    pub unavailable: AtomicBool,
}

impl Default for MockGraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            posts: RwLock::new(HashMap::new()),
            comments: RwLock::new(HashMap::new()),
            skills: RwLock::new(HashMap::new()),
            edges: RwLock::new(Vec::new()),
            unavailable: AtomicBool::new(false),
        }
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed a user into the store.
    pub async fn with_user(self, user: UserNode) -> Self {
        self.users.write().await.insert(user.id, user);
        self
    }

    /// Seed a FOLLOWS edge.
    pub async fn with_follow(self, from: Uuid, to: Uuid) -> Self {
        self.push_edge(from, RelType::Follows, to).await;
        self
    }

    /// Seed a post created by `creator_id`.
    pub async fn with_post(self, creator_id: Uuid, post: PostNode) -> Self {
        self.push_edge(creator_id, RelType::CreatedPost, post.id).await;
        self.posts.write().await.insert(post.id, post);
        self
    }

    /// Make every subsequent call fail (or recover).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of edges of a given type between two nodes
    pub async fn edge_count(&self, from: Uuid, rel: RelType, to: Uuid) -> usize {
        self.edges
            .read()
            .await
            .iter()
            .filter(|e| e.from == from && e.rel == rel && e.to == to)
            .count()
    }

    async fn push_edge(&self, from: Uuid, rel: RelType, to: Uuid) {
        self.edges.write().await.push(EdgeRecord {
            from,
            rel,
            to,
            created_at: Utc::now(),
        });
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(anyhow!("mock graph store unavailable"));
        }
        Ok(())
    }

    async fn endpoints(&self, node_id: Uuid, rel: RelType, direction: Direction) -> Vec<Uuid> {
        self.edges
            .read()
            .await
            .iter()
            .filter_map(|e| match direction {
                Direction::Outgoing if e.rel == rel && e.from == node_id => Some(e.to),
                Direction::Incoming if e.rel == rel && e.to == node_id => Some(e.from),
                _ => None,
            })
            .collect()
    }

    async fn users_by_ids(&self, ids: &[Uuid]) -> Vec<UserNode> {
        let users = self.users.read().await;
        ids.iter().filter_map(|id| users.get(id).cloned()).collect()
    }

    async fn remove_nodes_edges(&self, ids: &HashSet<Uuid>) {
        self.edges
            .write()
            .await
            .retain(|e| !ids.contains(&e.from) && !ids.contains(&e.to));
    }

    async fn comment_subtree(&self, root: Uuid) -> HashSet<Uuid> {
        let mut ids = HashSet::from([root]);
        ids.extend(self.endpoints(root, RelType::ReplyTo, Direction::Incoming).await);
        ids
    }
}

fn slice<T>(items: Vec<T>, limit: usize, offset: usize) -> (Vec<T>, usize) {
    let total = items.len();
    let page = items.into_iter().skip(offset).take(limit).collect();
    (page, total)
}

fn sort_by_first_name(users: &mut [UserNode]) {
    users.sort_by(|a, b| a.first_name.cmp(&b.first_name).then(a.id.cmp(&b.id)));
}

#[async_trait]
impl GraphStore for MockGraphStore {
    // ========================================================================
    // User operations
    // ========================================================================

    async fn create_user(&self, user: &UserNode) -> Result<bool> {
        self.check_available()?;
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.insert(user.id, user.clone());
        Ok(true)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<UserNode>> {
        self.check_available()?;
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<()> {
        self.check_available()?;
        if let Some(user) = self.users.write().await.get_mut(&id) {
            if let Some(ref first_name) = update.first_name {
                user.first_name = first_name.clone();
            }
            if let Some(ref last_name) = update.last_name {
                user.last_name = last_name.clone();
            }
            if let Some(ref title) = update.title {
                user.title = Some(title.clone());
            }
            if let Some(ref image) = update.profile_image {
                user.profile_image = Some(image.clone());
            }
        }
        Ok(())
    }

    async fn list_users_filtered(
        &self,
        exclude: Uuid,
        filter: &UserFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<UserNode>, usize)> {
        self.check_available()?;
        let candidates: Vec<UserNode> = self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.id != exclude)
            .filter(|u| match filter.title {
                Some(ref title) => u.title.as_deref() == Some(title.as_str()),
                None => true,
            })
            .cloned()
            .collect();

        let mut matched = Vec::with_capacity(candidates.len());
        for user in candidates {
            if let Some(ref wanted) = filter.skills {
                let skills = self.get_user_skills(user.id).await?;
                if !skills.iter().any(|s| wanted.contains(s)) {
                    continue;
                }
            }
            matched.push(user);
        }
        sort_by_first_name(&mut matched);
        Ok(slice(matched, limit, offset))
    }

    async fn list_follow_users(
        &self,
        user_id: Uuid,
        direction: Direction,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<UserNode>, usize)> {
        self.check_available()?;
        let ids = self.endpoints(user_id, RelType::Follows, direction).await;
        let mut users = self.users_by_ids(&ids).await;
        sort_by_first_name(&mut users);
        Ok(slice(users, limit, offset))
    }

    // ========================================================================
    // Skill operations
    // ========================================================================

    async fn create_skill(&self, skill: &SkillNode) -> Result<Uuid> {
        self.check_available()?;
        let mut skills = self.skills.write().await;
        if let Some(existing) = skills.values().find(|s| s.name == skill.name) {
            return Ok(existing.id);
        }
        skills.insert(skill.id, skill.clone());
        Ok(skill.id)
    }

    async fn get_user_skills(&self, user_id: Uuid) -> Result<Vec<String>> {
        self.check_available()?;
        let mut links: Vec<Uuid> = self
            .edges
            .read()
            .await
            .iter()
            .filter(|e| e.rel == RelType::HasSkill && e.from == user_id)
            .map(|e| e.to)
            .collect();
        // Edge list is insertion ordered: newest link last
        links.reverse();
        let skills = self.skills.read().await;
        Ok(links
            .into_iter()
            .filter_map(|id| skills.get(&id).map(|s| s.name.clone()))
            .collect())
    }

    // ========================================================================
    // Post operations
    // ========================================================================

    async fn create_post(&self, creator_id: Uuid, post: &PostNode) -> Result<()> {
        self.check_available()?;
        self.posts.write().await.insert(post.id, post.clone());
        self.push_edge(creator_id, RelType::CreatedPost, post.id).await;
        Ok(())
    }

    async fn get_post(&self, id: Uuid) -> Result<Option<PostNode>> {
        self.check_available()?;
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn get_post_creator(&self, post_id: Uuid) -> Result<Option<UserNode>> {
        self.check_available()?;
        let creators = self
            .endpoints(post_id, RelType::CreatedPost, Direction::Incoming)
            .await;
        Ok(self.users_by_ids(&creators).await.into_iter().next())
    }

    async fn update_post(
        &self,
        id: Uuid,
        text: Option<String>,
        images: Option<Vec<String>>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        self.check_available()?;
        if let Some(post) = self.posts.write().await.get_mut(&id) {
            if let Some(text) = text {
                post.text = text;
            }
            if let Some(images) = images {
                post.images = images;
            }
            post.updated_at = updated_at;
        }
        Ok(())
    }

    async fn delete_post(&self, id: Uuid) -> Result<()> {
        self.check_available()?;
        let mut doomed = HashSet::from([id]);
        for comment_id in self.endpoints(id, RelType::On, Direction::Incoming).await {
            doomed.extend(self.comment_subtree(comment_id).await);
        }
        self.posts.write().await.remove(&id);
        {
            let mut comments = self.comments.write().await;
            for comment_id in &doomed {
                comments.remove(comment_id);
            }
        }
        self.remove_nodes_edges(&doomed).await;
        Ok(())
    }

    async fn list_user_posts(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<PostNode>, usize)> {
        self.check_available()?;
        let ids = self
            .endpoints(user_id, RelType::CreatedPost, Direction::Outgoing)
            .await;
        let posts = self.posts.read().await;
        let mut items: Vec<PostNode> = ids.iter().filter_map(|id| posts.get(id).cloned()).collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(slice(items, limit, offset))
    }

    async fn list_posts_by_creators(&self, creator_ids: &[Uuid]) -> Result<Vec<(Uuid, PostNode)>> {
        self.check_available()?;
        let posts = self.posts.read().await;
        Ok(self
            .edges
            .read()
            .await
            .iter()
            .filter(|e| e.rel == RelType::CreatedPost && creator_ids.contains(&e.from))
            .filter_map(|e| posts.get(&e.to).map(|p| (e.from, p.clone())))
            .collect())
    }

    async fn count_posts_by_creators(&self, creator_ids: &[Uuid]) -> Result<usize> {
        self.check_available()?;
        let posts = self.posts.read().await;
        Ok(self
            .edges
            .read()
            .await
            .iter()
            .filter(|e| {
                e.rel == RelType::CreatedPost
                    && creator_ids.contains(&e.from)
                    && posts.contains_key(&e.to)
            })
            .count())
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    async fn create_comment(
        &self,
        creator_id: Uuid,
        comment: &CommentNode,
        anchor: CommentAnchor,
    ) -> Result<()> {
        self.check_available()?;
        self.comments
            .write()
            .await
            .insert(comment.id, comment.clone());
        self.push_edge(creator_id, RelType::CreatedComment, comment.id)
            .await;
        self.push_edge(comment.id, anchor.rel(), anchor.target()).await;
        Ok(())
    }

    async fn get_comment(&self, id: Uuid) -> Result<Option<CommentNode>> {
        self.check_available()?;
        Ok(self.comments.read().await.get(&id).cloned())
    }

    async fn get_comment_anchor(&self, id: Uuid) -> Result<Option<CommentAnchor>> {
        self.check_available()?;
        Ok(self.edges.read().await.iter().find_map(|e| {
            if e.from != id {
                return None;
            }
            match e.rel {
                RelType::On => Some(CommentAnchor::Post(e.to)),
                RelType::ReplyTo => Some(CommentAnchor::Reply(e.to)),
                _ => None,
            }
        }))
    }

    async fn get_comment_creator(&self, id: Uuid) -> Result<Option<UserNode>> {
        self.check_available()?;
        let creators = self
            .endpoints(id, RelType::CreatedComment, Direction::Incoming)
            .await;
        Ok(self.users_by_ids(&creators).await.into_iter().next())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<()> {
        self.check_available()?;
        let doomed = self.comment_subtree(id).await;
        {
            let mut comments = self.comments.write().await;
            for comment_id in &doomed {
                comments.remove(comment_id);
            }
        }
        self.remove_nodes_edges(&doomed).await;
        Ok(())
    }

    async fn list_comments(
        &self,
        anchor: CommentAnchor,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<CommentNode>, usize)> {
        self.check_available()?;
        let ids = self
            .endpoints(anchor.target(), anchor.rel(), Direction::Incoming)
            .await;
        let comments = self.comments.read().await;
        let mut items: Vec<CommentNode> = ids
            .iter()
            .filter_map(|id| comments.get(id).cloned())
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(slice(items, limit, offset))
    }

    // ========================================================================
    // Adjacency operations
    // ========================================================================

    async fn neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> Result<Vec<Uuid>> {
        self.check_available()?;
        Ok(self.endpoints(node_id, rel, direction).await)
    }

    async fn count_neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> Result<usize> {
        self.check_available()?;
        Ok(self.endpoints(node_id, rel, direction).await.len())
    }

    async fn has_edge(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool> {
        self.check_available()?;
        Ok(self.edge_count(from, rel, to).await > 0)
    }

    async fn create_edge_if_absent(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool> {
        self.check_available()?;
        // Check and insert under one write lock so concurrent toggles stay idempotent
        let mut edges = self.edges.write().await;
        if edges
            .iter()
            .any(|e| e.from == from && e.rel == rel && e.to == to)
        {
            return Ok(false);
        }
        edges.push(EdgeRecord {
            from,
            rel,
            to,
            created_at: Utc::now(),
        });
        Ok(true)
    }

    async fn delete_edge_if_present(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool> {
        self.check_available()?;
        let mut edges = self.edges.write().await;
        let before = edges.len();
        edges.retain(|e| !(e.from == from && e.rel == rel && e.to == to));
        Ok(edges.len() != before)
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;

    #[tokio::test]
    async fn test_create_edge_if_absent_is_idempotent() {
        let store = MockGraphStore::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(store
            .create_edge_if_absent(a, RelType::Follows, b)
            .await
            .unwrap());
        assert!(!store
            .create_edge_if_absent(a, RelType::Follows, b)
            .await
            .unwrap());
        assert_eq!(store.edge_count(a, RelType::Follows, b).await, 1);
        // Direction matters
        assert!(!store.has_edge(b, RelType::Follows, a).await.unwrap());
    }

    #[tokio::test]
    async fn test_neighbors_by_direction() {
        let alice = test_user("Alice");
        let bob = test_user("Bob");
        let store = MockGraphStore::new()
            .with_user(alice.clone())
            .await
            .with_user(bob.clone())
            .await
            .with_follow(alice.id, bob.id)
            .await;

        let out = store
            .neighbors(alice.id, RelType::Follows, Direction::Outgoing)
            .await
            .unwrap();
        let inc = store
            .neighbors(bob.id, RelType::Follows, Direction::Incoming)
            .await
            .unwrap();
        assert_eq!(out, vec![bob.id]);
        assert_eq!(inc, vec![alice.id]);
    }

    #[tokio::test]
    async fn test_delete_post_removes_comment_tree() {
        let alice = test_user("Alice");
        let post = test_post("hello");
        let store = MockGraphStore::new()
            .with_user(alice.clone())
            .await
            .with_post(alice.id, post.clone())
            .await;

        let top = CommentNode::new("top").unwrap();
        let reply = CommentNode::new("reply").unwrap();
        store
            .create_comment(alice.id, &top, CommentAnchor::Post(post.id))
            .await
            .unwrap();
        store
            .create_comment(alice.id, &reply, CommentAnchor::Reply(top.id))
            .await
            .unwrap();

        store.delete_post(post.id).await.unwrap();

        assert!(store.get_post(post.id).await.unwrap().is_none());
        assert!(store.get_comment(top.id).await.unwrap().is_none());
        assert!(store.get_comment(reply.id).await.unwrap().is_none());
        assert!(store.edges.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_user_reports_taken_email() {
        let store = MockGraphStore::new();
        let first = test_user("Ann");
        let mut second = test_user("Other");
        second.email = first.email.clone();

        assert!(store.create_user(&first).await.unwrap());
        assert!(!store.create_user(&second).await.unwrap());
        assert!(store.get_user(second.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_skill_returns_stored_id() {
        let store = MockGraphStore::new();
        let original = SkillNode::new("rust").unwrap();
        let duplicate = SkillNode::new("rust").unwrap();
        assert_ne!(original.id, duplicate.id);

        assert_eq!(store.create_skill(&original).await.unwrap(), original.id);
        assert_eq!(store.create_skill(&duplicate).await.unwrap(), original.id);
        assert_eq!(store.skills.read().await.len(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails() {
        let store = MockGraphStore::new();
        store.set_unavailable(true);
        assert!(store.get_user(Uuid::new_v4()).await.is_err());
        store.set_unavailable(false);
        assert!(store.get_user(Uuid::new_v4()).await.is_ok());
    }
}
