//! Neo4j client for the social graph

use super::models::*;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use neo4rs::{query, Graph, Query};
use std::sync::Arc;
use uuid::Uuid;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

/// Fixed-width UTC timestamp, so string order matches time order
fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    raw.parse()
        .with_context(|| format!("invalid timestamp {:?}", raw))
}

/// Node labels at the (source, target) ends of a relationship type
fn endpoint_labels(rel: RelType) -> (&'static str, &'static str) {
    match rel {
        RelType::Follows => (":User", ":User"),
        RelType::Likes => (":User", ":Post|Comment"),
        RelType::CreatedPost => (":User", ":Post"),
        RelType::CreatedComment => (":User", ":Comment"),
        RelType::On => (":Comment", ":Post"),
        RelType::ReplyTo => (":Comment", ":Comment"),
        RelType::HasSkill => (":User", ":Skill"),
    }
}

/// `(n {id: $id})` on the expanded side, `(m)` on the neighbor side
fn neighbor_pattern(rel: RelType, direction: Direction) -> String {
    let (src, dst) = endpoint_labels(rel);
    match direction {
        Direction::Outgoing => format!("(n{} {{id: $id}})-[r:{}]->(m{})", src, rel, dst),
        Direction::Incoming => format!("(n{} {{id: $id}})<-[r:{}]-(m{})", dst, rel, src),
    }
}

/// `(a {id: $from})-[r:REL]->(b {id: $to})`
fn edge_pattern(rel: RelType) -> String {
    let (src, dst) = endpoint_labels(rel);
    format!(
        "(a{} {{id: $from}})-[r:{}]->(b{} {{id: $to}})",
        src, rel, dst
    )
}

/// Cypher integer for SKIP/LIMIT; offsets past `i64::MAX` saturate and yield no rows
fn int_param(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn ids_param(ids: &[Uuid]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = [
            "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
            "CREATE CONSTRAINT user_email IF NOT EXISTS FOR (u:User) REQUIRE u.email IS UNIQUE",
            "CREATE CONSTRAINT post_id IF NOT EXISTS FOR (p:Post) REQUIRE p.id IS UNIQUE",
            "CREATE CONSTRAINT comment_id IF NOT EXISTS FOR (c:Comment) REQUIRE c.id IS UNIQUE",
            "CREATE CONSTRAINT skill_id IF NOT EXISTS FOR (s:Skill) REQUIRE s.id IS UNIQUE",
            "CREATE CONSTRAINT skill_name IF NOT EXISTS FOR (s:Skill) REQUIRE s.name IS UNIQUE",
        ];

        let indexes = [
            "CREATE INDEX user_first_name IF NOT EXISTS FOR (u:User) ON (u.first_name)",
            "CREATE INDEX user_title IF NOT EXISTS FOR (u:User) ON (u.title)",
            "CREATE INDEX post_created_at IF NOT EXISTS FOR (p:Post) ON (p.created_at)",
            "CREATE INDEX comment_created_at IF NOT EXISTS FOR (c:Comment) ON (c.created_at)",
        ];

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    /// Execute a parameterized Cypher query and collect every row
    pub(crate) async fn execute_with_params(&self, q: Query) -> Result<Vec<neo4rs::Row>> {
        let mut result = self.graph.execute(q).await?;
        let mut rows = Vec::new();
        while let Some(row) = result.next().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a query returning a single `total` integer column
    async fn count(&self, q: Query) -> Result<usize> {
        let rows = self.execute_with_params(q).await?;
        let total = match rows.first() {
            Some(row) => row.get::<i64>("total")?,
            None => 0,
        };
        Ok(total.max(0) as usize)
    }

    async fn ping(&self) -> Result<()> {
        self.graph.run(query("RETURN 1")).await?;
        Ok(())
    }

    /// Whether Neo4j answers a trivial query
    pub async fn health_check(&self) -> Result<bool> {
        match self.ping().await {
            Ok(()) => Ok(true),
            Err(e) => {
                tracing::warn!("Neo4j health check failed: {}", e);
                Ok(false)
            }
        }
    }

    // ========================================================================
    // User operations
    // ========================================================================

    /// Create a new user
    /// Create a user keyed by email; `false` when the email is already registered
    pub async fn create_user(&self, user: &UserNode) -> Result<bool> {
        let q = query(
            r#"
            MERGE (u:User {email: $email})
            ON CREATE SET
                u.id = $id,
                u.first_name = $first_name,
                u.last_name = $last_name,
                u.password_hash = $password_hash,
                u.title = $title,
                u.profile_image = $profile_image
            RETURN u.id AS id
            "#,
        )
        .param("id", user.id.to_string())
        .param("first_name", user.first_name.clone())
        .param("last_name", user.last_name.clone())
        .param("email", user.email.clone())
        .param("password_hash", user.password_hash.clone())
        .param("title", user.title.clone().unwrap_or_default())
        .param("profile_image", user.profile_image.clone().unwrap_or_default());

        let rows = self.execute_with_params(q).await?;
        let row = rows.first().ok_or_else(|| anyhow!("user merge returned no row"))?;
        let stored: String = row.get("id")?;
        Ok(stored == user.id.to_string())
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: Uuid) -> Result<Option<UserNode>> {
        let q = query("MATCH (u:User {id: $id}) RETURN u").param("id", id.to_string());
        self.first_user(q).await
    }

    /// Apply a partial profile update
    pub async fn update_user(&self, id: Uuid, update: &UserUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let mut sets = Vec::new();
        if update.first_name.is_some() {
            sets.push("u.first_name = $first_name");
        }
        if update.last_name.is_some() {
            sets.push("u.last_name = $last_name");
        }
        if update.title.is_some() {
            sets.push("u.title = $title");
        }
        if update.profile_image.is_some() {
            sets.push("u.profile_image = $profile_image");
        }

        let cypher = format!("MATCH (u:User {{id: $id}}) SET {}", sets.join(", "));
        let mut q = query(&cypher).param("id", id.to_string());
        if let Some(ref first_name) = update.first_name {
            q = q.param("first_name", first_name.clone());
        }
        if let Some(ref last_name) = update.last_name {
            q = q.param("last_name", last_name.clone());
        }
        if let Some(ref title) = update.title {
            q = q.param("title", title.clone());
        }
        if let Some(ref image) = update.profile_image {
            q = q.param("profile_image", image.clone());
        }
        self.graph.run(q).await?;
        Ok(())
    }

    /// List users except `exclude`, filtered by title and any-of skills
    pub async fn list_users_filtered(
        &self,
        exclude: Uuid,
        filter: &UserFilter,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<UserNode>, usize)> {
        let mut conditions = vec!["u.id <> $exclude"];
        if filter.title.is_some() {
            conditions.push("u.title = $title");
        }
        if filter.skills.is_some() {
            conditions.push("EXISTS { MATCH (u)-[:HAS_SKILL]->(s:Skill) WHERE s.name IN $skills }");
        }
        let where_clause = conditions.join(" AND ");

        let with_params = |cypher: String| {
            let mut q = query(&cypher).param("exclude", exclude.to_string());
            if let Some(ref title) = filter.title {
                q = q.param("title", title.clone());
            }
            if let Some(ref skills) = filter.skills {
                q = q.param("skills", skills.clone());
            }
            q
        };

        let total = self
            .count(with_params(format!(
                "MATCH (u:User) WHERE {} RETURN count(u) AS total",
                where_clause
            )))
            .await?;

        let q = with_params(format!(
            "MATCH (u:User) WHERE {} RETURN u ORDER BY u.first_name, u.id SKIP $offset LIMIT $limit",
            where_clause
        ))
        .param("offset", int_param(offset))
        .param("limit", int_param(limit));
        let users = self.collect_users(q).await?;

        Ok((users, total))
    }

    /// Followers (incoming) or followings (outgoing) of a user, by first name
    pub async fn list_follow_users(
        &self,
        user_id: Uuid,
        direction: Direction,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<UserNode>, usize)> {
        let pattern = neighbor_pattern(RelType::Follows, direction);

        let total = self
            .count(
                query(&format!("MATCH {} RETURN count(m) AS total", pattern))
                    .param("id", user_id.to_string()),
            )
            .await?;

        let q = query(&format!(
            "MATCH {} RETURN m AS u ORDER BY m.first_name, m.id SKIP $offset LIMIT $limit",
            pattern
        ))
        .param("id", user_id.to_string())
        .param("offset", int_param(offset))
        .param("limit", int_param(limit));
        let users = self.collect_users(q).await?;

        Ok((users, total))
    }

    async fn first_user(&self, q: Query) -> Result<Option<UserNode>> {
        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("u")?;
            Ok(Some(self.node_to_user(&node)?))
        } else {
            Ok(None)
        }
    }

    async fn collect_users(&self, q: Query) -> Result<Vec<UserNode>> {
        self.execute_with_params(q)
            .await?
            .iter()
            .map(|row| {
                let node: neo4rs::Node = row.get("u")?;
                self.node_to_user(&node)
            })
            .collect()
    }

    /// Parse a Neo4j Node into a UserNode
    fn node_to_user(&self, node: &neo4rs::Node) -> Result<UserNode> {
        let non_empty = |key: &str| {
            node.get::<String>(key)
                .ok()
                .filter(|value| !value.is_empty())
        };
        Ok(UserNode {
            id: node.get::<String>("id")?.parse()?,
            first_name: node.get("first_name")?,
            last_name: node.get("last_name")?,
            email: node.get("email")?,
            password_hash: node.get("password_hash").unwrap_or_default(),
            title: non_empty("title"),
            profile_image: non_empty("profile_image"),
        })
    }

    // ========================================================================
    // Skill operations
    // ========================================================================

    /// Create a skill; an existing skill with the same name is kept and its id returned
    pub async fn create_skill(&self, skill: &SkillNode) -> Result<Uuid> {
        let q = query("MERGE (s:Skill {name: $name}) ON CREATE SET s.id = $id RETURN s.id AS id")
            .param("name", skill.name.clone())
            .param("id", skill.id.to_string());
        let rows = self.execute_with_params(q).await?;
        let row = rows.first().ok_or_else(|| anyhow!("skill merge returned no row"))?;
        Ok(row.get::<String>("id")?.parse()?)
    }

    /// Skill names of a user, most recently attached first
    pub async fn get_user_skills(&self, user_id: Uuid) -> Result<Vec<String>> {
        let q = query(
            r#"
            MATCH (u:User {id: $id})-[r:HAS_SKILL]->(s:Skill)
            RETURN s.name AS name
            ORDER BY r.created_at DESC
            "#,
        )
        .param("id", user_id.to_string());
        self.execute_with_params(q)
            .await?
            .iter()
            .map(|row| Ok(row.get::<String>("name")?))
            .collect()
    }

    // ========================================================================
    // Post operations
    // ========================================================================

    /// Create a post with its CREATED_POST edge
    pub async fn create_post(&self, creator_id: Uuid, post: &PostNode) -> Result<()> {
        let q = query(
            r#"
            MATCH (u:User {id: $creator_id})
            CREATE (p:Post {
                id: $id,
                text: $text,
                images: $images,
                created_at: $created_at,
                updated_at: $updated_at
            })
            CREATE (u)-[:CREATED_POST {created_at: $created_at}]->(p)
            RETURN p.id AS id
            "#,
        )
        .param("creator_id", creator_id.to_string())
        .param("id", post.id.to_string())
        .param("text", post.text.clone())
        .param("images", post.images.clone())
        .param("created_at", ts(post.created_at))
        .param("updated_at", ts(post.updated_at));

        let rows = self.execute_with_params(q).await?;
        if rows.is_empty() {
            return Err(anyhow!("creator {} does not exist", creator_id));
        }
        Ok(())
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Option<PostNode>> {
        let q = query("MATCH (p:Post {id: $id}) RETURN p").param("id", id.to_string());
        let rows = self.execute_with_params(q).await?;
        match rows.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("p")?;
                Ok(Some(self.node_to_post(&node)?))
            }
            None => Ok(None),
        }
    }

    pub async fn get_post_creator(&self, post_id: Uuid) -> Result<Option<UserNode>> {
        let q = query("MATCH (u:User)-[:CREATED_POST]->(p:Post {id: $id}) RETURN u LIMIT 1")
            .param("id", post_id.to_string());
        self.first_user(q).await
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        text: Option<String>,
        images: Option<Vec<String>>,
        updated_at: DateTime<Utc>,
    ) -> Result<()> {
        let mut sets = vec!["p.updated_at = $updated_at"];
        if text.is_some() {
            sets.push("p.text = $text");
        }
        if images.is_some() {
            sets.push("p.images = $images");
        }
        let cypher = format!("MATCH (p:Post {{id: $id}}) SET {}", sets.join(", "));
        let mut q = query(&cypher)
            .param("id", id.to_string())
            .param("updated_at", ts(updated_at));
        if let Some(text) = text {
            q = q.param("text", text);
        }
        if let Some(images) = images {
            q = q.param("images", images);
        }
        self.graph.run(q).await?;
        Ok(())
    }

    /// Delete a post, its comments and their replies
    pub async fn delete_post(&self, id: Uuid) -> Result<()> {
        let q = query(
            r#"
            MATCH (p:Post {id: $id})
            OPTIONAL MATCH (c:Comment)-[:ON]->(p)
            OPTIONAL MATCH (r:Comment)-[:REPLY_TO]->(c)
            DETACH DELETE r, c, p
            "#,
        )
        .param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }

    pub async fn list_user_posts(
        &self,
        user_id: Uuid,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<PostNode>, usize)> {
        let total = self
            .count(
                query("MATCH (:User {id: $id})-[:CREATED_POST]->(p:Post) RETURN count(p) AS total")
                    .param("id", user_id.to_string()),
            )
            .await?;

        let q = query(
            r#"
            MATCH (:User {id: $id})-[:CREATED_POST]->(p:Post)
            RETURN p
            ORDER BY p.created_at DESC, p.id
            SKIP $offset LIMIT $limit
            "#,
        )
        .param("id", user_id.to_string())
        .param("offset", int_param(offset))
        .param("limit", int_param(limit));

        let posts = self
            .execute_with_params(q)
            .await?
            .iter()
            .map(|row| {
                let node: neo4rs::Node = row.get("p")?;
                self.node_to_post(&node)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((posts, total))
    }

    pub async fn list_posts_by_creators(
        &self,
        creator_ids: &[Uuid],
    ) -> Result<Vec<(Uuid, PostNode)>> {
        if creator_ids.is_empty() {
            return Ok(Vec::new());
        }
        let q = query(
            r#"
            MATCH (u:User)-[:CREATED_POST]->(p:Post)
            WHERE u.id IN $ids
            RETURN u.id AS creator_id, p
            "#,
        )
        .param("ids", ids_param(creator_ids));

        self.execute_with_params(q)
            .await?
            .iter()
            .map(|row| {
                let creator: Uuid = row.get::<String>("creator_id")?.parse()?;
                let node: neo4rs::Node = row.get("p")?;
                Ok((creator, self.node_to_post(&node)?))
            })
            .collect()
    }

    pub async fn count_posts_by_creators(&self, creator_ids: &[Uuid]) -> Result<usize> {
        if creator_ids.is_empty() {
            return Ok(0);
        }
        self.count(
            query(
                r#"
                MATCH (u:User)-[:CREATED_POST]->(p:Post)
                WHERE u.id IN $ids
                RETURN count(p) AS total
                "#,
            )
            .param("ids", ids_param(creator_ids)),
        )
        .await
    }

    fn node_to_post(&self, node: &neo4rs::Node) -> Result<PostNode> {
        let created_at = parse_ts(&node.get::<String>("created_at")?)?;
        Ok(PostNode {
            id: node.get::<String>("id")?.parse()?,
            text: node.get("text").unwrap_or_default(),
            images: node.get("images").unwrap_or_default(),
            created_at,
            updated_at: node
                .get::<String>("updated_at")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(created_at),
        })
    }

    // ========================================================================
    // Comment operations
    // ========================================================================

    /// Create a comment with its CREATED_COMMENT and anchor edges
    pub async fn create_comment(
        &self,
        creator_id: Uuid,
        comment: &CommentNode,
        anchor: CommentAnchor,
    ) -> Result<()> {
        let (_, target_label) = endpoint_labels(anchor.rel());
        let cypher = format!(
            r#"
            MATCH (u:User {{id: $creator_id}}), (t{} {{id: $target_id}})
            CREATE (c:Comment {{id: $id, text: $text, created_at: $created_at}})
            CREATE (u)-[:CREATED_COMMENT {{created_at: $created_at}}]->(c)
            CREATE (c)-[:{} {{created_at: $created_at}}]->(t)
            RETURN c.id AS id
            "#,
            target_label,
            anchor.rel()
        );
        let q = query(&cypher)
            .param("creator_id", creator_id.to_string())
            .param("target_id", anchor.target().to_string())
            .param("id", comment.id.to_string())
            .param("text", comment.text.clone())
            .param("created_at", ts(comment.created_at));

        let rows = self.execute_with_params(q).await?;
        if rows.is_empty() {
            return Err(anyhow!(
                "creator {} or anchor {} does not exist",
                creator_id,
                anchor.target()
            ));
        }
        Ok(())
    }

    pub async fn get_comment(&self, id: Uuid) -> Result<Option<CommentNode>> {
        let q = query("MATCH (c:Comment {id: $id}) RETURN c").param("id", id.to_string());
        let rows = self.execute_with_params(q).await?;
        match rows.first() {
            Some(row) => {
                let node: neo4rs::Node = row.get("c")?;
                Ok(Some(self.node_to_comment(&node)?))
            }
            None => Ok(None),
        }
    }

    pub async fn get_comment_anchor(&self, id: Uuid) -> Result<Option<CommentAnchor>> {
        let q = query(
            r#"
            MATCH (c:Comment {id: $id})-[r:ON|REPLY_TO]->(t)
            RETURN type(r) AS rel, t.id AS target
            LIMIT 1
            "#,
        )
        .param("id", id.to_string());
        let rows = self.execute_with_params(q).await?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let target: Uuid = row.get::<String>("target")?.parse()?;
        let rel: String = row.get("rel")?;
        match rel.as_str() {
            "ON" => Ok(Some(CommentAnchor::Post(target))),
            "REPLY_TO" => Ok(Some(CommentAnchor::Reply(target))),
            other => Err(anyhow!("unexpected anchor relationship {}", other)),
        }
    }

    pub async fn get_comment_creator(&self, id: Uuid) -> Result<Option<UserNode>> {
        let q = query("MATCH (u:User)-[:CREATED_COMMENT]->(c:Comment {id: $id}) RETURN u LIMIT 1")
            .param("id", id.to_string());
        self.first_user(q).await
    }

    /// Delete a comment and its replies
    pub async fn delete_comment(&self, id: Uuid) -> Result<()> {
        let q = query(
            r#"
            MATCH (c:Comment {id: $id})
            OPTIONAL MATCH (r:Comment)-[:REPLY_TO]->(c)
            DETACH DELETE r, c
            "#,
        )
        .param("id", id.to_string());
        self.graph.run(q).await?;
        Ok(())
    }

    pub async fn list_comments(
        &self,
        anchor: CommentAnchor,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<CommentNode>, usize)> {
        let pattern = neighbor_pattern(anchor.rel(), Direction::Incoming);

        let total = self
            .count(
                query(&format!("MATCH {} RETURN count(m) AS total", pattern))
                    .param("id", anchor.target().to_string()),
            )
            .await?;

        let q = query(&format!(
            "MATCH {} RETURN m AS c ORDER BY m.created_at DESC, m.id SKIP $offset LIMIT $limit",
            pattern
        ))
        .param("id", anchor.target().to_string())
        .param("offset", int_param(offset))
        .param("limit", int_param(limit));

        let comments = self
            .execute_with_params(q)
            .await?
            .iter()
            .map(|row| {
                let node: neo4rs::Node = row.get("c")?;
                self.node_to_comment(&node)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok((comments, total))
    }

    fn node_to_comment(&self, node: &neo4rs::Node) -> Result<CommentNode> {
        Ok(CommentNode {
            id: node.get::<String>("id")?.parse()?,
            text: node.get("text")?,
            created_at: parse_ts(&node.get::<String>("created_at")?)?,
        })
    }

    // ========================================================================
    // Adjacency operations
    // ========================================================================

    pub async fn neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> Result<Vec<Uuid>> {
        let q = query(&format!(
            "MATCH {} RETURN m.id AS id",
            neighbor_pattern(rel, direction)
        ))
        .param("id", node_id.to_string());

        self.execute_with_params(q)
            .await?
            .iter()
            .map(|row| Ok(row.get::<String>("id")?.parse()?))
            .collect()
    }

    pub async fn count_neighbors(
        &self,
        node_id: Uuid,
        rel: RelType,
        direction: Direction,
    ) -> Result<usize> {
        self.count(
            query(&format!(
                "MATCH {} RETURN count(r) AS total",
                neighbor_pattern(rel, direction)
            ))
            .param("id", node_id.to_string()),
        )
        .await
    }

    pub async fn has_edge(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool> {
        let total = self
            .count(
                query(&format!(
                    "MATCH {} RETURN count(r) AS total",
                    edge_pattern(rel)
                ))
                .param("from", from.to_string())
                .param("to", to.to_string()),
            )
            .await?;
        Ok(total > 0)
    }

    /// MERGE the edge; `$op` tells a fresh edge from an existing one
    pub async fn create_edge_if_absent(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool> {
        let (src, dst) = endpoint_labels(rel);
        let cypher = format!(
            r#"
            MATCH (a{} {{id: $from}}), (b{} {{id: $to}})
            MERGE (a)-[r:{}]->(b)
            ON CREATE SET r.created_at = $now, r.op = $op
            RETURN r.op = $op AS created
            "#,
            src, dst, rel
        );
        let q = query(&cypher)
            .param("from", from.to_string())
            .param("to", to.to_string())
            .param("now", ts(Utc::now()))
            .param("op", Uuid::new_v4().to_string());

        let rows = self.execute_with_params(q).await?;
        match rows.first() {
            Some(row) => Ok(row.get::<bool>("created").unwrap_or(false)),
            None => Err(anyhow!("cannot link {} -[{}]-> {}: missing endpoint", from, rel, to)),
        }
    }

    pub async fn delete_edge_if_present(&self, from: Uuid, rel: RelType, to: Uuid) -> Result<bool> {
        let removed = self
            .count(
                query(&format!(
                    "MATCH {} DELETE r RETURN count(*) AS total",
                    edge_pattern(rel)
                ))
                .param("from", from.to_string())
                .param("to", to.to_string()),
            )
            .await?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_neighbor_pattern_direction() {
        assert_eq!(
            neighbor_pattern(RelType::Follows, Direction::Outgoing),
            "(n:User {id: $id})-[r:FOLLOWS]->(m:User)"
        );
        assert_eq!(
            neighbor_pattern(RelType::On, Direction::Incoming),
            "(n:Post {id: $id})<-[r:ON]-(m:Comment)"
        );
    }

    #[test]
    fn test_edge_pattern_labels() {
        assert_eq!(
            edge_pattern(RelType::Likes),
            "(a:User {id: $from})-[r:LIKES]->(b:Post|Comment {id: $to})"
        );
    }

    #[test]
    fn test_huge_offset_never_goes_negative() {
        let page = crate::social::PageRequest::new(1_000_000_000_000_000_000, 10).unwrap();
        assert_eq!(int_param(page.offset()), i64::MAX);
        assert_eq!(int_param(usize::MAX), i64::MAX);
        assert_eq!(int_param(40), 40);
    }

    #[test]
    fn test_timestamps_sort_as_strings() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let late = early + chrono::Duration::milliseconds(1500);
        let (a, b) = (ts(early), ts(late));
        assert_eq!(a.len(), b.len());
        assert!(a < b);
        assert_eq!(parse_ts(&a).unwrap(), early);
        assert_eq!(parse_ts(&b).unwrap(), late);
    }
}
