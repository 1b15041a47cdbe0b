//! User registration, profiles and user listings

use super::models::{
    CreateUserRequest, CreatorSummary, DirectoryUser, EnrichedUser, UpdateProfileRequest,
    UserProfile,
};
use super::paging::{PageRequest, PageResult};
use crate::error::{Result, SocialError};
use crate::neo4j::models::{Direction, RelType, SkillNode, UserFilter, UserNode, UserUpdate};
use crate::neo4j::GraphStore;
use futures::future::try_join_all;
use std::sync::Arc;
use uuid::Uuid;

pub struct UserService {
    store: Arc<dyn GraphStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Register a user node. Emails are unique after normalization.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<UserNode> {
        let mut user = UserNode::new(req.first_name, req.last_name, req.email, req.password_hash)?;
        user.title = req.title.filter(|t| !t.trim().is_empty());
        user.profile_image = req.profile_image.filter(|i| !i.trim().is_empty());

        // The store checks and inserts in one step, so racing registrations
        // of the same email resolve to one node.
        if !self.store.create_user(&user).await? {
            return Err(SocialError::AlreadyExists(format!(
                "email {} is already registered",
                user.email
            )));
        }
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    pub async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile> {
        let user = self.require_user(user_id).await?;
        let (followers_count, following_count, skills) = futures::try_join!(
            self.store
                .count_neighbors(user_id, RelType::Follows, Direction::Incoming),
            self.store
                .count_neighbors(user_id, RelType::Follows, Direction::Outgoing),
            self.store.get_user_skills(user_id),
        )?;
        Ok(UserProfile {
            user,
            followers_count,
            following_count,
            skills,
        })
    }

    /// Partial profile update; listed skills are attached, existing ones kept
    pub async fn update_profile(
        &self,
        user_id: Uuid,
        req: UpdateProfileRequest,
    ) -> Result<UserProfile> {
        self.require_user(user_id).await?;

        let update = UserUpdate {
            first_name: non_blank("first_name", req.first_name)?,
            last_name: non_blank("last_name", req.last_name)?,
            title: req.title,
            profile_image: req.profile_image,
        };
        if update.is_empty() && req.skills.is_none() {
            return Err(SocialError::InvalidInput(
                "No profile fields to update".to_string(),
            ));
        }
        if !update.is_empty() {
            self.store.update_user(user_id, &update).await?;
        }

        for name in req.skills.unwrap_or_default() {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let skill_id = self.store.create_skill(&SkillNode::new(name)?).await?;
            self.store
                .create_edge_if_absent(user_id, RelType::HasSkill, skill_id)
                .await?;
        }

        self.get_profile(user_id).await
    }

    /// Users following `target`, ordered by first name
    pub async fn followers(
        &self,
        target: Uuid,
        viewer: Uuid,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedUser>> {
        self.follow_list(target, viewer, Direction::Incoming, page)
            .await
    }

    /// Users `target` follows, ordered by first name
    pub async fn following(
        &self,
        target: Uuid,
        viewer: Uuid,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedUser>> {
        self.follow_list(target, viewer, Direction::Outgoing, page)
            .await
    }

    /// User directory: everyone except the viewer, optionally filtered
    pub async fn list_users(
        &self,
        viewer: Uuid,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<PageResult<DirectoryUser>> {
        self.require_user(viewer).await?;
        let (users, total) = self
            .store
            .list_users_filtered(viewer, filter, page.limit(), page.offset())
            .await?;

        let store = self.store.as_ref();
        let results = try_join_all(users.into_iter().map(|user| async move {
            let (is_following, follows_me, skills) = futures::try_join!(
                store.has_edge(viewer, RelType::Follows, user.id),
                store.has_edge(user.id, RelType::Follows, viewer),
                store.get_user_skills(user.id),
            )?;
            Ok::<_, SocialError>(DirectoryUser {
                user: CreatorSummary::from(&user),
                email: user.email.clone(),
                is_following,
                follows_me,
                skills,
            })
        }))
        .await?;

        Ok(PageResult::from_store_page(page, results, total))
    }

    async fn follow_list(
        &self,
        target: Uuid,
        viewer: Uuid,
        direction: Direction,
        page: PageRequest,
    ) -> Result<PageResult<EnrichedUser>> {
        self.require_user(target).await?;
        let (users, total) = self
            .store
            .list_follow_users(target, direction, page.limit(), page.offset())
            .await?;

        let store = self.store.as_ref();
        let results = try_join_all(users.into_iter().map(|user| async move {
            let (followers_count, following_count, is_following, follows_me) = futures::try_join!(
                store.count_neighbors(user.id, RelType::Follows, Direction::Incoming),
                store.count_neighbors(user.id, RelType::Follows, Direction::Outgoing),
                store.has_edge(viewer, RelType::Follows, user.id),
                store.has_edge(user.id, RelType::Follows, viewer),
            )?;
            Ok::<_, SocialError>(EnrichedUser {
                user: CreatorSummary::from(&user),
                followers_count,
                following_count,
                is_following,
                follows_me,
            })
        }))
        .await?;

        Ok(PageResult::from_store_page(page, results, total))
    }

    async fn require_user(&self, id: Uuid) -> Result<UserNode> {
        self.store
            .get_user(id)
            .await?
            .ok_or_else(|| SocialError::user_not_found(id))
    }
}

fn non_blank(field: &str, value: Option<String>) -> Result<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(SocialError::InvalidInput(format!(
            "{} cannot be empty",
            field
        ))),
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}
