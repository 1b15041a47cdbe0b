//! Test helper factories and mock state builders
//!
//! Provides convenience functions for creating test objects with sensible defaults,
//! and helpers for building mock AppState instances.
#![allow(dead_code)]

use crate::neo4j::mock::MockGraphStore;
use crate::neo4j::models::*;
use crate::{AppState, Config};
use chrono::{Duration, Utc};
use std::sync::Arc;

// ============================================================================
// Mock state builders
// ============================================================================

/// Create a mock AppState with an empty in-memory store
pub fn mock_app_state() -> AppState {
    mock_app_state_with(MockGraphStore::new())
}

/// Create a mock AppState with a pre-seeded store
pub fn mock_app_state_with(graph: MockGraphStore) -> AppState {
    AppState::with_store(
        Arc::new(graph),
        Config {
            neo4j_uri: "bolt://mock:7687".to_string(),
            neo4j_password: "mock".to_string(),
            server_port: 0,
            ..Default::default()
        },
    )
}

// ============================================================================
// Entity factories
// ============================================================================

/// A user with a unique email derived from its first name
pub fn test_user(first_name: &str) -> UserNode {
    let id = uuid::Uuid::new_v4();
    let mut user = UserNode::new(
        first_name,
        "Tester",
        format!("{}.{}@example.com", first_name.to_lowercase(), id.simple()),
        "test-hash",
    )
    .expect("valid test user");
    user.id = id;
    user
}

/// A text post created now
pub fn test_post(text: &str) -> PostNode {
    PostNode::new(text, vec![]).expect("valid test post")
}

/// A text post created `seconds` ago
pub fn test_post_aged(text: &str, seconds: i64) -> PostNode {
    test_post(text).created_at(Utc::now() - Duration::seconds(seconds))
}

/// Seed a store with one user per name; users are returned in input order
pub async fn seeded_users(names: &[&str]) -> (MockGraphStore, Vec<UserNode>) {
    let mut store = MockGraphStore::new();
    let mut users = Vec::with_capacity(names.len());
    for name in names {
        let user = test_user(name);
        store = store.with_user(user.clone()).await;
        users.push(user);
    }
    (store, users)
}
