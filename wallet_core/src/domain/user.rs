use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Local projection of an upstream identity, maintained by C2. Never
/// deleted; idempotent on `user_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: Uuid,
    pub status: String,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The shape of an upstream user-lifecycle event, as read off the
/// `user_updates` topic by C10 and handed to C2's `UpsertUser`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    pub user_id: Uuid,
    pub status: String,
    pub archived: bool,
}
