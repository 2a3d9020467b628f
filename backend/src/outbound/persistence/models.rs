//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; adapters convert them to and
//! from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{pending_registrations, user_profiles, users};

/// Row read from `pending_registrations`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = pending_registrations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PendingRegistrationRow {
    pub code: String,
    pub email: String,
    pub provider: String,
    pub social_id: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for `users`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub provider: &'a str,
    pub social_id: &'a str,
    pub email: &'a str,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable row for `user_profiles`.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_profiles)]
pub(crate) struct NewUserProfileRow<'a> {
    pub user_id: Uuid,
    pub username: &'a str,
    pub bio: &'a str,
    pub social_links: serde_json::Value,
}
