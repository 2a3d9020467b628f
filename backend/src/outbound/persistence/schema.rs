//! Diesel table definitions for the PostgreSQL schema.
//!
//! Keep in step with `backend/migrations`; `diesel print-schema` regenerates
//! these from a live database.

diesel::table! {
    /// One-time registration codes awaiting finalisation.
    pending_registrations (code) {
        /// Primary key: opaque single-use code.
        code -> Text,
        email -> Text,
        /// Identity-provider name.
        provider -> Text,
        /// Provider-scoped subject identifier.
        social_id -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts. `email` carries `users_email_key`.
    users (id) {
        id -> Uuid,
        provider -> Text,
        social_id -> Text,
        email -> Text,
        is_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Public profile, one per account. `username` carries
    /// `user_profiles_username_key`.
    user_profiles (user_id) {
        user_id -> Uuid,
        username -> Text,
        bio -> Text,
        social_links -> Jsonb,
    }
}

diesel::joinable!(user_profiles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(pending_registrations, user_profiles, users);
