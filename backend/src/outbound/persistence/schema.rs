//! Diesel table definitions for the SQLite schema.
//!
//! These definitions must match `migrations/` exactly; Diesel uses them for
//! compile-time query validation and type-safe SQL generation.

diesel::table! {
    /// Accounts. `username` carries a UNIQUE constraint.
    users (id) {
        id -> Integer,
        username -> Text,
        email -> Text,
        /// `user` or `admin`, enforced by a CHECK constraint.
        role -> Text,
        /// Argon2 PHC string.
        password_hash -> Text,
    }
}

diesel::table! {
    /// Catalogue, seeded by the initial migration.
    products (id) {
        id -> Integer,
        name -> Text,
        price -> Double,
        description -> Nullable<Text>,
    }
}

diesel::table! {
    comments (id) {
        id -> Integer,
        body -> Text,
        author -> Text,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(users, products, comments);
