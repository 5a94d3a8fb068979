//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: in-memory SQLite repositories using Diesel ORM
//! - **crypto**: Argon2id password hashing and HS256 session tokens
//! - **process**: the `ping` binary, invoked without a shell
//! - **files**: the uploads directory behind a `cap_std` capability
//! - **http**: DNS resolution and pinned, redirect-free fetching

pub mod crypto;
pub mod files;
pub mod http;
pub mod persistence;
pub mod process;
