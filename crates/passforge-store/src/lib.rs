//! # passforge-store
//!
//! Storage engine for PassForge.
//!
//! Credential records live in a single SQLite table. [`CredentialStore`]
//! serializes every mutation, keeps an in-memory snapshot that always equals
//! the committed table, and pushes that snapshot to subscribers after each
//! change.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  RecordFeed (broadcast of Arc snapshots) │
//! ├─────────────────────────────────────────┤
//! │  CredentialStore (writer lock, snapshot) │
//! ├─────────────────────────────────────────┤
//! │  Database (rusqlite WAL, blocking pool)  │
//! │  Migrations (versioned, transactional)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```ignore
//! use passforge_store::CredentialStore;
//!
//! let store = CredentialStore::open_path("data/passforge.db").await?;
//! let mut feed = store.subscribe();
//! store.insert("GitHub", "Abc12345").await?;
//! let latest = feed.next().await;
//! ```

pub mod credentials;
pub mod db;
pub mod error;
pub mod feed;
pub mod migration;

// ── re-exports ───────────────────────────────────────────────────────

pub use credentials::{CredentialRecord, CredentialStore};
pub use db::Database;
pub use error::{StoreError, StoreResult};
pub use feed::{RecordFeed, RecordList};
