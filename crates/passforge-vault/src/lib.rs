//! Password vault for PassForge.
//!
//! This crate is the surface a front end talks to: it generates passwords,
//! saves and deletes named records, and streams the saved list as it
//! changes. Storage lives in `passforge-store`; generation in
//! `passforge-generator`.
//!
//! # Modules
//!
//! - [`vault`]: [`PasswordVault`], the generate/save/delete/observe surface.
//! - [`error`]: [`VaultError`], split into validation and storage failures.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use passforge_vault::PasswordVault;
//!
//! # async fn example() -> passforge_vault::Result<()> {
//! let vault = PasswordVault::open("data/passforge.db").await?;
//!
//! let password = vault.generate(16, true, true, true, false);
//! let record = vault.save("GitHub", &password).await?;
//!
//! let mut feed = vault.observe_all();
//! let newest_first = feed.next().await.unwrap_or_default();
//! assert_eq!(newest_first[0].id, record.id);
//!
//! vault.delete(record.id).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod vault;

pub use error::{Result, VaultError};
pub use passforge_generator::{CharClass, CharClasses, generate, policy};
pub use passforge_store::{CredentialRecord, RecordFeed, RecordList};
pub use vault::PasswordVault;
