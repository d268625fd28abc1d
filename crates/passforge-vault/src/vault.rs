//! The PassForge vault: password generation plus the saved-record list.
//!
//! [`PasswordVault`] is built once at startup and handed (cloned or behind a
//! reference) to whatever front end needs it. It owns no global state.

use std::path::Path;

use passforge_generator::{CharClasses, Generator};
use passforge_store::{CredentialRecord, CredentialStore, Database, RecordFeed, RecordList};
use tracing::{debug, info, instrument};

use crate::error::{Result, VaultError};

/// Password generator and credential store behind one handle.
///
/// Cloning is cheap; clones share the same store and feed.
#[derive(Debug, Clone)]
pub struct PasswordVault {
    store: CredentialStore,
    generator: Generator,
}

impl PasswordVault {
    /// Wrap an already-open store.
    pub fn new(store: CredentialStore) -> Self {
        Self {
            store,
            generator: Generator::new(),
        }
    }

    /// Open (creating and migrating as needed) the database at `path` and
    /// load every saved record.
    pub async fn open(path: impl AsRef<Path> + Send + 'static) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!(path = %path.display(), "opening password vault");
        let store = CredentialStore::open_path(path).await?;
        Ok(Self::new(store))
    }

    /// A vault backed by an in-memory database.
    pub async fn open_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        db.run_migrations().await?;
        let store = CredentialStore::open(db).await?;
        Ok(Self::new(store))
    }

    // ── generation ───────────────────────────────────────────────────

    /// Generate a password of `length` characters from the enabled classes.
    ///
    /// Returns an empty string when every flag is `false`. The length is
    /// used as given; clamp it with [`passforge_generator::policy`] first.
    pub fn generate(
        &self,
        length: usize,
        lowercase: bool,
        uppercase: bool,
        digits: bool,
        special: bool,
    ) -> String {
        self.generate_with(
            length,
            CharClasses::from_flags(lowercase, uppercase, digits, special),
        )
    }

    /// Like [`PasswordVault::generate`], taking a [`CharClasses`] set.
    pub fn generate_with(&self, length: usize, classes: CharClasses) -> String {
        self.generator.generate(length, classes)
    }

    // ── records ──────────────────────────────────────────────────────

    /// Save a password for `account_name`.
    ///
    /// Fails with [`VaultError::Validation`] if either argument is empty.
    #[instrument(skip(self, secret))]
    pub async fn save(&self, account_name: &str, secret: &str) -> Result<CredentialRecord> {
        let record = self.store.insert(account_name, secret).await?;
        debug!(record_id = record.id, "password saved");
        Ok(record)
    }

    /// Generate a password and save it in one step.
    ///
    /// Fails with [`VaultError::Validation`] if `account_name` is empty or no
    /// class is enabled (an empty password cannot be saved).
    #[instrument(skip(self))]
    pub async fn generate_and_save(
        &self,
        account_name: &str,
        length: usize,
        classes: CharClasses,
    ) -> Result<CredentialRecord> {
        if classes.is_empty() {
            return Err(VaultError::Validation(
                "select at least one character class".into(),
            ));
        }
        if length == 0 {
            return Err(VaultError::Validation(
                "password length must be at least 1".into(),
            ));
        }

        let secret = self.generate_with(length, classes);
        self.save(account_name, &secret).await
    }

    /// Delete the record with `id`. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> Result<bool> {
        Ok(self.store.delete(id).await?)
    }

    /// Feed of newest-first record lists: the current one immediately, then
    /// one after every save or delete.
    pub fn observe_all(&self) -> RecordFeed {
        self.store.subscribe()
    }

    /// Current newest-first record list.
    pub fn records(&self) -> RecordList {
        self.store.snapshot()
    }

    pub fn get(&self, id: i64) -> Option<CredentialRecord> {
        self.store.get(id)
    }

    /// End all feeds and refuse further mutations.
    pub async fn shutdown(&self) {
        self.store.shutdown().await;
    }

    /// The underlying record store.
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }
}

// ── tests ────────────────────────────────────────────────────────────
