//! Credential records and the store that owns them.
//!
//! [`CredentialStore`] keeps the durable `credentials` table and an
//! in-memory snapshot of it in lockstep. Mutations are serialized through a
//! single async writer lock; each one commits to SQLite first, re-reads the
//! ordered list inside the same transaction, and only then swaps the
//! snapshot and notifies subscribers. A failed write therefore never touches
//! the snapshot.

use std::cmp::Ordering;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};
use tracing::{Instrument, debug, info, instrument};

use crate::db::Database;
use crate::error::{StoreError, StoreResult};
use crate::feed::{RecordFeed, RecordList};

/// Buffered snapshots per subscriber before it is considered lagging.
const FEED_CAPACITY: usize = 64;

const SELECT_ALL: &str = "SELECT id, account_name, secret, created_at FROM credentials \
                          ORDER BY created_at DESC, id DESC";

// ═══════════════════════════════════════════════════════════════════════
//  Types
// ═══════════════════════════════════════════════════════════════════════

/// A saved password for one account.
///
/// Records are immutable once stored; they are only ever inserted or
/// removed whole.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// Store-assigned identifier. Never reused, even after deletion.
    pub id: i64,
    /// Caller-chosen label, never empty.
    pub account_name: String,
    /// The password text, stored as given.
    pub secret: String,
    /// Insertion time in milliseconds since the Unix epoch.
    pub created_at: i64,
}

impl std::fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("id", &self.id)
            .field("account_name", &self.account_name)
            .field("secret", &"<redacted>")
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl CredentialRecord {
    /// Insertion time as a UTC timestamp.
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// Store enumeration order: newest first, higher id first on ties.
    pub fn newest_first(a: &Self, b: &Self) -> Ordering {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            account_name: row.get(1)?,
            secret: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

fn load_all(conn: &Connection) -> StoreResult<Vec<CredentialRecord>> {
    let mut stmt = conn.prepare_cached(SELECT_ALL)?;
    let records = stmt
        .query_map([], CredentialRecord::from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

fn validate(account_name: &str, secret: &str) -> StoreResult<()> {
    if account_name.is_empty() {
        return Err(StoreError::InvalidArgument(
            "account name must not be empty".into(),
        ));
    }
    if secret.is_empty() {
        return Err(StoreError::InvalidArgument(
            "secret must not be empty".into(),
        ));
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
//  CredentialStore
// ═══════════════════════════════════════════════════════════════════════

/// Durable, ordered collection of [`CredentialRecord`]s with a live feed.
///
/// Cheap to clone; clones share the same database, writer lock and feed.
#[derive(Clone)]
pub struct CredentialStore {
    inner: Arc<Inner>,
}

struct Inner {
    db: Database,
    writer: Mutex<()>,
    state: RwLock<FeedState>,
}

struct FeedState {
    records: RecordList,
    /// `None` once the store has been shut down.
    tx: Option<broadcast::Sender<RecordList>>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("records", &self.len())
            .field("shut_down", &self.is_shut_down())
            .finish()
    }
}

impl CredentialStore {
    /// Load every persisted record from `db` and start serving snapshots.
    ///
    /// `db` must already be migrated.
    pub async fn open(db: Database) -> StoreResult<Self> {
        let records = db.execute(load_all).await?;
        info!(records = records.len(), "credential store loaded");

        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Ok(Self {
            inner: Arc::new(Inner {
                db,
                writer: Mutex::new(()),
                state: RwLock::new(FeedState {
                    records: records.into(),
                    tx: Some(tx),
                }),
            }),
        })
    }

    /// Open (creating if needed) and migrate the database at `path`, then
    /// load the store from it.
    pub async fn open_path(path: impl AsRef<Path> + Send + 'static) -> StoreResult<Self> {
        let db = Database::open_and_migrate(path).await?;
        Self::open(db).await
    }

    /// Persist a new record and publish the updated list.
    ///
    /// Fails with [`StoreError::InvalidArgument`] when either argument is
    /// empty; nothing is written in that case. The mutation runs to
    /// completion even if the returned future is dropped.
    #[instrument(skip(self, secret))]
    pub async fn insert(&self, account_name: &str, secret: &str) -> StoreResult<CredentialRecord> {
        validate(account_name, secret)?;

        let account_name = account_name.to_owned();
        let secret = secret.to_owned();
        let inner = Arc::clone(&self.inner);

        let record = tokio::spawn(
            async move {
                let _writer = inner.writer.lock().await;
                inner.ensure_open()?;

                let created_at = Utc::now().timestamp_millis();
                let (record, records) = inner
                    .db
                    .execute_mut(move |conn| {
                        let tx = conn.transaction()?;
                        tx.execute(
                            "INSERT INTO credentials (account_name, secret, created_at) \
                             VALUES (?1, ?2, ?3)",
                            params![account_name, secret, created_at],
                        )?;
                        let record = CredentialRecord {
                            id: tx.last_insert_rowid(),
                            account_name,
                            secret,
                            created_at,
                        };
                        let records = load_all(&tx)?;
                        tx.commit()?;
                        Ok((record, records))
                    })
                    .await?;

                inner.publish(records);
                Ok::<_, StoreError>(record)
            }
            .in_current_span(),
        )
        .await??;

        debug!(record_id = record.id, "credential saved");
        Ok(record)
    }

    /// Remove the record with `id` and publish the updated list.
    ///
    /// Returns whether a record was removed. An unknown id is not an error;
    /// subscribers still receive the (unchanged) list.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> StoreResult<bool> {
        let inner = Arc::clone(&self.inner);

        let removed = tokio::spawn(
            async move {
                let _writer = inner.writer.lock().await;
                inner.ensure_open()?;

                let (removed, records) = inner
                    .db
                    .execute_mut(move |conn| {
                        let tx = conn.transaction()?;
                        let removed = tx.execute("DELETE FROM credentials WHERE id = ?1", [id])?;
                        let records = load_all(&tx)?;
                        tx.commit()?;
                        Ok((removed > 0, records))
                    })
                    .await?;

                inner.publish(records);
                Ok::<_, StoreError>(removed)
            }
            .in_current_span(),
        )
        .await??;

        debug!(record_id = id, removed, "credential delete applied");
        Ok(removed)
    }

    /// Subscribe to the record feed.
    ///
    /// The first [`RecordFeed::next`] returns the current list at once.
    pub fn subscribe(&self) -> RecordFeed {
        // Reading the snapshot and registering the receiver under one read
        // guard means no commit can land between the two.
        let state = self.inner.read_state();
        RecordFeed::new(
            Arc::clone(&state.records),
            state.tx.as_ref().map(broadcast::Sender::subscribe),
        )
    }

    /// The current committed list, newest first.
    pub fn snapshot(&self) -> RecordList {
        Arc::clone(&self.inner.read_state().records)
    }

    /// Look up a single record.
    pub fn get(&self, id: i64) -> Option<CredentialRecord> {
        self.inner
            .read_state()
            .records
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.read_state().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stop accepting mutations and end every feed.
    ///
    /// Waits for an in-flight mutation to finish first. Subscribers still
    /// receive snapshots published before the shutdown.
    pub async fn shutdown(&self) {
        let _writer = self.inner.writer.lock().await;
        let mut state = self.inner.write_state();
        if state.tx.take().is_some() {
            info!("credential store shut down");
        }
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.read_state().tx.is_none()
    }

    /// The underlying database handle.
    pub fn database(&self) -> &Database {
        &self.inner.db
    }
}

impl Inner {
    fn ensure_open(&self) -> StoreResult<()> {
        if self.read_state().tx.is_none() {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    /// Swap in a freshly committed list and fan it out.
    fn publish(&self, records: Vec<CredentialRecord>) {
        debug_assert!(records.is_sorted_by(|a, b| {
            CredentialRecord::newest_first(a, b) != Ordering::Greater
        }));

        let list: RecordList = records.into();
        let mut state = self.write_state();
        state.records = Arc::clone(&list);
        if let Some(tx) = &state.tx {
            // Err only means nobody is subscribed right now.
            let _ = tx.send(list);
        }
    }

    // The guarded data is a pointer swap that cannot be left half-written,
    // so a poisoned lock is still safe to read.
    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, FeedState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, FeedState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

// ── tests ────────────────────────────────────────────────────────────
