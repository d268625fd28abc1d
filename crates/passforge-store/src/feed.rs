//! Live feed of committed record snapshots.
//!
//! A [`RecordFeed`] yields the store's full ordered record list: once
//! immediately on subscription, then again after every committed mutation.
//! Snapshots are immutable `Arc` slices, so fan-out to many subscribers never
//! copies records.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::broadcast;
use tracing::{trace, warn};

use crate::credentials::CredentialRecord;

/// A committed, newest-first list of records.
pub type RecordList = Arc<[CredentialRecord]>;

/// Per-subscriber handle on the snapshot feed.
///
/// Dropping the feed unsubscribes. The feed ends (returns `None`) after the
/// store shuts down and every already-published snapshot has been delivered.
#[derive(Debug)]
pub struct RecordFeed {
    initial: Option<RecordList>,
    rx: Option<broadcast::Receiver<RecordList>>,
}

impl RecordFeed {
    pub(crate) fn new(initial: RecordList, rx: Option<broadcast::Receiver<RecordList>>) -> Self {
        Self {
            initial: Some(initial),
            rx,
        }
    }

    /// Wait for the next snapshot.
    ///
    /// A subscriber that falls more than the channel capacity behind jumps
    /// straight to the newest committed snapshot; every snapshot it does see
    /// is complete.
    pub async fn next(&mut self) -> Option<RecordList> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            let rx = self.rx.as_mut()?;
            match rx.recv().await {
                Ok(snapshot) => {
                    trace!(records = snapshot.len(), "feed snapshot delivered");
                    return Some(snapshot);
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "record feed subscriber lagged, skipping stale snapshots");
                    if let Some(latest) = self.drain_to_latest() {
                        return Some(latest);
                    }
                }
                Err(broadcast::error::RecvError::Closed) => {
                    self.rx = None;
                    return None;
                }
            }
        }
    }

    /// Return a snapshot that is already available without waiting.
    ///
    /// Lagging behaves as in [`RecordFeed::next`].
    pub fn try_next(&mut self) -> Option<RecordList> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        let rx = self.rx.as_mut()?;
        match rx.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                warn!(skipped, "record feed subscriber lagged, skipping stale snapshots");
                self.drain_to_latest()
            }
            Err(broadcast::error::TryRecvError::Empty) => None,
            Err(broadcast::error::TryRecvError::Closed) => {
                self.rx = None;
                None
            }
        }
    }

    /// Consume every buffered snapshot and return the newest one.
    fn drain_to_latest(&mut self) -> Option<RecordList> {
        let rx = self.rx.as_mut()?;
        let mut latest = None;
        let mut closed = false;
        loop {
            match rx.try_recv() {
                Ok(snapshot) => latest = Some(snapshot),
                Err(broadcast::error::TryRecvError::Lagged(_)) => {}
                Err(broadcast::error::TryRecvError::Empty) => break,
                Err(broadcast::error::TryRecvError::Closed) => {
                    closed = true;
                    break;
                }
            }
        }
        if closed {
            self.rx = None;
        }
        latest
    }

    /// Adapt the feed into a [`futures::Stream`].
    pub fn into_stream(self) -> impl Stream<Item = RecordList> + Send {
        futures::stream::unfold(self, |mut feed| async move {
            let snapshot = feed.next().await?;
            Some((snapshot, feed))
        })
    }
}
