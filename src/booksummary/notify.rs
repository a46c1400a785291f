//! Listing subscriptions.
//!
//! A subscription delivers the aggregated listing once, at the moment it is
//! created, and then stays open without further emissions. Nothing watches the
//! backing stores: callers that want a fresh listing subscribe again or use the
//! listing returned by each mutation.

use crate::model::Record;
use log::debug;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

pub struct Subscription {
    rx: Receiver<Vec<Record>>,
    // Held so the channel reads as open, not disconnected, after the emission.
    _tx: Sender<Vec<Record>>,
}

impl Subscription {
    pub(crate) fn emit_once(listing: Vec<Record>) -> Self {
        let (tx, rx) = mpsc::channel();
        let count = listing.len();
        // The receiver is alive in this scope, so the send cannot fail.
        let _ = tx.send(listing);
        debug!(
            "event=subscribe module=notify status=emitted records={}",
            count
        );
        Self { rx, _tx: tx }
    }

    /// The pending listing, if it has not been taken yet.
    pub fn try_next(&self) -> Option<Vec<Record>> {
        match self.rx.try_recv() {
            Ok(listing) => Some(listing),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Waits up to `timeout` for a listing.
    pub fn next_timeout(&self, timeout: Duration) -> Option<Vec<Record>> {
        match self.rx.recv_timeout(timeout) {
            Ok(listing) => Some(listing),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Closes the channel. Dropping the subscription has the same effect.
    pub fn cancel(self) {
        debug!("event=subscribe module=notify status=cancelled");
    }
}
