//! Cancellable channel primitives.
//!
//! Every inter-stage handoff goes through these two functions, so the
//! interruption rule lives in one place instead of being scattered
//! through the parsing and execution loops. They are the only
//! suspension points at which stages observe cancellation; no stage
//! polls or spins.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Sends `value` on the bounded channel, waiting for capacity.
///
/// Returns `true` once the value is accepted. Returns `false` if the
/// cancellation token fires first, or if the receiving stage is gone
/// (which only happens after that stage already stopped on error or
/// cancellation — the sender treats both the same way: stop quietly).
pub async fn send_or_cancel<T: Send>(
    tx: &mpsc::Sender<T>,
    value: T,
    cancel: &CancellationToken,
) -> bool {
    tokio::select! {
        biased;

        () = cancel.cancelled() => false,
        sent = tx.send(value) => sent.is_ok(),
    }
}

/// Receives the next value from the bounded channel.
///
/// Returns `Some(value)` when a value arrives, or `None` when the
/// channel is closed by the sending stage or the cancellation token
/// fires, whichever happens first.
pub async fn recv_or_cancel<T: Send>(
    rx: &mut mpsc::Receiver<T>,
    cancel: &CancellationToken,
) -> Option<T> {
    tokio::select! {
        biased;

        () = cancel.cancelled() => None,
        value = rx.recv() => value,
    }
}
