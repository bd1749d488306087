//! Simple signaling primitives for worker coordination.
//!
//! This module provides a lightweight signaling mechanism for coordinating between
//! the reduce worker and the pipeline supervisor. It abstracts tokio's watch channels
//! into simple signal types focused on coordination events rather than data transfer.

use tokio::sync::watch;

/// Transmitter side of a coordination signal channel.
///
/// [`SignalTx`] abstracts a watch channel transmitter for sending coordination signals
/// between workers. The signal carries no data payload - it's purely for notification
/// that some event or state change has occurred.
pub type SignalTx = watch::Sender<()>;

/// Receiver side of a coordination signal channel.
///
/// [`SignalRx`] abstracts a watch channel receiver for detecting coordination signals.
/// Workers can use this to wait for events from other parts of the system without
/// polling or complex synchronization.
pub type SignalRx = watch::Receiver<()>;

/// Creates a new coordination signal channel.
///
/// The reduce worker uses this channel as its one-shot completion marker: it fires
/// the signal once when its fold loop exits, either because the target condition was
/// met or because the result channel closed. The supervisor converts the first firing
/// into the pipeline shutdown raise.
pub fn create_signal() -> (SignalTx, SignalRx) {
    let (tx, rx) = watch::channel(());
    (tx, rx)
}
