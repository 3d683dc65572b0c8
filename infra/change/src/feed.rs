//! Asynchronous fan-out of committed changes.
//!
//! The vetoable stage always runs inline on the mutating thread. Only after a change has
//! committed may observers be told about it asynchronously, and [`ChangeFeed`] is the
//! bridge for that: registered as an ordinary [`PropertyChangeListener`], it forwards each
//! committed event into a `tokio` broadcast channel in dispatch order.

use crate::error::ChangeError;
use crate::event::PropertyChangeEvent;
use crate::listener::PropertyChangeListener;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, trace, warn};

const MIN_CAPACITY: usize = 1;

/// A broadcast channel of committed [`PropertyChangeEvent`]s.
///
/// Cloning shares the same channel.
///
/// # Example
///
/// ```rust
/// use beans_change::{ChangeFeed, ChangeReceiverExt, ChangeSupport};
/// use std::sync::Arc;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), beans_change::ChangeError> {
/// let support = ChangeSupport::new("counter:1");
/// let feed = ChangeFeed::new(16)?;
/// let mut rx = feed.subscribe();
/// support.add_property_change_listener(Arc::new(feed));
///
/// support.fire_property_change("count", 0, 1);
/// let event = rx.recv_change().await.unwrap();
/// assert_eq!(event.new_value().as_int(), Some(1));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<Arc<PropertyChangeEvent>>,
}

impl ChangeFeed {
    /// # Errors
    /// Returns [`ChangeError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self, ChangeError> {
        if capacity < MIN_CAPACITY {
            return Err(ChangeError::InvalidCapacity {
                message: format!("capacity must be >= {MIN_CAPACITY}").into(),
                context: Some("change feed".into()),
            });
        }
        let (sender, _) = broadcast::channel(capacity);
        Ok(Self { sender })
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<PropertyChangeEvent>> {
        self.sender.subscribe()
    }

    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl PropertyChangeListener for ChangeFeed {
    fn property_change(&self, event: &PropertyChangeEvent) {
        match self.sender.send(Arc::new(event.clone())) {
            Ok(count) => trace!(property = event.property_name(), count, "Change forwarded to feed"),
            Err(_) => trace!(property = event.property_name(), "Change dropped: no active feed subscribers"),
        }
    }
}

/// Lag-tolerant receiving for change feed subscribers.
pub trait ChangeReceiverExt {
    /// Receives the next committed change, skipping over any the receiver fell behind on.
    /// Returns `None` once the feed is gone.
    fn recv_change(&mut self) -> impl Future<Output = Option<Arc<PropertyChangeEvent>>> + Send;
}

impl ChangeReceiverExt for broadcast::Receiver<Arc<PropertyChangeEvent>> {
    async fn recv_change(&mut self) -> Option<Arc<PropertyChangeEvent>> {
        let mut skipped = 0u64;

        loop {
            match self.recv().await {
                Ok(event) => {
                    if skipped > 0 {
                        warn!(skipped, "Change feed receiver lagged; continuing from oldest retained change");
                    }
                    return Some(event);
                },
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    skipped = skipped.saturating_add(n);
                    debug!(skipped = n, total_skipped = skipped, "Change feed receiver lagged");
                },
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
