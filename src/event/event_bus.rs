//! # Event Bus Implementation
//!
//! The EventBus is the inbound transport boundary: the chat connection publishes
//! every received [`Event`] here, and [`WaitRegistry::listen`] pumps them into the
//! wait registry one at a time.
//!
//! ## Design Decisions
//!
//! The implementation uses Tokio's broadcast channel so that the registry pump and
//! any other observers (logging, metrics) each see every event. Only the pump routes
//! events to waits, so each event is still consumed by at most one wait.
//!
//! ## Performance Considerations
//!
//! - The EventBus capacity should be sized for bursts of reactions
//! - A slow pump lags; lagged events are skipped and reported, not replayed

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, trace, warn};

use super::{
    types::{Event, EventKind},
    waiter::{Dispatch, WaitEvent, WaitRegistry},
};

/// # EventBus
///
/// Broadcast hub carrying transport events to the wait registry.
pub struct EventBus {
    event_sender: broadcast::Sender<Event>,
    capacity: usize,
    /// Keeps the channel open while no pump is subscribed
    _internal_receiver: broadcast::Receiver<Event>,
}

impl EventBus {
    /// Creates a new EventBus with the specified buffer capacity, at least 1.
    ///
    /// ```rust,no_run
    /// use eventwaiter::event::EventBus;
    /// let event_bus = EventBus::new(100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (event_sender, event_receiver) = broadcast::channel(capacity);
        Self {
            event_sender,
            capacity,
            _internal_receiver: event_receiver,
        }
    }

    pub fn subscribe(&self) -> EventReceiver {
        EventReceiver::new(self.event_sender.subscribe())
    }

    /// Publishes an event to all subscribers.
    ///
    /// # Errors
    ///
    /// Returns `EventError::SendFailed` if the channel is closed.
    pub async fn publish(&self, event: Event) -> EventResult<()> {
        self.sync_publish(event)
    }

    /// Publishes an event from a synchronous context, e.g. a transport callback.
    pub fn sync_publish(&self, event: Event) -> EventResult<()> {
        debug_event("Publishing", &event);
        self.event_sender
            .send(event)
            .map_err(|e| EventError::SendFailed {
                message: e.to_string(),
            })?;
        Ok(())
    }

    pub fn queue_size(&self) -> usize {
        self.event_sender.len()
    }

    pub fn subscribers_size(&self) -> usize {
        self.event_sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

pub fn debug_event(prefix: &str, event: &Event) {
    match event.kind() {
        EventKind::ReactionAdded | EventKind::MessageReceived => {
            trace!("{} Event: {:?}", prefix, event)
        }
        _ => debug!("{} Event: {:?}", prefix, event),
    }
}

pub struct EventReceiver {
    pub receiver: broadcast::Receiver<Event>,
}

impl EventReceiver {
    pub fn new(receiver: broadcast::Receiver<Event>) -> Self {
        Self { receiver }
    }

    /// Receives the next event. On lag the receiver resubscribes and reports how many
    /// events were skipped.
    pub async fn recv(&mut self) -> EventResult<Event> {
        match self.receiver.recv().await {
            Ok(event) => Ok(event),
            Err(broadcast::error::RecvError::Lagged(n)) => {
                self.receiver = self.receiver.resubscribe();
                Err(EventError::Lagged { count: n })
            }
            Err(e) => Err(EventError::ReceiveFailed {
                message: e.to_string(),
            }),
        }
    }
}

impl WaitRegistry<Event> {
    /// Dispatches events from `receiver` until the transport signals shutdown or the
    /// bus closes. Returns the number of events that matched a wait.
    pub async fn listen(&self, mut receiver: EventReceiver) -> usize {
        let mut matched = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => match self.dispatch(event) {
                    Dispatch::Matched(_) => matched += 1,
                    Dispatch::Unmatched => {}
                    Dispatch::Shutdown | Dispatch::Closed => break,
                },
                Err(EventError::Lagged { count }) => {
                    warn!(count, "Event pump lagged, skipped events");
                }
                Err(e) => {
                    debug!("Event pump stopped: {}", e);
                    break;
                }
            }
        }
        info!(matched, "Event pump finished");
        matched
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EventError {
    #[error("Event Send failed: {message}")]
    SendFailed { message: String },

    #[error("Event Receive failed: {message}")]
    ReceiveFailed { message: String },

    #[error("Event lagged: {count}")]
    Lagged { count: u64 },
}

pub type EventResult<T> = Result<T, EventError>;

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[tokio::test]
    async fn test_basic_publish_subscribe() {
        let bus = EventBus::new(16);
        let mut event_rx = bus.subscribe();

        bus.publish(Event::reaction("m1", "c1", "alice", "▶"))
            .await
            .unwrap();

        let received = event_rx.recv().await.unwrap();
        assert_eq!(received.kind(), EventKind::ReactionAdded);
    }

    #[tokio::test]
    async fn test_zero_capacity_is_raised_to_one() {
        let bus = EventBus::new(0);
        assert_eq!(bus.capacity(), 1);

        let mut event_rx = bus.subscribe();
        bus.publish(Event::Shutdown).await.unwrap();
        assert_eq!(event_rx.recv().await.unwrap(), Event::Shutdown);
    }

    #[tokio::test]
    async fn test_lagged_receiver_recovers() {
        let bus = EventBus::new(2);
        let mut event_rx = bus.subscribe();

        for i in 0..5 {
            bus.sync_publish(Event::message(format!("m{i}"), "c1", "alice", "hi"))
                .unwrap();
        }

        assert!(matches!(
            event_rx.recv().await,
            Err(EventError::Lagged { .. })
        ));

        bus.sync_publish(Event::Shutdown).unwrap();
        assert_eq!(event_rx.recv().await.unwrap(), Event::Shutdown);
    }

    #[tokio::test]
    async fn test_listen_routes_until_shutdown() {
        let bus = EventBus::new(16);
        let waiter = WaitRegistry::<Event>::with_tokio().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = seen.clone();
        waiter
            .wait_for(EventKind::MessageReceived)
            .filter(|event: &Event| event.actor().is_some_and(|a| a.as_str() == "bob"))
            .run(move |event| sink.lock().unwrap().push(event))
            .unwrap();

        let pump = tokio::spawn({
            let waiter = waiter.clone();
            let receiver = bus.subscribe();
            async move { waiter.listen(receiver).await }
        });

        bus.publish(Event::message("m1", "c1", "alice", "hello"))
            .await
            .unwrap();
        bus.publish(Event::message("m2", "c1", "bob", "hey"))
            .await
            .unwrap();
        bus.publish(Event::Shutdown).await.unwrap();

        assert_eq!(pump.await.unwrap(), 1);
        assert!(waiter.is_closed());
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Event::message("m2", "c1", "bob", "hey")]
        );
    }
}
