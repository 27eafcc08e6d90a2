//! # Wait Registry
//!
//! The WaitRegistry lets many independent call sites register "wake me when an event
//! of kind K arrives and satisfies P, otherwise run a fallback after D" against a
//! single incoming event stream.
//!
//! ## Matching
//!
//! Pending entries are kept per kind in registration order. [`WaitRegistry::dispatch`]
//! tries the event's own kind first, then each of its [`WaitEvent::supertypes`], and
//! hands the event to the first entry whose predicate accepts it. Each event is
//! consumed by at most one entry.
//!
//! ## Timeouts
//!
//! A registration with a deadline schedules exactly one timer on the
//! [`TimeoutScheduler`]. When the timer fires it calls
//! [`WaitRegistry::cancel_on_timeout`], which removes the entry by identity. Dispatch
//! removes entries the same way, so whichever side removes the entry first runs its
//! callback and the other side becomes a no-op.
//!
//! ## Locking
//!
//! Per-kind queues live in a `DashMap`. Predicates run while the queue for their kind
//! is locked and must not call back into the registry. Match and timeout actions run
//! after the entry has been removed and the lock released, so they may register new
//! waits.

use std::{
    collections::VecDeque,
    fmt::{self, Debug},
    hash::Hash,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Weak,
    },
    time::Duration,
};

use dashmap::DashMap;
use thiserror::Error;
use tokio::{sync::oneshot, time::Instant};
use tracing::{debug, info, instrument, trace};
use uuid::Uuid;

use super::scheduler::{TimeoutScheduler, TokioScheduler};

/// An event the registry can route.
pub trait WaitEvent: Send + 'static {
    type Kind: Eq + Hash + Clone + Debug + Send + Sync + 'static;

    fn kind(&self) -> Self::Kind;

    /// Broader kinds this event also satisfies, most specific first.
    fn supertypes(&self) -> Vec<Self::Kind> {
        Vec::new()
    }

    /// Whether this is the transport's shutdown signal.
    fn is_shutdown(&self) -> bool {
        false
    }
}

pub type Predicate<E> = Box<dyn Fn(&E) -> bool + Send + Sync + 'static>;
pub type MatchAction<E> = Box<dyn FnOnce(E) + Send + Sync + 'static>;
pub type TimeoutAction = Box<dyn FnOnce() + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WaitId(Uuid);

impl WaitId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for WaitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one pending registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WaitHandle<K> {
    id: WaitId,
    kind: K,
    deadline: Option<Instant>,
}

impl<K> WaitHandle<K> {
    pub fn id(&self) -> WaitId {
        self.id
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

/// When a wait expires and what runs if it does.
pub struct Expiry {
    delay: Duration,
    action: Option<TimeoutAction>,
}

impl Expiry {
    pub fn after(delay: Duration) -> Self {
        Self {
            delay,
            action: None,
        }
    }

    pub fn then(mut self, action: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.action = Some(Box::new(action));
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Debug for Expiry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Expiry")
            .field("delay", &self.delay)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// A pending registration. Consumed exactly once, by a match or by expiry.
pub struct WaitEntry<E: WaitEvent> {
    id: WaitId,
    kind: E::Kind,
    predicate: Predicate<E>,
    on_match: MatchAction<E>,
    deadline: Option<Instant>,
    on_timeout: Option<TimeoutAction>,
}

impl<E: WaitEvent> Debug for WaitEntry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitEntry")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("deadline", &self.deadline)
            .field("has_timeout_action", &self.on_timeout.is_some())
            .finish()
    }
}

/// Result of routing one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The event was consumed by this wait.
    Matched(WaitId),
    /// No pending wait accepted the event.
    Unmatched,
    /// The event was the shutdown signal; the registry is now closed.
    Shutdown,
    /// The registry was already closed; the event was ignored.
    Closed,
}

struct RegistryInner<E: WaitEvent> {
    waiting: DashMap<E::Kind, VecDeque<WaitEntry<E>>>,
    closed: AtomicBool,
    scheduler: Arc<dyn TimeoutScheduler>,
}

/// # WaitRegistry
///
/// Process-wide registry of pending waits. Cloning yields another handle to the same
/// registry.
pub struct WaitRegistry<E: WaitEvent> {
    inner: Arc<RegistryInner<E>>,
}

impl<E: WaitEvent> Clone for WaitRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<E: WaitEvent> WaitRegistry<E> {
    pub fn new(scheduler: Arc<dyn TimeoutScheduler>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                waiting: DashMap::new(),
                closed: AtomicBool::new(false),
                scheduler,
            }),
        }
    }

    /// Creates a registry whose timers run on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `WaitError::NoRuntime` outside of a tokio runtime.
    pub fn with_tokio() -> WaitResult<Self> {
        Ok(Self::new(Arc::new(TokioScheduler::current()?)))
    }

    /// Starts a registration for `kind`.
    ///
    /// ```rust,no_run
    /// # use std::time::Duration;
    /// # use eventwaiter::event::{Event, EventKind, WaitRegistry};
    /// # fn example(waiter: &WaitRegistry<Event>) -> Result<(), Box<dyn std::error::Error>> {
    /// waiter
    ///     .wait_for(EventKind::MessageReceived)
    ///     .filter(|event: &Event| event.actor().is_some_and(|a| a.as_str() == "alice"))
    ///     .timeout(Duration::from_secs(30), || println!("alice never answered"))
    ///     .run(|event| println!("alice said {:?}", event))?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn wait_for(&self, kind: E::Kind) -> WaitBuilder<'_, E> {
        WaitBuilder {
            registry: self,
            kind,
            predicate: None,
            expiry: None,
        }
    }

    /// Appends a wait for `kind` behind any already pending for the same kind.
    ///
    /// # Errors
    ///
    /// Returns `WaitError::Closed` once the registry has shut down.
    #[instrument(skip_all, fields(kind = ?kind))]
    pub fn register(
        &self,
        kind: E::Kind,
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
        on_match: impl FnOnce(E) + Send + Sync + 'static,
        expiry: Option<Expiry>,
    ) -> WaitResult<WaitHandle<E::Kind>> {
        self.insert(kind, Box::new(predicate), Box::new(on_match), expiry)
    }

    fn insert(
        &self,
        kind: E::Kind,
        predicate: Predicate<E>,
        on_match: MatchAction<E>,
        expiry: Option<Expiry>,
    ) -> WaitResult<WaitHandle<E::Kind>> {
        if self.is_closed() {
            return Err(WaitError::Closed);
        }

        let id = WaitId::new();
        let (delay, on_timeout) = match expiry {
            Some(Expiry { delay, action }) => (Some(delay), action),
            None => (None, None),
        };
        let deadline = delay.map(|d| Instant::now() + d);
        let handle = WaitHandle {
            id,
            kind: kind.clone(),
            deadline,
        };

        self.inner
            .waiting
            .entry(kind.clone())
            .or_default()
            .push_back(WaitEntry {
                id,
                kind,
                predicate,
                on_match,
                deadline,
                on_timeout,
            });

        // shutdown may have cleared the map between the check above and the insert
        if self.is_closed() {
            self.take(&handle);
            return Err(WaitError::Closed);
        }

        if let Some(delay) = delay {
            let registry = Arc::downgrade(&self.inner);
            let timer_handle = handle.clone();
            self.inner.scheduler.schedule_once(
                delay,
                Box::new(move || expire(registry, &timer_handle)),
            );
        }

        trace!(%id, "Wait registered");
        Ok(handle)
    }

    /// Routes `event` to the oldest pending wait that accepts it.
    ///
    /// The shutdown signal closes the registry instead of being matched.
    pub fn dispatch(&self, event: E) -> Dispatch {
        if self.is_closed() {
            trace!("Registry closed, ignoring event");
            return Dispatch::Closed;
        }
        if event.is_shutdown() {
            self.shutdown();
            return Dispatch::Shutdown;
        }

        let mut kinds = vec![event.kind()];
        kinds.extend(event.supertypes());

        for kind in kinds {
            let matched = match self.inner.waiting.get_mut(&kind) {
                Some(mut queue) => queue
                    .iter()
                    .position(|entry| (entry.predicate)(&event))
                    .and_then(|index| queue.remove(index)),
                None => None,
            };

            if let Some(WaitEntry { id, on_match, .. }) = matched {
                trace!(%id, ?kind, "Wait matched");
                self.prune(&kind);
                on_match(event);
                return Dispatch::Matched(id);
            }
        }
        Dispatch::Unmatched
    }

    /// Removes the wait if it is still pending and runs its timeout action.
    ///
    /// Returns `false` when the wait was already matched, cancelled or dropped by
    /// shutdown; nothing runs in that case.
    pub fn cancel_on_timeout(&self, handle: &WaitHandle<E::Kind>) -> bool {
        match self.take(handle) {
            Some(entry) => {
                debug!(id = %entry.id, kind = ?entry.kind, "Wait expired");
                if let Some(action) = entry.on_timeout {
                    action();
                }
                true
            }
            None => {
                trace!(id = %handle.id, "Expired wait already resolved");
                false
            }
        }
    }

    /// Removes the wait if it is still pending without running any callback.
    pub fn cancel(&self, handle: &WaitHandle<E::Kind>) -> bool {
        let removed = self.take(handle).is_some();
        if removed {
            debug!(id = %handle.id, "Wait cancelled");
        }
        removed
    }

    /// Closes the registry and drops every pending wait without running callbacks.
    /// Idempotent.
    pub fn shutdown(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.scheduler.shutdown();
        let dropped: usize = self.inner.waiting.iter().map(|queue| queue.len()).sum();
        self.inner.waiting.clear();
        info!(dropped, "Wait registry shut down");
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    pub fn is_pending(&self, handle: &WaitHandle<E::Kind>) -> bool {
        self.inner
            .waiting
            .get(&handle.kind)
            .is_some_and(|queue| queue.iter().any(|entry| entry.id == handle.id))
    }

    /// Number of waits pending for `kind`.
    pub fn pending(&self, kind: &E::Kind) -> usize {
        self.inner
            .waiting
            .get(kind)
            .map(|queue| queue.len())
            .unwrap_or(0)
    }

    /// Waits for the next event of `kind` accepted by `predicate`.
    ///
    /// The registration is withdrawn when the timeout elapses or the returned future
    /// is dropped.
    ///
    /// # Errors
    ///
    /// * `WaitError::Timeout` - no matching event arrived in time
    /// * `WaitError::Cancelled` - the registry shut down while waiting
    /// * `WaitError::Closed` - the registry was already closed
    #[instrument(skip(self, predicate))]
    pub async fn next(
        &self,
        kind: E::Kind,
        predicate: impl Fn(&E) -> bool + Send + Sync + 'static,
        timeout: Duration,
    ) -> WaitResult<E> {
        let (tx, mut rx) = oneshot::channel();
        let handle = self.register(
            kind,
            predicate,
            move |event| {
                // the receiver is gone only if the caller stopped waiting
                let _ = tx.send(event);
            },
            None,
        )?;
        let _guard = CancelOnDrop {
            registry: self,
            handle: &handle,
        };

        let sleep = tokio::time::sleep(timeout);
        tokio::pin!(sleep);

        tokio::select! {
            result = &mut rx => result.map_err(|_| WaitError::Cancelled),
            _ = &mut sleep => {
                if self.cancel(&handle) {
                    Err(WaitError::Timeout(timeout))
                } else {
                    // a dispatch removed the entry first; its value is on the way
                    rx.await.map_err(|_| WaitError::Cancelled)
                }
            }
        }
    }

    fn take(&self, handle: &WaitHandle<E::Kind>) -> Option<WaitEntry<E>> {
        let entry = self
            .inner
            .waiting
            .get_mut(&handle.kind)
            .and_then(|mut queue| {
                let index = queue.iter().position(|entry| entry.id == handle.id)?;
                queue.remove(index)
            });
        if entry.is_some() {
            self.prune(&handle.kind);
        }
        entry
    }

    fn prune(&self, kind: &E::Kind) {
        self.inner.waiting.remove_if(kind, |_, queue| queue.is_empty());
    }
}

fn expire<E: WaitEvent>(registry: Weak<RegistryInner<E>>, handle: &WaitHandle<E::Kind>) {
    if let Some(inner) = registry.upgrade() {
        WaitRegistry { inner }.cancel_on_timeout(handle);
    }
}

struct CancelOnDrop<'a, E: WaitEvent> {
    registry: &'a WaitRegistry<E>,
    handle: &'a WaitHandle<E::Kind>,
}

impl<E: WaitEvent> Drop for CancelOnDrop<'_, E> {
    fn drop(&mut self) {
        self.registry.cancel(self.handle);
    }
}

/// Builder returned by [`WaitRegistry::wait_for`].
pub struct WaitBuilder<'a, E: WaitEvent> {
    registry: &'a WaitRegistry<E>,
    kind: E::Kind,
    predicate: Option<Predicate<E>>,
    expiry: Option<Expiry>,
}

impl<E: WaitEvent> WaitBuilder<'_, E> {
    /// Only events accepted by `predicate` match. Without a filter any event of the
    /// kind matches.
    pub fn filter(mut self, predicate: impl Fn(&E) -> bool + Send + Sync + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    pub fn timeout(mut self, delay: Duration, action: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.expiry = Some(Expiry::after(delay).then(action));
        self
    }

    /// Expires silently after `delay`.
    pub fn expire_after(mut self, delay: Duration) -> Self {
        self.expiry = Some(Expiry::after(delay));
        self
    }

    pub fn run(
        self,
        on_match: impl FnOnce(E) + Send + Sync + 'static,
    ) -> WaitResult<WaitHandle<E::Kind>> {
        let predicate = self.predicate.unwrap_or_else(|| Box::new(|_: &E| true));
        self.registry
            .insert(self.kind, predicate, Box::new(on_match), self.expiry)
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum WaitError {
    #[error("Wait registry is closed")]
    Closed,
    #[error("Wait timed out after {0:?}")]
    Timeout(Duration),
    #[error("Wait cancelled")]
    Cancelled,
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),
}

pub type WaitResult<T> = Result<T, WaitError>;

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum SignalKind {
        Selection,
        Other,
        Any,
        Stop,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Signal {
        Selection(u32),
        Other(u32),
        Stop,
    }

    impl WaitEvent for Signal {
        type Kind = SignalKind;

        fn kind(&self) -> SignalKind {
            match self {
                Signal::Selection(_) => SignalKind::Selection,
                Signal::Other(_) => SignalKind::Other,
                Signal::Stop => SignalKind::Stop,
            }
        }

        fn supertypes(&self) -> Vec<SignalKind> {
            match self {
                Signal::Stop => Vec::new(),
                _ => vec![SignalKind::Any],
            }
        }

        fn is_shutdown(&self) -> bool {
            matches!(self, Signal::Stop)
        }
    }

    fn value_is(expected: u32) -> impl Fn(&Signal) -> bool + Send + Sync + 'static {
        move |signal| matches!(signal, Signal::Selection(v) if *v == expected)
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn bump(counter: &Arc<AtomicUsize>) -> impl FnOnce() + Send + Sync + 'static {
        let counter = counter.clone();
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_match_before_deadline_suppresses_timeout() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let received = Arc::new(Mutex::new(None));
        let timeouts = counter();

        let slot = received.clone();
        waiter
            .register(
                SignalKind::Selection,
                value_is(3),
                move |signal| *slot.lock().unwrap() = Some(signal),
                Some(Expiry::after(Duration::from_millis(100)).then(bump(&timeouts))),
            )
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(matches!(
            waiter.dispatch(Signal::Selection(3)),
            Dispatch::Matched(_)
        ));
        assert_eq!(*received.lock().unwrap(), Some(Signal::Selection(3)));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(timeouts.load(Ordering::SeqCst), 0);
        assert_eq!(waiter.pending(&SignalKind::Selection), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_fires_exactly_once() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let matches = counter();
        let timeouts = counter();

        let on_match = bump(&matches);
        let handle = waiter
            .wait_for(SignalKind::Selection)
            .filter(value_is(3))
            .timeout(Duration::from_millis(100), bump(&timeouts))
            .run(move |_| on_match())
            .unwrap();

        tokio::time::sleep(Duration::from_millis(99)).await;
        assert_eq!(timeouts.load(Ordering::SeqCst), 0);
        assert!(waiter.is_pending(&handle));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(timeouts.load(Ordering::SeqCst), 1);
        assert!(!waiter.is_pending(&handle));

        // late event and late timer are both no-ops
        assert_eq!(waiter.dispatch(Signal::Selection(3)), Dispatch::Unmatched);
        assert!(!waiter.cancel_on_timeout(&handle));
        assert_eq!(matches.load(Ordering::SeqCst), 0);
        assert_eq!(timeouts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_oldest_matching_wait_wins() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let order = order.clone();
            waiter
                .register(
                    SignalKind::Selection,
                    |_| true,
                    move |_| order.lock().unwrap().push(name),
                    None,
                )
                .unwrap();
        }

        waiter.dispatch(Signal::Selection(1));
        assert_eq!(*order.lock().unwrap(), vec!["first"]);
        waiter.dispatch(Signal::Selection(2));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_rejected_event_keeps_wait_pending() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let matches = counter();
        let on_match = bump(&matches);

        let handle = waiter
            .register(SignalKind::Selection, value_is(3), move |_| on_match(), None)
            .unwrap();

        assert_eq!(waiter.dispatch(Signal::Selection(4)), Dispatch::Unmatched);
        assert_eq!(waiter.dispatch(Signal::Other(3)), Dispatch::Unmatched);
        assert!(waiter.is_pending(&handle));

        assert_eq!(waiter.dispatch(Signal::Selection(3)), Dispatch::Matched(handle.id()));
        assert_eq!(matches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_specific_kind_is_tried_before_supertype() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let hits = Arc::new(Mutex::new(Vec::new()));

        let any_hits = hits.clone();
        waiter
            .register(SignalKind::Any, |_| true, move |_| any_hits.lock().unwrap().push("any"), None)
            .unwrap();
        let specific_hits = hits.clone();
        waiter
            .register(
                SignalKind::Other,
                |_| true,
                move |_| specific_hits.lock().unwrap().push("other"),
                None,
            )
            .unwrap();

        waiter.dispatch(Signal::Other(1));
        waiter.dispatch(Signal::Selection(1));
        assert_eq!(*hits.lock().unwrap(), vec!["other", "any"]);
    }

    #[tokio::test]
    async fn test_match_action_can_register_again() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let chained = waiter.clone();
        let first_seen = seen.clone();
        waiter
            .register(
                SignalKind::Selection,
                |_| true,
                move |signal| {
                    first_seen.lock().unwrap().push(signal);
                    let second_seen = first_seen.clone();
                    chained
                        .register(
                            SignalKind::Selection,
                            |_| true,
                            move |signal| second_seen.lock().unwrap().push(signal),
                            None,
                        )
                        .unwrap();
                },
                None,
            )
            .unwrap();

        waiter.dispatch(Signal::Selection(1));
        assert_eq!(waiter.pending(&SignalKind::Selection), 1);
        waiter.dispatch(Signal::Selection(2));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Signal::Selection(1), Signal::Selection(2)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_drops_waits_silently() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let fired = counter();

        let on_match = bump(&fired);
        waiter
            .register(
                SignalKind::Selection,
                |_| true,
                move |_| on_match(),
                Some(Expiry::after(Duration::from_millis(10)).then(bump(&fired))),
            )
            .unwrap();

        assert_eq!(waiter.dispatch(Signal::Stop), Dispatch::Shutdown);
        assert!(waiter.is_closed());
        assert_eq!(waiter.pending(&SignalKind::Selection), 0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(waiter.dispatch(Signal::Selection(1)), Dispatch::Closed);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        let rejected = waiter.register(SignalKind::Selection, |_| true, |_| {}, None);
        assert_eq!(rejected.unwrap_err(), WaitError::Closed);

        waiter.shutdown();
        assert!(waiter.is_closed());
    }

    #[tokio::test]
    async fn test_cancel_removes_without_callbacks() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();
        let fired = counter();
        let on_match = bump(&fired);

        let handle = waiter
            .register(
                SignalKind::Selection,
                |_| true,
                move |_| on_match(),
                Some(Expiry::after(Duration::from_secs(60)).then(bump(&fired))),
            )
            .unwrap();

        assert!(waiter.cancel(&handle));
        assert!(!waiter.cancel(&handle));
        assert!(!waiter.cancel_on_timeout(&handle));
        assert_eq!(waiter.dispatch(Signal::Selection(1)), Dispatch::Unmatched);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_resolves_with_matching_event() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();

        let sender = waiter.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            sender.dispatch(Signal::Selection(2));
            sender.dispatch(Signal::Selection(3));
        });

        let event = waiter
            .next(SignalKind::Selection, value_is(3), Duration::from_millis(100))
            .await
            .unwrap();
        assert_eq!(event, Signal::Selection(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_times_out_and_withdraws() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();

        let result = waiter
            .next(SignalKind::Selection, value_is(3), Duration::from_millis(100))
            .await;

        assert_eq!(result, Err(WaitError::Timeout(Duration::from_millis(100))));
        assert_eq!(waiter.pending(&SignalKind::Selection), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_is_cancelled_by_shutdown() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();

        let closer = waiter.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            closer.dispatch(Signal::Stop);
        });

        let result = waiter
            .next(SignalKind::Selection, |_| true, Duration::from_secs(5))
            .await;
        assert_eq!(result, Err(WaitError::Cancelled));
    }

    #[tokio::test]
    async fn test_dropped_next_withdraws_registration() {
        let waiter = WaitRegistry::<Signal>::with_tokio().unwrap();

        let pending = waiter.next(SignalKind::Selection, |_| true, Duration::from_secs(5));
        let outcome = tokio::time::timeout(Duration::from_millis(10), pending).await;

        assert!(outcome.is_err());
        assert_eq!(waiter.pending(&SignalKind::Selection), 0);
    }
}
