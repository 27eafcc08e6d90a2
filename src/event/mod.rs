//! # Event Waiting
//!
//! The event subsystem routes a single stream of transport events to many
//! independent "wait for the next matching event" registrations.
//!
//! ## Architecture Overview
//!
//! - **EventBus**: inbound transport boundary, a broadcast channel of [`Event`]s
//! - **WaitRegistry**: pending waits keyed by event kind, matched oldest-first
//! - **TimeoutScheduler**: one-shot timers that expire waits nobody answered
//!
//! ## Event Flow
//!
//! ```text
//! ┌─────────┐     ┌──────────┐     ┌──────────────┐     ┌──────────┐
//! │Transport│────▶│ EventBus │────▶│ WaitRegistry │────▶│ on_match │
//! └─────────┘     └──────────┘     └──────┬───────┘     └──────────┘
//!                                         │ remove by id
//!                                  ┌──────┴───────┐     ┌────────────┐
//!                                  │  Scheduler   │────▶│ on_timeout │
//!                                  └──────────────┘     └────────────┘
//! ```
//!
//! A match and a timeout for the same wait both try to remove it by identity; only
//! the one that succeeds runs its callback.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! # use std::time::Duration;
//! # use eventwaiter::event::{Event, EventKind, WaitRegistry};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let waiter = WaitRegistry::<Event>::with_tokio()?;
//!
//! waiter
//!     .wait_for(EventKind::ReactionAdded)
//!     .filter(|event: &Event| event.actor().is_some_and(|a| a.as_str() == "alice"))
//!     .timeout(Duration::from_secs(20), || println!("no reaction from alice"))
//!     .run(|event| println!("alice reacted: {:?}", event))?;
//!
//! waiter.dispatch(Event::reaction("m1", "c1", "alice", "👍"));
//! # Ok(())
//! # }
//! ```

pub mod event_bus;
pub mod scheduler;
pub mod types;
pub mod waiter;

pub use event_bus::{EventBus, EventError, EventReceiver, EventResult};
pub use scheduler::{TimeoutScheduler, TimerCallback, TokioScheduler};
pub use types::{ActorId, ArtifactId, ChannelId, Event, EventKind, RoleId};
pub use waiter::{
    Dispatch, Expiry, WaitBuilder, WaitError, WaitEvent, WaitHandle, WaitId, WaitRegistry,
    WaitResult,
};
