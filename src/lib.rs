//! # eventwaiter: Event Waiting and Interactive Menus
//!
//! eventwaiter lets application code suspend a piece of logic until the next
//! matching event arrives from a chat transport, and builds multi-step
//! interactive menus on top of that primitive.
//!
//! ## Building Blocks
//!
//! ### 1. Wait Registry
//! The [`event`] module keeps pending waits keyed by event kind:
//! - Oldest-first matching with a caller-supplied predicate
//! - Optional per-wait timeout with a timeout action
//! - Exactly one of match or timeout runs for each wait
//! - Shutdown drops every pending wait silently
//!
//! ### 2. Transport Boundary
//! Events arrive through an [`event::EventBus`]; rendered artifacts leave through
//! an [`menu::ArtifactSink`]. Neither side knows about the other.
//!
//! ### 3. Menus
//! The [`menu`] module provides button menus, ordered menus, paginators,
//! selection dialogs and slideshows. Each is a small state machine that keeps
//! exactly one wait registered while it is displayed.
//!
//! ## Event Pipeline
//!
//! ```text
//! Transport → EventBus → WaitRegistry::listen → dispatch → menu step → ArtifactSink
//! ```
//!
//! Configuration ([`config`]) supplies bus capacity and menu defaults; crate-wide
//! errors are collected in [`error`]. The [`testing`] module holds in-memory
//! collaborators for driving menus without a transport.

pub mod config;
pub mod error;
pub mod event;
pub mod menu;
pub mod testing;

// Re-exports
pub use error::*;
pub use event::*;
