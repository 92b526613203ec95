//! Event system for the map veto service
//!
//! This crate provides the event bus and event types used to tell
//! presentation layers about veto lifecycle changes.

mod bus;
mod types;

pub use bus::{ChannelSubscription, EventBus};
pub use types::*;
