//! Registry of active vetoes, at most one per channel.
//!
//! Every start, action, cancellation and eviction goes through
//! [`SessionRegistry`], which is what keeps "one active veto per channel"
//! true under concurrent requests.

mod registry;

pub use registry::SessionRegistry;
