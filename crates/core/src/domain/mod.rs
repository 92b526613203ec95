mod format;
mod pool;
mod session;
mod snapshot;

pub use format::*;
pub use pool::*;
pub use session::*;
pub use snapshot::*;

/// Opaque identifier of the channel a veto runs in.
pub type ChannelId = u64;

/// Opaque identifier of a participant.
pub type UserId = u64;
