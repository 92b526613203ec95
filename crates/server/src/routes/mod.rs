mod health;
mod maps;
mod messages;
pub mod sse;
mod vetoes;

pub use health::*;
pub use maps::*;
pub use messages::*;
pub use vetoes::*;
