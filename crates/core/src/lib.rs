//! Map veto domain.
//!
//! Two teams alternately ban and pick maps from a pool, following the action
//! sequence of a best-of-1, best-of-3 or best-of-5 format, until a single
//! decider remains.

pub mod domain;
pub mod error;
pub mod mentions;

pub use domain::*;
pub use error::{Result, VetoError};
