//! # AERIE Streaming
//!
//! Moves chunk generation off the consumer thread.
//!
//! The generator in `aerie_procedural` is pure and synchronous. This crate
//! wraps it in a worker pool that tracks which coordinates are in flight,
//! delivers results in completion order keyed by coordinate, and drops
//! results that were cancelled while being generated.
//!
//! Deciding *which* chunks to request (view distance, unloading) is left to
//! the caller.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod dispatcher;
pub mod error;

pub use dispatcher::{ChunkDispatcher, DispatchStats};
pub use error::{DispatchError, DispatchResult};
