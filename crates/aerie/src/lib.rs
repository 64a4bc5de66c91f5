//! # AERIE
//!
//! Front end for the floating terrain generator.
//!
//! - `cli`: Argument parsing for `chunkgen`
//! - `report`: Per-chunk statistics

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cli;
pub mod report;

pub use aerie_procedural as procedural;
pub use aerie_streaming as streaming;
