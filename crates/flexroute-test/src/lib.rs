//! Shared test utilities for flexroute crates.
//!
//! - [`fixtures`]: small instances with known optima and the five-node
//!   demonstration instance
//! - [`ReplayEngine`]: a backend that records the model and checks a
//!   caller-supplied assignment against it

pub mod fixtures;
mod replay;

pub use replay::{RecordedRow, RecordedVar, ReplayEngine, RowSense};
