//! Library half of the `portal` command-line client.
//!
//! The binary wires these together with the argument parser and the
//! table output; they live here so integration tests can reach them.

pub mod config;
pub mod logging;
pub mod script;
pub mod seed;
