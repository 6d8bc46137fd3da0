//! Subcommand handlers. Each takes the shared `Session` and prints its
//! results to stdout; diagnostics go through tracing to stderr.

pub mod auth;
pub mod item;
pub mod space;
pub mod tracker;
