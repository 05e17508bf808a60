//! dockhand - typed async client over the Docker CLI.
//!
//! Every operation shells out to the engine binary, captures its output on
//! concurrently drained streams, and interprets the result into an
//! immutable snapshot or a typed error. Transient daemon failures are
//! retried against a caller-supplied deadline; domain errors surface
//! immediately.

pub mod build;
pub mod classify;
pub mod client;
pub mod config;
pub mod display;
pub mod exec;
pub mod resource;
pub mod retry;
pub mod watch;

pub use classify::{Error, ResourceKind};
pub use client::Docker;
pub use retry::{Deadline, Retry};
