//! Engine process execution.
//!
//! Everything in this crate ultimately funnels through this module: one
//! [`Invocation`] describes a single run of the engine binary, [`run`]
//! executes it to completion with both output streams drained concurrently,
//! and [`stream`] keeps the process alive and hands stdout to the caller one
//! line at a time.

mod command;
mod result;
mod runner;
mod stream;

pub use command::Invocation;
pub use result::CommandResult;
pub use runner::run;
pub use stream::{stream, StreamingChild};

pub(crate) use result::exit_code_of;
pub(crate) use runner::{default_working_dir, drain, spawn_piped};
