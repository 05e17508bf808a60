//! Long-running build observation.

mod observer;

pub use observer::{BuildObserver, BuildOutcome};
