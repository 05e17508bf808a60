//! Typed error taxonomy for interpreted engine responses.

use std::fmt;
use std::time::Duration;

use crate::exec::CommandResult;

/// The resource domain an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Container,
    Image,
    Network,
    Node,
    Service,
    Task,
    Config,
    Context,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Container => "container",
            Self::Image => "image",
            Self::Network => "network",
            Self::Node => "node",
            Self::Service => "service",
            Self::Task => "task",
            Self::Config => "config",
            Self::Context => "context",
        };
        f.write_str(label)
    }
}

/// Everything that can go wrong driving the engine.
///
/// [`is_transient`](Error::is_transient) separates failures worth retrying
/// (the daemon is temporarily unreachable, the binary briefly failed to
/// start) from domain errors where a retry would only hide bugs.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The referenced resource does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: ResourceKind, id: String },

    /// The resource exists but is held by something else.
    #[error("{kind} {id} is in use: {detail}")]
    InUse {
        kind: ResourceKind,
        id: String,
        detail: String,
    },

    /// The engine rejected the request for lack of authority, including
    /// swarm operations issued against a non-manager node.
    #[error("permission denied: {detail}")]
    PermissionDenied { detail: String },

    /// The engine does not support the requested feature.
    #[error("unsupported by this engine: {feature} ({remediation})")]
    Unsupported { feature: String, remediation: String },

    /// The request was malformed or semantically invalid.
    #[error("invalid argument: {detail}")]
    InvalidArgument { detail: String },

    /// The engine daemon could not be reached.
    #[error("cannot reach the engine daemon: {detail}")]
    DaemonUnreachable { detail: String },

    /// A deadline expired before the operation converged.
    #[error("timed out after {waited:?} (last error: {})", last_error.as_deref().unwrap_or("none"))]
    Timeout {
        waited: Duration,
        last_error: Option<String>,
    },

    /// The caller cancelled the operation.
    #[error("operation interrupted")]
    Interrupted,

    /// Starting or talking to the engine process failed at the I/O level.
    #[error("engine process I/O failure: {0}")]
    Io(#[from] std::io::Error),

    /// The engine produced output no registered rule recognizes. Carries
    /// the complete invocation record so nothing is lost.
    #[error("unexpected engine response\n{0}")]
    Unexpected(Box<CommandResult>),
}

impl Error {
    /// Whether a retry might succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::DaemonUnreachable { .. } | Self::Io(_))
    }

    /// Build the catch-all error for an unclassifiable response.
    #[must_use]
    pub fn unexpected(result: CommandResult) -> Self {
        Self::Unexpected(Box::new(result))
    }
}
