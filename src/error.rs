//! Error handling for the sysreport crate.

/// A specialized `Result` type for sysreport operations.
pub type Result<T> = std::result::Result<T, SystemError>;

/// The main error type for OS queries and snapshot assembly.
#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A system call returned an errno
    #[error("OS error: {0}")]
    Os(#[from] nix::errno::Errno),

    /// System information parsing failed
    #[error("Failed to parse system information: {0}")]
    ParseError(String),

    /// The host cannot report this metric
    #[error("Not supported on this host: {0}")]
    Unsupported(String),

    /// The host returned readings that contradict each other
    #[error("Inconsistent readings: {0}")]
    Inconsistent(String),

    /// Generic system error
    #[error("System error: {0}")]
    System(String),
}

impl SystemError {
    /// Create a new parse error
    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    /// Create a new unsupported-metric error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::Unsupported(msg.into())
    }

    /// Create a new inconsistency error
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        Self::Inconsistent(msg.into())
    }

    /// Create a new generic system error
    #[allow(clippy::self_named_constructors)]
    pub fn system_error(msg: impl Into<String>) -> Self {
        Self::System(msg.into())
    }
}
