use thiserror::Error;

/// Canonical result for producer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A source, transform or traversal step unwound while the producer was
    /// between states. The head it was working on is gone for good.
    #[error("producer was poisoned by a failed decomposition step")]
    Poisoned,

    #[error("owner must be attached before the first pull")]
    AlreadyStarted,
}
