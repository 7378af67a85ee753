/// Error type shared by the gateway, the view model builder and the group service
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TabError {
    /// The host rejected a windows/tabs/tabGroups call
    #[error("{call} failed: {message}")]
    Host { call: &'static str, message: String },

    /// The host answered with something we could not decode
    #[error("could not decode {what}: {message}")]
    Decode { what: &'static str, message: String },

    #[error("unknown group color: {0}")]
    UnknownColor(String),

    #[error("invalid popup config: {0}")]
    InvalidConfig(String),

    /// The same kind of mutation is still waiting on the host
    #[error("{0} already in progress")]
    Busy(&'static str),
}

pub type Result<T> = std::result::Result<T, TabError>;
