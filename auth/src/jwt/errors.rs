use thiserror::Error;

/// Error type for token issuing and parsing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    Expired,

    #[error("Unexpected signing algorithm: {0}")]
    InvalidAlgorithm(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}

/// Error for rejected token service configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenConfigError {
    #[error("{0} secret must not be empty")]
    EmptySecret(&'static str),

    #[error("Access and refresh tokens must be signed with different secrets")]
    SharedSecret,

    #[error("{0} token lifetime must be positive")]
    NonPositiveDuration(&'static str),

    #[error("{0} token lifetime is out of range")]
    DurationOutOfRange(&'static str),
}
