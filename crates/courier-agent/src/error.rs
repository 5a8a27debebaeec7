use thiserror::Error;

/// Failures of the single agent call. The relay matches on these variants,
/// so they stay typed rather than collapsing into an opaque error.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Agent call exceeded its time bound")]
    Timeout,

    #[error("Agent returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Agent transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Agent returned a malformed payload: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
