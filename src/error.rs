use thiserror::Error;

/// Failures the reporting pipeline surfaces to its caller. None of these
/// abort the process; the CLI maps them to user-facing states.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("authentication rejected by the upstream API (status {status})")]
    AuthRejected { status: u16 },

    #[error("course fetch failed with status {status}")]
    FetchFailed { status: u16 },

    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),

    #[error("malformed course payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("course query rejected: {0}")]
    QueryRejected(String),

    #[error("unknown field id `{id}`")]
    UnknownField { id: String },
}
