use thiserror::Error;

/// Failure to parse a [`TruncatePosition`](crate::truncate::TruncatePosition).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseTruncatePositionError {
    #[error("truncate position is empty")]
    Empty,

    #[error("unknown truncate position: {value} (expected start, middle or end)")]
    Unknown { value: String },
}

/// Failure to parse a [`WidthPolicy`](crate::config::WidthPolicy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseWidthPolicyError {
    #[error("width policy is empty")]
    Empty,

    #[error("unknown width policy: {value} (expected narrow, wide or a boolean)")]
    Unknown { value: String },
}
