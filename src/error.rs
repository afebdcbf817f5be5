use thiserror::Error;

/// Failure taxonomy for resource inspection.
///
/// Parse and decode failures indicate a contract violation by the
/// upstream data source and abort the whole operation; there is no
/// partial-success mode and no retry at this layer.
#[derive(Debug, Error)]
pub enum InspectError {
    /// Identifier does not match the `domain:key=val,...` shape.
    #[error("malformed resource identifier: {0}")]
    MalformedIdentifier(String),

    /// A wire value carries a kind this decoder does not recognize,
    /// meaning the producer and this decoder have drifted apart.
    #[error("unknown wire value kind: {0}")]
    UnknownValueKind(String),

    /// The live inspection source could not be reached.
    #[error("inspection source unavailable: {0}")]
    SourceUnavailable(String),

    /// A single-resource lookup matched nothing.
    #[error("no resource found for identifier: {0}")]
    NotFound(String),
}

impl InspectError {
    /// Check if this error should be rendered as the distinct
    /// "not connected" state instead of a generic failure.
    pub fn is_not_connected(&self) -> bool {
        matches!(self, InspectError::SourceUnavailable(_))
    }
}
