/// Alias for `Result<T, KmError>`.
pub type KmResult<T> = Result<T, KmError>;

/// Errors that can occur when reading or building kingdom data.
#[derive(Debug, thiserror::Error)]
pub enum KmError {
    /// A name did not match any variant of a keyword enum.
    #[error("unknown {kind}: \"{name}\"")]
    UnknownName {
        /// Which enum was being parsed (e.g. "skill", "activity").
        kind: &'static str,
        /// The text that failed to parse.
        name: String,
    },

    /// Structure data supplied by the host failed to parse or validate.
    #[error("malformed structure data for \"{name}\": {reason}")]
    MalformedStructure {
        /// The settlement or structure the data belongs to.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A value is outside the range the kingdom rules allow.
    #[error("validation error: {0}")]
    Validation(String),
}
