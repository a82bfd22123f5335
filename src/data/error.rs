use thiserror::Error;

/// Typed failures of the data layer.
///
/// Loader functions wrap these in `anyhow::Error` with file context; callers
/// that care about the kind can `downcast_ref::<DataError>()`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    /// A row is missing a required field or a field does not parse.
    #[error("row {row}: {message}")]
    Parse { row: usize, message: String },

    /// A label outside the fixed label set of a category.
    #[error("unknown {kind} label: '{label}'")]
    UnknownLabel { kind: &'static str, label: String },

    /// An integer code outside 1..=4.
    #[error("unknown {kind} code: {code}")]
    UnknownCode { kind: &'static str, code: i64 },

    /// A required column is absent from the header / schema.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
