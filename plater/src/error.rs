use thiserror::Error;

/// Errors raised by the arrangement engine.
///
/// Both variants are configuration errors: they are detected before any work is done.
/// Footprints that cannot be placed are *not* errors, they are reported through
/// [`Arrangement::n_unplaced`](crate::entities::Arrangement::n_unplaced).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ArrangeError {
    /// The work area has zero or negative extent, or could not be converted to the scaled space.
    #[error("invalid work area: {0}")]
    InvalidWorkArea(String),

    /// One of the arrangement options is out of range.
    #[error("invalid arrangement config: {0}")]
    InvalidConfig(String),
}
