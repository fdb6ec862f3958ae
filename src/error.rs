use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the flow engine. All of them are precondition
/// violations; nothing here is transient.
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("failed to read config {}: {source}", .path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, FlowError>;

/// Smallest frame side accepted by the gradient stencils.
pub const MIN_SIDE: usize = 2;

/// Checks that `(w, h)` is at least `MIN_SIDE` in both directions.
pub(crate) fn ensure_min_dims(what: &str, w: usize, h: usize) -> Result<()> {
    if w < MIN_SIDE || h < MIN_SIDE {
        return Err(FlowError::DimensionMismatch(format!(
            "{what} is {w}x{h}, needs at least {MIN_SIDE}x{MIN_SIDE}"
        )));
    }
    Ok(())
}

/// Checks that two planes share a shape.
pub(crate) fn ensure_same_dims(
    what: &str,
    expected: (usize, usize),
    found: (usize, usize),
) -> Result<()> {
    if expected != found {
        return Err(FlowError::DimensionMismatch(format!(
            "{what} is {}x{}, expected {}x{}",
            found.0, found.1, expected.0, expected.1
        )));
    }
    Ok(())
}
