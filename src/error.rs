use std::fmt;

/// Every contract violation the library can report.
///
/// Shape and range errors are programmer errors: nothing is broadcast,
/// truncated or reshaped to make an operation succeed.
#[derive(Debug)]
pub enum NnError {
    /// Operand shapes do not satisfy the operation's contract.
    ShapeMismatch {
        op: &'static str,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// A row or column index lies outside `0..bound`.
    OutOfRange { index: usize, bound: usize },
    /// Backing storage for a `rows x cols` matrix could not be obtained.
    AllocationFailure { rows: usize, cols: usize },
    InvalidArchitecture(String),
    Config(String),
    Io(std::io::Error),
}

pub type Result<T> = std::result::Result<T, NnError>;

impl fmt::Display for NnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NnError::ShapeMismatch { op, expected, actual } => write!(
                f,
                "{op}: expected {}x{}, got {}x{}",
                expected.0, expected.1, actual.0, actual.1
            ),
            NnError::OutOfRange { index, bound } => {
                write!(f, "index {index} out of range for length {bound}")
            }
            NnError::AllocationFailure { rows, cols } => {
                write!(f, "could not allocate a {rows}x{cols} matrix")
            }
            NnError::InvalidArchitecture(msg) => write!(f, "invalid architecture: {msg}"),
            NnError::Config(msg) => write!(f, "invalid config: {msg}"),
            NnError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for NnError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NnError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NnError {
    fn from(e: std::io::Error) -> Self {
        NnError::Io(e)
    }
}

impl From<serde_json::Error> for NnError {
    fn from(e: serde_json::Error) -> Self {
        NnError::Config(e.to_string())
    }
}

/// Fails with `ShapeMismatch` unless `actual == expected`.
pub(crate) fn ensure_shape(
    op: &'static str,
    expected: (usize, usize),
    actual: (usize, usize),
) -> Result<()> {
    if expected != actual {
        return Err(NnError::ShapeMismatch { op, expected, actual });
    }
    Ok(())
}
