use core::fmt;

/// Result alias for `nerve`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the projection and mapping stages and by the bundled
/// lenses, covers and clusterers.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Point data could not be read as a numeric matrix.
    InvalidInput(String),

    /// Matrix dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Raw data and cover disagree on the number of points.
    RowCountMismatch {
        /// Rows in the raw point matrix.
        data: usize,
        /// Points known to the cover.
        cover: usize,
    },

    /// A matrix used as precomputed distances is not square.
    NotSquare {
        /// Row count.
        rows: usize,
        /// Column count.
        cols: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// A clusterer returned a label vector of the wrong length.
    LabelCountMismatch {
        /// Points handed to the clusterer.
        expected: usize,
        /// Labels returned.
        found: usize,
    },

    /// Generic error with message, typically raised by a user-supplied lens
    /// or clusterer.
    Other(String),
}

/// Coarse classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Null, empty, ragged or non-numeric point data.
    Input,
    /// A programming contract was violated (row counts, square matrices).
    Precondition,
    /// A lens, cover or clusterer failed while running.
    Capability,
}

impl Error {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput | Error::InvalidInput(_) => ErrorKind::Input,
            Error::RowCountMismatch { .. } | Error::NotSquare { .. } => ErrorKind::Precondition,
            Error::DimensionMismatch { .. }
            | Error::InvalidParameter { .. }
            | Error::LabelCountMismatch { .. }
            | Error::Other(_) => ErrorKind::Capability,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::InvalidInput(msg) => write!(f, "invalid point data: {msg}"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::RowCountMismatch { data, cover } => {
                write!(f, "data has {data} rows but the cover holds {cover} points")
            }
            Error::NotSquare { rows, cols } => {
                write!(f, "precomputed distances must be square, got {rows}x{cols}")
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::LabelCountMismatch { expected, found } => {
                write!(f, "clusterer returned {found} labels for {expected} points")
            }
            Error::Other(msg) => write!(f, "{msg}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
