/// Error type shared by every meshlink operation
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{what} buffer has {len} values, expected a multiple of {multiple}")]
    InvalidLength {
        what: &'static str,
        len: usize,
        multiple: usize,
    },

    #[error("{what}: expected {expected} items, found {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("cannot merge geometries with different attribute sets (geometry {index})")]
    AttributeMismatch { index: usize },

    #[error("point set is empty")]
    EmptyPointSet,

    #[error("invalid value range: min {min} must be below max {max}")]
    InvalidRange { min: f32, max: f32 },

    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },

    #[error("STL: {0}")]
    Stl(String),

    #[error("PLY: {0}")]
    Ply(String),

    #[error("row {row} has {found} values but {expected} fields were declared")]
    FieldMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown scalar type '{0}'")]
    UnknownScalarType(String),

    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("input is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
