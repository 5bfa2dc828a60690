use thiserror::Error;

/// Result type for tessellation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported before any output is written.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid bounds: min ({min_x}, {min_y}) must be finite and strictly below max ({max_x}, {max_y})")]
    InvalidBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("site {index} has a non-finite coordinate")]
    NonFiniteSite { index: usize },

    #[error("site {index} at ({x}, {y}) lies outside the bounds")]
    SiteOutOfBounds { index: usize, x: f64, y: f64 },

    #[error("sites {first} and {second} share the coordinate ({x}, {y})")]
    DuplicateSite {
        first: usize,
        second: usize,
        x: f64,
        y: f64,
    },

    #[error("relaxation strength {0} must lie in (0, 1]")]
    InvalidRelaxation(f64),
}
