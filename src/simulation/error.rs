//! Configuration errors raised while constructing a world or a controller.
//!
//! Nothing inside a tick can fail; every fault the core can report is a bad
//! parameter detected at startup.

use thiserror::Error;

use super::organism::Species;

/// Errors emitted when parameters cannot produce a valid simulation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// The field must have a positive, finite width and height.
    #[error("field size must be positive and finite, got {width}x{height}")]
    InvalidField {
        /// Configured field width.
        width: f32,
        /// Configured field height.
        height: f32,
    },
    /// A 3x3 cell neighborhood would not cover the whole vision range.
    #[error("cell size {cell_size} is smaller than the {species} vision length {vision_length}")]
    CellSmallerThanVision {
        /// Configured cell size.
        cell_size: f32,
        /// Species whose vision does not fit.
        species: Species,
        /// Vision length of that species.
        vision_length: f32,
    },
    /// The plant minimum separation must fit in one cell for neighborhood checks.
    #[error("cell size {cell_size} is smaller than the plant spread separation {separation}")]
    CellSmallerThanSpread {
        /// Configured cell size.
        cell_size: f32,
        /// Plant minimum separation.
        separation: f32,
    },
    /// A `min..=max` range was inverted.
    #[error("range `{name}` is inverted: {min} > {max}")]
    InvertedRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// A parameter that must be strictly positive was not.
    #[error("parameter `{name}` must be positive, got {value}")]
    NonPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// A parameter that must not be negative was.
    #[error("parameter `{name}` must not be negative, got {value}")]
    Negative {
        /// Name of the offending parameter.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// A parameter was infinite or NaN.
    #[error("parameter `{name}` must be finite, got {value}")]
    NotFinite {
        /// Name of the offending parameter.
        name: &'static str,
        /// Configured value.
        value: f64,
    },
    /// Controller matrices do not have the fixed 4 -> hidden -> 2 layout.
    #[error("controller {layer} has shape {actual:?}, expected {expected:?}")]
    ControllerShape {
        /// Which matrix or bias vector is wrong.
        layer: &'static str,
        /// Shape that was supplied.
        actual: Vec<usize>,
        /// Shape that was required.
        expected: Vec<usize>,
    },
}
