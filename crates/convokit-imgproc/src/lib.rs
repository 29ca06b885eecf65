#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// color normalization and grayscale reduction module.
pub mod color;

/// error types shared by the filtering operations.
pub mod error;

/// image filtering module.
pub mod filter;

/// border handling for out-of-bounds neighbours.
pub mod padding;

/// module containing parallization utilities.
pub mod parallel;

/// utility functions for resizing images for display.
pub mod resize;

/// step-by-step replay of a single convolution sample.
pub mod trace;

pub use error::FilterError;
