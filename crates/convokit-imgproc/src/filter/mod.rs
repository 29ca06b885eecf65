//! Filter operations
//!
//! This module provides the 3x3 convolution engine and the predefined kernels.

/// Filter kernels
pub mod kernels;

/// Convolution engine
mod convolution;
pub use convolution::*;

/// Named filter operations
mod ops;
pub use ops::*;
