use convokit_image::ImageError;

use crate::parallel::ParallelError;

/// Errors raised while validating inputs of the convolution engine.
///
/// Every variant is detected before any pixel is computed.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum FilterError {
    /// The image has a channel count that cannot be normalized to RGB.
    #[error("Unsupported channel count: {0} (expected 1, 3 or 4)")]
    UnsupportedChannelCount(usize),

    /// The kernel is not 3x3 or its weights do not fill its shape.
    #[error("Invalid kernel shape: {0}x{1} (expected 3x3)")]
    InvalidKernelShape(usize, usize),

    /// The image has zero width or height.
    #[error("Empty image: {0}x{1}")]
    EmptyImage(usize, usize),

    /// The image cannot hold a full 3x3 neighbourhood.
    #[error("Image too small to trace: {0}x{1} (need at least 3x3)")]
    ImageTooSmall(usize, usize),

    /// The kernel name is not one of the predefined kernels.
    #[error("Unknown kernel: {0}")]
    UnknownKernel(String),

    /// Error coming from the image container.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error coming from the execution strategy.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
