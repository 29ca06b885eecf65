//! Step-by-step replay of the convolution at a single pixel.
//!
//! The tracer works on the luminance view of the image and reproduces the exact
//! arithmetic of [`crate::filter::filter2d`]: the nine products are accumulated in
//! row-major order starting from zero and the sum goes through
//! [`crate::filter::saturate_u8`]. Only interior pixels are traced, so no padding
//! is ever involved.

use convokit_image::{Image, ImageSize};

use crate::{
    color::{check_channel_count, gray_from_any_u8},
    error::FilterError,
    filter::{kernels::Kernel, saturate_u8},
};

/// One cell of the 3x3 neighbourhood and its contribution to the sum.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceStep {
    /// Row inside the 3x3 neighbourhood.
    pub row: usize,
    /// Column inside the 3x3 neighbourhood.
    pub col: usize,
    /// The luminance of the pixel.
    pub pixel_value: u8,
    /// The kernel weight at (`row`, `col`).
    pub kernel_weight: f32,
    /// `pixel_value * kernel_weight`.
    pub product: f32,
}

/// The full record of one traced convolution sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleTrace {
    /// The traced (x, y) position after clamping to the interior.
    pub position: (usize, usize),
    /// The 3x3 luminance neighbourhood centered at `position`.
    pub region: [[u8; 3]; 3],
    /// The kernel weights.
    pub kernel: [[f32; 3]; 3],
    /// The nine steps in row-major order, (0, 0) to (2, 2).
    pub steps: Vec<TraceStep>,
    /// The unclipped sum of the products.
    pub raw_sum: f32,
    /// The clipped and rounded output value.
    pub final_value: u8,
}

impl SampleTrace {
    /// Iterate over the steps in presentation order.
    pub fn iter_steps(&self) -> impl Iterator<Item = &TraceStep> {
        self.steps.iter()
    }

    /// Render the arithmetic as a single line, e.g. `10×-1.000 + ... = -320.000 → 0`.
    pub fn formula(&self) -> String {
        let terms = self
            .steps
            .iter()
            .map(|step| format!("{}×{:.3}", step.pixel_value, step.kernel_weight))
            .collect::<Vec<_>>()
            .join(" + ");
        format!("{} = {:.3} → {}", terms, self.raw_sum, self.final_value)
    }
}

/// Resolve the position to trace and clamp it so a full 3x3 neighbourhood exists.
///
/// Defaults to the geometric center `(width / 2, height / 2)`. Coordinates below 1
/// become 1 and coordinates at or past the last column/row become `width - 2`
/// (`height - 2`).
///
/// # Errors
///
/// [`FilterError::EmptyImage`] for an image without pixels and
/// [`FilterError::ImageTooSmall`] when width or height is below 3.
pub fn clamp_position(
    size: ImageSize,
    position: Option<(usize, usize)>,
) -> Result<(usize, usize), FilterError> {
    if size.is_empty() {
        return Err(FilterError::EmptyImage(size.width, size.height));
    }
    if size.width < 3 || size.height < 3 {
        return Err(FilterError::ImageTooSmall(size.width, size.height));
    }

    let (x, y) = position.unwrap_or((size.width / 2, size.height / 2));
    Ok((x.clamp(1, size.width - 2), y.clamp(1, size.height - 2)))
}

/// Trace the convolution of `kernel` at one pixel of `image`.
///
/// # Arguments
///
/// * `image` - The source image with 1, 3 or 4 channels.
/// * `kernel` - A 3x3 kernel.
/// * `position` - The (x, y) pixel to trace, the image center if `None`.
///
/// # Errors
///
/// Inputs are validated before any computation, in this order:
/// [`FilterError::UnsupportedChannelCount`], [`FilterError::EmptyImage`],
/// [`FilterError::ImageTooSmall`], [`FilterError::InvalidKernelShape`].
///
/// # Example
///
/// ```
/// use convokit_image::Image;
/// use convokit_imgproc::{filter::kernels, trace::trace};
///
/// let image = Image::<u8, 1>::from_size_val([5, 5].into(), 100).unwrap();
/// let sample = trace(&image, &kernels::edge_kernel(), None).unwrap();
///
/// assert_eq!(sample.position, (2, 2));
/// assert_eq!(sample.steps.len(), 9);
/// assert_eq!(sample.raw_sum, 0.0);
/// assert_eq!(sample.final_value, 0);
/// ```
pub fn trace<const C: usize>(
    image: &Image<u8, C>,
    kernel: &Kernel,
    position: Option<(usize, usize)>,
) -> Result<SampleTrace, FilterError> {
    check_channel_count(C)?;
    let (x, y) = clamp_position(image.size(), position)?;
    let weights = kernel.as_3x3()?;

    if position.is_some_and(|p| p != (x, y)) {
        log::debug!("trace position {:?} clamped to {:?}", position, (x, y));
    }

    let gray = gray_from_any_u8(image)?;
    let gray_data = gray.as_slice();
    let width = gray.width();

    let mut region = [[0u8; 3]; 3];
    let mut steps = Vec::with_capacity(9);
    let mut raw_sum = 0.0f32;

    for (row, region_row) in region.iter_mut().enumerate() {
        for (col, cell) in region_row.iter_mut().enumerate() {
            let pixel_value = gray_data[(y + row - 1) * width + (x + col - 1)];
            let kernel_weight = weights[row][col];
            let product = pixel_value as f32 * kernel_weight;

            *cell = pixel_value;
            raw_sum += product;
            steps.push(TraceStep {
                row,
                col,
                pixel_value,
                kernel_weight,
                product,
            });
        }
    }

    Ok(SampleTrace {
        position: (x, y),
        region,
        kernel: weights,
        steps,
        raw_sum,
        final_value: saturate_u8(raw_sum),
    })
}
