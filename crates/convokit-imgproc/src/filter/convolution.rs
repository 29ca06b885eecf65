use convokit_image::{Image, ImageError};

use super::kernels::Kernel;
use crate::{
    color::normalize_to_rgb8, error::FilterError, padding::PaddingMode,
    parallel::ExecutionStrategy,
};

/// Options controlling a convolution call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FilterOptions {
    /// How neighbours outside the image are produced.
    pub padding: PaddingMode,
    /// How the output rows are scheduled.
    pub strategy: ExecutionStrategy,
}

/// Clip a raw convolution sum to [0, 255] and round it half-to-even.
///
/// This is the single rounding rule shared by the engine, the grayscale
/// reduction and the sample tracer.
///
/// # Example
///
/// ```
/// use convokit_imgproc::filter::saturate_u8;
///
/// assert_eq!(saturate_u8(-12.0), 0);
/// assert_eq!(saturate_u8(300.0), 255);
/// assert_eq!(saturate_u8(2.5), 2);
/// assert_eq!(saturate_u8(3.5), 4);
/// ```
#[inline]
pub fn saturate_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Convolve every channel of an image with a 3x3 kernel.
///
/// For every output pixel `(i, j)` and channel `c`:
///
/// raw = Σ_{m=-1..1} Σ_{n=-1..1} src[i+m, j+n, c] * kernel[m+1, n+1]
///
/// Neighbours outside the image come from `options.padding`. The products are
/// accumulated in row-major kernel order starting from zero, then the sum is
/// clipped and rounded with [`saturate_u8`]. Channels never mix.
///
/// # Arguments
///
/// * `src` - The source image with shape (H, W, C).
/// * `dst` - The destination image with shape (H, W, C).
/// * `kernel` - A 3x3 kernel.
/// * `options` - Padding and execution strategy.
///
/// # Errors
///
/// [`FilterError::EmptyImage`] if the image has no pixels,
/// [`FilterError::InvalidKernelShape`] if the kernel is not 3x3 and
/// [`ImageError::InvalidImageSize`] if `src` and `dst` differ in size.
///
/// # Example
///
/// ```
/// use convokit_image::Image;
/// use convokit_imgproc::filter::{filter2d, kernels, FilterOptions};
///
/// let src = Image::<u8, 1>::from_size_val([5, 5].into(), 100).unwrap();
/// let mut dst = Image::<u8, 1>::from_size_val(src.size(), 0).unwrap();
///
/// filter2d(&src, &mut dst, &kernels::edge_kernel(), &FilterOptions::default()).unwrap();
/// assert!(dst.as_slice().iter().all(|&v| v == 0));
/// ```
pub fn filter2d<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    kernel: &Kernel,
    options: &FilterOptions,
) -> Result<(), FilterError> {
    if src.size().is_empty() {
        return Err(FilterError::EmptyImage(src.width(), src.height()));
    }

    let weights = kernel.as_3x3()?;

    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        )
        .into());
    }

    let (rows, cols) = (src.rows(), src.cols());
    let src_data = src.as_slice();
    let padding = options.padding;

    crate::parallel::for_each_row(
        dst.as_slice_mut(),
        cols * C,
        options.strategy,
        |row, dst_row| {
            let row_idx: [Option<usize>; 3] =
                std::array::from_fn(|k| padding.map_index(row as isize + k as isize - 1, rows));

            for col in 0..cols {
                let col_idx: [Option<usize>; 3] = std::array::from_fn(|k| {
                    padding.map_index(col as isize + k as isize - 1, cols)
                });

                for ch in 0..C {
                    let mut sum = 0.0f32;
                    for (ky, r) in row_idx.iter().enumerate() {
                        for (kx, c) in col_idx.iter().enumerate() {
                            let value = match (r, c) {
                                (Some(r), Some(c)) => src_data[(r * cols + c) * C + ch] as f32,
                                _ => 0.0,
                            };
                            sum += value * weights[ky][kx];
                        }
                    }
                    dst_row[col * C + ch] = saturate_u8(sum);
                }
            }
        },
    )?;

    Ok(())
}

/// Apply a 3x3 kernel to an image, producing a filtered RGB image.
///
/// The image is first normalized to three channels (grayscale is broadcast, alpha
/// is discarded), then every channel is convolved independently with
/// [`PaddingMode::Reflect101`] borders. The output has the same width and height
/// as the input and every sample lies in [0, 255].
///
/// # Errors
///
/// Inputs are validated before any computation, in this order:
/// [`FilterError::UnsupportedChannelCount`], [`FilterError::EmptyImage`],
/// [`FilterError::InvalidKernelShape`].
///
/// # Example
///
/// ```
/// use convokit_image::Image;
/// use convokit_imgproc::filter::{apply, kernels};
///
/// let image = Image::<u8, 3>::from_size_val([4, 3].into(), 42).unwrap();
/// let blurred = apply(&image, &kernels::blur_kernel()).unwrap();
///
/// assert_eq!(blurred.size(), image.size());
/// assert!(blurred.as_slice().iter().all(|&v| v == 42));
/// ```
pub fn apply<const C: usize>(
    image: &Image<u8, C>,
    kernel: &Kernel,
) -> Result<Image<u8, 3>, FilterError> {
    apply_with_options(image, kernel, &FilterOptions::default())
}

/// Same as [`apply`] with explicit padding and execution strategy.
pub fn apply_with_options<const C: usize>(
    image: &Image<u8, C>,
    kernel: &Kernel,
    options: &FilterOptions,
) -> Result<Image<u8, 3>, FilterError> {
    let rgb = normalize_to_rgb8(image)?;

    log::debug!(
        "convolving {} ({} channels) with a {:?} kernel, {:?}",
        image.size(),
        C,
        kernel.shape(),
        options
    );

    let mut dst = Image::<u8, 3>::from_size_val(rgb.size(), 0)?;
    filter2d(&rgb, &mut dst, kernel, options)?;

    Ok(dst)
}
