use convokit_image::{Image, ImageError};

use crate::filter::saturate_u8;

/// Define the RGB weights for the grayscale conversion.
const RW: f32 = 0.299;
const GW: f32 = 0.587;
const BW: f32 = 0.114;

fn check_same_size<T1, const C1: usize, T2, const C2: usize>(
    src: &Image<T1, C1>,
    dst: &Image<T2, C2>,
) -> Result<(), ImageError> {
    if src.size() != dst.size() {
        return Err(ImageError::InvalidImageSize(
            src.cols(),
            src.rows(),
            dst.cols(),
            dst.rows(),
        ));
    }
    Ok(())
}

/// Convert an RGB8 image to grayscale using the formula:
///
/// Y = 0.299 * R + 0.587 * G + 0.114 * B
///
/// The luminance is rounded half-to-even and saturated, the same rule the
/// convolution engine applies to its outputs.
///
/// # Arguments
///
/// * `src` - The input RGB8 image.
/// * `dst` - The output grayscale image.
///
/// Precondition: the input and output images must have the same size.
///
/// # Example
///
/// ```
/// use convokit_image::{Image, ImageSize};
/// use convokit_imgproc::color::gray_from_rgb_u8;
///
/// let image = Image::<u8, 3>::new(
///     ImageSize {
///         width: 2,
///         height: 1,
///     },
///     vec![255, 255, 255, 10, 20, 30],
/// )
/// .unwrap();
///
/// let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0).unwrap();
///
/// gray_from_rgb_u8(&image, &mut gray).unwrap();
/// assert_eq!(gray.as_slice(), &[255, 18]);
/// ```
pub fn gray_from_rgb_u8(src: &Image<u8, 3>, dst: &mut Image<u8, 1>) -> Result<(), ImageError> {
    check_same_size(src, dst)?;

    src.as_slice()
        .chunks_exact(3)
        .zip(dst.as_slice_mut().iter_mut())
        .for_each(|(src_pixel, dst_pixel)| {
            let r = src_pixel[0] as f32;
            let g = src_pixel[1] as f32;
            let b = src_pixel[2] as f32;
            *dst_pixel = saturate_u8(RW * r + GW * g + BW * b);
        });

    Ok(())
}

/// Convert a grayscale image to an RGB image by replicating the grayscale value across all three channels.
///
/// # Arguments
///
/// * `src` - The input grayscale image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_gray<T>(src: &Image<T, 1>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy,
{
    check_same_size(src, dst)?;

    src.as_slice()
        .iter()
        .zip(dst.as_slice_mut().chunks_exact_mut(3))
        .for_each(|(&src_pixel, dst_pixel)| {
            dst_pixel.fill(src_pixel);
        });

    Ok(())
}

/// Convert an RGBA image to RGB by discarding the alpha channel.
///
/// # Arguments
///
/// * `src` - The input RGBA image.
/// * `dst` - The output RGB image.
///
/// Precondition: the input and output images must have the same size.
pub fn rgb_from_rgba<T>(src: &Image<T, 4>, dst: &mut Image<T, 3>) -> Result<(), ImageError>
where
    T: Copy,
{
    check_same_size(src, dst)?;

    src.as_slice()
        .chunks_exact(4)
        .zip(dst.as_slice_mut().chunks_exact_mut(3))
        .for_each(|(src_pixel, dst_pixel)| {
            dst_pixel.copy_from_slice(&src_pixel[..3]);
        });

    Ok(())
}
