use convokit_image::{Image, ImageSize};

use crate::{error::FilterError, filter::saturate_u8};

/// Compute the display size of an image limited to `max_width` pixels.
///
/// Images narrower than `max_width` keep their size. Wider images are scaled
/// down keeping the aspect ratio, the height being truncated and never below 1.
///
/// # Example
///
/// ```
/// use convokit_imgproc::resize::fit_width;
///
/// let size = fit_width([1000, 750].into(), 500);
/// assert_eq!((size.width, size.height), (500, 375));
/// ```
pub fn fit_width(size: ImageSize, max_width: usize) -> ImageSize {
    if max_width == 0 || size.width <= max_width {
        return size;
    }
    let ratio = max_width as f64 / size.width as f64;
    ImageSize {
        width: max_width,
        height: ((size.height as f64 * ratio) as usize).max(1),
    }
}

// sample position in the source for output index `i`, corners aligned
fn source_coord(i: usize, src_len: usize, dst_len: usize) -> f32 {
    if dst_len <= 1 {
        return 0.0;
    }
    i as f32 * (src_len - 1) as f32 / (dst_len - 1) as f32
}

/// Resize an image with bilinear interpolation.
///
/// The corners of the source and destination grids are aligned and the
/// interpolated values are rounded back to u8.
///
/// # Arguments
///
/// * `src` - The input image container.
/// * `dst` - The output image container, its size is the target size.
///
/// # Errors
///
/// [`FilterError::EmptyImage`] if either image has no pixels.
pub fn resize_bilinear<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
) -> Result<(), FilterError> {
    if src.size().is_empty() {
        return Err(FilterError::EmptyImage(src.width(), src.height()));
    }
    if dst.size().is_empty() {
        return Err(FilterError::EmptyImage(dst.width(), dst.height()));
    }

    let (rows, cols) = (src.rows(), src.cols());
    let (dst_rows, dst_cols) = (dst.rows(), dst.cols());
    let data = src.as_slice();

    for (y, dst_row) in dst.as_slice_mut().chunks_exact_mut(dst_cols * C).enumerate() {
        let v = source_coord(y, rows, dst_rows);
        let iv0 = (v.trunc() as usize).min(rows - 1);
        let iv1 = (iv0 + 1).min(rows - 1);
        let frac_v = v.fract();

        for (x, dst_pixel) in dst_row.chunks_exact_mut(C).enumerate() {
            let u = source_coord(x, cols, dst_cols);
            let iu0 = (u.trunc() as usize).min(cols - 1);
            let iu1 = (iu0 + 1).min(cols - 1);
            let frac_u = u.fract();

            let w00 = (1.0 - frac_u) * (1.0 - frac_v);
            let w01 = frac_u * (1.0 - frac_v);
            let w10 = (1.0 - frac_u) * frac_v;
            let w11 = frac_u * frac_v;

            let base00 = (iv0 * cols + iu0) * C;
            let base01 = (iv0 * cols + iu1) * C;
            let base10 = (iv1 * cols + iu0) * C;
            let base11 = (iv1 * cols + iu1) * C;

            for (k, out) in dst_pixel.iter_mut().enumerate() {
                let value = data[base00 + k] as f32 * w00
                    + data[base01 + k] as f32 * w01
                    + data[base10 + k] as f32 * w10
                    + data[base11 + k] as f32 * w11;
                *out = saturate_u8(value);
            }
        }
    }

    Ok(())
}

/// Downscale an image so that it is at most `max_width` pixels wide.
///
/// Returns a copy of the image when it already fits.
pub fn resize_to_fit_width<const C: usize>(
    src: &Image<u8, C>,
    max_width: usize,
) -> Result<Image<u8, C>, FilterError> {
    let new_size = fit_width(src.size(), max_width);
    if new_size == src.size() {
        return Ok(src.clone());
    }

    let mut dst = Image::<u8, C>::from_size_val(new_size, 0)?;
    resize_bilinear(src, &mut dst)?;
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use convokit_image::{Image, ImageSize};

    use super::*;

    #[test]
    fn test_fit_width() {
        let small: ImageSize = [320, 240].into();
        assert_eq!(fit_width(small, 500), small);
        assert_eq!(fit_width([1001, 3].into(), 500), ImageSize::from([500, 1]));
        assert_eq!(fit_width([2000, 1].into(), 500), ImageSize::from([500, 1]));
        assert_eq!(fit_width(small, 0), small);
    }

    #[test]
    fn test_resize_corners_are_kept() -> Result<(), FilterError> {
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new([3, 2].into(), vec![
            0, 100, 200,
            50, 150, 250,
        ])?;
        let mut dst = Image::<u8, 1>::from_size_val([5, 2].into(), 0)?;
        resize_bilinear(&image, &mut dst)?;
        assert_eq!(dst.as_slice(), &[0, 50, 100, 150, 200, 50, 100, 150, 200, 250]);
        Ok(())
    }

    #[test]
    fn test_resize_to_fit_width() -> Result<(), FilterError> {
        let image = Image::<u8, 3>::from_size_val([8, 4].into(), 77)?;
        let resized = resize_to_fit_width(&image, 4)?;
        assert_eq!(resized.size(), ImageSize::from([4, 2]));
        assert!(resized.as_slice().iter().all(|&v| v == 77));

        let same = resize_to_fit_width(&image, 500)?;
        assert_eq!(same, image);
        Ok(())
    }

    #[test]
    fn test_resize_empty() -> Result<(), FilterError> {
        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 0)?;
        let mut dst = Image::<u8, 1>::new([0, 3].into(), vec![])?;
        assert_eq!(
            resize_bilinear(&image, &mut dst),
            Err(FilterError::EmptyImage(0, 3))
        );
        Ok(())
    }
}
