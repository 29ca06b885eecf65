use convokit_image::{Image, ImageError, ImageSize};

use super::{gray_from_rgb_u8, rgb_from_gray, rgb_from_rgba};
use crate::error::FilterError;

/// Check that a channel count can be normalized to RGB.
///
/// # Errors
///
/// [`FilterError::UnsupportedChannelCount`] when `channels` is not 1, 3 or 4.
pub fn check_channel_count(channels: usize) -> Result<(), FilterError> {
    if !matches!(channels, 1 | 3 | 4) {
        return Err(FilterError::UnsupportedChannelCount(channels));
    }
    Ok(())
}

/// Normalize an interleaved u8 buffer with a runtime channel count to RGB8.
///
/// Grayscale buffers are broadcast to three identical channels, RGBA buffers
/// lose their alpha channel and RGB buffers are copied as they are.
///
/// # Arguments
///
/// * `size` - The size of the image in pixels.
/// * `channels` - The number of interleaved channels in `data`.
/// * `data` - The pixel buffer.
///
/// # Errors
///
/// [`FilterError::UnsupportedChannelCount`] when `channels` is not 1, 3 or 4,
/// and [`ImageError::InvalidChannelShape`] when `data` does not fill `size`.
///
/// # Example
///
/// ```
/// use convokit_imgproc::color::rgb8_from_raw;
///
/// let rgb = rgb8_from_raw([2, 1].into(), 1, &[10, 20]).unwrap();
/// assert_eq!(rgb.as_slice(), &[10, 10, 10, 20, 20, 20]);
/// ```
pub fn rgb8_from_raw(
    size: ImageSize,
    channels: usize,
    data: &[u8],
) -> Result<Image<u8, 3>, FilterError> {
    check_channel_count(channels)?;

    let expected = size.width * size.height * channels;
    if data.len() != expected {
        return Err(ImageError::InvalidChannelShape(data.len(), expected).into());
    }

    let rgb = match channels {
        1 => {
            let gray = Image::<u8, 1>::new(size, data.to_vec())?;
            let mut rgb = Image::<u8, 3>::from_size_val(size, 0)?;
            rgb_from_gray(&gray, &mut rgb)?;
            rgb
        }
        4 => {
            let rgba = Image::<u8, 4>::new(size, data.to_vec())?;
            let mut rgb = Image::<u8, 3>::from_size_val(size, 0)?;
            rgb_from_rgba(&rgba, &mut rgb)?;
            rgb
        }
        _ => Image::<u8, 3>::new(size, data.to_vec())?,
    };

    Ok(rgb)
}

/// Normalize an image with `C` channels to RGB8.
///
/// See [`rgb8_from_raw`] for the conversion rules.
///
/// # Errors
///
/// [`FilterError::UnsupportedChannelCount`] when `C` is not 1, 3 or 4.
pub fn normalize_to_rgb8<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, 3>, FilterError> {
    rgb8_from_raw(src.size(), C, src.as_slice())
}

/// Reduce an image with `C` channels to its luminance view.
///
/// The image is first normalized to RGB8 and then converted with [`gray_from_rgb_u8`],
/// so a grayscale input comes back unchanged.
pub fn gray_from_any_u8<const C: usize>(src: &Image<u8, C>) -> Result<Image<u8, 1>, FilterError> {
    let rgb = normalize_to_rgb8(src)?;
    let mut gray = Image::<u8, 1>::from_size_val(rgb.size(), 0)?;
    gray_from_rgb_u8(&rgb, &mut gray)?;
    Ok(gray)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_rgb_is_identity() -> Result<(), FilterError> {
        let image = Image::<u8, 3>::new([1, 2].into(), vec![1, 2, 3, 4, 5, 6])?;
        let rgb = normalize_to_rgb8(&image)?;
        assert_eq!(rgb, image);
        Ok(())
    }

    #[test]
    fn normalize_rgba_drops_alpha() -> Result<(), FilterError> {
        let image = Image::<u8, 4>::new([1, 1].into(), vec![9, 8, 7, 0])?;
        let rgb = normalize_to_rgb8(&image)?;
        assert_eq!(rgb.as_slice(), &[9, 8, 7]);
        Ok(())
    }

    #[test]
    fn normalize_unsupported_channels() -> Result<(), FilterError> {
        let image = Image::<u8, 2>::from_size_val([2, 2].into(), 0)?;
        assert_eq!(
            normalize_to_rgb8(&image),
            Err(FilterError::UnsupportedChannelCount(2))
        );
        assert_eq!(
            rgb8_from_raw([1, 1].into(), 5, &[0; 5]),
            Err(FilterError::UnsupportedChannelCount(5))
        );
        Ok(())
    }

    #[test]
    fn raw_length_mismatch() {
        assert_eq!(
            rgb8_from_raw([2, 2].into(), 3, &[0; 11]),
            Err(FilterError::Image(ImageError::InvalidChannelShape(11, 12)))
        );
    }

    #[test]
    fn gray_from_gray_is_identity() -> Result<(), FilterError> {
        let image = Image::<u8, 1>::new([3, 1].into(), vec![0, 128, 255])?;
        let gray = gray_from_any_u8(&image)?;
        assert_eq!(gray, image);
        Ok(())
    }
}
