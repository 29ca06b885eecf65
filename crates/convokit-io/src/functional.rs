use std::{io::Cursor, path::Path};

use convokit_image::{Image, ImageSize};

use crate::error::IoError;

/// A decoded image in one of the 8-bit layouts the filters accept.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl GenericImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
        }
    }

    /// The number of interleaved channels.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(_) => 1,
            GenericImage::Rgb8(_) => 3,
            GenericImage::Rgba8(_) => 4,
        }
    }

    /// The raw pixel buffer.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            GenericImage::L8(img) => img.as_slice(),
            GenericImage::Rgb8(img) => img.as_slice(),
            GenericImage::Rgba8(img) => img.as_slice(),
        }
    }
}

/// Decodes an image held in memory.
///
/// The format is guessed from the content. Deeper or float pixel formats are
/// converted to 8 bits: the ones with alpha to RGBA, 16-bit grayscale to
/// grayscale and everything else to RGB.
///
/// # Arguments
///
/// * `bytes` - The encoded image file contents.
pub fn decode_image_bytes(bytes: &[u8]) -> Result<GenericImage, IoError> {
    let img = image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    let color = img.color();
    let image = match color {
        image::ColorType::L8 => GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?),
        image::ColorType::Rgb8 => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
        image::ColorType::Rgba8 => {
            GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
        }
        image::ColorType::L16 => GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?),
        c if c.has_alpha() => GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?),
        _ => GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?),
    };

    log::debug!("decoded {:?} image of size {}", color, size);

    Ok(image)
}

/// Reads an image from the given file path.
///
/// The method tries to read from any image format supported by the image crate.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// The decoded image, see [`decode_image_bytes`] for the pixel layouts.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path)?;
    decode_image_bytes(&bytes)
}

/// The file name used to save a filtered image.
///
/// The kernel name is lowercased and its spaces replaced by underscores.
///
/// # Example
///
/// ```
/// use convokit_io::functional::processed_file_name;
///
/// assert_eq!(processed_file_name("Edge Detection"), "processed_edge_detection.png");
/// ```
pub fn processed_file_name(kernel_name: &str) -> String {
    format!(
        "processed_{}.png",
        kernel_name.to_lowercase().replace(' ', "_")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_missing_file() {
        let res = read_image_any("does/not/exist.png");
        assert!(matches!(res, Err(IoError::FileDoesNotExist(_))));
    }

    #[test]
    fn decode_invalid_bytes() {
        let res = decode_image_bytes(b"definitely not an image");
        assert!(res.is_err());
    }

    #[test]
    fn read_gray_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let gray = image::GrayImage::from_fn(4, 3, |x, y| image::Luma([(x * 10 + y) as u8]));
        gray.save(&file_path)?;

        let image = read_image_any(&file_path)?;
        assert_eq!(image.num_channels(), 1);
        assert_eq!(image.size(), ImageSize::from([4, 3]));
        assert_eq!(image.as_slice(), gray.as_raw().as_slice());
        Ok(())
    }

    #[test]
    fn read_rgba_png() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("rgba.png");

        let rgba = image::RgbaImage::from_pixel(2, 2, image::Rgba([10, 20, 30, 40]));
        rgba.save(&file_path)?;

        match read_image_any(&file_path)? {
            GenericImage::Rgba8(img) => {
                assert_eq!(img.size(), ImageSize::from([2, 2]));
                assert_eq!(&img.as_slice()[..4], &[10, 20, 30, 40]);
            }
            other => panic!("expected rgba8, got {} channels", other.num_channels()),
        }
        Ok(())
    }

    #[test]
    fn read_gray16_png_as_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray16.png");

        let gray16: image::ImageBuffer<image::Luma<u16>, Vec<u16>> =
            image::ImageBuffer::from_fn(3, 2, |x, y| image::Luma([257 * (x + 3 * y) as u16 * 40]));
        gray16.save(&file_path)?;

        match read_image_any(&file_path)? {
            GenericImage::L8(img) => {
                assert_eq!(img.size(), ImageSize::from([3, 2]));
                assert_eq!(img.as_slice(), &[0, 40, 80, 120, 160, 200]);
            }
            other => panic!("expected l8, got {} channels", other.num_channels()),
        }
        Ok(())
    }

    #[test]
    fn read_gray_alpha_png_as_rgba8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray_alpha.png");

        let gray_alpha = image::GrayAlphaImage::from_pixel(2, 1, image::LumaA([90, 128]));
        gray_alpha.save(&file_path)?;

        match read_image_any(&file_path)? {
            GenericImage::Rgba8(img) => {
                assert_eq!(img.size(), ImageSize::from([2, 1]));
                assert_eq!(img.as_slice(), &[90, 90, 90, 128, 90, 90, 90, 128]);
            }
            other => panic!("expected rgba8, got {} channels", other.num_channels()),
        }
        Ok(())
    }

    #[test]
    fn file_names() {
        assert_eq!(processed_file_name("blur"), "processed_blur.png");
        assert_eq!(processed_file_name("Sharpen"), "processed_sharpen.png");
        assert_eq!(
            processed_file_name("Edge Detection (Laplacian)"),
            "processed_edge_detection_(laplacian).png"
        );
    }
}
