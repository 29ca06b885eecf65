use std::path::Path;

use ::png::{BitDepth, ColorType, Encoder};
use convokit_image::Image;

use crate::error::IoError;

/// Encode an RGB8 image as PNG.
///
/// # Arguments
///
/// * `image` - The image to encode.
///
/// # Returns
///
/// The PNG file contents.
pub fn encode_image_png_rgb8(image: &Image<u8, 3>) -> Result<Vec<u8>, IoError> {
    let mut buf = Vec::new();

    let [width, height] = <[u32; 2]>::from(image.size());
    let mut encoder = Encoder::new(&mut buf, width, height);
    encoder.set_color(ColorType::Rgb);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .write_image_data(image.as_slice())
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    writer
        .finish()
        .map_err(|e| IoError::PngEncodingError(e.to_string()))?;

    Ok(buf)
}

/// Write an RGB8 image to a PNG file.
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
/// * `image` - The image to write.
pub fn write_image_png_rgb8(file_path: impl AsRef<Path>, image: &Image<u8, 3>) -> Result<(), IoError> {
    let file_path = file_path.as_ref();
    let png_data = encode_image_png_rgb8(image)?;
    std::fs::write(file_path, png_data)?;
    log::debug!("wrote {} to {}", image.size(), file_path.display());
    Ok(())
}
