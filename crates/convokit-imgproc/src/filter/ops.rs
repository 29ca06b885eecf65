use convokit_image::Image;

use super::{
    apply,
    kernels::{self, KernelKind, SharpenVariant},
};
use crate::error::FilterError;

/// Apply one of the predefined kernels to an image.
///
/// # Arguments
///
/// * `image` - The source image with 1, 3 or 4 channels.
/// * `kind` - The kernel to apply.
///
/// # Returns
///
/// The filtered RGB image with the same width and height.
pub fn apply_named<const C: usize>(
    image: &Image<u8, C>,
    kind: KernelKind,
) -> Result<Image<u8, 3>, FilterError> {
    log::debug!("applying the {} kernel", kind);
    apply(image, &kind.kernel())
}

/// Blur an image with the 3x3 averaging kernel.
pub fn blur<const C: usize>(image: &Image<u8, C>) -> Result<Image<u8, 3>, FilterError> {
    apply(image, &kernels::blur_kernel())
}

/// Sharpen an image with the given sharpen variant.
pub fn sharpen<const C: usize>(
    image: &Image<u8, C>,
    variant: SharpenVariant,
) -> Result<Image<u8, 3>, FilterError> {
    apply(image, &kernels::sharpen_kernel(variant))
}

/// Highlight edges with the 3x3 Laplacian.
pub fn edge_detect<const C: usize>(image: &Image<u8, C>) -> Result<Image<u8, 3>, FilterError> {
    apply(image, &kernels::edge_kernel())
}

#[cfg(test)]
mod tests {
    use convokit_image::Image;

    use super::*;

    #[test]
    fn test_named_matches_wrappers() -> Result<(), FilterError> {
        let data = (0..6 * 5 * 4).map(|i| (i * 13 % 256) as u8).collect();
        let image = Image::<u8, 4>::new([6, 5].into(), data)?;

        assert_eq!(apply_named(&image, KernelKind::Blur)?, blur(&image)?);
        assert_eq!(apply_named(&image, KernelKind::Edge)?, edge_detect(&image)?);
        for variant in [SharpenVariant::Orthogonal, SharpenVariant::Full] {
            assert_eq!(
                apply_named(&image, KernelKind::Sharpen(variant))?,
                sharpen(&image, variant)?
            );
        }
        Ok(())
    }

    #[test]
    fn test_sharpen_variants_differ() -> Result<(), FilterError> {
        // a diagonal neighbour only matters for the full variant
        #[rustfmt::skip]
        let image = Image::<u8, 1>::new([3, 3].into(), vec![
            100, 50, 50,
            50, 50, 50,
            50, 50, 50,
        ])?;
        let orthogonal = sharpen(&image, SharpenVariant::Orthogonal)?;
        let full = sharpen(&image, SharpenVariant::Full)?;

        // 5 * 50 - 4 * 50 = 50
        assert_eq!(orthogonal.get([1, 1, 0]), Some(&50));
        // 9 * 50 - 7 * 50 - 100 = 0
        assert_eq!(full.get([1, 1, 0]), Some(&0));
        Ok(())
    }
}
