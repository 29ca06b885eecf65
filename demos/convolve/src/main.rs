use argh::FromArgs;
use std::path::PathBuf;

use convokit::{
    image::Image,
    imgproc::{
        filter::{self, kernels::KernelKind, FilterOptions},
        padding::PaddingMode,
        parallel::ExecutionStrategy,
        resize,
        trace::{self, SampleTrace},
        FilterError,
    },
    io::{
        functional::{self as F, GenericImage},
        png,
    },
};

#[derive(FromArgs)]
/// Apply a 3x3 kernel to an image and explain one output pixel
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    image_path: PathBuf,

    /// the kernel to apply: blur, sharpen, sharpen-full or edge
    #[argh(option, short = 'k', default = "KernelKind::Blur")]
    kernel: KernelKind,

    /// directory where the filtered png is written
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// column of the traced pixel, the image center if omitted
    #[argh(option)]
    x: Option<usize>,

    /// row of the traced pixel, the image center if omitted
    #[argh(option)]
    y: Option<usize>,

    /// border mode: constant, replicate, reflect, reflect101 or wrap
    #[argh(option, default = "String::from(\"reflect101\")")]
    padding: String,

    /// downscale the input to at most this width before filtering
    #[argh(option)]
    max_width: Option<usize>,

    /// compute the output rows on the rayon thread pool
    #[argh(switch)]
    parallel: bool,

    /// print the trace as json
    #[argh(switch)]
    json: bool,
}

fn parse_padding(name: &str) -> Result<PaddingMode, String> {
    match name.to_lowercase().as_str() {
        "constant" => Ok(PaddingMode::Constant),
        "replicate" => Ok(PaddingMode::Replicate),
        "reflect" => Ok(PaddingMode::Reflect),
        "reflect101" => Ok(PaddingMode::Reflect101),
        "wrap" => Ok(PaddingMode::Wrap),
        _ => Err(format!("Invalid padding: {name}")),
    }
}

/// Trace the sample pixel, `None` when the image has no 3x3 interior.
fn trace_if_possible<const C: usize>(
    image: &Image<u8, C>,
    kind: KernelKind,
    position: Option<(usize, usize)>,
) -> Result<Option<SampleTrace>, FilterError> {
    match trace::trace(image, &kind.kernel(), position) {
        Ok(sample) => Ok(Some(sample)),
        Err(FilterError::ImageTooSmall(width, height)) => {
            log::warn!("a {width}x{height} image is too small to trace a sample pixel");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// The name of the filtered png, derived from the kernel display name.
fn output_file_name(kind: KernelKind) -> String {
    F::processed_file_name(kind.display_name())
}

fn run<const C: usize>(
    image: &Image<u8, C>,
    args: &Args,
    options: &FilterOptions,
) -> Result<(Image<u8, 3>, Option<SampleTrace>), Box<dyn std::error::Error>> {
    let image = match args.max_width {
        Some(max_width) => resize::resize_to_fit_width(image, max_width)?,
        None => image.clone(),
    };

    let kernel = args.kernel.kernel();
    let filtered = filter::apply_with_options(&image, &kernel, options)?;

    let position = match (args.x, args.y) {
        (None, None) => None,
        (x, y) => Some((
            x.unwrap_or(image.width() / 2),
            y.unwrap_or(image.height() / 2),
        )),
    };
    let sample = trace_if_possible(&image, args.kernel, position)?;

    Ok((filtered, sample))
}

fn print_trace(sample: &SampleTrace) {
    let (x, y) = sample.position;
    println!("Sample pixel at ({x}, {y})");
    println!("Image region:");
    for row in sample.region.iter() {
        let cells = row.iter().map(|v| format!("{v:4}")).collect::<String>();
        println!("[{cells} ]");
    }
    println!("Element-wise multiplication:");
    for step in sample.iter_steps() {
        println!(
            "  ({}, {}): {:3} × {:6.3} = {:8.3}",
            step.row, step.col, step.pixel_value, step.kernel_weight, step.product
        );
    }
    println!("Sum: {:.3}", sample.raw_sum);
    println!("Result (clipped to 0-255): {}", sample.final_value);
    println!("{}", sample.formula());
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let options = FilterOptions {
        padding: parse_padding(&args.padding)?,
        strategy: if args.parallel {
            ExecutionStrategy::ParallelRows
        } else {
            ExecutionStrategy::Serial
        },
    };

    let image = F::read_image_any(&args.image_path)?;
    log::info!(
        "read {} with size {} and {} channels",
        args.image_path.display(),
        image.size(),
        image.num_channels()
    );

    let (filtered, sample) = match &image {
        GenericImage::L8(img) => run(img, &args, &options)?,
        GenericImage::Rgb8(img) => run(img, &args, &options)?,
        GenericImage::Rgba8(img) => run(img, &args, &options)?,
    };

    let output_path = args.output_dir.join(output_file_name(args.kernel));
    png::write_image_png_rgb8(&output_path, &filtered)?;

    println!("{}", args.kernel.display_name());
    println!("{}", args.kernel.kernel());
    println!("{}", args.kernel.explanation());
    println!();

    match sample {
        Some(sample) if args.json => println!("{}", serde_json::to_string_pretty(&sample)?),
        Some(sample) => print_trace(&sample),
        None => println!("No sample pixel: the image is smaller than 3x3"),
    }

    println!("Saved {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiny_images_skip_the_trace() -> Result<(), FilterError> {
        let image = Image::<u8, 3>::from_size_val([2, 1].into(), 10)?;
        assert_eq!(trace_if_possible(&image, KernelKind::Edge, None)?, None);

        let filtered = filter::apply(&image, &KernelKind::Edge.kernel())?;
        assert_eq!(filtered.size(), image.size());
        Ok(())
    }

    #[test]
    fn other_trace_errors_are_kept() -> Result<(), FilterError> {
        let image = Image::<u8, 3>::new([0, 0].into(), vec![])?;
        assert_eq!(
            trace_if_possible(&image, KernelKind::Blur, None),
            Err(FilterError::EmptyImage(0, 0))
        );

        let image = Image::<u8, 1>::from_size_val([3, 3].into(), 10)?;
        let sample = trace_if_possible(&image, KernelKind::Blur, None)?;
        assert_eq!(sample.map(|s| s.position), Some((1, 1)));
        Ok(())
    }

    #[test]
    fn output_names_follow_display_names() {
        assert_eq!(
            output_file_name(KernelKind::Blur),
            "processed_blur_(averaging).png"
        );
        assert_eq!(
            output_file_name(KernelKind::Edge),
            "processed_edge_detection_(laplacian).png"
        );
        assert_eq!(
            output_file_name("sharpen".parse().unwrap()),
            "processed_sharpen.png"
        );
    }
}
