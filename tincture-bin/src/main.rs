//! Generate a ranked color palette for images using k-means or median cut quantization.

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc,
    clippy::unreadable_literal
)]

mod cli;

#[allow(clippy::wildcard_imports)]
use cli::*;

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use colored::Colorize;
use image::{DynamicImage, RgbaImage};
use serde::Serialize;
use thiserror::Error;
use tincture::{ExtractedColor, ExtractionError, Extractor, Raster, Rgb};
use tracing::Level;

/// Record the running time of a function and log the elapsed time
macro_rules! time {
    ($name: literal, $func_call: expr) => {{
        let start = Instant::now();
        let result = $func_call;
        tracing::info!("{} took {}ms", $name, start.elapsed().as_millis());
        result
    }};
}

/// Error cases for processing a single image
#[derive(Debug, Error)]
enum AppError {
    /// Failed to read or decode the image file
    #[error("Failed to load the image file: {0}")]
    ImageLoad(#[from] image::ImageError),
    /// Failed to read the avif file
    #[cfg(feature = "avif")]
    #[error("Failed to read the avif file: {0}")]
    AvifRead(std::io::Error),
    /// Failed to decode the avif file
    #[cfg(feature = "avif")]
    #[error("Failed to decode the avif file: {0}")]
    AvifDecode(libavif_image::Error),
    /// The palette could not be extracted
    #[error("Failed to extract a palette: {0}")]
    Extraction(#[from] ExtractionError),
    /// The worker threads could not be started
    #[cfg(feature = "threads")]
    #[error("Failed to create the thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// The palette of one image, as written by `--output json`
#[derive(Serialize)]
struct ImagePalette<'a> {
    /// The input path
    image: &'a Path,
    /// Colors sorted by descending percentage
    palette: &'a [ExtractedColor],
}

fn main() -> ExitCode {
    let options = Options::parse();

    tracing_subscriber::fmt()
        .with_max_level(if options.verbose {
            Level::DEBUG
        } else {
            Level::WARN
        })
        .with_writer(std::io::stderr)
        .init();

    let extractor = match Extractor::new(options.extraction_options()) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let results = match run_generate_palettes(&extractor, &options) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = false;
    let mut palettes = Vec::with_capacity(results.len());
    for (path, result) in options.images.iter().zip(results) {
        match result {
            Ok(palette) => palettes.push((path, palette)),
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                failed = true;
            }
        }
    }

    if let Err(e) = print_palettes(&palettes, &options) {
        eprintln!("{e}");
        failed = true;
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Palettes or errors, in the same order as the input paths
type Palettes = Vec<Result<Vec<ExtractedColor>, AppError>>;

/// Builds a thread pool and then generates the palette of each image in parallel
#[cfg(feature = "threads")]
fn run_generate_palettes(extractor: &Extractor, options: &Options) -> Result<Palettes, AppError> {
    use rayon::prelude::*;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(usize::from(options.threads))
        .build()?;

    Ok(pool.install(|| {
        options
            .images
            .par_iter()
            .map(|path| generate_palette(extractor, path))
            .collect()
    }))
}

/// Generates the palette of each image on a single thread
#[cfg(not(feature = "threads"))]
#[allow(clippy::unnecessary_wraps)]
fn run_generate_palettes(extractor: &Extractor, options: &Options) -> Result<Palettes, AppError> {
    Ok(options
        .images
        .iter()
        .map(|path| generate_palette(extractor, path))
        .collect())
}

/// Load an image and extract its palette
fn generate_palette(extractor: &Extractor, path: &Path) -> Result<Vec<ExtractedColor>, AppError> {
    let span = tracing::info_span!("image", path = %path.display());
    let _enter = span.enter();

    let image = time!("Image loading", load_image(path))?.into_rgba8();
    let palette = time!("Palette extraction", extract_palette(extractor, &image))?;

    tracing::info!("Found {} colors", palette.len());
    Ok(palette)
}

/// Run the extractor over a decoded image
fn extract_palette(
    extractor: &Extractor,
    image: &RgbaImage,
) -> Result<Vec<ExtractedColor>, ExtractionError> {
    extractor.extract(&Raster::from(image))
}

/// Load the image at the given path
#[cfg(feature = "avif")]
fn load_image(path: &Path) -> Result<DynamicImage, AppError> {
    if path.extension().map_or(false, |ext| ext == "avif") {
        let buf = std::fs::read(path).map_err(AppError::AvifRead)?;
        libavif_image::read(&buf).map_err(AppError::AvifDecode)
    } else {
        Ok(image::open(path)?)
    }
}

/// Load the image at the given path
#[cfg(not(feature = "avif"))]
fn load_image(path: &Path) -> Result<DynamicImage, AppError> {
    Ok(image::open(path)?)
}

/// Print every palette in the selected output format
fn print_palettes(
    palettes: &[(&PathBuf, Vec<ExtractedColor>)],
    options: &Options,
) -> Result<(), serde_json::Error> {
    if options.output == FormatOutput::Json {
        let json = palettes
            .iter()
            .map(|(path, palette)| ImagePalette {
                image: path,
                palette,
            })
            .collect::<Vec<_>>();

        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    let prefix = options.images.len() > 1;
    for (path, palette) in palettes {
        let mut colors = palette.iter().collect::<Vec<_>>();
        if options.reverse {
            colors.reverse();
        }

        let line = format_colors(&colors, options);
        if prefix {
            println!("{}: {line}", path.display());
        } else {
            println!("{line}");
        }
    }

    Ok(())
}

/// Format one line of colors using the given options
fn format_colors(colors: &[&ExtractedColor], options: &Options) -> String {
    let delimiter = if options.output == FormatOutput::Swatch {
        ""
    } else {
        " "
    };

    colors
        .iter()
        .map(|&color| {
            let text = format_color(color, options);
            if options.verbose && options.output != FormatOutput::Swatch {
                format!("{text} ({:.1}%)", color.dominance)
            } else {
                text
            }
        })
        .collect::<Vec<_>>()
        .join(delimiter)
}

/// Format and colorize the text for one color
fn format_color(color: &ExtractedColor, options: &Options) -> String {
    let Rgb { r, g, b } = color.rgb();

    let text = match options.output {
        FormatOutput::Hex | FormatOutput::Json => color.hex().to_owned(),
        FormatOutput::Rgb => format!("({r},{g},{b})"),
        FormatOutput::Swatch => return "   ".on_truecolor(r, g, b).to_string(),
    };

    match options.colorize {
        Some(ColorizeOutput::Fg) => text.truecolor(r, g, b).to_string(),
        Some(ColorizeOutput::Bg) => text.on_truecolor(r, g, b).to_string(),
        None => text,
    }
}
