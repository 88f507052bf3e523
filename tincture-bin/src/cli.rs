//! Specifies the CLI and handles arg parsing

use clap::{Parser, ValueEnum};
use std::{
	fmt::{Debug, Display},
	num::ParseFloatError,
	ops::RangeBounds,
	path::PathBuf,
	str::FromStr,
};
use tincture::{Algorithm, ExtractionOptions, DEFAULT_MAX_SAMPLES};

/// Supported output formats for the final colors
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum FormatOutput {
	/// sRGB hexcode
	Hex,
	/// sRGB (r,g,b) triple
	Rgb,
	/// Whitespace with true color background
	Swatch,
	/// The full palette of every image as a JSON array
	Json,
}

/// Ways to colorize the output text
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum ColorizeOutput {
	/// Foreground
	Fg,
	/// Background
	Bg,
}

/// Generate a ranked color palette for one or more images.
///
/// Pixels are sampled from each image and reduced to a few representative colors
/// using k-means clustering or median cut quantization.
/// The colors are printed from most to least dominant.
#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(version)]
pub struct Options {
	/// The paths to the input images
	#[arg(required = true)]
	pub images: Vec<PathBuf>,

	/// The clustering algorithm, either `kmeans` or `median_cut`
	#[arg(short, long, default_value_t = Algorithm::KMeans)]
	pub algorithm: Algorithm,

	/// The (maximum) number of colors to find
	#[arg(short = 'k', long = "colors", default_value_t = ExtractionOptions::DEFAULT_COLOR_COUNT, value_parser = parse_positive)]
	pub color_count: usize,

	/// Drop colors that make up less than this fraction of the image
	///
	/// Provided values should be in the range [0.0, 1.0].
	#[arg(short = 'm', long = "min-percentage", default_value_t = ExtractionOptions::DEFAULT_MIN_COLOR_PERCENTAGE, value_parser = parse_unit_interval)]
	pub min_color_percentage: f64,

	/// Drop grays and near grays from the palette
	#[arg(long)]
	pub exclude_neutral: bool,

	/// Drop colors that are too close to a more dominant color
	///
	/// See --sensitivity for how close is too close.
	#[arg(long)]
	pub exclude_similar: bool,

	/// The tolerance used by --exclude-similar
	///
	/// A color is dropped if its RGB distance to a more dominant color is below (1 - sensitivity) * 100.
	/// So 1.0 keeps every color, and lower values merge more and more colors together.
	/// Provided values should be in the range [0.0, 1.0].
	#[arg(long, default_value_t = ExtractionOptions::DEFAULT_SENSITIVITY, value_parser = parse_unit_interval)]
	pub sensitivity: f64,

	/// The maximum number of k-means iterations
	#[arg(short = 'i', long, default_value_t = ExtractionOptions::DEFAULT_MAX_ITERATIONS, value_parser = parse_positive)]
	pub max_iter: usize,

	/// The approximate maximum number of pixels sampled from each image
	///
	/// Higher values give more accurate palettes for large images, at the cost of speed.
	#[arg(short = 'p', long, default_value_t = DEFAULT_MAX_SAMPLES, value_parser = parse_positive)]
	pub max_samples: usize,

	/// The seed value used for the k-means random number generator
	#[arg(long, default_value_t = 0)]
	pub seed: u64,

	/// The format to print the colors in
	#[arg(short, long, default_value = "hex")]
	pub output: FormatOutput,

	/// Color the foreground or background for each printed color
	#[arg(short, long)]
	pub colorize: Option<ColorizeOutput>,

	/// Print the colors from least to most dominant
	#[arg(short, long)]
	pub reverse: bool,

	/// The number of threads to use for processing multiple images
	///
	/// A value of 0 indicates to automatically choose the number of threads.
	#[cfg(feature = "threads")]
	#[arg(short, long, default_value_t = 0)]
	pub threads: u8,

	/// Print additional information, such as timings and color percentages
	#[arg(short, long)]
	pub verbose: bool,
}

impl Options {
	/// The extraction options selected on the command line
	pub fn extraction_options(&self) -> ExtractionOptions {
		ExtractionOptions {
			algorithm: self.algorithm,
			color_count: self.color_count,
			min_color_percentage: self.min_color_percentage,
			include_neutral: !self.exclude_neutral,
			exclude_similar: self.exclude_similar,
			sensitivity: self.sensitivity,
			max_iterations: self.max_iter,
			max_samples: self.max_samples,
			seed: self.seed,
		}
	}
}

/// Parse a float value and ensure it in the provided, valid range
fn parse_float_in_range<T>(s: &str, range: impl RangeBounds<T> + Debug) -> Result<T, String>
where
	T: FromStr<Err = ParseFloatError> + Display + PartialOrd,
{
	let value: T = s.parse().map_err(|e| format!("{e}"))?;
	if range.contains(&value) {
		Ok(value)
	} else {
		Err(format!("{value} is not in {range:?}"))
	}
}

/// Parse a fraction and ensure it is in `0.0..=1.0`
fn parse_unit_interval(s: &str) -> Result<f64, String> {
	parse_float_in_range(s, 0.0..=1.0)
}

/// Parse a count and ensure it is at least `1`
fn parse_positive(s: &str) -> Result<usize, String> {
	match s.parse::<usize>() {
		Ok(0) => Err("must be at least 1".to_owned()),
		Ok(n) => Ok(n),
		Err(e) => Err(format!("{e}")),
	}
}
