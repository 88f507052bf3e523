//! Wires sampling, clustering, and filtering into a single extraction call

use crate::{
	filter,
	sample::{sample_pixels, Raster},
	Clusterer, ExtractedColor, ExtractionError, ExtractionOptions,
};
use std::fmt;

/// The steps of an extraction, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
	/// Collecting opaque pixels from the raster
	Sampling,
	/// Reducing the samples to representative colors
	Clustering,
	/// Thresholding, deduplicating, and truncating the raw palette
	Filtering,
	/// The palette is ready
	Done,
	/// The extraction stopped with an error, logged alongside this stage
	Failed,
}

impl fmt::Display for Stage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Sampling => "sampling",
			Self::Clustering => "clustering",
			Self::Filtering => "filtering",
			Self::Done => "done",
			Self::Failed => "failed",
		})
	}
}

/// Validated options together with the clusterer they select
///
/// An `Extractor` holds no mutable state, so one instance can serve any number of
/// images, including from several threads at once.
#[derive(Debug, Clone)]
pub struct Extractor {
	/// The validated options
	options: ExtractionOptions,
	/// The strategy chosen by `options.algorithm`
	clusterer: Clusterer,
}

impl Extractor {
	/// Validate `options` and select the clusterer
	///
	/// # Errors
	/// Returns [`ExtractionError::InvalidOptions`] if any option is out of range.
	pub fn new(options: ExtractionOptions) -> Result<Self, ExtractionError> {
		options.validate()?;
		let clusterer = Clusterer::from_options(&options);
		Ok(Self { options, clusterer })
	}

	/// The options this extractor runs with
	#[must_use]
	pub const fn options(&self) -> &ExtractionOptions {
		&self.options
	}

	/// The selected clustering strategy
	#[must_use]
	pub const fn clusterer(&self) -> &Clusterer {
		&self.clusterer
	}

	/// Extract the palette of `raster`
	///
	/// The result has at most `color_count` entries sorted by descending percentage.
	/// It may be empty if every color was filtered out.
	///
	/// # Errors
	/// Returns [`ExtractionError::EmptyPixelSet`] if the image has no opaque pixels.
	pub fn extract(&self, raster: &Raster<'_>) -> Result<Vec<ExtractedColor>, ExtractionError> {
		let span = tracing::debug_span!(
			"extract",
			width = raster.width(),
			height = raster.height(),
			algorithm = %self.clusterer.algorithm(),
		);
		let _enter = span.enter();

		tracing::debug!(stage = %Stage::Sampling);
		let pixels = sample_pixels(raster, self.options.max_samples).map_err(|e| {
			tracing::debug!(stage = %Stage::Failed, error = %e, "extraction failed");
			e
		})?;

		tracing::debug!(stage = %Stage::Clustering, samples = pixels.len());
		let raw = self.clusterer.cluster(&pixels);

		tracing::debug!(stage = %Stage::Filtering, colors = raw.len());
		let palette = filter::apply(raw, &self.options);

		tracing::debug!(stage = %Stage::Done, colors = palette.len());
		Ok(palette)
	}
}

/// Extract the palette of `raster` with the given options
///
/// # Errors
/// Returns [`ExtractionError::InvalidOptions`] before doing any work if the options are invalid,
/// or [`ExtractionError::EmptyPixelSet`] if the image has no opaque pixels.
pub fn extract(raster: &Raster<'_>, options: &ExtractionOptions) -> Result<Vec<ExtractedColor>, ExtractionError> {
	Extractor::new(options.clone())?.extract(raster)
}

/// Extract the palette of an interleaved RGBA buffer
///
/// # Errors
/// Same as [`extract`], plus [`ExtractionError::BufferSize`] if `pixels` does not hold
/// exactly `width * height * 4` bytes.
pub fn extract_rgba(
	width: u32,
	height: u32,
	pixels: &[u8],
	options: &ExtractionOptions,
) -> Result<Vec<ExtractedColor>, ExtractionError> {
	let extractor = Extractor::new(options.clone())?;
	extractor.extract(&Raster::new(width, height, pixels)?)
}
