//! Error types returned by the extraction pipeline

use thiserror::Error;

/// Reasons an [`ExtractionOptions`](crate::ExtractionOptions) value is rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OptionsError {
	/// At least one color must be requested
	#[error("color count must be at least 1, got {0}")]
	ColorCount(usize),
	/// Minimum color percentage outside `0.0..=1.0`
	#[error("minimum color percentage must be in [0, 1], got {0}")]
	MinColorPercentage(f64),
	/// Sensitivity outside `0.0..=1.0`
	#[error("sensitivity must be in [0, 1], got {0}")]
	Sensitivity(f64),
	/// k-means must be allowed at least one iteration
	#[error("max iterations must be at least 1")]
	MaxIterations,
	/// The sampler must be allowed at least one sample
	#[error("max samples must be at least 1")]
	MaxSamples,
	/// Algorithm name that is not `kmeans` or `median_cut`
	#[error("unknown algorithm `{0}`, expected `kmeans` or `median_cut`")]
	UnknownAlgorithm(String),
}

/// Error cases for a single palette extraction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractionError {
	/// No pixel survived alpha filtering, or the image has no pixels at all
	#[error("no opaque pixels to sample: the image is empty or fully transparent")]
	EmptyPixelSet,
	/// The options were rejected before any processing began
	#[error("invalid extraction options: {0}")]
	InvalidOptions(#[from] OptionsError),
	/// The RGBA buffer does not match the given dimensions
	#[error("pixel buffer holds {actual} bytes but the dimensions require {expected}")]
	BufferSize {
		/// `width * height * 4`
		expected: usize,
		/// Actual buffer length
		actual: usize,
	},
}
