//! Caller supplied configuration for an extraction

use crate::{error::OptionsError, sample::DEFAULT_MAX_SAMPLES, KMeans};
use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The clustering strategy used to reduce the sampled pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
	/// Randomly seeded k-means
	#[default]
	#[cfg_attr(feature = "serde", serde(rename = "kmeans"))]
	KMeans,
	/// Deterministic median cut
	#[cfg_attr(feature = "serde", serde(rename = "median_cut"))]
	MedianCut,
}

impl Algorithm {
	/// The name used when parsing and displaying this algorithm
	#[must_use]
	pub const fn name(self) -> &'static str {
		match self {
			Self::KMeans => "kmeans",
			Self::MedianCut => "median_cut",
		}
	}
}

impl fmt::Display for Algorithm {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

impl FromStr for Algorithm {
	type Err = OptionsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"kmeans" => Ok(Self::KMeans),
			"median_cut" => Ok(Self::MedianCut),
			_ => Err(OptionsError::UnknownAlgorithm(s.to_owned())),
		}
	}
}

/// Settings for one palette extraction
///
/// Use [`ExtractionOptions::validate`] (called by the extractor) before running anything.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct ExtractionOptions {
	/// Clustering strategy
	pub algorithm: Algorithm,
	/// Maximum number of colors in the palette, at least `1`
	pub color_count: usize,
	/// Colors covering less than this share of the sampled pixels are dropped, in `[0, 1]`
	pub min_color_percentage: f64,
	/// Keep grays and near grays
	pub include_neutral: bool,
	/// Drop colors that are too close to a more dominant color
	pub exclude_similar: bool,
	/// Similarity tolerance in `[0, 1]`
	///
	/// Two colors count as duplicates when their distance is below `(1 - sensitivity) * 100`,
	/// so a *lower* sensitivity merges colors that are further apart.
	pub sensitivity: f64,
	/// Upper bound on k-means iterations
	pub max_iterations: usize,
	/// Approximate upper bound on the number of sampled pixels
	pub max_samples: usize,
	/// Seed for the k-means centroid initialization
	pub seed: u64,
}

impl ExtractionOptions {
	/// Default number of colors
	pub const DEFAULT_COLOR_COUNT: usize = 5;
	/// Default minimum color percentage
	pub const DEFAULT_MIN_COLOR_PERCENTAGE: f64 = 0.01;
	/// Default similarity sensitivity
	pub const DEFAULT_SENSITIVITY: f64 = 0.5;
	/// Default k-means iteration bound
	pub const DEFAULT_MAX_ITERATIONS: usize = KMeans::DEFAULT_MAX_ITERATIONS;

	/// Check every field against its documented range
	///
	/// # Errors
	/// Returns the first offending field.
	pub fn validate(&self) -> Result<(), OptionsError> {
		if self.color_count < 1 {
			return Err(OptionsError::ColorCount(self.color_count));
		}
		if !(0.0..=1.0).contains(&self.min_color_percentage) {
			return Err(OptionsError::MinColorPercentage(self.min_color_percentage));
		}
		if !(0.0..=1.0).contains(&self.sensitivity) {
			return Err(OptionsError::Sensitivity(self.sensitivity));
		}
		if self.max_iterations == 0 {
			return Err(OptionsError::MaxIterations);
		}
		if self.max_samples == 0 {
			return Err(OptionsError::MaxSamples);
		}
		Ok(())
	}

	/// The minimum distance two kept colors must have when `exclude_similar` is set
	#[must_use]
	pub fn similarity_distance(&self) -> f64 {
		(1.0 - self.sensitivity) * 100.0
	}
}

impl Default for ExtractionOptions {
	fn default() -> Self {
		Self {
			algorithm: Algorithm::default(),
			color_count: Self::DEFAULT_COLOR_COUNT,
			min_color_percentage: Self::DEFAULT_MIN_COLOR_PERCENTAGE,
			include_neutral: true,
			exclude_similar: false,
			sensitivity: Self::DEFAULT_SENSITIVITY,
			max_iterations: Self::DEFAULT_MAX_ITERATIONS,
			max_samples: DEFAULT_MAX_SAMPLES,
			seed: 0,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_valid() {
		assert_eq!(ExtractionOptions::default().validate(), Ok(()));
	}

	#[test]
	fn rejects_zero_colors() {
		let options = ExtractionOptions { color_count: 0, ..Default::default() };
		assert_eq!(options.validate(), Err(OptionsError::ColorCount(0)));
	}

	#[test]
	fn rejects_out_of_range_percentage() {
		for value in [-0.1, 1.5, f64::NAN] {
			let options = ExtractionOptions { min_color_percentage: value, ..Default::default() };
			assert!(matches!(options.validate(), Err(OptionsError::MinColorPercentage(_))));
		}

		for value in [0.0, 1.0] {
			let options = ExtractionOptions { min_color_percentage: value, ..Default::default() };
			assert_eq!(options.validate(), Ok(()));
		}
	}

	#[test]
	fn rejects_out_of_range_sensitivity() {
		let options = ExtractionOptions { sensitivity: 1.01, ..Default::default() };
		assert_eq!(options.validate(), Err(OptionsError::Sensitivity(1.01)));
	}

	#[test]
	fn rejects_zero_bounds() {
		let options = ExtractionOptions { max_iterations: 0, ..Default::default() };
		assert_eq!(options.validate(), Err(OptionsError::MaxIterations));

		let options = ExtractionOptions { max_samples: 0, ..Default::default() };
		assert_eq!(options.validate(), Err(OptionsError::MaxSamples));
	}

	#[test]
	fn parses_algorithm_names() {
		assert_eq!("kmeans".parse::<Algorithm>(), Ok(Algorithm::KMeans));
		assert_eq!("median_cut".parse::<Algorithm>(), Ok(Algorithm::MedianCut));
		assert_eq!(
			"octree".parse::<Algorithm>(),
			Err(OptionsError::UnknownAlgorithm("octree".to_owned()))
		);

		for algorithm in [Algorithm::KMeans, Algorithm::MedianCut] {
			assert_eq!(algorithm.to_string().parse::<Algorithm>(), Ok(algorithm));
		}
	}

	#[test]
	fn similarity_distance_grows_as_sensitivity_falls() {
		let strict = ExtractionOptions { sensitivity: 0.9, ..Default::default() };
		let loose = ExtractionOptions { sensitivity: 0.1, ..Default::default() };
		assert!(strict.similarity_distance() < loose.similarity_distance());
		assert!((loose.similarity_distance() - 90.0).abs() < 1e-9);
	}

	#[cfg(feature = "serde")]
	#[test]
	fn deserializes_partial_options() {
		let options: ExtractionOptions =
			serde_json::from_str(r#"{"algorithm":"median_cut","colorCount":3,"includeNeutral":false}"#)
				.expect("valid options");

		assert_eq!(options.algorithm, Algorithm::MedianCut);
		assert_eq!(options.color_count, 3);
		assert!(!options.include_neutral);
		assert_eq!(options.max_samples, DEFAULT_MAX_SAMPLES);

		assert!(serde_json::from_str::<ExtractionOptions>(r#"{"algorithm":"octree"}"#).is_err());
	}
}
