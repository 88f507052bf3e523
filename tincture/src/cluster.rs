//! Dispatch between the two clustering strategies

use crate::{Algorithm, ExtractedColor, ExtractionOptions, KMeans, MedianCut, Pixel};

/// A configured clustering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clusterer {
	/// Seeded k-means
	KMeans(KMeans),
	/// Deterministic median cut
	MedianCut(MedianCut),
}

impl Clusterer {
	/// Build the clusterer selected by `options.algorithm`, asking for `options.color_count` colors
	#[must_use]
	pub const fn from_options(options: &ExtractionOptions) -> Self {
		match options.algorithm {
			Algorithm::KMeans => Self::KMeans(
				KMeans::new(options.color_count, options.seed).with_max_iterations(options.max_iterations),
			),
			Algorithm::MedianCut => Self::MedianCut(MedianCut::new(options.color_count)),
		}
	}

	/// The algorithm this clusterer runs
	#[must_use]
	pub const fn algorithm(&self) -> Algorithm {
		match self {
			Self::KMeans(_) => Algorithm::KMeans,
			Self::MedianCut(_) => Algorithm::MedianCut,
		}
	}

	/// Reduce `pixels` to representative colors sorted by descending percentage
	///
	/// The percentages of the returned colors sum to `1.0` unless `pixels` is empty.
	#[must_use]
	pub fn cluster(&self, pixels: &[Pixel]) -> Vec<ExtractedColor> {
		match self {
			Self::KMeans(kmeans) => kmeans.cluster(pixels),
			Self::MedianCut(median_cut) => median_cut.cluster(pixels),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_options_select_default_kmeans() {
		assert_eq!(ExtractionOptions::DEFAULT_MAX_ITERATIONS, KMeans::DEFAULT_MAX_ITERATIONS);
		assert_eq!(
			Clusterer::from_options(&ExtractionOptions::default()),
			Clusterer::KMeans(KMeans::new(ExtractionOptions::DEFAULT_COLOR_COUNT, 0))
		);
	}

	#[test]
	fn selects_algorithm_from_options() {
		let options = ExtractionOptions { color_count: 3, seed: 9, max_iterations: 7, ..Default::default() };
		assert_eq!(
			Clusterer::from_options(&options),
			Clusterer::KMeans(KMeans::new(3, 9).with_max_iterations(7))
		);

		let options = ExtractionOptions { algorithm: Algorithm::MedianCut, color_count: 4, ..Default::default() };
		let clusterer = Clusterer::from_options(&options);
		assert_eq!(clusterer, Clusterer::MedianCut(MedianCut::new(4)));
		assert_eq!(clusterer.algorithm(), Algorithm::MedianCut);
	}
}
