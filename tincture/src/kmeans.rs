//! Provides the implementation for seeded k-means over raw RGB pixels

use crate::{
	color::{self, squared_distance, ExtractedColor},
	Pixel,
};
use palette::Srgb;
use rand::{Rng, SeedableRng};

/// Population at which a k-means cluster is fully trusted
const CONFIDENCE_SATURATION: f64 = 100.0;

/// Promote a byte pixel to floating point channels
fn to_f64(pixel: Pixel) -> Srgb<f64> {
	Srgb::new(f64::from(pixel.red), f64::from(pixel.green), f64::from(pixel.blue))
}

/// Data for each center/centroid
struct CenterData {
	/// The centroid point
	centroid: Vec<Srgb<f64>>,
	/// Vector sum for all pixels in this center
	sum: Vec<Srgb<f64>>,
	/// Number of pixels in this center
	count: Vec<usize>,
}

impl CenterData {
	/// Create a [`CenterData`] from the initial centroids
	fn new(centroid: Vec<Srgb<f64>>) -> Self {
		let k = centroid.len();
		Self {
			centroid,
			sum: vec![Srgb::new(0.0, 0.0, 0.0); k],
			count: vec![0; k],
		}
	}
}

/// Result from running k-means
#[derive(Debug, Clone)]
pub struct KmeansResult {
	/// Sum of squared distances from each pixel to its centroid
	pub variance: f64,
	/// Final centroids of the non-empty clusters
	pub centroids: Vec<Srgb<f64>>,
	/// Number of pixels in each centroid
	pub counts: Vec<usize>,
	/// Number of elapsed iterations
	pub iterations: usize,
}

impl KmeansResult {
	/// Create an empty result, representing that k-means could not be run
	const fn empty() -> Self {
		Self {
			variance: 0.0,
			centroids: Vec::new(),
			counts: Vec::new(),
			iterations: 0,
		}
	}
}

/// Choose the starting centroids by sampling `k` pixels uniformly with replacement
fn initial_centroids(k: usize, rng: &mut impl Rng, pixels: &[Pixel]) -> Vec<Srgb<f64>> {
	(0..k).map(|_| to_f64(pixels[rng.gen_range(0..pixels.len())])).collect()
}

/// Index of the closest centroid, preferring the lowest index on ties
fn nearest(color: Srgb<f64>, centroids: &[Srgb<f64>]) -> usize {
	let mut min_dist = f64::INFINITY;
	let mut min_center = 0;
	for (i, &centroid) in centroids.iter().enumerate() {
		let dist = squared_distance(color, centroid);
		if dist < min_dist {
			min_dist = dist;
			min_center = i;
		}
	}
	min_center
}

/// For each pixel, update its assigned center. Returns whether any assignment changed.
fn update_assignments(pixels: &[Pixel], centroids: &[Srgb<f64>], assignment: &mut [usize]) -> bool {
	let mut changed = false;
	for (&pixel, center) in pixels.iter().zip(assignment) {
		let closest = nearest(to_f64(pixel), centroids);
		if closest != *center {
			*center = closest;
			changed = true;
		}
	}
	changed
}

/// Recompute the sums and counts of each center from the current assignments
fn compute_sums(pixels: &[Pixel], centers: &mut CenterData, assignment: &[usize]) {
	centers.sum.fill(Srgb::new(0.0, 0.0, 0.0));
	centers.count.fill(0);

	for (&pixel, &center) in pixels.iter().zip(assignment) {
		let sum = &mut centers.sum[center];
		sum.red += f64::from(pixel.red);
		sum.green += f64::from(pixel.green);
		sum.blue += f64::from(pixel.blue);
		centers.count[center] += 1;
	}
}

/// Move each non-empty center to the mean of its pixels. Empty centers keep their centroid.
fn update_centroids(centers: &mut CenterData) {
	for ((centroid, &n), sum) in centers.centroid.iter_mut().zip(&centers.count).zip(&centers.sum) {
		if n > 0 {
			#[allow(clippy::cast_precision_loss)]
			let n = n as f64;
			*centroid = Srgb::new(sum.red / n, sum.green / n, sum.blue / n);
		}
	}
}

/// Parameters for k-means clustering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KMeans {
	/// The (maximum) number of clusters
	k: usize,
	/// Upper bound on the number of assignment passes
	max_iterations: usize,
	/// Seed for choosing the initial centroids
	seed: u64,
}

impl KMeans {
	/// Default upper bound on the number of iterations
	pub const DEFAULT_MAX_ITERATIONS: usize = 50;

	/// Find at most `k` clusters, choosing initial centroids with the given seed
	#[must_use]
	pub const fn new(k: usize, seed: u64) -> Self {
		Self { k, max_iterations: Self::DEFAULT_MAX_ITERATIONS, seed }
	}

	/// Change the iteration bound. A bound of `0` is treated as `1`.
	#[must_use]
	pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
		self.max_iterations = max_iterations;
		self
	}

	/// The (maximum) number of clusters
	#[must_use]
	pub const fn k(&self) -> usize {
		self.k
	}

	/// Run k-means on `pixels`, returning the raw centroids and counts
	///
	/// An empty result is returned if `pixels` is empty or `k` is `0`.
	#[must_use]
	pub fn run(&self, pixels: &[Pixel]) -> KmeansResult {
		if self.k == 0 || pixels.is_empty() {
			return KmeansResult::empty();
		}

		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(self.seed);
		let mut centers = CenterData::new(initial_centroids(self.k, &mut rng, pixels));

		// `k` marks a pixel as not yet assigned, so the first pass always counts as a change
		let mut assignment = vec![self.k; pixels.len()];

		let mut iterations = 0;
		while iterations < self.max_iterations.max(1) {
			let changed = update_assignments(pixels, &centers.centroid, &mut assignment);
			iterations += 1;
			tracing::trace!(iterations, changed, "k-means iteration");

			if !changed {
				break;
			}

			compute_sums(pixels, &mut centers, &assignment);
			update_centroids(&mut centers);
		}

		let variance = pixels
			.iter()
			.zip(&assignment)
			.map(|(&pixel, &center)| squared_distance(to_f64(pixel), centers.centroid[center]))
			.sum();

		let (centroids, counts) = centers
			.centroid
			.iter()
			.zip(&centers.count)
			.filter(|&(_, &count)| count > 0)
			.map(|(&centroid, &count)| (centroid, count))
			.unzip();

		KmeansResult { variance, centroids, counts, iterations }
	}

	/// Cluster `pixels` into at most `k` colors sorted by descending percentage
	///
	/// Clusters that end up empty produce no color.
	#[must_use]
	pub fn cluster(&self, pixels: &[Pixel]) -> Vec<ExtractedColor> {
		let result = self.run(pixels);
		tracing::debug!(
			iterations = result.iterations,
			clusters = result.centroids.len(),
			variance = result.variance,
			"k-means finished"
		);

		let mut colors = result
			.centroids
			.into_iter()
			.zip(result.counts)
			.map(|(centroid, count)| {
				ExtractedColor::from_cluster(centroid, count, pixels.len(), CONFIDENCE_SATURATION)
			})
			.collect::<Vec<_>>();

		color::sort_by_percentage(&mut colors);
		colors
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_relative_eq;

	fn test_pixels() -> Vec<Pixel> {
		let mut pixels = Vec::new();
		for (color, n) in [
			(Srgb::new(250, 10, 10), 40),
			(Srgb::new(240, 20, 5), 20),
			(Srgb::new(10, 10, 250), 25),
			(Srgb::new(20, 5, 235), 10),
			(Srgb::new(10, 240, 10), 5),
		] {
			pixels.extend(std::iter::repeat(color).take(n));
		}
		pixels
	}

	fn initialize(k: usize) -> (Vec<Pixel>, CenterData, Vec<usize>) {
		let pixels = test_pixels();
		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(0);
		let centers = CenterData::new(initial_centroids(k, &mut rng, &pixels));
		let assignment = vec![k; pixels.len()];
		(pixels, centers, assignment)
	}

	#[test]
	fn initial_centroids_are_pixels() {
		let pixels = test_pixels();
		let mut rng = rand_xoshiro::Xoshiro256PlusPlus::seed_from_u64(7);
		let centroids = initial_centroids(8, &mut rng, &pixels);

		assert_eq!(centroids.len(), 8);
		for centroid in centroids {
			assert!(pixels.iter().any(|&p| to_f64(p) == centroid));
		}
	}

	#[test]
	fn nearest_prefers_lowest_index() {
		let centroids = [Srgb::new(0.0, 0.0, 0.0), Srgb::new(10.0, 0.0, 0.0), Srgb::new(10.0, 0.0, 0.0)];
		assert_eq!(nearest(Srgb::new(9.0, 0.0, 0.0), &centroids), 1);
		assert_eq!(nearest(Srgb::new(5.0, 0.0, 0.0), &centroids), 0);
	}

	#[test]
	fn first_assignment_always_changes() {
		let (pixels, centers, mut assignment) = initialize(3);
		assert!(update_assignments(&pixels, &centers.centroid, &mut assignment));
		assert!(assignment.iter().all(|&center| center < 3));
		assert!(!update_assignments(&pixels, &centers.centroid, &mut assignment));
	}

	#[test]
	fn sums_reflect_assignment() {
		let (pixels, mut centers, mut assignment) = initialize(4);
		update_assignments(&pixels, &centers.centroid, &mut assignment);
		compute_sums(&pixels, &mut centers, &assignment);

		assert_eq!(centers.count.iter().sum::<usize>(), pixels.len());

		for (&pixel, &center) in pixels.iter().zip(&assignment) {
			let sum = &mut centers.sum[center];
			sum.red -= f64::from(pixel.red);
			sum.green -= f64::from(pixel.green);
			sum.blue -= f64::from(pixel.blue);
			centers.count[center] -= 1;
		}

		for &sum in &centers.sum {
			assert_relative_eq!(sum, Srgb::new(0.0, 0.0, 0.0));
		}
		assert!(centers.count.iter().all(|&n| n == 0));
	}

	#[test]
	fn empty_centers_keep_their_centroid() {
		let mut centers = CenterData::new(vec![Srgb::new(1.0, 2.0, 3.0), Srgb::new(4.0, 5.0, 6.0)]);
		centers.sum[0] = Srgb::new(20.0, 40.0, 60.0);
		centers.count[0] = 2;

		update_centroids(&mut centers);

		assert_eq!(centers.centroid, vec![Srgb::new(10.0, 20.0, 30.0), Srgb::new(4.0, 5.0, 6.0)]);
	}

	#[test]
	fn percentages_cover_all_pixels() {
		let pixels = test_pixels();
		for seed in 0..16 {
			for k in 1..=6 {
				let colors = KMeans::new(k, seed).cluster(&pixels);
				assert!(!colors.is_empty() && colors.len() <= k);

				let total = colors.iter().map(|c| c.percentage).sum::<f64>();
				assert_relative_eq!(total, 1.0, epsilon = 1e-6);

				for pair in colors.windows(2) {
					assert!(pair[0].percentage >= pair[1].percentage);
				}
			}
		}
	}

	#[test]
	fn same_seed_same_result() {
		let pixels = test_pixels();
		let x = KMeans::new(4, 42).cluster(&pixels);
		let y = KMeans::new(4, 42).cluster(&pixels);
		assert_eq!(x, y);
	}

	#[test]
	fn identical_pixels_collapse_to_one_cluster() {
		let pixels = vec![Srgb::new(255, 0, 0); 500];
		let colors = KMeans::new(5, 3).cluster(&pixels);

		assert_eq!(colors.len(), 1);
		assert_eq!(colors[0].hex(), "#ff0000");
		assert_eq!(colors[0].percentage, 1.0);
		assert_eq!(colors[0].confidence, 1.0);
	}

	#[test]
	fn separates_two_distinct_colors() {
		let mut pixels = vec![Srgb::new(255, 0, 0); 50];
		pixels.extend(vec![Srgb::new(0, 0, 255); 50]);

		for seed in 0..16 {
			let colors = KMeans::new(2, seed).cluster(&pixels);
			let mut hexes = colors.iter().map(ExtractedColor::hex).collect::<Vec<_>>();
			hexes.sort_unstable();

			assert_eq!(hexes, vec!["#0000ff", "#ff0000"], "seed {seed}");
			for color in &colors {
				assert_relative_eq!(color.percentage, 0.5);
				assert_relative_eq!(color.confidence, 0.5);
			}
		}
	}

	#[test]
	fn max_iterations_reached() {
		let pixels = (0..=255).flat_map(|r| [Srgb::new(r, 0, 255 - r), Srgb::new(r, r, 0)]).collect::<Vec<_>>();

		let converged = KMeans::new(6, 1).with_max_iterations(1000).run(&pixels);
		assert!((2..1000).contains(&converged.iterations));

		let result = KMeans::new(6, 1).with_max_iterations(1).run(&pixels);
		assert_eq!(result.iterations, 1);
		assert_eq!(result.counts.iter().sum::<usize>(), pixels.len());

		let result = KMeans::new(6, 1).with_max_iterations(0).run(&pixels);
		assert_eq!(result.iterations, 1);
	}

	#[test]
	fn empty_input() {
		assert!(KMeans::new(4, 0).cluster(&[]).is_empty());
		assert!(KMeans::new(0, 0).cluster(&test_pixels()).is_empty());
	}
}
