//! Deterministic median cut quantization
//!
//! Buckets are owned `Vec`s of pixels. Each split consumes the largest bucket
//! that holds more than one color and replaces it with its two halves.

use crate::{
	color::{self, ExtractedColor},
	Pixel,
};

/// Population at which a median cut bucket is fully trusted
const CONFIDENCE_SATURATION: f64 = 50.0;

/// A color channel to split a bucket along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Channel {
	/// Red
	Red,
	/// Green
	Green,
	/// Blue
	Blue,
}

impl Channel {
	/// The value of this channel for the given pixel
	const fn of(self, pixel: Pixel) -> u8 {
		match self {
			Self::Red => pixel.red,
			Self::Green => pixel.green,
			Self::Blue => pixel.blue,
		}
	}
}

/// The channel with the largest `max - min` range in `bucket` and that range,
/// preferring red then green on ties
fn widest_channel(bucket: &[Pixel]) -> (Channel, u8) {
	let mut min = [u8::MAX; 3];
	let mut max = [u8::MIN; 3];
	for pixel in bucket {
		for (i, value) in [pixel.red, pixel.green, pixel.blue].into_iter().enumerate() {
			min[i] = min[i].min(value);
			max[i] = max[i].max(value);
		}
	}

	let range = |i: usize| max[i].saturating_sub(min[i]);
	let (r, g, b) = (range(0), range(1), range(2));

	if r >= g && r >= b {
		(Channel::Red, r)
	} else if g >= b {
		(Channel::Green, g)
	} else {
		(Channel::Blue, b)
	}
}

/// Whether `bucket` holds at least two distinct colors
fn can_split(bucket: &[Pixel]) -> bool {
	bucket.len() > 1 && widest_channel(bucket).1 > 0
}

/// Index of the largest bucket that can still be split, preferring the first on ties
///
/// A bucket of identical pixels counts as a single color and is never split.
fn largest_bucket(buckets: &[Vec<Pixel>]) -> Option<usize> {
	let mut largest: Option<(usize, usize)> = None;
	for (i, bucket) in buckets.iter().enumerate() {
		if largest.map_or(true, |(_, len)| bucket.len() > len) && can_split(bucket) {
			largest = Some((i, bucket.len()));
		}
	}
	largest.map(|(i, _)| i)
}

/// Sort `bucket` along its widest channel and split it in half
fn split(mut bucket: Vec<Pixel>) -> (Vec<Pixel>, Vec<Pixel>) {
	let (channel, _) = widest_channel(&bucket);
	bucket.sort_by_key(|&pixel| channel.of(pixel));
	let upper = bucket.split_off(bucket.len() / 2);
	(bucket, upper)
}

/// Parameters for median cut quantization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianCut {
	/// The (maximum) number of buckets
	target_colors: usize,
}

impl MedianCut {
	/// Split into at most `target_colors` buckets
	#[must_use]
	pub const fn new(target_colors: usize) -> Self {
		Self { target_colors }
	}

	/// The (maximum) number of buckets
	#[must_use]
	pub const fn target_colors(&self) -> usize {
		self.target_colors
	}

	/// Repeatedly split the largest bucket until there are `target_colors` buckets
	/// or every bucket holds a single color
	#[must_use]
	pub fn buckets(&self, pixels: &[Pixel]) -> Vec<Vec<Pixel>> {
		if self.target_colors == 0 || pixels.is_empty() {
			return Vec::new();
		}

		let mut buckets = vec![pixels.to_vec()];
		while buckets.len() < self.target_colors {
			let Some(index) = largest_bucket(&buckets) else { break };
			let (lower, upper) = split(std::mem::take(&mut buckets[index]));
			buckets[index] = lower;
			buckets.push(upper);
		}

		buckets
	}

	/// Quantize `pixels` into at most `target_colors` colors sorted by descending percentage
	#[must_use]
	pub fn cluster(&self, pixels: &[Pixel]) -> Vec<ExtractedColor> {
		let buckets = self.buckets(pixels);
		tracing::debug!(buckets = buckets.len(), "median cut finished");

		let mut colors = buckets
			.iter()
			.map(|bucket| {
				ExtractedColor::from_cluster(color::mean(bucket), bucket.len(), pixels.len(), CONFIDENCE_SATURATION)
			})
			.collect::<Vec<_>>();

		color::sort_by_percentage(&mut colors);
		colors
	}
}
