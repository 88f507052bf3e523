//! Color types and the color space math shared by every pipeline stage
//!
//! Distances are plain Euclidean distances over raw RGB channel values.
//! This is not perceptually uniform, but it is only ever used to compare colors
//! against each other (deduplication, neutrality), never as an absolute measure.

use palette::{FromColor, Srgb};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A single sampled pixel with its alpha channel already discarded
pub type Pixel = Srgb<u8>;

/// Channel spread below which a color is considered gray
pub const NEUTRAL_THRESHOLD: u8 = 30;

/// Byte RGB triple
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgb {
	/// Red channel
	pub r: u8,
	/// Green channel
	pub g: u8,
	/// Blue channel
	pub b: u8,
}

impl From<Pixel> for Rgb {
	fn from(pixel: Pixel) -> Self {
		Self { r: pixel.red, g: pixel.green, b: pixel.blue }
	}
}

impl From<Rgb> for Pixel {
	fn from(Rgb { r, g, b }: Rgb) -> Self {
		Srgb::new(r, g, b)
	}
}

/// HSL triple with the hue in degrees `[0, 360)` and saturation and lightness in `[0, 100]`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hsl {
	/// Hue in degrees
	pub h: f64,
	/// Saturation percentage
	pub s: f64,
	/// Lightness percentage
	pub l: f64,
}

/// A color in all the representations handed to callers
///
/// `hex` and `hsl` are always derived from `rgb`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color {
	/// Lowercase `#rrggbb`
	pub hex: String,
	/// Byte channels
	pub rgb: Rgb,
	/// HSL components
	pub hsl: Hsl,
}

impl Color {
	/// Build a color from its byte channels
	#[must_use]
	pub fn new(rgb: Rgb) -> Self {
		let pixel = Pixel::from(rgb);
		Self {
			hex: rgb_to_hex(f64::from(rgb.r), f64::from(rgb.g), f64::from(rgb.b)),
			rgb,
			hsl: rgb_to_hsl(pixel),
		}
	}
}

/// The role of an extracted color in the palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ColorKind {
	/// A representative color of the image
	#[default]
	Primary,
}

/// One entry of an extracted palette
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ExtractedColor {
	/// The rounded representative color
	#[cfg_attr(feature = "serde", serde(flatten))]
	pub color: Color,
	/// Palette role, always [`ColorKind::Primary`]
	#[cfg_attr(feature = "serde", serde(rename = "type"))]
	pub kind: ColorKind,
	/// Share of the sampled pixels in this cluster, in `(0, 1]`
	pub percentage: f64,
	/// `percentage * 100`
	pub dominance: f64,
	/// Unrounded centroid (k-means) or mean (median cut) of the cluster
	pub cluster: [f64; 3],
	/// Heuristic in `[0, 1]` that saturates once the cluster is populated enough
	pub confidence: f64,
}

impl ExtractedColor {
	/// Describe a cluster of `population` out of `total` sampled pixels centered on `center`
	///
	/// `saturation` is the population at which `confidence` reaches `1.0`.
	pub(crate) fn from_cluster(center: Srgb<f64>, population: usize, total: usize, saturation: f64) -> Self {
		// pixel counts are bounded by the sample cap, far below 2^52
		#[allow(clippy::cast_precision_loss)]
		let (population, total) = (population as f64, total as f64);
		let percentage = population / total;
		let rgb = Rgb {
			r: round_channel(center.red),
			g: round_channel(center.green),
			b: round_channel(center.blue),
		};

		Self {
			color: Color::new(rgb),
			kind: ColorKind::Primary,
			percentage,
			dominance: percentage * 100.0,
			cluster: [center.red, center.green, center.blue],
			confidence: f64::min(1.0, population / saturation),
		}
	}

	/// Lowercase `#rrggbb`
	#[must_use]
	pub fn hex(&self) -> &str {
		&self.color.hex
	}

	/// Byte channels
	#[must_use]
	pub const fn rgb(&self) -> Rgb {
		self.color.rgb
	}
}

/// Sort colors by descending percentage, keeping the existing order of ties
pub(crate) fn sort_by_percentage(colors: &mut [ExtractedColor]) {
	colors.sort_by(|x, y| f64::total_cmp(&y.percentage, &x.percentage));
}

/// Round a channel value to the nearest byte
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_channel(value: f64) -> u8 {
	value.round().clamp(0.0, 255.0) as u8
}

/// Convert to HSL using the usual min/max formulation
///
/// Achromatic colors get a hue and saturation of `0`.
#[must_use]
pub fn rgb_to_hsl(rgb: Pixel) -> Hsl {
	let hsl = palette::Hsl::<palette::encoding::Srgb, f64>::from_color(rgb.into_format::<f64>());
	let h = hsl.hue.into_positive_degrees();
	Hsl {
		// normalizing a tiny negative hue can land exactly on 360
		h: if h >= 360.0 { 0.0 } else { h },
		s: hsl.saturation * 100.0,
		l: hsl.lightness * 100.0,
	}
}

/// Format channels as lowercase `#rrggbb`, rounding each to the nearest integer
#[must_use]
pub fn rgb_to_hex(r: f64, g: f64, b: f64) -> String {
	let rgb = Srgb::new(round_channel(r), round_channel(g), round_channel(b));
	format!("#{rgb:x}")
}

/// Squared Euclidean distance between two colors in raw RGB space
#[must_use]
pub fn squared_distance(x: Srgb<f64>, y: Srgb<f64>) -> f64 {
	let dr = x.red - y.red;
	let dg = x.green - y.green;
	let db = x.blue - y.blue;
	dr * dr + dg * dg + db * db
}

/// Euclidean distance between two colors in raw RGB space, in `[0, ~441.67]`
#[must_use]
pub fn color_distance(x: Srgb<f64>, y: Srgb<f64>) -> f64 {
	squared_distance(x, y).sqrt()
}

/// Whether the channel spread of `rgb` is below `threshold`, i.e. the color is a gray of any lightness
#[must_use]
pub fn is_neutral(rgb: Rgb, threshold: u8) -> bool {
	let max = rgb.r.max(rgb.g).max(rgb.b);
	let min = rgb.r.min(rgb.g).min(rgb.b);
	max - min < threshold
}

/// Per channel arithmetic mean of `pixels`, or black if there are none
pub(crate) fn mean(pixels: &[Pixel]) -> Srgb<f64> {
	if pixels.is_empty() {
		return Srgb::new(0.0, 0.0, 0.0);
	}

	let (r, g, b) = pixels.iter().fold((0u64, 0u64, 0u64), |(r, g, b), p| {
		(r + u64::from(p.red), g + u64::from(p.green), b + u64::from(p.blue))
	});

	#[allow(clippy::cast_precision_loss)]
	let n = pixels.len() as f64;

	#[allow(clippy::cast_precision_loss)]
	Srgb::new(r as f64 / n, g as f64 / n, b as f64 / n)
}
