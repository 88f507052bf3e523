//! Extract a small, ranked color palette from raster image pixels.
//!
//! # Examples
//!
//! ## Read an image file and get up to 5 dominant colors.
//!
//! ```no_run
//! let image = image::open("some image").unwrap().into_rgba8();
//! let palette = tincture::extract(&(&image).into(), &tincture::ExtractionOptions::default()).unwrap();
//!
//! for color in &palette {
//!     println!("{} {:.1}%", color.hex(), color.dominance);
//! }
//! ```
//!
//! ## Reuse the same options for many images.
//!
//! ```no_run
//! use tincture::{Algorithm, ExtractionOptions, Extractor, Raster};
//!
//! let options = ExtractionOptions {
//!     algorithm: Algorithm::MedianCut,
//!     color_count: 8,
//!     include_neutral: false,
//!     ..Default::default()
//! };
//! let extractor = Extractor::new(options).unwrap();
//!
//! let pixels = vec![255; 64 * 64 * 4];
//! let palette = extractor.extract(&Raster::new(64, 64, &pixels).unwrap()).unwrap();
//! ```
//!
//! # Pipeline
//!
//! Each extraction runs the same three stages:
//!
//! 1. **Sampling**: roughly [`DEFAULT_MAX_SAMPLES`] evenly strided pixels are taken from the image
//!    and mostly transparent ones (alpha below 128) are dropped.
//!    If nothing is left, the extraction fails with [`ExtractionError::EmptyPixelSet`].
//! 2. **Clustering**: the samples are reduced to `color_count` colors
//!    by either k-means or median cut, see [`Algorithm`].
//! 3. **Filtering**: rare colors, grays (optionally), and near duplicates (optionally) are dropped,
//!    and the palette is truncated to `color_count` entries.
//!
//! The returned colors are always sorted by descending percentage.
//!
//! # Arguments
//!
//! ## Algorithm
//!
//! k-means picks its starting centroids at random, so different seeds can give different palettes.
//! The seed is part of [`ExtractionOptions`], so the same options always give the same palette.
//! Median cut is fully deterministic and does not use the seed.
//!
//! ## Minimum Color Percentage
//!
//! Colors that cover less than this share of the sampled pixels are dropped.
//! `0.0` keeps everything.
//!
//! ## Sensitivity
//!
//! Only used when `exclude_similar` is set.
//! A color is dropped if it lies within `(1 - sensitivity) * 100` of a more dominant color
//! (Euclidean distance over raw RGB values, which ranges from `0` to about `441`).
//! So a sensitivity of `1.0` keeps every color, and lower values merge more and more colors.
//!
//! ## Color distance
//!
//! All distances are plain Euclidean distances in RGB space.
//! These are cheap but not perceptually uniform.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::cargo)]
#![warn(clippy::use_debug, clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
#![warn(clippy::unwrap_used, clippy::unwrap_in_result)]
#![warn(clippy::unneeded_field_pattern, clippy::rest_pat_in_fully_bound_structs)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::str_to_string, clippy::string_to_string, clippy::string_slice)]
#![warn(missing_docs, clippy::missing_docs_in_private_items, rustdoc::all)]
#![warn(clippy::float_cmp_const, clippy::lossy_float_literal)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::unreadable_literal)]

pub mod color;
pub mod filter;
pub mod sample;

mod cluster;
mod error;
mod extract;
mod kmeans;
mod median_cut;
mod options;

pub use cluster::Clusterer;
pub use color::{Color, ColorKind, ExtractedColor, Hsl, Pixel, Rgb};
pub use error::{ExtractionError, OptionsError};
pub use extract::{extract, extract_rgba, Extractor, Stage};
pub use kmeans::{KMeans, KmeansResult};
pub use median_cut::MedianCut;
pub use options::{Algorithm, ExtractionOptions};
pub use sample::{sample_pixels, Raster, DEFAULT_MAX_SAMPLES};
