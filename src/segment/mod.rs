//! Foreground segmentation of the food region.
//!
//! Pipeline
//! - Colour candidates: union of HSV boxes typical for food colours.
//! - Texture candidates: mid-tone lightness with local detail.
//! - Closing then opening with a square element cleans the union.
//! - The largest external contour is kept as the principal object. If it
//!   swallows most of the image the background was probably selected, so the
//!   mask is cut down to a central search ellipse instead.
//! - A final coverage check and the validity predicate decide between the
//!   heuristic mask and the centered fallback ellipse.
//!
//! The segmenter never fails; [`MaskSource`] tells callers which path won.

mod params;
mod segmenter;
mod validate;

pub use params::{MaskValidity, SegmenterParams, FOOD_COLOR_RANGES};
pub use segmenter::{ForegroundSegmenter, MaskSource};
pub use validate::is_valid_mask;

#[cfg(test)]
mod tests;
