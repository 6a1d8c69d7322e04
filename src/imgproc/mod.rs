//! Low-level image operators shared by the segmentation, depth and volume
//! stages: colour conversion, separable filters, binary morphology, shape
//! rasterisation and external contours.

pub mod color;
pub mod contours;
pub mod filters;
pub mod morphology;
pub mod shapes;

pub use color::{lightness_plane, luma_plane, rgb_to_hsv, Hsv, HsvRange};
pub use contours::{find_external_contours, largest_external_contour, Contour};
pub use filters::{abs_diff, box_mean, gaussian_blur, Kernel1d, SeparableFilter};
pub use shapes::centered_ellipse;
