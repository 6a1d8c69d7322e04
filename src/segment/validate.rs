use super::params::MaskValidity;
use crate::image::Mask;
use crate::imgproc::largest_external_contour;

impl MaskValidity {
    /// Coverage within bounds, at least one contour, and the largest contour
    /// holding most of the mask.
    pub fn check(&self, mask: &Mask) -> bool {
        let count = mask.count();
        let total = mask.w * mask.h;
        if count == 0 || total == 0 {
            return false;
        }
        let coverage = count as f32 / total as f32;
        if coverage < self.min_coverage || coverage > self.max_coverage {
            return false;
        }
        match largest_external_contour(mask) {
            Some(main) => main.area() as f32 / count as f32 > self.min_main_contour_share,
            None => false,
        }
    }
}

/// Validity predicate with the default thresholds.
pub fn is_valid_mask(mask: &Mask) -> bool {
    MaskValidity::default().check(mask)
}
