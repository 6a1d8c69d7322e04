//! External contour extraction on binary masks.
//!
//! A contour here is represented by the region it encloses: the 8-connected
//! foreground blob together with every hole inside it. Holes are background
//! pixels that cannot reach the image border through 4-connected background.
//! Blobs nested inside another blob's hole are absorbed by the outer one, so
//! only outermost contours are reported. The area of a contour is the pixel
//! count of its filled interior.
use crate::image::Mask;

const NEIGH8: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const NEIGH4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// Filled interior of one external contour.
#[derive(Clone, Debug)]
pub struct Contour {
    /// Linear indices (`y * w + x`) of the enclosed pixels.
    pub pixels: Vec<usize>,
    /// Inclusive bounding box `[x0, y0, x1, y1]`.
    pub bbox: [usize; 4],
}

impl Contour {
    pub fn area(&self) -> usize {
        self.pixels.len()
    }

    pub fn bbox_width(&self) -> usize {
        self.bbox[2] - self.bbox[0] + 1
    }

    pub fn bbox_height(&self) -> usize {
        self.bbox[3] - self.bbox[1] + 1
    }

    /// Rasterise the filled interior into a fresh mask.
    pub fn to_mask(&self, w: usize, h: usize) -> Mask {
        let mut mask = Mask::new(w, h);
        for &i in &self.pixels {
            mask.data[i] = 1;
        }
        mask
    }
}

#[inline]
fn step(x: usize, y: usize, (dx, dy): (isize, isize), w: usize, h: usize) -> Option<usize> {
    let nx = x as isize + dx;
    let ny = y as isize + dy;
    if nx < 0 || ny < 0 || nx >= w as isize || ny >= h as isize {
        None
    } else {
        Some(ny as usize * w + nx as usize)
    }
}

/// Background reachable from the border through 4-connected background.
fn outside_region(mask: &Mask) -> Vec<bool> {
    let (w, h) = (mask.w, mask.h);
    let mut outside = vec![false; w * h];
    let mut stack = Vec::new();
    let seed = |i: usize, outside: &mut [bool], stack: &mut Vec<usize>| {
        if mask.data[i] == 0 && !outside[i] {
            outside[i] = true;
            stack.push(i);
        }
    };
    for x in 0..w {
        seed(x, &mut outside, &mut stack);
        seed((h - 1) * w + x, &mut outside, &mut stack);
    }
    for y in 0..h {
        seed(y * w, &mut outside, &mut stack);
        seed(y * w + w - 1, &mut outside, &mut stack);
    }
    while let Some(i) = stack.pop() {
        let (x, y) = (i % w, i / w);
        for off in NEIGH4 {
            if let Some(j) = step(x, y, off, w, h) {
                if mask.data[j] == 0 && !outside[j] {
                    outside[j] = true;
                    stack.push(j);
                }
            }
        }
    }
    outside
}

/// Extract all external contours of `mask`, in raster order of their first
/// pixel.
pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
    let (w, h) = (mask.w, mask.h);
    if w == 0 || h == 0 {
        return Vec::new();
    }
    let outside = outside_region(mask);
    let mut visited = vec![false; w * h];
    let mut stack = Vec::new();
    let mut contours = Vec::new();

    for start in 0..w * h {
        if outside[start] || visited[start] {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let mut pixels = Vec::new();
        let mut bbox = [usize::MAX, usize::MAX, 0, 0];
        while let Some(i) = stack.pop() {
            let (x, y) = (i % w, i / w);
            pixels.push(i);
            bbox[0] = bbox[0].min(x);
            bbox[1] = bbox[1].min(y);
            bbox[2] = bbox[2].max(x);
            bbox[3] = bbox[3].max(y);
            for off in NEIGH8 {
                if let Some(j) = step(x, y, off, w, h) {
                    if !outside[j] && !visited[j] {
                        visited[j] = true;
                        stack.push(j);
                    }
                }
            }
        }
        contours.push(Contour { pixels, bbox });
    }
    contours
}

/// The contour with the largest filled area, if any.
pub fn largest_external_contour(mask: &Mask) -> Option<Contour> {
    find_external_contours(mask)
        .into_iter()
        .max_by_key(Contour::area)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(m: &mut Mask, x0: usize, y0: usize, x1: usize, y1: usize) {
        for y in y0..=y1 {
            for x in x0..=x1 {
                m.set(x, y, true);
            }
        }
    }

    #[test]
    fn empty_mask_has_no_contours() {
        assert!(find_external_contours(&Mask::new(10, 10)).is_empty());
        assert!(largest_external_contour(&Mask::new(10, 10)).is_none());
    }

    #[test]
    fn ring_is_filled_and_swallows_inner_blob() {
        let mut m = Mask::new(30, 30);
        rect(&mut m, 5, 5, 24, 24);
        for y in 8..=21 {
            for x in 8..=21 {
                m.set(x, y, false);
            }
        }
        rect(&mut m, 12, 12, 14, 14);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 20 * 20);
        assert_eq!(contours[0].bbox, [5, 5, 24, 24]);
    }

    #[test]
    fn largest_of_separate_blobs_is_selected() {
        let mut m = Mask::new(40, 20);
        rect(&mut m, 1, 1, 4, 4);
        rect(&mut m, 10, 2, 29, 17);
        let contours = find_external_contours(&m);
        assert_eq!(contours.len(), 2);
        let main = largest_external_contour(&m).unwrap();
        assert_eq!(main.area(), 20 * 16);
        assert_eq!(main.bbox_width(), 20);
        assert_eq!(main.bbox_height(), 16);
        let clean = main.to_mask(40, 20);
        assert!(!clean.get(2, 2));
        assert!(clean.get(10, 2));
    }

    #[test]
    fn diagonal_neighbours_join_one_contour() {
        let mut m = Mask::new(6, 6);
        m.set(1, 1, true);
        m.set(2, 2, true);
        m.set(3, 3, true);
        assert_eq!(find_external_contours(&m).len(), 1);
    }
}
