use crate::image::Mask;

/// Filled, axis-aligned ellipse centred at `(w / 2, h / 2)` with semi-axes
/// `floor(w * fx)` and `floor(h * fy)`, each at least one pixel.
pub fn centered_ellipse(w: usize, h: usize, fx: f32, fy: f32) -> Mask {
    let mut mask = Mask::new(w, h);
    if w == 0 || h == 0 {
        return mask;
    }
    let (cx, cy) = ((w / 2) as f32, (h / 2) as f32);
    let ax = ((w as f32 * fx).floor()).max(1.0);
    let ay = ((h as f32 * fy).floor()).max(1.0);
    for y in 0..h {
        let dy = (y as f32 - cy) / ay;
        let dy2 = dy * dy;
        if dy2 > 1.0 {
            continue;
        }
        for x in 0..w {
            let dx = (x as f32 - cx) / ax;
            if dx * dx + dy2 <= 1.0 {
                mask.set(x, y, true);
            }
        }
    }
    mask
}
