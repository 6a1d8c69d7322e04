#![allow(dead_code)]

/// Packed RGB image filled with one colour.
pub fn solid_rgb(width: usize, height: usize, rgb: [u8; 3]) -> Vec<u8> {
    assert!(width > 0 && height > 0, "image dimensions must be positive");
    rgb.iter().copied().cycle().take(width * height * 3).collect()
}

/// Textured disc (two alternating shades in `cell`-sized squares) centred on a
/// flat background.
pub fn textured_disc_rgb(
    width: usize,
    height: usize,
    radius: f32,
    shades: ([u8; 3], [u8; 3]),
    background: [u8; 3],
    cell: usize,
) -> Vec<u8> {
    assert!(cell > 0, "cell size must be positive");
    let (cx, cy) = (width as f32 / 2.0, height as f32 / 2.0);
    let mut img = Vec::with_capacity(width * height * 3);
    for y in 0..height {
        for x in 0..width {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let px = if dx * dx + dy * dy > radius * radius {
                background
            } else if (x / cell + y / cell) % 2 == 0 {
                shades.0
            } else {
                shades.1
            };
            img.extend_from_slice(&px);
        }
    }
    img
}

/// Deterministic pseudo-random RGB noise.
pub fn noise_rgb(width: usize, height: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..width * height * 3)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}
