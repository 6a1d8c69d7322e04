use super::*;
use crate::image::{ImageRgb8, Mask};

fn solid(w: usize, h: usize, rgb: [u8; 3]) -> Vec<u8> {
    rgb.iter().copied().cycle().take(w * h * 3).collect()
}

fn disc_on_background(w: usize, h: usize, r: f32, fg: [u8; 3], bg: [u8; 3]) -> Vec<u8> {
    let (cx, cy) = (w as f32 / 2.0, h as f32 / 2.0);
    let mut buf = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        for x in 0..w {
            let (dx, dy) = (x as f32 - cx, y as f32 - cy);
            let px = if dx * dx + dy * dy <= r * r { fg } else { bg };
            buf.extend_from_slice(&px);
        }
    }
    buf
}

fn noise(w: usize, h: usize, seed: u32) -> Vec<u8> {
    let mut state = seed;
    (0..w * h * 3)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect()
}

#[test]
fn uniform_gray_falls_back_to_centered_ellipse() {
    let buf = solid(200, 200, [128, 128, 128]);
    let img = ImageRgb8::packed(200, 200, &buf);
    let seg = ForegroundSegmenter::default();
    let (mask, source) = seg.segment_with_source(&img);
    assert_eq!(source, MaskSource::Fallback);
    assert_eq!(mask, seg.fallback_mask(200, 200));
    let cov = mask.coverage();
    assert!((0.18..0.21).contains(&cov), "coverage={cov}");
}

#[test]
fn red_disc_on_white_is_segmented() {
    let (w, h) = (120, 120);
    let buf = disc_on_background(w, h, 30.0, [200, 30, 30], [255, 255, 255]);
    let img = ImageRgb8::packed(w, h, &buf);
    let (mask, source) = ForegroundSegmenter::default().segment_with_source(&img);
    assert_eq!(source, MaskSource::Heuristic);
    assert!(mask.get(60, 60));
    assert!(!mask.get(5, 5));
    let expected = std::f32::consts::PI * 900.0;
    let count = mask.count() as f32;
    assert!(
        (count - expected).abs() < expected * 0.1,
        "count={count} expected~{expected}"
    );
}

#[test]
fn saturated_full_frame_is_cut_to_central_region() {
    let buf = solid(100, 80, [220, 40, 30]);
    let img = ImageRgb8::packed(100, 80, &buf);
    let (mask, source) = ForegroundSegmenter::default().segment_with_source(&img);
    assert_eq!(source, MaskSource::CentralRegion);
    let cov = mask.coverage();
    assert!((0.3..0.45).contains(&cov), "coverage={cov}");
}

#[test]
fn coverage_stays_in_bounds_for_assorted_inputs() {
    let (w, h) = (64, 50);
    let inputs = vec![
        solid(w, h, [0, 0, 0]),
        solid(w, h, [255, 255, 255]),
        solid(w, h, [30, 160, 40]),
        solid(w, h, [128, 128, 128]),
        noise(w, h, 7),
        noise(w, h, 12345),
        disc_on_background(w, h, 4.0, [250, 200, 20], [10, 10, 10]),
        disc_on_background(w, h, 40.0, [90, 60, 30], [250, 250, 250]),
    ];
    let seg = ForegroundSegmenter::default();
    for (i, buf) in inputs.iter().enumerate() {
        let img = ImageRgb8::packed(w, h, buf);
        let cov = seg.segment(&img).coverage();
        assert!((0.03..=0.9).contains(&cov), "input {i}: coverage={cov}");
    }
}

#[test]
fn malformed_buffer_still_yields_a_mask() {
    let buf = vec![0u8; 10];
    let img = ImageRgb8::packed(60, 60, &buf);
    let (mask, source) = ForegroundSegmenter::default().segment_with_source(&img);
    assert_eq!(source, MaskSource::Fallback);
    assert!(mask.count() > 0);
}

#[test]
fn validity_predicate_rejects_split_and_empty_masks() {
    assert!(!is_valid_mask(&Mask::new(50, 50)));

    let mut split = Mask::new(100, 100);
    for y in 10..30 {
        for x in 10..30 {
            split.set(x, y, true);
            split.set(x + 50, y + 50, true);
        }
    }
    assert!(!is_valid_mask(&split));

    let mut single = Mask::new(100, 100);
    for y in 10..40 {
        for x in 10..40 {
            single.set(x, y, true);
        }
    }
    assert!(is_valid_mask(&single));

    let mut full = Mask::new(20, 20);
    full.data.iter_mut().for_each(|v| *v = 1);
    assert!(!is_valid_mask(&full));
}
