//! I/O helpers used by the command-line tool.
//!
//! - `load_rgb_image`: read a PNG/JPEG/etc. into an owned, packed RGB buffer.
//! - `save_mask`: write a [`Mask`] as a black/white PNG.
//! - `save_depth_map`: write a [`DepthMap`] as a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::{DepthMap, ImageRgb8, ImageView, Mask};
use image::{GrayImage, ImageBuffer, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Owned, tightly packed RGB buffer with borrowed view conversion.
#[derive(Clone, Debug)]
pub struct RgbImageBuf {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbImageBuf {
    /// Wrap packed RGB bytes. Returns `None` if the length does not match.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * 3).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> usize {
        self.height
    }

    /// Borrow as a read-only `ImageRgb8` view
    pub fn as_view(&self) -> ImageRgb8<'_> {
        ImageRgb8::packed(self.width, self.height, &self.data)
    }
}

/// Load an image from disk and convert to 8-bit RGB.
pub fn load_rgb_image(path: &Path) -> Result<RgbImageBuf, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_rgb8();
    let width = img.width() as usize;
    let height = img.height() as usize;
    RgbImageBuf::new(width, height, img.into_raw())
        .ok_or_else(|| format!("Decoded buffer size mismatch for {}", path.display()))
}

/// Save a mask to a PNG (food = white).
pub fn save_mask(mask: &Mask, path: &Path) -> Result<(), String> {
    save_gray(mask, |v| if v != 0 { 255 } else { 0 }, path)
}

/// Save a depth map to a grayscale PNG.
pub fn save_depth_map(depth: &DepthMap, path: &Path) -> Result<(), String> {
    save_gray(depth, |v| v, path)
}

fn save_gray<V>(plane: &V, level: impl Fn(u8) -> u8, path: &Path) -> Result<(), String>
where
    V: ImageView<Pixel = u8>,
{
    ensure_parent_dir(path)?;
    let (width, height) = (plane.width(), plane.height());
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        data.extend(plane.row(y).iter().map(|&v| level(v)));
    }
    let image: GrayImage = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(
        width as u32,
        height as u32,
        data,
    )
    .ok_or_else(|| "Failed to create image buffer".to_string())?;
    image
        .save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_and_depth_planes_round_trip_through_png() {
        let dir = std::env::temp_dir().join(format!("food_volume_io_{}", std::process::id()));
        let mut mask = Mask::new(4, 3);
        mask.set(1, 0, true);
        mask.set(3, 2, true);
        let depth = DepthMap::uniform(4, 3, 77);

        save_mask(&mask, &dir.join("mask.png")).unwrap();
        save_depth_map(&depth, &dir.join("depth.png")).unwrap();
        let mask_png = image::open(dir.join("mask.png")).unwrap().into_luma8();
        let depth_png = image::open(dir.join("depth.png")).unwrap().into_luma8();
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(mask_png.dimensions(), (4, 3));
        assert_eq!(mask_png.get_pixel(1, 0).0, [255]);
        assert_eq!(mask_png.get_pixel(3, 2).0, [255]);
        assert_eq!(mask_png.get_pixel(0, 0).0, [0]);
        assert!(depth_png.pixels().all(|p| p.0 == [77]));
    }
}
