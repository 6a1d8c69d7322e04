/// Borrowed, interleaved 8-bit RGB image.
///
/// `stride` counts bytes between the starts of consecutive rows and must be at
/// least `3 * w`. Callers decode files themselves; see [`crate::image::io`]
/// for the helper used by the command-line tool.
#[derive(Clone, Copy, Debug)]
pub struct ImageRgb8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageRgb8<'a> {
    /// Tightly packed view (`stride == 3 * w`).
    pub fn packed(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w * 3,
            data,
        }
    }

    /// Check that the stride and buffer length can back `w × h` pixels.
    pub fn check_layout(&self) -> Result<(), String> {
        if self.stride < self.w * 3 {
            return Err(format!(
                "stride {} is smaller than 3 * width ({})",
                self.stride,
                self.w * 3
            ));
        }
        let needed = if self.h == 0 {
            0
        } else {
            (self.h - 1) * self.stride + self.w * 3
        };
        if self.data.len() < needed {
            return Err(format!(
                "buffer holds {} bytes, {}x{} RGB needs {needed}",
                self.data.len(),
                self.w,
                self.h
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.w * self.h
    }

    /// Interleaved bytes of row `y` (exactly `3 * w` long).
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w * 3]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> [u8; 3] {
        let i = y * self.stride + x * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }
}
