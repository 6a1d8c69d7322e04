/// Read-only row access shared by the owned planes.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Row `y`, trimmed to the pixels that belong to the image.
    fn row(&self, y: usize) -> &[Self::Pixel];
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
