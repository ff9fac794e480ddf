/// Read-only access to a row-major single-plane image.
pub trait ImageView {
    type Pixel: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    fn row(&self, y: usize) -> &[Self::Pixel];

    /// Pixel at `(x, y)` with coordinates clamped to the image bounds
    /// (replicated border).
    #[inline]
    fn get_clamped(&self, x: isize, y: isize) -> Self::Pixel {
        let cx = x.clamp(0, self.width() as isize - 1) as usize;
        let cy = y.clamp(0, self.height() as isize - 1) as usize;
        self.row(cy)[cx]
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}

pub trait ImageViewMut: ImageView {
    fn row_mut(&mut self, y: usize) -> &mut [Self::Pixel];
}
