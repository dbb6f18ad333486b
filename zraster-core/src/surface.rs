//! Pixel surface capability injected into the renderer

use crate::color::Rgb;

/// Anything the renderer can paint on.
///
/// Implementations must tolerate blocks that extend past their right or
/// bottom edge; the renderer only bounds-checks the block origin.
pub trait PixelSurface {
    /// Fill the entire surface with `color`.
    fn fill_all(&mut self, color: Rgb);

    /// Fill the `w` x `h` block whose top-left corner is `(x, y)`.
    fn fill_block(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb);
}

impl<S: PixelSurface + ?Sized> PixelSurface for &mut S {
    fn fill_all(&mut self, color: Rgb) {
        (**self).fill_all(color)
    }

    fn fill_block(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        (**self).fill_block(x, y, w, h, color)
    }
}

/// Owned row-major color buffer for headless rendering
#[derive(Debug, Clone)]
pub struct BufferSurface {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl BufferSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::default(); width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.width + x])
        } else {
            None
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Reallocate to the new size, cleared to the default color.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Rgb::default(); width * height];
    }

    pub fn count(&self, color: Rgb) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }
}

impl PixelSurface for BufferSurface {
    fn fill_all(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fill_block(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        let x_end = x.saturating_add(w).min(self.width);
        let y_end = y.saturating_add(h).min(self.height);
        for row in y.min(y_end)..y_end {
            let start = row * self.width;
            self.pixels[start + x.min(x_end)..start + x_end].fill(color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_block_clips_to_edges() {
        let mut surface = BufferSurface::new(4, 3);
        surface.fill_all(Rgb::WHITE);
        surface.fill_block(3, 2, 2, 2, Rgb::BLACK);
        assert_eq!(surface.get(3, 2), Some(Rgb::BLACK));
        assert_eq!(surface.count(Rgb::BLACK), 1);

        surface.fill_block(10, 10, 2, 2, Rgb::BLUE);
        assert_eq!(surface.count(Rgb::BLUE), 0);
    }

    #[test]
    fn test_borrowed_surface_forwards() {
        fn paint<S: PixelSurface>(mut target: S) {
            target.fill_all(Rgb::YELLOW);
        }

        let mut surface = BufferSurface::new(2, 2);
        paint(&mut surface);
        assert_eq!(surface.count(Rgb::YELLOW), 4);
    }
}
