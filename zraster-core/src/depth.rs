//! Reciprocal depth buffer
//!
//! Each cell holds the largest `1/z` written at that pixel, so the nearest
//! surface (smallest positive z) wins. Unwritten cells hold negative infinity.

#[derive(Debug, Clone)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    cells: Vec<f32>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![f32::NEG_INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Reset every cell without reallocating.
    pub fn clear(&mut self) {
        self.cells.fill(f32::NEG_INFINITY);
    }

    /// Stored reciprocal depth, or `None` outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        self.index(x, y).map(|i| self.cells[i])
    }

    pub fn is_written(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|v| v.is_finite())
    }

    pub fn written_count(&self) -> usize {
        self.cells.iter().filter(|v| v.is_finite()).count()
    }

    /// Store `reciprocal` if it is strictly greater than the current value.
    /// Returns whether the write happened.
    pub fn test_and_set(&mut self, x: usize, y: usize, reciprocal: f32) -> bool {
        match self.index(x, y) {
            Some(i) if reciprocal > self.cells[i] => {
                self.cells[i] = reciprocal;
                true
            }
            _ => false,
        }
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unwritten() {
        let depth = DepthBuffer::new(3, 2);
        assert_eq!(depth.get(2, 1), Some(f32::NEG_INFINITY));
        assert_eq!(depth.get(3, 0), None);
        assert_eq!(depth.written_count(), 0);
    }

    #[test]
    fn test_larger_reciprocal_wins() {
        let mut depth = DepthBuffer::new(2, 2);
        assert!(depth.test_and_set(1, 1, 0.5));
        assert!(!depth.test_and_set(1, 1, 0.25));
        assert!(!depth.test_and_set(1, 1, 0.5));
        assert!(depth.test_and_set(1, 1, 1.0));
        assert_eq!(depth.get(1, 1), Some(1.0));
    }

    #[test]
    fn test_clear_keeps_dimensions() {
        let mut depth = DepthBuffer::new(4, 4);
        depth.test_and_set(0, 0, 1.0);
        depth.clear();
        assert_eq!(depth.written_count(), 0);
        assert_eq!((depth.width(), depth.height()), (4, 4));
    }
}
