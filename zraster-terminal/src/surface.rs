//! Terminal cell grid that the core renderer paints on

use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use std::io::Write;
use zraster_core::{PixelSurface, Rgb};

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// One cell per pixel; cells equal to the background print as blanks.
pub struct TerminalSurface {
    width: usize,
    height: usize,
    background: Rgb,
    cells: Vec<Rgb>,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            background: Rgb::BLACK,
            cells: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.cells = vec![self.background; width * height];
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Rgb> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x])
    }

    /// Ramp character for a painted cell. Never blank, so dark colors stay visible.
    pub fn glyph(color: Rgb) -> char {
        let last = LUMINOSITY_RAMP.len() - 1;
        let index = (color.luminance() * last as f32).round() as usize;
        LUMINOSITY_RAMP[index.clamp(1, last)]
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            for x in 0..self.width {
                let color = self.cells[y * self.width + x];
                if color == self.background {
                    writer.queue(Print(' '))?;
                    continue;
                }
                if current != Some(color) {
                    writer.queue(SetForegroundColor(Color::Rgb {
                        r: color.r,
                        g: color.g,
                        b: color.b,
                    }))?;
                    current = Some(color);
                }
                writer.queue(Print(Self::glyph(color)))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl PixelSurface for TerminalSurface {
    fn fill_all(&mut self, color: Rgb) {
        self.background = color;
        self.cells.fill(color);
    }

    fn fill_block(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        for row in y..y.saturating_add(h).min(self.height) {
            for col in x..x.saturating_add(w).min(self.width) {
                self.cells[row * self.width + col] = color;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_block_clips() {
        let mut surface = TerminalSurface::new(3, 2);
        surface.fill_block(2, 1, 4, 4, Rgb::WHITE);
        assert_eq!(surface.cell(2, 1), Some(Rgb::WHITE));
        assert_eq!(surface.cell(1, 1), Some(Rgb::BLACK));
    }

    #[test]
    fn test_glyph_never_blank() {
        assert_eq!(TerminalSurface::glyph(Rgb::BLACK), '.');
        assert_eq!(TerminalSurface::glyph(Rgb::WHITE), '@');
    }

    #[test]
    fn test_draw_blanks_background() {
        let mut surface = TerminalSurface::new(2, 2);
        surface.fill_all(Rgb::BLUE);
        surface.fill_block(0, 0, 1, 1, Rgb::WHITE);
        let mut out = Vec::new();
        surface.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains('@'));
        assert_eq!(text.matches(' ').count(), 3);
    }
}
