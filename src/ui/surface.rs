//! Drawing surface for bolts: a grid of braille cells, 2×4 dots each.

use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

use crate::{
    domain::geometry::{Point, Rgba},
    ui::theme::{ColorCapability, quantize},
};

const DOTS_X: usize = 2;
const DOTS_Y: usize = 4;
const BRAILLE_BASE: u32 = 0x2800;
const SAMPLE_SPACING: f32 = 0.5;

/// Bit for each dot inside a braille cell, indexed `[dy][dx]`.
const DOT_BITS: [[u8; DOTS_X]; DOTS_Y] = [[0x01, 0x08], [0x02, 0x10], [0x04, 0x20], [0x40, 0x80]];

/// A single stroked polyline. Caps and joins are always round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Rgba,
}

impl Stroke {
    #[must_use]
    pub fn new(width: f32, color: Rgba) -> Self {
        Self { width, color }
    }
}

/// Surface point at the middle of terminal cell `(col, row)`.
#[must_use]
pub fn cell_center(col: u16, row: u16) -> Point {
    Point::new(
        f32::from(col) * DOTS_X as f32 + 1.0,
        f32::from(row) * DOTS_Y as f32 + 2.0,
    )
}

pub trait Surface {
    /// Width and height in surface units.
    fn size(&self) -> (f32, f32);
    fn clear(&mut self);
    fn stroke_path(&mut self, points: &[Point], stroke: Stroke);
}

#[derive(Debug, Clone, Default)]
pub struct BrailleSurface {
    cols: usize,
    rows: usize,
    dots: Vec<u8>,
    colors: Vec<[f32; 3]>,
    // per-stroke coverage, so overlapping samples of one stroke blend once
    scratch: Vec<u8>,
    touched: Vec<usize>,
}

impl BrailleSurface {
    #[must_use]
    pub fn new(cols: u16, rows: u16) -> Self {
        let mut surface = Self::default();
        surface.resize(cols, rows);
        surface
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = usize::from(cols);
        self.rows = usize::from(rows);
        let len = self.cols * self.rows;
        self.dots = vec![0; len];
        self.colors = vec![[0.0; 3]; len];
        self.scratch = vec![0; len];
        self.touched.clear();
    }

    #[must_use]
    pub fn cols(&self) -> u16 {
        u16::try_from(self.cols).unwrap_or(u16::MAX)
    }

    #[must_use]
    pub fn rows(&self) -> u16 {
        u16::try_from(self.rows).unwrap_or(u16::MAX)
    }

    /// Braille glyph for the cell at `(col, row)`, if any dot is lit.
    #[must_use]
    pub fn glyph(&self, col: usize, row: usize) -> Option<char> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        braille_char(self.dots[row * self.cols + col])
    }

    /// Composited colour of the cell at `(col, row)` over a black background.
    #[must_use]
    pub fn cell_color(&self, col: usize, row: usize) -> Option<(u8, u8, u8)> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        let [r, g, b] = self.colors[row * self.cols + col];
        Some((to_channel(r), to_channel(g), to_channel(b)))
    }

    #[must_use]
    pub fn lit_cells(&self) -> usize {
        self.dots.iter().filter(|bits| **bits != 0).count()
    }

    /// Text rendering of the dot grid, one line per row.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows);
        for row in 0..self.rows {
            let line: String = (0..self.cols)
                .map(|col| self.glyph(col, row).unwrap_or(' '))
                .collect();
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    /// Adapts the surface into a ratatui widget for the given colour depth.
    #[must_use]
    pub fn widget(&self, capability: ColorCapability) -> SurfaceWidget<'_> {
        SurfaceWidget {
            surface: self,
            capability,
        }
    }

    fn stamp(&mut self, center: Point, radius: f32) {
        let width_dots = self.cols * DOTS_X;
        let height_dots = self.rows * DOTS_Y;
        let radius = radius.max(0.5);

        let min_x = (center.x - radius).floor().max(0.0);
        let max_x = (center.x + radius).ceil().min(width_dots as f32 - 1.0);
        let min_y = (center.y - radius).floor().max(0.0);
        let max_y = (center.y + radius).ceil().min(height_dots as f32 - 1.0);
        if min_x > max_x || min_y > max_y {
            return;
        }

        let home = (center.x.floor(), center.y.floor());
        for dy in (min_y as usize)..=(max_y as usize) {
            for dx in (min_x as usize)..=(max_x as usize) {
                let cx = dx as f32 + 0.5 - center.x;
                let cy = dy as f32 + 0.5 - center.y;
                let is_home = (dx as f32, dy as f32) == home;
                if is_home || cx * cx + cy * cy <= radius * radius {
                    self.mark(dx, dy);
                }
            }
        }
    }

    fn mark(&mut self, dx: usize, dy: usize) {
        let idx = (dy / DOTS_Y) * self.cols + dx / DOTS_X;
        if self.scratch[idx] == 0 {
            self.touched.push(idx);
        }
        self.scratch[idx] |= DOT_BITS[dy % DOTS_Y][dx % DOTS_X];
    }

    fn commit(&mut self, color: Rgba) {
        let alpha = color.a;
        let src = [
            f32::from(color.r) / 255.0,
            f32::from(color.g) / 255.0,
            f32::from(color.b) / 255.0,
        ];
        for idx in self.touched.drain(..) {
            self.dots[idx] |= self.scratch[idx];
            self.scratch[idx] = 0;
            let dst = &mut self.colors[idx];
            for channel in 0..3 {
                dst[channel] = dst[channel] * (1.0 - alpha) + src[channel] * alpha;
            }
        }
    }
}

impl Surface for BrailleSurface {
    fn size(&self) -> (f32, f32) {
        ((self.cols * DOTS_X) as f32, (self.rows * DOTS_Y) as f32)
    }

    fn clear(&mut self) {
        self.dots.fill(0);
        self.colors.fill([0.0; 3]);
    }

    fn stroke_path(&mut self, points: &[Point], stroke: Stroke) {
        if points.len() < 2 || stroke.color.a <= 0.0 || !(stroke.width > 0.0) {
            return;
        }
        if self.cols == 0 || self.rows == 0 {
            return;
        }

        let radius = stroke.width / 2.0;
        for pair in points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
                continue;
            }
            let samples = (a.distance(b) / SAMPLE_SPACING).ceil().clamp(1.0, 4096.0) as usize;
            for step in 0..=samples {
                let t = step as f32 / samples as f32;
                let p = Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
                self.stamp(p, radius);
            }
        }
        self.commit(stroke.color);
    }
}

pub struct SurfaceWidget<'a> {
    surface: &'a BrailleSurface,
    capability: ColorCapability,
}

impl Widget for SurfaceWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = usize::from(area.height).min(self.surface.rows);
        let cols = usize::from(area.width).min(self.surface.cols);
        for row in 0..rows {
            for col in 0..cols {
                let Some(glyph) = self.surface.glyph(col, row) else {
                    continue;
                };
                let Some((r, g, b)) = self.surface.cell_color(col, row) else {
                    continue;
                };
                let position = (area.x + col as u16, area.y + row as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_char(glyph)
                        .set_fg(quantize(Color::Rgb(r, g, b), self.capability));
                }
            }
        }
    }
}

fn braille_char(bits: u8) -> Option<char> {
    if bits == 0 {
        return None;
    }
    char::from_u32(BRAILLE_BASE + u32::from(bits))
}

fn to_channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
