//! Character-grid drawing surface.
//!
//! Rasterizes pipeline output into a width x height character grid:
//! Bresenham strokes for segments, `#` markers on both endpoints (the
//! character-cell version of the endpoint squares). The grid prints with a
//! top-left origin, so rows are flipped from the pipeline's y-up pixel
//! space at plot time.

use wire_shared::math::Vec2;
use wire_shared::pipeline::DrawSurface;

const STROKE: u8 = b'*';
const MARKER: u8 = b'#';
const BLANK: u8 = b' ';

pub struct AsciiSurface {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

impl AsciiSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![BLANK; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The current frame as printable rows, top row first.
    pub fn rows(&self) -> Vec<String> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| String::from_utf8_lossy(row).into_owned())
            .collect()
    }

    fn plot(&mut self, x: i64, y: i64, glyph: u8) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let row = self.height as i64 - 1 - y;
        self.cells[(row * self.width as i64 + x) as usize] = glyph;
    }

    fn stroke(&mut self, a: Vec2, b: Vec2) {
        let (mut x0, mut y0) = (a.x.round() as i64, a.y.round() as i64);
        let (x1, y1) = (b.x.round() as i64, b.y.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.plot(x0, y0, STROKE);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

impl DrawSurface for AsciiSurface {
    fn begin_frame(&mut self) {
        self.cells.fill(BLANK);
    }

    fn draw_line(&mut self, a: Vec2, b: Vec2) {
        self.stroke(a, b);
        // Endpoint markers overwrite the stroke ends.
        self.plot(a.x.round() as i64, a.y.round() as i64, MARKER);
        self.plot(b.x.round() as i64, b.y.round() as i64, MARKER);
    }
}
