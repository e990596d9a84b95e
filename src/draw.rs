// Window + software drawing utilities.
// Visual effects provided here:
// 1) A window that shows the constellation canvas.
// 2) The four primitives the field paints with: background, disc, polygon, line.
// 3) A tiny 5x7 bitmap font to render the HUD on top of the points.

use crate::error::Error;
use crate::gesture::PointerEvent;
use crate::types::{Color, FrameBuffer};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

/// Where the field sends its drawing. The window canvas is one implementation,
/// a plain `Vec<DrawCommand>` (for recording a frame) is another.
pub trait DrawSink {
    fn fill_background(&mut self, color: Color);
    fn fill_circle(&mut self, x: i32, y: i32, radius: i32, color: Color);
    fn fill_polygon(&mut self, points: &[(i32, i32)], color: Color);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color);
}

/// One recorded primitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DrawCommand {
    Background(Color),
    Circle { x: i32, y: i32, radius: i32, color: Color },
    Polygon { points: Vec<(i32, i32)>, color: Color },
    Line { x1: i32, y1: i32, x2: i32, y2: i32, color: Color },
}

impl DrawSink for Vec<DrawCommand> {
    fn fill_background(&mut self, color: Color) {
        self.push(DrawCommand::Background(color));
    }

    fn fill_circle(&mut self, x: i32, y: i32, radius: i32, color: Color) {
        self.push(DrawCommand::Circle { x, y, radius, color });
    }

    fn fill_polygon(&mut self, points: &[(i32, i32)], color: Color) {
        self.push(DrawCommand::Polygon { points: points.to_vec(), color });
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        self.push(DrawCommand::Line { x1, y1, x2, y2, color });
    }
}

impl DrawSink for FrameBuffer {
    fn fill_background(&mut self, color: Color) {
        self.pixels.fill(color.0);
    }

    /// Solid disc: every pixel whose centre is within `radius` of (x,y).
    fn fill_circle(&mut self, x: i32, y: i32, radius: i32, color: Color) {
        if radius <= 0 {
            put_pixel(self, x, y, color.0);
            return;
        }
        // Scan only the part of the bounding box that is on screen; i64 keeps r² exact.
        let (cx, cy, r) = (x as i64, y as i64, radius as i64);
        let r2 = r * r;
        let x_lo = (cx - r).max(0);
        let x_hi = (cx + r).min(self.width as i64 - 1);
        let y_lo = (cy - r).max(0);
        let y_hi = (cy + r).min(self.height as i64 - 1);
        for py in y_lo..=y_hi {
            let dy = py - cy;
            for px in x_lo..=x_hi {
                let dx = px - cx;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[py as usize * self.width + px as usize] = color.0;
                }
            }
        }
    }

    /// Even-odd scanline fill, sampling pixel centres. Right/bottom edges are exclusive.
    fn fill_polygon(&mut self, points: &[(i32, i32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let y_min = points.iter().map(|p| p.1).min().unwrap_or(0).max(0);
        let y_max = points.iter().map(|p| p.1).max().unwrap_or(0).min(self.height as i32);

        let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
        for y in y_min..y_max {
            let sy = y as f32 + 0.5;
            crossings.clear();
            for (i, &(x0, y0)) in points.iter().enumerate() {
                let (x1, y1) = points[(i + 1) % points.len()];
                let (fy0, fy1) = (y0 as f32, y1 as f32);
                if (fy0 <= sy && sy < fy1) || (fy1 <= sy && sy < fy0) {
                    let t = (sy - fy0) / (fy1 - fy0);
                    crossings.push(x0 as f32 + t * (x1 - x0) as f32);
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for span in crossings.chunks_exact(2) {
                let xa = (span[0] - 0.5).ceil() as i32;
                let xb = (span[1] - 0.5).ceil() as i32;
                for x in xa..xb {
                    put_pixel(self, x, y, color.0);
                }
            }
        }
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Color) {
        bresenham(self, x1, y1, x2, y2, color.0);
    }
}

pub struct Drawer {
    window: Window, // the on-screen window you see
    left_was_down: bool,
    last_mouse: Option<(i32, i32)>,
}

impl Drawer {
    /// Create a resizable window.
    /// Visual: a new empty window appears with your chosen title.
    pub fn new(title: &str, width: usize, height: usize, fps: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window = Window::new(title, width, height, options)
            .map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(fps);
        Ok(Self { window, left_was_down: false, last_mouse: None })
    }

    /// Push the pixels for this frame to the screen.
    /// Visual: the window immediately displays the new frame.
    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))?;
        Ok(())
    }

    /// Returns false when the user closes the window (so we can stop the loop).
    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    /// Current client area in pixels. Zero while minimized on some platforms.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// True while ESC is held down (we’ll exit when this is pressed).
    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    pub fn key_pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }

    /// Current mouse position in window pixel coordinates, if over the window.
    pub fn mouse_pos(&self) -> Option<(i32, i32)> {
        self.window
            .get_mouse_pos(MouseMode::Discard)
            .map(|(x, y)| (x as i32, y as i32))
    }

    /// Turn this frame's raw mouse state into pointer events.
    /// Press edge → Down, held + moved → Move, release edge → Up.
    /// Leaving the window mid-drag reports Outside.
    pub fn pointer_events(&mut self) -> Vec<PointerEvent> {
        let down = self.window.get_mouse_down(MouseButton::Left);
        let pos = self.mouse_pos();
        let events = translate_mouse(self.left_was_down, self.last_mouse, down, pos);
        self.left_was_down = down;
        self.last_mouse = pos;
        events
    }
}

/// Edge detection behind `Drawer::pointer_events`, kept free of the window for tests.
fn translate_mouse(
    was_down: bool,
    last: Option<(i32, i32)>,
    down: bool,
    pos: Option<(i32, i32)>,
) -> Vec<PointerEvent> {
    let mut events = Vec::new();
    match (was_down, down, pos) {
        (false, true, Some((x, y))) => events.push(PointerEvent::Down { x, y }),
        (true, true, Some((x, y))) if last != Some((x, y)) => events.push(PointerEvent::Move { x, y }),
        (true, true, None) if last.is_some() => events.push(PointerEvent::Outside),
        (true, false, _) => events.push(PointerEvent::Up),
        _ => {}
    }
    events
}

/* ---------- Software drawing: pixels, lines, tiny bitmap font ---------- */

/// Put a pixel on the framebuffer if (x,y) is inside bounds.
#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    let idx = y * fb.width + x;
    fb.pixels[idx] = color;
}

/// Draw a thin line between (x0,y0) and (x1,y1) using Bresenham.
/// Visual: a straight 1-pixel line connecting two nearby points.
fn bresenham(fb: &mut FrameBuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
    let (mut x0, mut y0) = (x0, y0);
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(fb, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

/* ---------- 5x7 bitmap font (ASCII subset for the HUD) ---------- */

/// Return a 5x7 glyph bitmap for a limited character set.
/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    macro_rules! g { ($a:expr,$b:expr,$c:expr,$d:expr,$e:expr,$f:expr,$g:expr) => {
        Some([$a,$b,$c,$d,$e,$f,$g])
    }; }

    match ch.to_ascii_uppercase() {
        '0' => g!(0b01110,0b10001,0b10011,0b10101,0b11001,0b10001,0b01110),
        '1' => g!(0b00100,0b01100,0b00100,0b00100,0b00100,0b00100,0b01110),
        '2' => g!(0b01110,0b10001,0b00001,0b00010,0b00100,0b01000,0b11111),
        '3' => g!(0b11110,0b00001,0b00001,0b01110,0b00001,0b00001,0b11110),
        '4' => g!(0b00010,0b00110,0b01010,0b10010,0b11111,0b00010,0b00010),
        '5' => g!(0b11111,0b10000,0b11110,0b00001,0b00001,0b10001,0b01110),
        '6' => g!(0b00110,0b01000,0b10000,0b11110,0b10001,0b10001,0b01110),
        '7' => g!(0b11111,0b00001,0b00010,0b00100,0b01000,0b01000,0b01000),
        '8' => g!(0b01110,0b10001,0b10001,0b01110,0b10001,0b10001,0b01110),
        '9' => g!(0b01110,0b10001,0b10001,0b01111,0b00001,0b00010,0b01100),

        // Letters used by the HUD labels: FPS PTS LNS WRAP REFLECT LEGACY
        'A' => g!(0b01110,0b10001,0b10001,0b11111,0b10001,0b10001,0b10001),
        'C' => g!(0b01110,0b10001,0b10000,0b10000,0b10000,0b10001,0b01110),
        'E' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b11111),
        'F' => g!(0b11111,0b10000,0b10000,0b11110,0b10000,0b10000,0b10000),
        'G' => g!(0b01110,0b10001,0b10000,0b10111,0b10001,0b10001,0b01111),
        'L' => g!(0b10000,0b10000,0b10000,0b10000,0b10000,0b10000,0b11111),
        'N' => g!(0b10001,0b11001,0b10101,0b10011,0b10001,0b10001,0b10001),
        'P' => g!(0b11110,0b10001,0b10001,0b11110,0b10000,0b10000,0b10000),
        'R' => g!(0b11110,0b10001,0b10001,0b11110,0b10100,0b10010,0b10001),
        'S' => g!(0b01111,0b10000,0b10000,0b01110,0b00001,0b00001,0b11110),
        'T' => g!(0b11111,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        'W' => g!(0b10001,0b10001,0b10001,0b10101,0b10101,0b10101,0b01010),
        'Y' => g!(0b10001,0b10001,0b01010,0b00100,0b00100,0b00100,0b00100),

        ' ' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00000,0b00000),
        '|' => g!(0b00100,0b00100,0b00100,0b00100,0b00100,0b00100,0b00100),
        ':' => g!(0b00000,0b00100,0b00000,0b00000,0b00100,0b00000,0b00000),
        '.' => g!(0b00000,0b00000,0b00000,0b00000,0b00000,0b00100,0b00000),

        _ => None,
    }
}

/// Draw a single 5x7 character at (x,y) with a 1-pixel black shadow.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    if let Some(rows) = glyph5x7(ch) {
        for (shadow, c) in [(1, 0x00000000), (0, color)] {
            for (ry, rowbits) in rows.iter().enumerate() {
                for rx in 0..5 {
                    if (rowbits & (1 << (4 - rx))) != 0 {
                        put_pixel(fb, x + rx as i32 + shadow, y + ry as i32 + shadow, c);
                    }
                }
            }
        }
    }
}

/// Draw a text string using 5x7 glyphs.
/// Visual: a compact HUD string appears; each glyph is 5x7 with 1-pixel spacing.
pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6; // 5 pixels glyph width + 1 pixel spacing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Color = Color(0xFFFFFF);

    fn lit(fb: &FrameBuffer) -> usize {
        fb.pixels.iter().filter(|&&p| p == WHITE.0).count()
    }

    #[test]
    fn background_fills_every_pixel() {
        let mut fb = FrameBuffer::new(4, 3);
        fb.fill_background(Color(0x123456));
        assert!(fb.pixels.iter().all(|&p| p == 0x123456));
    }

    #[test]
    fn circle_is_clipped_at_the_edges() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.fill_circle(0, 0, 3, WHITE);
        // Quarter disc of radius 3 centred on the corner.
        let expected = (0..=3)
            .flat_map(|y| (0..=3).map(move |x| (x, y)))
            .filter(|(x, y)| x * x + y * y <= 9)
            .count();
        assert_eq!(lit(&fb), expected);
        assert_eq!(fb.get(0, 0), Some(WHITE.0));
        assert_eq!(fb.get(3, 3), Some(0));
    }

    #[test]
    fn huge_circle_covers_small_canvas() {
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_circle(4, 4, 40_000, WHITE);
        assert_eq!(lit(&fb), 64);

        // Centre far off screen: the box overlaps the canvas but the disc does not.
        let mut fb = FrameBuffer::new(8, 8);
        fb.fill_circle(i32::MAX, i32::MAX, i32::MAX, WHITE);
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn square_polygon_has_exclusive_far_edges() {
        let mut fb = FrameBuffer::new(20, 20);
        fb.fill_polygon(&[(5, 5), (9, 5), (9, 9), (5, 9)], WHITE);
        assert_eq!(lit(&fb), 16);
        assert_eq!(fb.get(5, 5), Some(WHITE.0));
        assert_eq!(fb.get(8, 8), Some(WHITE.0));
        assert_eq!(fb.get(9, 9), Some(0));
    }

    #[test]
    fn line_touches_both_endpoints() {
        let mut fb = FrameBuffer::new(10, 10);
        fb.draw_line(1, 1, 8, 4, WHITE);
        assert_eq!(fb.get(1, 1), Some(WHITE.0));
        assert_eq!(fb.get(8, 4), Some(WHITE.0));
        assert_eq!(lit(&fb), 8);
    }

    #[test]
    fn recorder_keeps_primitives_in_order() {
        let mut rec: Vec<DrawCommand> = Vec::new();
        rec.fill_background(Color(1));
        rec.fill_circle(2, 3, 4, Color(5));
        rec.draw_line(0, 0, 1, 1, Color(6));
        assert_eq!(
            rec,
            vec![
                DrawCommand::Background(Color(1)),
                DrawCommand::Circle { x: 2, y: 3, radius: 4, color: Color(5) },
                DrawCommand::Line { x1: 0, y1: 0, x2: 1, y2: 1, color: Color(6) },
            ]
        );
    }

    #[test]
    fn mouse_edges_become_pointer_events() {
        assert_eq!(translate_mouse(false, None, true, Some((3, 4))), vec![PointerEvent::Down { x: 3, y: 4 }]);
        assert_eq!(translate_mouse(true, Some((3, 4)), true, Some((3, 4))), vec![]);
        assert_eq!(translate_mouse(true, Some((3, 4)), true, Some((7, 4))), vec![PointerEvent::Move { x: 7, y: 4 }]);
        assert_eq!(translate_mouse(true, Some((7, 4)), false, Some((7, 4))), vec![PointerEvent::Up]);
        assert_eq!(translate_mouse(true, Some((7, 4)), true, None), vec![PointerEvent::Outside]);
        assert_eq!(translate_mouse(false, None, false, None), vec![]);
    }
}
