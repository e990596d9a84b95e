// The constellation itself: a fixed set of drifting points, joined by lines when close.
// Visual outcomes:
// - Points glide at constant speed and re-enter from the opposite edge.
// - Any two points nearer than the distance barrier are connected by a thin line.
// - Dragging nudges the whole set; releasing can scatter them in new directions.

use crate::config::{BoundaryPolicy, Config, PointShape};
use crate::draw::DrawSink;
use crate::gesture::{parallax_shift, GestureAction, GestureTracker, PointerEvent};
use crate::types::{Color, Point, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, warn};

/// Result of one frame step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Always true: the field animates forever and wants the next frame.
    pub redraw: bool,
    pub points_drawn: usize,
    pub lines_drawn: usize,
}

#[derive(Clone)]
pub struct AnimatedPointField<R = StdRng> {
    config: Config,
    points: Vec<Point>,
    viewport: Option<Viewport>,
    gesture: GestureTracker,
    rng: R,
}

impl AnimatedPointField<StdRng> {
    pub fn new(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Same seed, same layout and scatters.
    pub fn with_seed(config: Config, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> AnimatedPointField<R> {
    pub fn with_rng(config: Config, rng: R) -> Self {
        let points = vec![Point::default(); config.point_count];
        Self { config, points, viewport: None, gesture: GestureTracker::new(), rng }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Seed every point with a random position inside `width x height` and a random speed.
    /// Returns false (and keeps the old state) for a degenerate size.
    pub fn layout(&mut self, width: i32, height: i32) -> bool {
        let Some(viewport) = Viewport::new(width, height) else {
            warn!(width, height, "skipping layout for degenerate viewport");
            return false;
        };
        self.viewport = Some(viewport);
        self.relayout(viewport);
        debug!(width, height, points = self.points.len(), "laid out point field");
        true
    }

    fn relayout(&mut self, viewport: Viewport) {
        let (bx, by) = (self.config.speed_x_barrier, self.config.speed_y_barrier);
        for p in &mut self.points {
            p.center_x = self.rng.gen_range(0..viewport.width());
            p.center_y = self.rng.gen_range(0..viewport.height());
            p.speed_x = random_speed(&mut self.rng, bx);
            p.speed_y = random_speed(&mut self.rng, by);
        }
    }

    /// Paint the current positions, then move every point by its speed.
    /// Lines and shapes use the positions from *before* the move.
    pub fn step_frame<S: DrawSink + ?Sized>(&mut self, sink: &mut S) -> FrameReport {
        sink.fill_background(self.config.background);

        let Some(viewport) = self.viewport else {
            return FrameReport { redraw: true, points_drawn: 0, lines_drawn: 0 };
        };

        let mut lines_drawn = 0;
        for (i, p) in self.points.iter().enumerate() {
            draw_point(sink, self.config.point_shape, p, self.config.point_radius, self.config.point_color);

            for q in &self.points[i + 1..] {
                if distance(p, q) < self.config.distance_barrier {
                    sink.draw_line(p.center_x, p.center_y, q.center_x, q.center_y, self.config.line_color);
                    lines_drawn += 1;
                }
            }
        }

        let policy = self.config.boundary;
        for p in &mut self.points {
            p.center_x = step_axis(p.center_x, &mut p.speed_x, viewport.width(), policy);
            p.center_y = step_axis(p.center_y, &mut p.speed_y, viewport.height(), policy);
        }

        FrameReport { redraw: true, points_drawn: self.points.len(), lines_drawn }
    }

    /// Feed one pointer event. Returns whether it was consumed.
    pub fn pointer(&mut self, event: PointerEvent) -> bool {
        let action = self.gesture.handle(event);
        match action {
            GestureAction::Parallax { start, end } => self.parallax(start, end),
            GestureAction::Release if self.config.touch_to_scatter => self.scatter(),
            _ => {}
        }
        action.handled()
    }

    /// Shift every point by a fraction of the drag from `start` to `end`.
    pub fn parallax(&mut self, start: (i32, i32), end: (i32, i32)) {
        let (dx, dy) = parallax_shift(start, end, self.config.parallax_same_direction);
        for p in &mut self.points {
            p.center_x += dx;
            p.center_y += dy;
        }
    }

    /// New random speed for every point; positions stay put.
    pub fn scatter(&mut self) {
        let (bx, by) = (self.config.speed_x_barrier, self.config.speed_y_barrier);
        for p in &mut self.points {
            p.speed_x = random_speed(&mut self.rng, bx);
            p.speed_y = random_speed(&mut self.rng, by);
        }
        debug!(points = self.points.len(), "scattered");
    }

    /* ---------- runtime tuning ---------- */

    pub fn background(&self) -> Color { self.config.background }
    pub fn set_background(&mut self, color: Color) { self.config.background = color; }

    pub fn point_radius(&self) -> i32 { self.config.point_radius }
    pub fn set_point_radius(&mut self, radius: i32) { self.config.point_radius = radius; }

    pub fn point_color(&self) -> Color { self.config.point_color }
    pub fn set_point_color(&mut self, color: Color) { self.config.point_color = color; }

    pub fn point_shape(&self) -> PointShape { self.config.point_shape }
    pub fn set_point_shape(&mut self, shape: PointShape) { self.config.point_shape = shape; }

    pub fn line_color(&self) -> Color { self.config.line_color }
    pub fn set_line_color(&mut self, color: Color) { self.config.line_color = color; }

    pub fn speed_x_barrier(&self) -> i32 { self.config.speed_x_barrier }
    pub fn set_speed_x_barrier(&mut self, barrier: i32) { self.config.speed_x_barrier = barrier; }

    pub fn speed_y_barrier(&self) -> i32 { self.config.speed_y_barrier }
    pub fn set_speed_y_barrier(&mut self, barrier: i32) { self.config.speed_y_barrier = barrier; }

    pub fn distance_barrier(&self) -> i32 { self.config.distance_barrier }
    pub fn set_distance_barrier(&mut self, barrier: i32) { self.config.distance_barrier = barrier; }

    pub fn parallax_same_direction(&self) -> bool { self.config.parallax_same_direction }
    pub fn set_parallax_same_direction(&mut self, same: bool) { self.config.parallax_same_direction = same; }

    pub fn touch_to_scatter(&self) -> bool { self.config.touch_to_scatter }
    pub fn set_touch_to_scatter(&mut self, scatter: bool) { self.config.touch_to_scatter = scatter; }

    pub fn boundary(&self) -> BoundaryPolicy { self.config.boundary }
    pub fn set_boundary(&mut self, policy: BoundaryPolicy) { self.config.boundary = policy; }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Resize the store. Every point is re-seeded if a viewport is known.
    pub fn set_point_count(&mut self, count: usize) {
        self.config.point_count = count;
        self.points.resize(count, Point::default());
        if let Some(viewport) = self.viewport {
            self.relayout(viewport);
        }
        debug!(count, "point count changed");
    }
}

/// Uniform in `[-barrier, barrier)`; a non-positive barrier means no movement.
fn random_speed<R: Rng + ?Sized>(rng: &mut R, barrier: i32) -> i32 {
    if barrier <= 0 {
        return 0;
    }
    rng.gen_range(-barrier..barrier)
}

/// Euclidean distance between two points, truncated to an integer.
pub fn distance(a: &Point, b: &Point) -> i32 {
    let dx = (a.center_x - b.center_x) as f64;
    let dy = (a.center_y - b.center_y) as f64;
    (dx * dx + dy * dy).sqrt() as i32
}

/// Advance one coordinate by `speed` and apply the edge policy for an axis of length `size`.
fn step_axis(pos: i32, speed: &mut i32, size: i32, policy: BoundaryPolicy) -> i32 {
    let next = pos.saturating_add(*speed);
    match policy {
        BoundaryPolicy::Legacy => {
            if next < 0 {
                size + next
            } else if next > size {
                size - next
            } else {
                next
            }
        }
        BoundaryPolicy::Wrap => next.rem_euclid(size),
        BoundaryPolicy::Reflect => {
            let last = size - 1;
            if next < 0 {
                *speed = speed.abs();
                (-next).min(last)
            } else if next > last {
                *speed = -speed.abs();
                (2 * last - next).clamp(0, last)
            } else {
                next
            }
        }
    }
}

fn draw_point<S: DrawSink + ?Sized>(sink: &mut S, shape: PointShape, p: &Point, radius: i32, color: Color) {
    match shape {
        PointShape::Circle => sink.fill_circle(p.center_x, p.center_y, radius, color),
        PointShape::Square => {
            // Half-diagonal equals the radius.
            let h = (radius as f64 / std::f64::consts::SQRT_2) as i32;
            let (x, y) = p.pos();
            sink.fill_polygon(&[(x - h, y - h), (x + h, y - h), (x + h, y + h), (x - h, y + h)], color);
        }
    }
}
