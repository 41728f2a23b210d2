//! Shared sprite kernel: pose integration, toroidal wrap, world-space
//! projection and polygon collision.

use core::f64::consts::TAU;

use crate::constants::MAX_INTENSITY;
use crate::geometry::{round_half_up, FieldSize, Point, Polygon};

/// Keeps an angle inside `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Linear draw intensity for `counter` out of `total`, clamped to `0..=255`.
pub fn ramp_intensity(counter: i32, total: i32) -> u8 {
    if total <= 0 {
        return MAX_INTENSITY as u8;
    }
    (MAX_INTENSITY * counter / total).clamp(0, MAX_INTENSITY) as u8
}

#[derive(Clone, Debug, Default)]
pub struct Sprite {
    shape: Polygon,
    polygon: Polygon,
    pub active: bool,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub angle: f64,
    pub spin: f64,
}

impl Sprite {
    pub fn with_shape(points: &[(i32, i32)]) -> Self {
        Self {
            shape: Polygon::from_points(points),
            ..Self::default()
        }
    }

    pub fn shape(&self) -> &Polygon {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: Polygon) {
        self.shape = shape;
    }

    /// World-space polygon from the last `render`. Stale while inactive.
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    pub fn place(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }

    pub fn set_velocity(&mut self, dx: f64, dy: f64) {
        self.dx = dx;
        self.dy = dy;
    }

    /// Integrates one tick of motion and wraps across field edges.
    ///
    /// Screen y grows downward while `dy` points up, so `y` moves by `-dy`.
    /// Returns `true` when any axis wrapped.
    pub fn advance(&mut self, field: &FieldSize) -> bool {
        self.angle = normalize_angle(self.angle + self.spin);

        let half_w = f64::from(field.half_width());
        let half_h = f64::from(field.half_height());
        let width = f64::from(field.width());
        let height = f64::from(field.height());
        let mut wrapped = false;

        self.x += self.dx;
        if self.x < -half_w {
            self.x += width;
            wrapped = true;
        }
        if self.x > half_w {
            self.x -= width;
            wrapped = true;
        }

        self.y -= self.dy;
        if self.y < -half_h {
            self.y += height;
            wrapped = true;
        }
        if self.y > half_h {
            self.y -= height;
            wrapped = true;
        }

        wrapped
    }

    /// Rebuilds the world polygon from shape and pose.
    pub fn render(&mut self, field: &FieldSize) {
        let (sin, cos) = self.angle.sin_cos();
        let ox = round_half_up(self.x) + field.half_width();
        let oy = round_half_up(self.y) + field.half_height();

        self.polygon.clear();
        for p in self.shape.points() {
            let px = f64::from(p.x);
            let py = f64::from(p.y);
            self.polygon.push(Point::new(
                round_half_up(px * cos + py * sin) + ox,
                round_half_up(py * cos - px * sin) + oy,
            ));
        }
    }

    pub fn is_colliding(&self, other: &Sprite) -> bool {
        self.polygon.overlaps(&other.polygon)
    }

    pub fn speed(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}

/// Anything built on a [`Sprite`]. Pools and the collision pass work
/// through this view.
pub trait Body {
    fn sprite(&self) -> &Sprite;
    fn sprite_mut(&mut self) -> &mut Sprite;

    fn is_active(&self) -> bool {
        self.sprite().active
    }

    fn deactivate(&mut self) {
        self.sprite_mut().active = false;
    }

    fn collides_with(&self, other: &dyn Body) -> bool {
        self.sprite().is_colliding(other.sprite())
    }
}

impl Body for Sprite {
    fn sprite(&self) -> &Sprite {
        self
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    fn field() -> FieldSize {
        FieldSize::new(200, 100).expect("valid field")
    }

    fn moving(x: f64, y: f64, dx: f64, dy: f64) -> Sprite {
        let mut sprite = Sprite::with_shape(&[(0, -10), (7, 10), (-7, 10)]);
        sprite.active = true;
        sprite.place(x, y);
        sprite.set_velocity(dx, dy);
        sprite
    }

    #[test]
    fn wrap_right_edge_subtracts_width() {
        let mut sprite = moving(99.0, 0.0, 2.0, 0.0);
        assert!(sprite.advance(&field()));
        assert_eq!(sprite.x, 101.0 - 200.0);
    }

    #[test]
    fn wrap_left_edge_adds_width() {
        let mut sprite = moving(-99.0, 0.0, -2.0, 0.0);
        assert!(sprite.advance(&field()));
        assert_eq!(sprite.x, -101.0 + 200.0);
    }

    #[test]
    fn wrap_vertical_edges_follow_screen_y() {
        // Positive dy moves up the screen (towards negative y).
        let mut up = moving(0.0, -49.0, 0.0, 2.0);
        assert!(up.advance(&field()));
        assert_eq!(up.y, -51.0 + 100.0);

        let mut down = moving(0.0, 49.0, 0.0, -2.0);
        assert!(down.advance(&field()));
        assert_eq!(down.y, 51.0 - 100.0);
    }

    #[test]
    fn interior_motion_does_not_wrap() {
        let mut sprite = moving(0.0, 0.0, 1.5, 0.5);
        assert!(!sprite.advance(&field()));
        assert_eq!((sprite.x, sprite.y), (1.5, -0.5));
    }

    #[test]
    fn exact_half_field_is_not_a_wrap() {
        let mut sprite = moving(99.0, 0.0, 1.0, 0.0);
        assert!(!sprite.advance(&field()));
        assert_eq!(sprite.x, 100.0);
    }

    #[test]
    fn angle_stays_normalized() {
        let mut sprite = moving(0.0, 0.0, 0.0, 0.0);
        sprite.angle = 0.01;
        sprite.spin = -0.02;
        sprite.advance(&field());
        assert!((sprite.angle - (TAU - 0.01)).abs() < 1e-12);

        sprite.angle = TAU - 0.01;
        sprite.spin = 0.02;
        sprite.advance(&field());
        assert!((sprite.angle - 0.01).abs() < 1e-12);
        assert_eq!(normalize_angle(-1e-300), 0.0);
    }

    #[test]
    fn render_offsets_by_half_field_and_keeps_vertex_count() {
        let mut sprite = moving(0.0, 0.0, 0.0, 0.0);
        sprite.render(&field());
        assert_eq!(sprite.polygon().len(), sprite.shape().len());
        assert_eq!(
            sprite.polygon().points(),
            &[Point::new(100, 40), Point::new(107, 60), Point::new(93, 60)]
        );
    }

    #[test]
    fn render_rotates_a_half_turn() {
        let mut sprite = moving(10.0, -5.0, 0.0, 0.0);
        sprite.angle = PI;
        sprite.render(&field());
        // (0,-10) rotated by π maps to (0,10) before translation.
        assert_eq!(sprite.polygon().points()[0], Point::new(110, 55));
    }

    #[test]
    fn rendering_twice_does_not_accumulate_points() {
        let mut sprite = moving(3.0, 3.0, 0.0, 0.0);
        sprite.render(&field());
        sprite.render(&field());
        assert_eq!(sprite.polygon().len(), 3);
    }

    #[test]
    fn intensity_ramp_is_clamped() {
        assert_eq!(ramp_intensity(100, 100), 255);
        assert_eq!(ramp_intensity(50, 100), 127);
        assert_eq!(ramp_intensity(-1, 100), 0);
        assert_eq!(ramp_intensity(300, 100), 255);
        assert_eq!(ramp_intensity(1, 0), 255);
    }

    #[test]
    fn overlapping_sprites_collide() {
        let mut a = moving(0.0, 0.0, 0.0, 0.0);
        let mut b = moving(2.0, 2.0, 0.0, 0.0);
        let mut far = moving(60.0, 30.0, 0.0, 0.0);
        for s in [&mut a, &mut b, &mut far] {
            s.render(&field());
        }
        assert!(a.is_colliding(&b));
        assert!(b.collides_with(&a));
        assert!(!a.is_colliding(&far));
    }
}
