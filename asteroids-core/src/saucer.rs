//! Flying saucer passes and its homing missile.

use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use crate::constants::{
    MAX_INTENSITY, MAX_ROCK_SPEED, MISSILE_COUNT, MISSILE_FADE_STEP, MISSILE_SPEED, UFO_PASSES,
};
use crate::geometry::FieldSize;
use crate::rng::RandomSource;
use crate::sprite::{normalize_angle, Body, Sprite};

pub const SAUCER_SHAPE: [(i32, i32); 10] = [
    (-15, 0),
    (-10, -5),
    (-5, -5),
    (-5, -8),
    (5, -8),
    (5, -5),
    (10, -5),
    (15, 0),
    (10, 5),
    (-10, 5),
];
pub const MISSILE_SHAPE: [(i32, i32); 7] = [
    (0, -4),
    (1, -3),
    (1, 3),
    (2, 4),
    (-2, 4),
    (-1, 3),
    (-1, -3),
];

/// Heading, in the screen-angle convention, that points from the origin
/// along `(dx, dy)`.
///
/// A zero `dx` yields exactly `-π/2` or `π/2` depending on the sign of `dy`.
pub fn heading_toward(dx: f64, dy: f64) -> f64 {
    if dx == 0.0 {
        return if dy < 0.0 { -FRAC_PI_2 } else { FRAC_PI_2 };
    }
    let mut angle = (dy / dx).abs().atan();
    if dy > 0.0 {
        angle = -angle;
    }
    if dx < 0.0 {
        angle = PI - angle;
    }
    angle
}

#[derive(Clone, Debug)]
pub struct Missile {
    sprite: Sprite,
    counter: i32,
}

impl Default for Missile {
    fn default() -> Self {
        Self {
            sprite: Sprite::with_shape(&MISSILE_SHAPE),
            counter: 0,
        }
    }
}

impl Body for Missile {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

impl Missile {
    pub fn counter(&self) -> i32 {
        self.counter
    }

    /// Arms the missile at rest on `(x, y)` with a full lifetime.
    pub fn launch(&mut self, x: f64, y: f64, field: &FieldSize) {
        let sprite = &mut self.sprite;
        sprite.active = true;
        sprite.angle = 0.0;
        sprite.spin = 0.0;
        sprite.set_velocity(0.0, 0.0);
        sprite.place(x, y);
        sprite.render(field);
        self.counter = MISSILE_COUNT;
    }

    pub fn stop(&mut self) {
        self.sprite.active = false;
        self.counter = 0;
    }

    /// Counts down the lifetime; `true` once it has run out.
    pub fn tick_lifetime(&mut self) -> bool {
        self.counter -= 1;
        self.counter <= 0
    }

    /// Points the missile at `(target_x, target_y)` and sets its cruise
    /// velocity along that heading.
    pub fn steer_toward(&mut self, target_x: f64, target_y: f64) {
        let heading = heading_toward(target_x - self.sprite.x, target_y - self.sprite.y);
        let angle = normalize_angle(heading - FRAC_PI_2);
        self.sprite.angle = angle;
        let (sin, cos) = angle.sin_cos();
        self.sprite.set_velocity(MISSILE_SPEED * -sin, MISSILE_SPEED * cos);
    }

    pub fn intensity(&self) -> u8 {
        (self.counter * MISSILE_FADE_STEP).clamp(0, MAX_INTENSITY) as u8
    }
}

#[derive(Clone, Debug)]
pub struct Saucer {
    sprite: Sprite,
    pass_counter: i32,
    passes_left: i32,
    missile: Missile,
}

impl Default for Saucer {
    fn default() -> Self {
        Self {
            sprite: Sprite::with_shape(&SAUCER_SHAPE),
            pass_counter: 0,
            passes_left: 0,
            missile: Missile::default(),
        }
    }
}

impl Body for Saucer {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

impl Saucer {
    pub fn missile(&self) -> &Missile {
        &self.missile
    }

    pub fn missile_mut(&mut self) -> &mut Missile {
        &mut self.missile
    }

    pub fn pass_counter(&self) -> i32 {
        self.pass_counter
    }

    pub fn passes_left(&self) -> i32 {
        self.passes_left
    }

    /// Grants a fresh budget of passes.
    pub fn reset_passes(&mut self) {
        self.passes_left = UFO_PASSES;
    }

    /// Enters from the left or right edge at a random height, heading
    /// roughly across the field. The pass lasts one field width of travel.
    pub fn enter(&mut self, field: &FieldSize, rng: &mut dyn RandomSource) {
        let half_w = f64::from(field.half_width());
        let sprite = &mut self.sprite;
        sprite.active = true;
        sprite.x = -half_w;
        sprite.y = rng.next_f64() * f64::from(field.height()) - f64::from(field.half_height());

        let heading = rng.next_f64() * FRAC_PI_4 - FRAC_PI_2;
        let speed = MAX_ROCK_SPEED / 2.0 + rng.next_f64() * (MAX_ROCK_SPEED / 2.0);
        let (sin, cos) = heading.sin_cos();
        sprite.set_velocity(speed * -sin, speed * cos);
        if rng.coin() {
            sprite.x = half_w;
            sprite.dx = -sprite.dx;
        }
        sprite.render(field);

        self.pass_counter = (f64::from(field.width()) / sprite.dx).abs() as i32;
    }

    /// Counts down the current pass; `true` once it has ended.
    pub fn tick_pass(&mut self) -> bool {
        self.pass_counter -= 1;
        self.pass_counter <= 0
    }

    /// Spends one pass. `true` while passes remain.
    pub fn spend_pass(&mut self) -> bool {
        self.passes_left -= 1;
        self.passes_left > 0
    }

    pub fn stop(&mut self) {
        self.sprite.active = false;
        self.pass_counter = 0;
        self.passes_left = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRng;

    fn field() -> FieldSize {
        FieldSize::default()
    }

    #[test]
    fn heading_with_zero_dx_is_exactly_vertical() {
        assert_eq!(heading_toward(0.0, -5.0), -FRAC_PI_2);
        assert_eq!(heading_toward(0.0, 5.0), FRAC_PI_2);
        assert_eq!(heading_toward(0.0, 0.0), FRAC_PI_2);
    }

    #[test]
    fn heading_quadrants() {
        assert_eq!(heading_toward(10.0, 0.0), 0.0);
        assert_eq!(heading_toward(-10.0, 0.0), PI);
        assert!((heading_toward(10.0, 10.0) + FRAC_PI_4).abs() < 1e-12);
        assert!((heading_toward(-10.0, -10.0) - 3.0 * FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn missile_flies_at_the_target() {
        let mut missile = Missile::default();
        missile.launch(0.0, 0.0, &field());
        assert_eq!(missile.counter(), MISSILE_COUNT);
        assert_eq!(missile.intensity(), 255);

        // Target up and slightly right on screen.
        missile.steer_toward(10.0, -100.0);
        let s = missile.sprite();
        assert!((s.speed() - MISSILE_SPEED).abs() < 1e-12);
        assert!(s.dy > 0.0 && s.dx > 0.0);

        // Target to the right.
        missile.steer_toward(100.0, 0.0);
        let s = missile.sprite();
        assert!(s.dx > 0.0 && s.dy.abs() < 1e-12);

        // Each tick closes the distance.
        let mut missile = Missile::default();
        missile.launch(-50.0, 30.0, &field());
        let target = (40.0, -20.0);
        let mut last = f64::INFINITY;
        for _ in 0..10 {
            missile.steer_toward(target.0, target.1);
            missile.sprite_mut().advance(&field());
            let s = missile.sprite();
            let distance = (target.0 - s.x).hypot(target.1 - s.y);
            assert!(distance < last);
            last = distance;
        }
    }

    #[test]
    fn missile_fades_in_last_ticks() {
        let mut missile = Missile::default();
        missile.launch(0.0, 0.0, &field());
        while missile.counter() > 5 {
            missile.tick_lifetime();
        }
        assert_eq!(missile.intensity(), 120);
        missile.stop();
        assert!(!missile.is_active());
        assert_eq!(missile.intensity(), 0);
    }

    #[test]
    fn entry_from_left_edge() {
        let mut saucer = Saucer::default();
        // y, heading, speed, side.
        let mut rng = SequenceRng::new(vec![0.5, 0.0, 1.0, 0.9]);
        saucer.enter(&field(), &mut rng);
        let s = saucer.sprite();
        assert!(s.active);
        assert_eq!((s.x, s.y), (-600.0, 0.0));
        // Heading -π/2 moves straight right at full saucer speed.
        assert!((s.dx - MAX_ROCK_SPEED).abs() < 1e-12);
        assert!(s.dy.abs() < 1e-12);
        assert_eq!(saucer.pass_counter(), 250);
    }

    #[test]
    fn entry_from_right_edge_flips_dx() {
        let mut saucer = Saucer::default();
        let mut rng = SequenceRng::new(vec![0.25, 0.0, 0.0, 0.1]);
        saucer.enter(&field(), &mut rng);
        let s = saucer.sprite();
        assert_eq!((s.x, s.y), (600.0, -200.0));
        assert!((s.dx + MAX_ROCK_SPEED / 2.0).abs() < 1e-12);
        assert_eq!(saucer.pass_counter(), 500);
    }

    #[test]
    fn passes_run_down_then_stop() {
        let mut saucer = Saucer::default();
        saucer.reset_passes();
        assert!(saucer.spend_pass());
        assert!(saucer.spend_pass());
        assert!(!saucer.spend_pass());

        saucer.reset_passes();
        saucer.stop();
        assert_eq!((saucer.passes_left(), saucer.pass_counter()), (0, 0));
        assert!(!saucer.is_active());
    }
}
