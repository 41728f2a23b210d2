//! Player craft, its projectile ring and the cosmetic flame sprites.

use crate::constants::{
    BULLET_SPEED, HYPER_COUNT, MAX_INTENSITY, MAX_SHIP_SPEED, MAX_SHOTS, SCRAP_COUNT,
    SHIP_ANGLE_STEP, SHIP_SPEED_STEP,
};
use crate::geometry::FieldSize;
use crate::input::ControlState;
use crate::pool::Pool;
use crate::rng::RandomSource;
use crate::sprite::{normalize_angle, ramp_intensity, Body, Sprite};

pub const SHIP_SHAPE: [(i32, i32); 3] = [(0, -10), (7, 10), (-7, 10)];
pub const BULLET_SHAPE: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const FORWARD_FLAME_SHAPE: [(i32, i32); 4] = [(0, 12), (-3, 16), (0, 26), (3, 16)];
pub const REVERSE_FLAME_SHAPE: [(i32, i32); 8] = [
    (-2, 12),
    (-4, 14),
    (-2, 20),
    (0, 14),
    (2, 12),
    (4, 14),
    (2, 20),
    (0, 14),
];

#[derive(Clone, Debug)]
pub struct Bullet {
    sprite: Sprite,
}

impl Default for Bullet {
    fn default() -> Self {
        Self {
            sprite: Sprite::with_shape(&BULLET_SHAPE),
        }
    }
}

impl Body for Bullet {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

pub type BulletPool = Pool<Bullet, MAX_SHOTS>;

#[derive(Clone, Debug)]
pub struct Ship {
    sprite: Sprite,
    forward_flame: Sprite,
    reverse_flame: Sprite,
    bullets: BulletPool,
    hyper_counter: i32,
    respawn_counter: i32,
}

impl Default for Ship {
    fn default() -> Self {
        Self::new()
    }
}

impl Body for Ship {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

impl Ship {
    pub fn new() -> Self {
        Self {
            sprite: Sprite::with_shape(&SHIP_SHAPE),
            forward_flame: Sprite::with_shape(&FORWARD_FLAME_SHAPE),
            reverse_flame: Sprite::with_shape(&REVERSE_FLAME_SHAPE),
            bullets: BulletPool::new(),
            hyper_counter: 0,
            respawn_counter: 0,
        }
    }

    pub fn bullets(&self) -> &BulletPool {
        &self.bullets
    }

    pub fn bullets_mut(&mut self) -> &mut BulletPool {
        &mut self.bullets
    }

    pub fn forward_flame(&self) -> &Sprite {
        &self.forward_flame
    }

    pub fn reverse_flame(&self) -> &Sprite {
        &self.reverse_flame
    }

    pub fn hyper_counter(&self) -> i32 {
        self.hyper_counter
    }

    pub fn respawn_counter(&self) -> i32 {
        self.respawn_counter
    }

    pub fn in_hyperspace(&self) -> bool {
        self.hyper_counter > 0
    }

    /// Active and outside the hyperspace window.
    pub fn is_vulnerable(&self) -> bool {
        self.sprite.active && self.hyper_counter <= 0
    }

    /// Places a fresh ship at field centre, at rest and pointing up.
    pub fn reset(&mut self, field: &FieldSize) {
        self.sprite.active = true;
        self.sprite.place(0.0, 0.0);
        self.sprite.set_velocity(0.0, 0.0);
        self.sprite.angle = 0.0;
        self.sprite.spin = 0.0;
        self.hyper_counter = 0;
        self.sprite.render(field);
        self.sync_flames(field);
    }

    /// Respawn after a crash, shielded for a full hyperspace window.
    pub fn respawn(&mut self, field: &FieldSize) {
        self.reset(field);
        self.hyper_counter = HYPER_COUNT;
    }

    pub fn crash(&mut self) {
        self.sprite.active = false;
        self.respawn_counter = SCRAP_COUNT;
    }

    /// Counts down the wreck timer; `true` once it has elapsed.
    pub fn tick_respawn(&mut self) -> bool {
        self.respawn_counter -= 1;
        self.respawn_counter <= 0
    }

    /// Applies held rotation and thrust. Thrust changes velocity even while
    /// the ship is wrecked; only integration is gated on `active`.
    pub fn steer(&mut self, controls: &ControlState) {
        if controls.rotate_left {
            self.sprite.angle = normalize_angle(self.sprite.angle + SHIP_ANGLE_STEP);
        }
        if controls.rotate_right {
            self.sprite.angle = normalize_angle(self.sprite.angle - SHIP_ANGLE_STEP);
        }

        let (sin, cos) = self.sprite.angle.sin_cos();
        let dx = SHIP_SPEED_STEP * -sin;
        let dy = SHIP_SPEED_STEP * cos;

        if controls.thrust_forward {
            self.sprite.dx += dx;
            self.sprite.dy += dy;
        }
        if controls.thrust_reverse {
            self.sprite.dx -= dx;
            self.sprite.dy -= dy;
        }

        if controls.is_thrusting() && self.sprite.speed() > MAX_SHIP_SPEED {
            let sign = if controls.thrust_forward { 1.0 } else { -1.0 };
            self.sprite.dx = sign * MAX_SHIP_SPEED * -sin;
            self.sprite.dy = sign * MAX_SHIP_SPEED * cos;
        }
    }

    /// Integrates an active ship, runs down the hyperspace window and keeps
    /// the flame sprites on the hull.
    pub fn update(&mut self, field: &FieldSize) {
        if !self.sprite.active {
            return;
        }
        self.sprite.advance(field);
        self.sprite.render(field);
        if self.hyper_counter > 0 {
            self.hyper_counter -= 1;
        }
        self.sync_flames(field);
    }

    fn sync_flames(&mut self, field: &FieldSize) {
        for flame in [&mut self.forward_flame, &mut self.reverse_flame] {
            flame.place(self.sprite.x, self.sprite.y);
            flame.angle = self.sprite.angle;
            flame.render(field);
        }
    }

    /// Launches the next projectile in the ring from the ship's position.
    /// Returns the slot used, or `None` while wrecked.
    pub fn fire(&mut self) -> Option<usize> {
        if !self.sprite.active {
            return None;
        }
        let (sin, cos) = self.sprite.angle.sin_cos();
        let (x, y) = (self.sprite.x, self.sprite.y);
        let (index, bullet) = self.bullets.claim_next();
        let sprite = bullet.sprite_mut();
        sprite.active = true;
        sprite.place(x, y);
        sprite.set_velocity(BULLET_SPEED * -sin, BULLET_SPEED * cos);
        Some(index)
    }

    /// Jumps to a random spot and opens the invulnerability window.
    pub fn hyperspace(&mut self, field: &FieldSize, rng: &mut dyn RandomSource) -> bool {
        if !self.sprite.active || self.hyper_counter > 0 {
            return false;
        }
        let (x, y) = field.random_position(rng);
        self.sprite.place(x, y);
        self.hyper_counter = HYPER_COUNT;
        true
    }

    /// Projectiles vanish instead of wrapping.
    pub fn update_bullets(&mut self, field: &FieldSize) {
        self.bullets.for_each_active(|_, bullet| {
            let sprite = bullet.sprite_mut();
            if sprite.advance(field) {
                sprite.active = false;
            } else {
                sprite.render(field);
            }
        });
    }

    /// Fades in from black over the hyperspace window.
    pub fn intensity(&self) -> u8 {
        (MAX_INTENSITY - i32::from(ramp_intensity(self.hyper_counter, HYPER_COUNT))) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_ROCK_SPEED;
    use crate::input::Control;
    use crate::rng::SequenceRng;
    use core::f64::consts::FRAC_PI_2;

    fn field() -> FieldSize {
        FieldSize::default()
    }

    fn ready_ship() -> Ship {
        let mut ship = Ship::new();
        ship.reset(&field());
        ship
    }

    #[test]
    fn fire_from_centre_heads_up_screen() {
        let mut ship = ready_ship();
        let slot = ship.fire().expect("active ship fires");
        assert_eq!(slot, 1);

        let bullet = ship.bullets().get(slot).expect("slot").sprite();
        assert!(bullet.active);
        assert_eq!((bullet.x, bullet.y), (0.0, 0.0));
        assert_eq!(bullet.dy, 2.0 * MAX_ROCK_SPEED);
        assert_eq!(bullet.dx, 0.0);
        assert!(bullet.polygon().is_empty(), "rendered on the next update");
    }

    #[test]
    fn bullet_velocity_ignores_ship_velocity() {
        let mut ship = ready_ship();
        ship.sprite_mut().set_velocity(3.0, -2.0);
        let slot = ship.fire().expect("fires");
        let bullet = ship.bullets().get(slot).expect("slot").sprite();
        assert_eq!((bullet.dx, bullet.dy), (0.0, BULLET_SPEED));
    }

    #[test]
    fn wrecked_ship_cannot_fire_or_warp() {
        let mut ship = ready_ship();
        ship.crash();
        assert!(ship.fire().is_none());
        let mut rng = SequenceRng::constant(0.25);
        assert!(!ship.hyperspace(&field(), &mut rng));
        assert_eq!(ship.bullets().active_count(), 0);
    }

    #[test]
    fn ninth_shot_reuses_a_live_slot() {
        let mut ship = ready_ship();
        let slots: Vec<usize> = (0..9).map(|_| ship.fire().expect("fires")).collect();
        assert_eq!(slots, vec![1, 2, 3, 4, 5, 6, 7, 0, 1]);
        assert_eq!(ship.bullets().active_count(), MAX_SHOTS);
    }

    #[test]
    fn bullets_expire_on_wrap() {
        let mut ship = ready_ship();
        let slot = ship.fire().expect("fires");
        let mut ticks = 0;
        while ship.bullets().get(slot).expect("slot").is_active() {
            ship.update_bullets(&field());
            ticks += 1;
            assert!(ticks < 1_000, "bullet never wrapped");
        }
        // 400 units to the top edge at 9.6 per tick.
        assert_eq!(ticks, 42);
    }

    #[test]
    fn thrust_is_clamped_to_max_speed_along_heading() {
        let mut ship = ready_ship();
        let mut controls = ControlState::default();
        controls.set(Control::ThrustForward, true);
        for _ in 0..100 {
            ship.steer(&controls);
        }
        let sprite = ship.sprite();
        assert!((sprite.speed() - MAX_SHIP_SPEED).abs() < 1e-9);
        assert!(sprite.dy > 0.0);

        controls.set(Control::ThrustForward, false);
        controls.set(Control::ThrustReverse, true);
        for _ in 0..100 {
            ship.steer(&controls);
        }
        assert!((ship.sprite().speed() - MAX_SHIP_SPEED).abs() < 1e-9);
        assert!(ship.sprite().dy < 0.0);
    }

    #[test]
    fn forward_wins_the_clamp_when_both_thrusts_are_held() {
        let mut ship = ready_ship();
        ship.sprite_mut().set_velocity(0.0, -10.0);
        let mut controls = ControlState::default();
        controls.set(Control::ThrustForward, true);
        controls.set(Control::ThrustReverse, true);
        ship.steer(&controls);
        assert!((ship.sprite().dy - MAX_SHIP_SPEED).abs() < 1e-9);
    }

    #[test]
    fn rotation_wraps_into_range() {
        let mut ship = ready_ship();
        let mut controls = ControlState::default();
        controls.set(Control::RotateRight, true);
        ship.steer(&controls);
        let angle = ship.sprite().angle;
        assert!(angle > FRAC_PI_2 && angle < core::f64::consts::TAU);
    }

    #[test]
    fn hyperspace_opens_window_and_fades_in() {
        let mut ship = ready_ship();
        let mut rng = SequenceRng::new(vec![0.75, 0.25]);
        assert!(ship.hyperspace(&field(), &mut rng));
        assert_eq!((ship.sprite().x, ship.sprite().y), (300.0, -200.0));
        assert!(!ship.is_vulnerable());
        assert_eq!(ship.intensity(), 0);
        assert!(!ship.hyperspace(&field(), &mut rng), "already warping");

        for _ in 0..HYPER_COUNT {
            ship.update(&field());
        }
        assert!(ship.is_vulnerable());
        assert_eq!(ship.intensity(), 255);
    }

    #[test]
    fn flames_follow_the_hull() {
        let mut ship = ready_ship();
        ship.sprite_mut().set_velocity(1.0, 1.0);
        ship.sprite_mut().spin = 0.1;
        ship.update(&field());
        let hull = ship.sprite();
        for flame in [ship.forward_flame(), ship.reverse_flame()] {
            assert_eq!((flame.x, flame.y, flame.angle), (hull.x, hull.y, hull.angle));
            assert_eq!(flame.polygon().len(), flame.shape().len());
        }
    }

    #[test]
    fn respawn_timer_runs_out_after_scrap_count() {
        let mut ship = ready_ship();
        ship.crash();
        let mut ticks = 1;
        while !ship.tick_respawn() {
            ticks += 1;
        }
        assert_eq!(ticks, SCRAP_COUNT);
        ship.respawn(&field());
        assert!(ship.is_active());
        assert_eq!(ship.hyper_counter(), HYPER_COUNT);
    }
}
