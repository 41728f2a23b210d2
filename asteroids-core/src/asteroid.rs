//! Jagged asteroid bodies, wave spawning and splitting.

use core::f64::consts::TAU;

use crate::constants::{
    MAX_ROCKS, MAX_ROCK_SIDES, MAX_ROCK_SIZE, MAX_ROCK_SPIN, MIN_ROCK_SIDES, MIN_ROCK_SIZE,
};
use crate::geometry::{round_half_up, FieldSize, Point, Polygon};
use crate::pool::Pool;
use crate::rng::RandomSource;
use crate::sprite::{Body, Sprite};

pub const SPLIT_FRAGMENTS: usize = 2;

#[derive(Clone, Debug, Default)]
pub struct Asteroid {
    sprite: Sprite,
    small: bool,
}

impl Body for Asteroid {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

pub type AsteroidPool = Pool<Asteroid, MAX_ROCKS>;

/// Regular polygon outline with a random radius per vertex.
///
/// Vertex `j` of `s` sits at angle `2πj/s`; fragments use half radii.
pub fn jagged_shape(rng: &mut dyn RandomSource, fragment: bool) -> Polygon {
    let sides = rng.next_span(MIN_ROCK_SIDES, MAX_ROCK_SIDES - MIN_ROCK_SIDES);
    let mut shape = Polygon::new();
    for j in 0..sides {
        let theta = TAU / f64::from(sides) * f64::from(j);
        let mut radius = rng.next_span(MIN_ROCK_SIZE, MAX_ROCK_SIZE - MIN_ROCK_SIZE);
        if fragment {
            radius >>= 1;
        }
        let r = f64::from(radius);
        shape.push(Point::new(
            -round_half_up(r * theta.sin()),
            round_half_up(r * theta.cos()),
        ));
    }
    shape
}

impl Asteroid {
    pub fn is_small(&self) -> bool {
        self.small
    }

    /// Regenerates this slot as a full-size body on a random field edge,
    /// drifting at up to `speed` per axis.
    pub fn spawn_at_edge(&mut self, speed: f64, field: &FieldSize, rng: &mut dyn RandomSource) {
        let shape = jagged_shape(rng, false);
        let sprite = &mut self.sprite;
        sprite.set_shape(shape);
        sprite.active = true;
        sprite.angle = 0.0;
        sprite.spin = rng.symmetric(MAX_ROCK_SPIN);

        let half_w = f64::from(field.half_width());
        let half_h = f64::from(field.half_height());
        if rng.coin() {
            let x = if rng.coin() { half_w } else { -half_w };
            let y = rng.next_f64() * f64::from(field.height()) - half_h;
            sprite.place(x, y);
        } else {
            let x = rng.next_f64() * f64::from(field.width()) - half_w;
            let y = if rng.coin() { half_h } else { -half_h };
            sprite.place(x, y);
        }

        let mut dx = rng.next_f64() * speed;
        if rng.coin() {
            dx = -dx;
        }
        let mut dy = rng.next_f64() * speed;
        if rng.coin() {
            dy = -dy;
        }
        sprite.set_velocity(dx, dy);
        sprite.render(field);
        self.small = false;
    }

    /// Regenerates this slot as a small body at `(x, y)`.
    pub fn spawn_fragment(
        &mut self,
        x: f64,
        y: f64,
        speed: f64,
        field: &FieldSize,
        rng: &mut dyn RandomSource,
    ) {
        let shape = jagged_shape(rng, true);
        let sprite = &mut self.sprite;
        sprite.set_shape(shape);
        sprite.active = true;
        sprite.angle = 0.0;
        sprite.spin = rng.symmetric(MAX_ROCK_SPIN);
        sprite.place(x, y);
        let dx = rng.symmetric(speed);
        let dy = rng.symmetric(speed);
        sprite.set_velocity(dx, dy);
        sprite.render(field);
        self.small = true;
    }
}

/// Refills every slot with a full-size body.
pub fn spawn_wave(
    pool: &mut AsteroidPool,
    speed: f64,
    field: &FieldSize,
    rng: &mut dyn RandomSource,
) {
    for index in 0..pool.capacity() {
        if let Some(asteroid) = pool.get_mut(index) {
            asteroid.spawn_at_edge(speed, field, rng);
        }
    }
}

/// Creates up to two small bodies at `(x, y)` in the first free slots.
/// Returns how many were created; a full pool yields none.
pub fn split(
    pool: &mut AsteroidPool,
    x: f64,
    y: f64,
    speed: f64,
    field: &FieldSize,
    rng: &mut dyn RandomSource,
) -> usize {
    let mut created = 0;
    while created < SPLIT_FRAGMENTS {
        let Some((_, slot)) = pool.claim_inactive() else {
            break;
        };
        slot.spawn_fragment(x, y, speed, field, rng);
        created += 1;
    }
    created
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MIN_ROCK_SPEED;
    use crate::rng::{SeededRng, SequenceRng};

    fn field() -> FieldSize {
        FieldSize::default()
    }

    #[test]
    fn jagged_shape_vertex_count_and_radius() {
        let mut rng = SeededRng::new(99);
        for _ in 0..200 {
            let shape = jagged_shape(&mut rng, false);
            assert!((6..=15).contains(&shape.len()), "sides {}", shape.len());
            for p in shape.points() {
                let r = f64::from(p.x).hypot(f64::from(p.y));
                assert!((19.0..=40.0).contains(&r), "radius {r}");
            }
        }
    }

    #[test]
    fn fragment_shape_uses_half_radius() {
        // Sides 6 + floor(0.0) = 6, radius (20 + 0) >> 1 = 10.
        let mut rng = SequenceRng::constant(0.0);
        let shape = jagged_shape(&mut rng, true);
        assert_eq!(shape.len(), 6);
        assert_eq!(shape.points()[0], Point::new(0, 10));
        // Vertex 3 sits at θ = π.
        assert_eq!(shape.points()[3], Point::new(0, -10));
    }

    #[test]
    fn wave_fills_every_slot_on_an_edge() {
        let mut pool = AsteroidPool::new();
        let mut rng = SeededRng::new(5);
        spawn_wave(&mut pool, MIN_ROCK_SPEED, &field(), &mut rng);
        assert_eq!(pool.active_count(), MAX_ROCKS);

        for (_, asteroid) in pool.iter_active() {
            let s = asteroid.sprite();
            let on_vertical_edge = s.x.abs() == 600.0;
            let on_horizontal_edge = s.y.abs() == 400.0;
            assert!(on_vertical_edge || on_horizontal_edge, "({}, {})", s.x, s.y);
            assert!(s.dx.abs() <= MIN_ROCK_SPEED && s.dy.abs() <= MIN_ROCK_SPEED);
            assert!(s.spin.abs() <= MAX_ROCK_SPIN);
            assert!(!asteroid.is_small());
            assert_eq!(s.polygon().len(), s.shape().len());
        }
    }

    #[test]
    fn split_fills_first_free_slots_including_parent() {
        let mut pool = AsteroidPool::new();
        let mut rng = SeededRng::new(8);
        spawn_wave(&mut pool, 1.0, &field(), &mut rng);
        pool.get_mut(2).expect("slot").deactivate();
        pool.get_mut(5).expect("slot").deactivate();
        pool.get_mut(6).expect("slot").deactivate();

        let created = split(&mut pool, 12.0, -7.0, 1.0, &field(), &mut rng);
        assert_eq!(created, 2);
        assert_eq!(pool.active_count(), MAX_ROCKS - 1);
        for index in [2, 5] {
            let asteroid = pool.get(index).expect("slot");
            assert!(asteroid.is_active() && asteroid.is_small());
            assert_eq!((asteroid.sprite().x, asteroid.sprite().y), (12.0, -7.0));
        }
        assert!(!pool.get(6).expect("slot").is_active());
    }

    #[test]
    fn split_with_one_free_slot_makes_one() {
        let mut pool = AsteroidPool::new();
        let mut rng = SeededRng::new(8);
        spawn_wave(&mut pool, 1.0, &field(), &mut rng);
        pool.get_mut(7).expect("slot").deactivate();
        assert_eq!(split(&mut pool, 0.0, 0.0, 1.0, &field(), &mut rng), 1);
    }

    #[test]
    fn split_into_full_pool_makes_nothing() {
        let mut pool = AsteroidPool::new();
        let mut rng = SeededRng::new(8);
        spawn_wave(&mut pool, 1.0, &field(), &mut rng);
        assert_eq!(split(&mut pool, 0.0, 0.0, 1.0, &field(), &mut rng), 0);
        assert_eq!(pool.active_count(), MAX_ROCKS);
    }
}
