//! Explosion debris: one spinning line segment per outline edge.

use crate::constants::{
    DEBRIS_SPIN_FACTOR, DETAIL_STRIDE_MIN_VERTICES, MAX_ROCK_SPEED, MAX_ROCK_SPIN, MAX_SCRAP,
    SCRAP_COUNT,
};
use crate::geometry::{FieldSize, Polygon};
use crate::pool::Pool;
use crate::rng::RandomSource;
use crate::sprite::{ramp_intensity, Body, Sprite};

#[derive(Clone, Debug, Default)]
pub struct Debris {
    sprite: Sprite,
    counter: i32,
}

impl Body for Debris {
    fn sprite(&self) -> &Sprite {
        &self.sprite
    }

    fn sprite_mut(&mut self) -> &mut Sprite {
        &mut self.sprite
    }
}

pub type DebrisPool = Pool<Debris, MAX_SCRAP>;

impl Debris {
    pub fn counter(&self) -> i32 {
        self.counter
    }

    pub fn intensity(&self) -> u8 {
        ramp_intensity(self.counter, SCRAP_COUNT)
    }

    /// Drifts one tick; the fragment disappears once its counter goes
    /// negative.
    pub fn update(&mut self, field: &FieldSize) {
        self.sprite.advance(field);
        self.sprite.render(field);
        self.counter -= 1;
        if self.counter < 0 {
            self.sprite.active = false;
        }
    }
}

/// Breaks `source` into edge fragments drawn from `pool` round-robin.
///
/// With detail off, outlines of six or more vertices use every other edge.
/// Returns the number of fragments emitted.
pub fn explode(
    source: &mut Sprite,
    pool: &mut DebrisPool,
    detail: bool,
    field: &FieldSize,
    rng: &mut dyn RandomSource,
) -> usize {
    source.render(field);

    let points = source.shape().points();
    let n = points.len();
    if n == 0 {
        return 0;
    }
    let stride = if detail || n < DETAIL_STRIDE_MIN_VERTICES {
        1
    } else {
        2
    };

    let mut emitted = 0;
    for i in (0..n).step_by(stride) {
        let a = points[i];
        let b = points[(i + 1) % n];
        let cx = (a.x + b.x) / 2;
        let cy = (a.y + b.y) / 2;

        let (_, debris) = pool.claim_next();
        let sprite = &mut debris.sprite;
        sprite.set_shape(Polygon::from_points(&[
            (a.x - cx, a.y - cy),
            (b.x - cx, b.y - cy),
        ]));
        sprite.active = true;
        sprite.place(source.x + f64::from(cx), source.y + f64::from(cy));
        sprite.angle = source.angle;
        sprite.spin = DEBRIS_SPIN_FACTOR * rng.symmetric(MAX_ROCK_SPIN);
        let dx = (rng.symmetric(MAX_ROCK_SPEED) + source.dx) / 2.0;
        let dy = (rng.symmetric(MAX_ROCK_SPEED) + source.dy) / 2.0;
        sprite.set_velocity(dx, dy);
        debris.counter = SCRAP_COUNT;
        emitted += 1;
    }
    emitted
}
