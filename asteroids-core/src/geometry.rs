use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_FIELD_HEIGHT, DEFAULT_FIELD_WIDTH, STAR_AREA_PER_STAR};
use crate::error::ConfigError;
use crate::rng::RandomSource;

pub const MAX_FIELD_DIMENSION: i32 = 16_384;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed integer polygon. The last vertex connects back to the first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: &[(i32, i32)]) -> Self {
        Self {
            points: points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Even-odd containment test. Polygons with fewer than three vertices
    /// enclose nothing.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.points.len();
        if n < 3 {
            return false;
        }

        let px = f64::from(point.x);
        let py = f64::from(point.y);
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            let (ax, ay) = (f64::from(a.x), f64::from(a.y));
            let (bx, by) = (f64::from(b.x), f64::from(b.y));
            if (ay > py) != (by > py) {
                let crossing_x = (bx - ax) * (py - ay) / (by - ay) + ax;
                if px < crossing_x {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }

    /// True when any vertex of either polygon lies inside the other.
    ///
    /// Thin shapes whose edges cross without a vertex inside are missed;
    /// the arcade feel depends on that looseness.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        self.points.iter().any(|p| other.contains(*p))
            || other.points.iter().any(|p| self.contains(*p))
    }
}

/// Round half up, matching the arcade's integer projection.
#[inline]
pub fn round_half_up(value: f64) -> i32 {
    (value + 0.5).floor() as i32
}

/// Playfield dimensions. The origin sits at the field centre; positions
/// range over `[-width/2, width/2]` and `[-height/2, height/2]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawFieldSize")]
pub struct FieldSize {
    width: i32,
    height: i32,
}

/// Unchecked wire form; deserialization goes through [`FieldSize::new`].
#[derive(Deserialize)]
struct RawFieldSize {
    width: i32,
    height: i32,
}

impl TryFrom<RawFieldSize> for FieldSize {
    type Error = ConfigError;

    fn try_from(raw: RawFieldSize) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl Default for FieldSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_FIELD_WIDTH,
            height: DEFAULT_FIELD_HEIGHT,
        }
    }
}

impl FieldSize {
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::NonPositiveDimension { width, height });
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(ConfigError::OddDimension { width, height });
        }
        if width > MAX_FIELD_DIMENSION || height > MAX_FIELD_DIMENSION {
            return Err(ConfigError::DimensionTooLarge {
                width,
                height,
                max: MAX_FIELD_DIMENSION,
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn half_width(&self) -> i32 {
        self.width / 2
    }

    pub fn half_height(&self) -> i32 {
        self.height / 2
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let hw = f64::from(self.half_width());
        let hh = f64::from(self.half_height());
        (-hw..=hw).contains(&x) && (-hh..=hh).contains(&y)
    }

    /// Uniform position anywhere on the field, in centred coordinates.
    pub fn random_position(&self, rng: &mut dyn RandomSource) -> (f64, f64) {
        let x = rng.next_f64() * f64::from(self.width) - f64::from(self.half_width());
        let y = rng.next_f64() * f64::from(self.height) - f64::from(self.half_height());
        (x, y)
    }

    pub fn star_count(&self) -> usize {
        let area = i64::from(self.width) * i64::from(self.height);
        (area / i64::from(STAR_AREA_PER_STAR)) as usize
    }

    /// Background points in screen coordinates (`0..width`, `0..height`).
    pub fn generate_stars(&self, rng: &mut dyn RandomSource) -> Vec<Point> {
        (0..self.star_count())
            .map(|_| {
                Point::new(
                    (rng.next_f64() * f64::from(self.width)) as i32,
                    (rng.next_f64() * f64::from(self.height)) as i32,
                )
            })
            .collect()
    }
}
