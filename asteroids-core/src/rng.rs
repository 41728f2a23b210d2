/// Source of uniform samples in `[0, 1)`.
///
/// The simulation draws every random decision through this trait so a
/// session can be replayed from a seed or driven by a scripted sequence.
pub trait RandomSource {
    fn next_f64(&mut self) -> f64;

    /// `true` with probability one half.
    fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }

    /// Uniform in `[-magnitude, magnitude)`.
    fn symmetric(&mut self, magnitude: f64) -> f64 {
        self.next_f64() * 2.0 * magnitude - magnitude
    }

    /// Uniform integer in `[min, min + span)`.
    fn next_span(&mut self, min: i32, span: i32) -> i32 {
        min + (self.next_f64() * f64::from(span)).floor() as i32
    }
}

const U32_RANGE: f64 = 4_294_967_296.0;

#[derive(Clone, Copy, Debug)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 0xDEAD_BEEF } else { seed },
        }
    }

    pub fn state(&self) -> u32 {
        self.state
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        self.state
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        f64::from(self.next()) / U32_RANGE
    }
}

/// Replays a fixed list of samples, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct SequenceRng {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceRng {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values, cursor: 0 }
    }

    /// A source that always returns `value`.
    pub fn constant(value: f64) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor = self.cursor.wrapping_add(1);
        value
    }
}
