//! Random draws used when stocking the zoo.

/// Source of uniform draws in `[0, 1)`.
///
/// Stocking only ever asks for unit floats, so tests can force exact values
/// (including a zero draw) without reasoning about a generator's internals.
pub trait Draw {
    fn unit(&mut self) -> f64;
}

/// Seeded splitmix64 generator. Same seed, same zoo.
#[derive(Debug, Clone)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl Draw for SplitMix64 {
    fn unit(&mut self) -> f64 {
        // Top 53 bits fill the f64 mantissa exactly.
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[derive(Debug, Clone)]
pub struct Scripted {
    values: Vec<f64>,
    cursor: usize,
}

impl Scripted {
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl Draw for Scripted {
    fn unit(&mut self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v.clamp(0.0, 1.0 - f64::EPSILON)
    }
}
