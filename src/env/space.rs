use rand::distributions::{Distribution, Uniform};
use rand::Rng;

/// A discrete space `{0, 1, ..., n - 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discrete {
    pub n: usize,
}

impl Discrete {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        Uniform::from(0..self.n).sample(rng)
    }

    pub fn contains(&self, value: usize) -> bool {
        value < self.n
    }
}
