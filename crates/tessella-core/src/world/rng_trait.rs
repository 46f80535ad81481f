//! RNG trait abstraction for the simulation
//!
//! Rules never reach for a global generator; the driver owns a seeded RNG and
//! threads it through, so a given seed always replays the same world.

/// Random number generator trait for World simulation
pub trait WorldRng {
    /// Generate random boolean with 50% probability
    fn gen_bool(&mut self) -> bool;

    /// Generate random f32 in [0.0, 1.0)
    fn gen_f32(&mut self) -> f32;

    /// Generate a random index in [0, len); `len` must be non-zero
    fn gen_index(&mut self, len: usize) -> usize;

    /// Check if random value is less than probability threshold
    fn check_probability(&mut self, probability: f32) -> bool {
        self.gen_f32() < probability
    }
}

// Blanket implementation for any type implementing rand::Rng
// This covers seeded Xoshiro generators as well as ThreadRng
impl<T: ?Sized + rand::Rng> WorldRng for T {
    fn gen_bool(&mut self) -> bool {
        rand::Rng::r#gen(self)
    }

    fn gen_f32(&mut self) -> f32 {
        rand::Rng::r#gen(self)
    }

    fn gen_index(&mut self, len: usize) -> usize {
        rand::Rng::gen_range(self, 0..len)
    }
}

/// Fisher-Yates shuffle driven by a `WorldRng`
pub fn shuffle<T>(rng: &mut dyn WorldRng, items: &mut [T]) {
    for i in (1..items.len()).rev() {
        let j = rng.gen_index(i + 1);
        items.swap(i, j);
    }
}
