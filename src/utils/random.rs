//! Fast pseudo random number generator.
//!
//! Linear congruential generator. Each consumer owns its own state so that the
//! two modulation oscillators draw independent, reproducible sequences.

#[derive(Debug, Clone)]
pub struct Random {
    state: u32,
}

impl Default for Random {
    fn default() -> Self {
        Self::new(0x21)
    }
}

impl Random {
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    #[inline]
    pub fn seed(&mut self, seed: u32) {
        self.state = seed;
    }

    #[inline]
    pub fn get_word(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(1664525).wrapping_add(1013904223);
        self.state
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn get_float(&mut self) -> f32 {
        // 24 bits keep the result strictly below 1.0 after the f32 conversion.
        (self.get_word() >> 8) as f32 / 16_777_216.0
    }

    /// Uniform float in `[min, max]`.
    #[inline]
    pub fn get_ranged(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.get_float()
    }
}
