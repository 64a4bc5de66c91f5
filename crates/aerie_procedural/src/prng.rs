//! # Seeded Pseudo-Random Stream
//!
//! Frozen algorithm. Test vectors and every generated world depend on it, so
//! it must never change.
//!
//! ## Contract
//!
//! 1. **Seeding**: take the IEEE-754 bit pattern `b` of the seed (with `-0.0`
//!    treated as `0.0`), fold it to 32 bits as `(b ^ (b >> 32)) as u32`, and
//!    reinterpret as `i32`. A zero state is replaced by `1`.
//! 2. **Recurrence** (xorshift32, on the signed state):
//!    `s ^= s << 13; s ^= s >> 17 (arithmetic); s ^= s << 5`.
//! 3. **Output**: every draw advances the state once, then maps it linearly
//!    from `[i32::MIN, i32::MAX]` onto `[min, max]`:
//!    `(s - i32::MIN) / (i32::MAX - i32::MIN) * (max - min) + min`.

use crate::noise::WorldSeed;

/// Deterministic xorshift32 stream.
#[derive(Clone, Debug)]
pub struct SeededRng {
    state: i32,
}

impl SeededRng {
    /// Creates a stream from a world seed.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            state: Self::fold_seed(seed.value()),
        }
    }

    /// Derives the initial 32-bit state from a seed.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn fold_seed(seed: f64) -> i32 {
        let seed = if seed == 0.0 { 0.0 } else { seed };
        let bits = seed.to_bits();
        let folded = (bits ^ (bits >> 32)) as u32 as i32;
        if folded == 0 {
            1
        } else {
            folded
        }
    }

    /// Current raw state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> i32 {
        self.state
    }

    /// Advances the stream and returns the new raw state.
    #[inline]
    pub fn next_i32(&mut self) -> i32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Advances the stream and maps the state onto `[min, max]`.
    #[inline]
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        let raw = f64::from(self.next_i32());
        let unit = (raw - f64::from(i32::MIN)) / (f64::from(i32::MAX) - f64::from(i32::MIN));
        unit * (max - min) + min
    }
}
