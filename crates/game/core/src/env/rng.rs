//! RNG oracle for deterministic random number generation.
//!
//! Every random decision in a battle (first enemy pick, deck reshuffles) goes
//! through an injected [`RngOracle`]. Given the same seed an oracle must return
//! the same value, so a battle replays identically under test.

/// RNG oracle for deterministic random number generation.
///
/// Implementations must be deterministic and produce the same values
/// given the same seed.
pub trait RngOracle: Send + Sync {
    /// Generate a random u32 value from a seed.
    fn next_u32(&self, seed: u64) -> u32;

    /// Pick an index in `0..len`. Returns 0 when `len` is 0 or 1.
    fn pick_index(&self, seed: u64, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.next_u32(seed) as usize % len
    }

    /// Generate a random value in range [min, max] inclusive.
    fn range(&self, seed: u64, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = max - min + 1;
        min + (self.next_u32(seed) % range)
    }
}

/// PCG random number generator (PCG-XSH-RR, 64-bit state, 32-bit output).
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        Self::pcg_output(Self::pcg_step(seed))
    }
}

/// Adapts a plain function or closure into an [`RngOracle`].
///
/// ```
/// # use battle_core::env::{FnRng, RngOracle};
/// let rng = FnRng(|seed: u64| (seed % 7) as u32);
/// assert_eq!(rng.next_u32(9), 2);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FnRng<F>(pub F);

impl<F> RngOracle for FnRng<F>
where
    F: Fn(u64) -> u32 + Send + Sync,
{
    fn next_u32(&self, seed: u64) -> u32 {
        (self.0)(seed)
    }
}

/// Oracle that ignores the seed and always returns the same value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedRng(pub u32);

impl RngOracle for FixedRng {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Compute deterministic seed from battle state components.
///
/// * `battle_seed` - Base seed set at battle start
/// * `nonce` - Command sequence number (increments each command)
/// * `actor` - Numeric id of the actor rolling (0 for the player/system)
/// * `context` - Distinguishes several rolls made by the same command
pub fn compute_seed(battle_seed: u64, nonce: u64, actor: u32, context: u32) -> u64 {
    // SplitMix64 / FxHash style mixing constants
    let mut hash = battle_seed;
    hash ^= nonce.wrapping_mul(0x9e3779b97f4a7c15);
    hash ^= (actor as u64).wrapping_mul(0x517cc1b727220a95);
    hash ^= (context as u64).wrapping_mul(0x85ebca6b);

    hash ^= hash >> 33;
    hash = hash.wrapping_mul(0xff51afd7ed558ccd);
    hash ^= hash >> 33;

    hash
}
