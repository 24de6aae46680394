//! Reducing raw random words into `[0, n)`.
//!
//! `uint32_below` / `uint64_below` use Lemire's nearly-divisionless method
//! ("Fast Random Integer Generation in an Interval", 2019): take the full
//! product `x * n`, keep its high word, and reject the draw when the low word
//! falls below `2^k mod n`. Every accepted high word then has exactly
//! `floor(2^k / n)` preimages, so the result is unbiased. The modulus is only
//! computed when the low word is smaller than `n`, which is rare for small `n`.
//!
//! `modulo_below` is the naive `x % n` reduction, kept so the tool can
//! demonstrate the bias it introduces when `n` does not divide `2^64`.

use rand::RngCore;

use super::error::{StatsError, StatsResult};

/// Full-precision product of two 64-bit words as `(hi, lo)`.
pub fn mul64(x: u64, y: u64) -> (u64, u64) {
    let m = u128::from(x) * u128::from(y);
    ((m >> 64) as u64, m as u64)
}

fn split64to32(x: u64) -> (u32, u32) {
    ((x >> 32) as u32, x as u32)
}

/// Unbiased draw in `[0, n)` from 32-bit words.
pub fn uint32_below<R: RngCore + ?Sized>(rng: &mut R, n: u32) -> StatsResult<u32> {
    if n == 0 {
        return Err(StatsError::invalid_argument("cannot draw from an empty range [0, 0)"));
    }
    let (mut hi, mut lo) = split64to32(u64::from(rng.next_u32()) * u64::from(n));
    if lo < n {
        // 2^32 mod n
        let min_lo = n.wrapping_neg() % n;
        while lo < min_lo {
            (hi, lo) = split64to32(u64::from(rng.next_u32()) * u64::from(n));
        }
    }
    Ok(hi)
}

/// Unbiased draw in `[0, n)` from 64-bit words.
pub fn uint64_below<R: RngCore + ?Sized>(rng: &mut R, n: u64) -> StatsResult<u64> {
    if n == 0 {
        return Err(StatsError::invalid_argument("cannot draw from an empty range [0, 0)"));
    }
    let (mut hi, mut lo) = mul64(rng.next_u64(), n);
    if lo < n {
        // 2^64 mod n
        let min_lo = n.wrapping_neg() % n;
        while lo < min_lo {
            (hi, lo) = mul64(rng.next_u64(), n);
        }
    }
    Ok(hi)
}

/// Biased draw in `[0, n)`: low values are favoured unless `n` divides `2^64`.
pub fn modulo_below<R: RngCore + ?Sized>(rng: &mut R, n: u64) -> StatsResult<u64> {
    if n == 0 {
        return Err(StatsError::invalid_argument("cannot draw from an empty range [0, 0)"));
    }
    Ok(rng.next_u64() % n)
}
