//! Carry-less folding constants for reflected CRC-32 polynomials.
//!
//! The folding kernels need, per polynomial:
//!
//! - `K_n = (x^n mod P(x))' << 1` for the fold distances (4×128 and 128 bits)
//!   and the 64→32 bit width reduction,
//! - `P'`, the 33-bit reflected polynomial,
//! - `μ' = (⌊x^64 / P(x)⌋)'`, the Barrett reciprocal,
//!
//! where `'` is bit reflection. Everything is computed by `const fn` so the
//! kernels embed plain immediates.

use crate::polynomial::{CRC32_IEEE, CRC32C, Polynomial};

// ─────────────────────────────────────────────────────────────────────────────
// GF(2) polynomial arithmetic
// ─────────────────────────────────────────────────────────────────────────────

/// `x^n mod P(x)`, where `poly_full` carries the explicit `x^32` term.
const fn xpow_mod(n: u32, poly_full: u64) -> u32 {
  let mut r: u64 = 1;
  let mut i = 0;
  while i < n {
    r <<= 1;
    if (r >> 32) & 1 != 0 {
      r ^= poly_full;
    }
    i += 1;
  }
  r as u32
}

/// Degree of a nonzero polynomial.
const fn degree(x: u128) -> u32 {
  127 - x.leading_zeros()
}

/// GF(2) quotient `dividend / divisor`.
const fn gf2_div(dividend: u128, divisor: u128) -> u128 {
  let mut dd = dividend;
  let mut q: u128 = 0;
  while dd != 0 && degree(dd) >= degree(divisor) {
    let shift = degree(dd) - degree(divisor);
    q ^= 1u128 << shift;
    dd ^= divisor << shift;
  }
  q
}

/// Reverse the low 33 bits of `v`.
const fn reflect33(v: u64) -> u64 {
  (v & ((1u64 << 33) - 1)).reverse_bits() >> 31
}

/// `(x^n mod P(x))' << 1`.
const fn fold_key(n: u32, poly_full: u64) -> u64 {
  (xpow_mod(n, poly_full).reverse_bits() as u64) << 1
}

// ─────────────────────────────────────────────────────────────────────────────
// Constant sets
// ─────────────────────────────────────────────────────────────────────────────

/// Folding and reduction constants for one reflected CRC-32 polynomial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct FoldConstants {
  /// `(K1, K2)`: fold one 128-bit lane across 512 bits (`x^544`, `x^480`).
  pub fold_512: (u64, u64),
  /// `(K3, K4)`: fold one 128-bit lane across 128 bits (`x^160`, `x^96`).
  pub fold_128: (u64, u64),
  /// `K5`: 64→32 bit width reduction (`x^64`).
  pub fold_64: u64,
  /// `P'`.
  pub poly: u64,
  /// `μ'`.
  pub mu: u64,
}

impl FoldConstants {
  #[must_use]
  pub const fn new(poly: Polynomial) -> Self {
    let full = poly.full();
    Self {
      fold_512: (fold_key(4 * 128 + 32, full), fold_key(4 * 128 - 32, full)),
      fold_128: (fold_key(128 + 32, full), fold_key(128 - 32, full)),
      fold_64: fold_key(64, full),
      poly: reflect33(full),
      mu: reflect33(gf2_div(1u128 << 64, full as u128) as u64),
    }
  }
}

pub(crate) const CRC32_IEEE_FOLD: FoldConstants = FoldConstants::new(CRC32_IEEE);
pub(crate) const CRC32C_FOLD: FoldConstants = FoldConstants::new(CRC32C);
