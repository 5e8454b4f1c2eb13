//! x86_64 PCLMULQDQ engine.
//!
//! Folds four 128-bit lanes across 64-byte strides, collapses them to one
//! lane, reduces 128→64→32 bits and finishes with a Barrett reduction.
//! Inputs under 64 bytes and the final sub-16-byte tail go through the
//! slice-by-8 tail.
//!
//! # Safety
//!
//! Kernels require `pclmulqdq`, `sse4.1` and `sse2`. The safe wrappers are
//! only reachable through [`super::select`], which checks
//! [`platform::caps::x86::PCLMUL_READY`] first.

#![allow(unsafe_code)]

use core::arch::x86_64::{
  __m128i, _mm_and_si128, _mm_clmulepi64_si128, _mm_cvtsi32_si128, _mm_extract_epi32, _mm_loadu_si128,
  _mm_set_epi32, _mm_set_epi64x, _mm_srli_si128, _mm_xor_si128,
};

use platform::Caps;
use platform::caps::x86;

use super::clmul::{CRC32_IEEE_FOLD, CRC32C_FOLD, FoldConstants};
use super::{AcceleratedEngine, normal_via_reflected, portable};

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn load(block: &[u8; 16]) -> __m128i {
  // SAFETY: `block` is 16 readable bytes; `loadu` has no alignment requirement.
  unsafe { _mm_loadu_si128(block.as_ptr().cast()) }
}

/// `b ^ (a.lo * k.lo) ^ (a.hi * k.hi)`.
#[inline]
#[target_feature(enable = "pclmulqdq,sse2")]
unsafe fn fold(a: __m128i, b: __m128i, k: __m128i) -> __m128i {
  _mm_xor_si128(
    b,
    _mm_xor_si128(_mm_clmulepi64_si128(a, k, 0x00), _mm_clmulepi64_si128(a, k, 0x11)),
  )
}

/// Raw reflected update: `crc` is the complemented register.
#[target_feature(enable = "pclmulqdq,sse2,sse4.1")]
unsafe fn update(crc: u32, data: &[u8], k: &FoldConstants, tail: fn(u32, &[u8]) -> u32) -> u32 {
  let (blocks, rest) = data.as_chunks::<16>();
  let [b0, b1, b2, b3, more @ ..] = blocks else {
    return tail(crc, data);
  };

  // SAFETY: target features are enabled on this function.
  unsafe {
    let mut x3 = _mm_xor_si128(load(b0), _mm_cvtsi32_si128(crc as i32));
    let mut x2 = load(b1);
    let mut x1 = load(b2);
    let mut x0 = load(b3);

    let k1k2 = _mm_set_epi64x(k.fold_512.1 as i64, k.fold_512.0 as i64);
    let (strides, singles) = more.as_chunks::<4>();
    for [y3, y2, y1, y0] in strides {
      x3 = fold(x3, load(y3), k1k2);
      x2 = fold(x2, load(y2), k1k2);
      x1 = fold(x1, load(y1), k1k2);
      x0 = fold(x0, load(y0), k1k2);
    }

    let k3k4 = _mm_set_epi64x(k.fold_128.1 as i64, k.fold_128.0 as i64);
    let mut x = fold(x3, x2, k3k4);
    x = fold(x, x1, k3k4);
    x = fold(x, x0, k3k4);
    for y in singles {
      x = fold(x, load(y), k3k4);
    }

    // 128 → 64
    x = _mm_xor_si128(_mm_clmulepi64_si128(x, k3k4, 0x10), _mm_srli_si128(x, 8));

    // 64 → 32
    let low32 = _mm_set_epi32(0, 0, 0, !0);
    let k5 = _mm_set_epi64x(0, k.fold_64 as i64);
    x = _mm_xor_si128(_mm_clmulepi64_si128(_mm_and_si128(x, low32), k5, 0x00), _mm_srli_si128(x, 4));

    // Barrett
    let pu = _mm_set_epi64x(k.mu as i64, k.poly as i64);
    let t1 = _mm_clmulepi64_si128(_mm_and_si128(x, low32), pu, 0x10);
    let t2 = _mm_clmulepi64_si128(_mm_and_si128(t1, low32), pu, 0x00);
    let c = _mm_extract_epi32(_mm_xor_si128(x, t2), 1) as u32;

    tail(c, rest)
  }
}

fn crc32_raw(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only reachable after `select` checked PCLMUL_READY.
  unsafe { update(crc, data, &CRC32_IEEE_FOLD, portable::crc32_raw) }
}

fn crc32c_raw(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only reachable after `select` checked PCLMUL_READY.
  unsafe { update(crc, data, &CRC32C_FOLD, portable::crc32c_raw) }
}

/// PCLMULQDQ folding engine.
pub struct Pclmul;

impl AcceleratedEngine for Pclmul {
  const NAME: &'static str = "x86_64/pclmul";
  const REQUIRES: Caps = x86::PCLMUL_READY;

  fn crc32_refl(crc: u32, data: &[u8]) -> u32 {
    !crc32_raw(!crc, data)
  }

  fn crc32c_refl(crc: u32, data: &[u8]) -> u32 {
    !crc32c_raw(!crc, data)
  }

  fn crc32(crc: u32, data: &[u8]) -> u32 {
    !normal_via_reflected(!crc, data, crc32_raw)
  }

  fn crc32c(crc: u32, data: &[u8]) -> u32 {
    !normal_via_reflected(!crc, data, crc32c_raw)
  }
}
