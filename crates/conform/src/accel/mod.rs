//! Capability-gated accelerated CRC-32 engines.
//!
//! Each engine implements [`AcceleratedEngine`] and declares the CPU
//! capabilities it needs. [`select`] walks the candidate list (best first)
//! and returns the first engine the detected [`Caps`] satisfy, or `None`.
//!
//! # Engines
//!
//! | name | arch | requires |
//! |------|------|----------|
//! | `x86_64/pclmul` | x86_64 | `pclmulqdq + sse4.1 + sse2` |
//! | `aarch64/crc` | aarch64 | `crc` |
//!
//! Reflected variants run natively. Non-reflected variants are derived from
//! the reflected kernel by bit-reversing the state and every input byte.
//!
//! # Safety
//!
//! The built-in kernels execute target-feature code. The candidate list is
//! private to this crate; the only way to obtain those kernels is through
//! [`select`] or [`detect`], which check the engine's requirements first.
//!
//! ```compile_fail
//! let kernels = conform::accel::candidates()[0].func;
//! ```
//!
//! ```
//! use platform::Caps;
//!
//! assert!(conform::accel::select(Caps::NONE).is_none());
//! ```

#[cfg(any(target_arch = "x86_64", test))]
mod clmul;
#[cfg(any(target_arch = "x86_64", test))]
mod portable;

#[cfg(target_arch = "aarch64")]
mod aarch64;
#[cfg(target_arch = "x86_64")]
mod x86_64;

use platform::Caps;

use crate::CrcFn;
use crate::config::{self, Force};

// ─────────────────────────────────────────────────────────────────────────────
// Engine contract
// ─────────────────────────────────────────────────────────────────────────────

/// An accelerated CRC engine for all four variants.
///
/// Every function has the reference signature and semantics: the public,
/// complemented accumulator goes in and comes out.
pub trait AcceleratedEngine {
  /// Diagnostic name, e.g. `"x86_64/pclmul"`.
  const NAME: &'static str;
  /// Capabilities that must be present before any kernel may run.
  const REQUIRES: Caps;

  fn crc32_refl(crc: u32, data: &[u8]) -> u32;
  fn crc32c_refl(crc: u32, data: &[u8]) -> u32;
  fn crc32(crc: u32, data: &[u8]) -> u32;
  fn crc32c(crc: u32, data: &[u8]) -> u32;
}

/// The four entry points of one engine as plain function pointers.
#[derive(Clone, Copy, Debug)]
pub struct Kernels {
  pub crc32_refl: CrcFn,
  pub crc32c_refl: CrcFn,
  pub crc32: CrcFn,
  pub crc32c: CrcFn,
}

impl Kernels {
  /// Kernel table of engine `E`.
  #[must_use]
  pub const fn of<E: AcceleratedEngine>() -> Self {
    Self {
      crc32_refl: E::crc32_refl,
      crc32c_refl: E::crc32c_refl,
      crc32: E::crc32,
      crc32c: E::crc32c,
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// An engine with its capability requirements.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Candidate<F> {
  pub(crate) name: &'static str,
  pub(crate) requires: Caps,
  pub(crate) func: F,
}

impl Candidate<Kernels> {
  #[must_use]
  pub(crate) const fn engine<E: AcceleratedEngine>() -> Self {
    Self {
      name: E::NAME,
      requires: E::REQUIRES,
      func: Kernels::of::<E>(),
    }
  }
}

/// The result of engine selection.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Name of the selected engine.
  pub name: &'static str,
  pub func: F,
}

#[cfg(target_arch = "x86_64")]
const CANDIDATES: &[Candidate<Kernels>] = &[Candidate::engine::<x86_64::Pclmul>()];

#[cfg(target_arch = "aarch64")]
const CANDIDATES: &[Candidate<Kernels>] = &[Candidate::engine::<aarch64::HwCrc>()];

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const CANDIDATES: &[Candidate<Kernels>] = &[];

/// Engines compiled for this target, best first.
#[must_use]
pub(crate) fn candidates() -> &'static [Candidate<Kernels>] {
  CANDIDATES
}

/// Pick the first candidate whose requirements are a subset of `caps`.
///
/// Unlike kernel selection with a portable fallback, an empty result is
/// normal here: it means "no accelerated engine on this machine".
#[must_use]
pub fn select(caps: Caps) -> Option<Selected<Kernels>> {
  let selected = candidates()
    .iter()
    .find(|c| caps.has(c.requires))
    .map(|c| Selected {
      name: c.name,
      func: c.func,
    });

  match &selected {
    Some(s) => log::debug!("accelerated CRC engine {} selected (caps: {caps})", s.name),
    None => log::debug!("no accelerated CRC engine for caps: {caps}"),
  }
  selected
}

/// Select against the detected CPU, honoring `CRC32_CONFORM_FORCE`.
#[must_use]
pub fn detect() -> Option<Selected<Kernels>> {
  if config::get().force == Force::Portable {
    log::debug!("accelerated CRC engine disabled by CRC32_CONFORM_FORCE=portable");
    return None;
  }
  select(platform::caps())
}

/// Whether an accelerated engine may run in this process.
#[inline]
#[must_use]
pub fn is_available() -> bool {
  detect().is_some()
}

// ─────────────────────────────────────────────────────────────────────────────
// Non-reflected variants via bit reversal
// ─────────────────────────────────────────────────────────────────────────────

/// Stack staging size for bit-reversed input.
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
const STAGE_LEN: usize = 4096;

/// Run a raw MSB-first update through a raw LSB-first kernel.
///
/// Reversing the register and every input byte turns an MSB-first CRC into
/// an LSB-first one over the same polynomial:
/// `normal(s, D) == rev32(reflected(rev32(s), rev8(D)))`.
#[inline]
#[cfg_attr(not(any(target_arch = "x86_64", target_arch = "aarch64")), allow(dead_code))]
pub(crate) fn normal_via_reflected(state: u32, data: &[u8], reflected: impl Fn(u32, &[u8]) -> u32) -> u32 {
  let mut buf = [0u8; STAGE_LEN];
  let mut s = state.reverse_bits();
  for chunk in data.chunks(STAGE_LEN) {
    let (staged, _) = buf.split_at_mut(chunk.len());
    for (dst, &src) in staged.iter_mut().zip(chunk) {
      *dst = src.reverse_bits();
    }
    s = reflected(s, staged);
  }
  s.reverse_bits()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reference;

  #[test]
  fn select_with_no_caps_is_none() {
    assert!(select(Caps::NONE).is_none());
  }

  #[test]
  fn select_honors_requirements() {
    for c in candidates() {
      let picked = select(c.requires).map(|s| s.name);
      assert_eq!(picked, Some(c.name));
    }
  }

  #[test]
  fn normal_via_reflected_matches_reference() {
    // Raw reflected table update over the reflected polynomial produces the
    // normal CRC once state and bytes are mirrored.
    let data: Vec<u8> = (0..10_000u32).map(|i| (i.wrapping_mul(0x9E37_79B9) >> 24) as u8).collect();
    for len in [0, 1, 15, 64, 4095, 4096, 4097, 10_000] {
      let part = &data[..len];
      let via = !normal_via_reflected(!0, part, |s, d| {
        reference::update_reflected(s, d, &crate::tables::REFLECTED_CRC32C)
      });
      assert_eq!(via, reference::crc32c(0, part), "len {len}");
    }
  }

  #[test]
  fn detected_engine_matches_reference() {
    let Some(selected) = detect() else { return };
    let k = selected.func;
    let data: Vec<u8> = (0..3000u32).map(|i| (i ^ (i >> 3)) as u8).collect();
    for len in [0, 1, 7, 16, 63, 64, 65, 127, 128, 255, 1024, 3000] {
      let part = &data[..len];
      assert_eq!((k.crc32_refl)(0, part), reference::crc32_refl(0, part), "crc32_refl len {len}");
      assert_eq!((k.crc32c_refl)(0, part), reference::crc32c_refl(0, part), "crc32c_refl len {len}");
      assert_eq!((k.crc32)(0, part), reference::crc32(0, part), "crc32 len {len}");
      assert_eq!((k.crc32c)(0, part), reference::crc32c(0, part), "crc32c len {len}");
    }
  }
}
