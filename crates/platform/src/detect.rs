//! Runtime CPU detection.
//!
//! Detection combines compile-time features (`cfg!(target_feature = ...)`)
//! with runtime probing (`is_x86_feature_detected!` /
//! `is_aarch64_feature_detected!`). The result is cached in a `OnceLock`
//! under `std`; without `std` only compile-time features are reported.
//!
//! Under Miri detection always reports [`Caps::NONE`] so that no intrinsic
//! is ever interpreted.
//!
//! # Overrides
//!
//! Tests can pin the reported capabilities:
//!
//! ```ignore
//! platform::set_caps_override(Some(Caps::NONE));
//! assert!(platform::caps().is_empty());
//! platform::set_caps_override(None);
//! ```

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Override
// ─────────────────────────────────────────────────────────────────────────────

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);
static OVERRIDE_BITS: AtomicU64 = AtomicU64::new(0);

/// Replace the detected capabilities with `caps` (or restore detection with `None`).
#[cfg(any(test, feature = "testing"))]
pub fn set_caps_override(caps: Option<Caps>) {
  match caps {
    Some(c) => {
      OVERRIDE_BITS.store(c.0, Ordering::Release);
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

#[inline]
fn override_caps() -> Option<Caps> {
  if OVERRIDE_SET.load(Ordering::Acquire) {
    Some(Caps(OVERRIDE_BITS.load(Ordering::Acquire)))
  } else {
    None
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Public entry
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
pub(crate) fn caps() -> Caps {
  if let Some(c) = override_caps() {
    return c;
  }
  cached()
}

#[cfg(feature = "std")]
fn cached() -> Caps {
  use std::sync::OnceLock;
  static CACHE: OnceLock<Caps> = OnceLock::new();
  *CACHE.get_or_init(detect)
}

#[cfg(not(feature = "std"))]
fn cached() -> Caps {
  detect()
}

fn detect() -> Caps {
  if cfg!(miri) {
    return Caps::NONE;
  }
  let caps = compile_time() | runtime();
  log::debug!("detected cpu capabilities on {}: {caps}", crate::Arch::current());
  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-time detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
const fn compile_time() -> Caps {
  use crate::caps::x86;

  let mut c = Caps::NONE;
  if cfg!(target_feature = "sse2") {
    c = c.union(x86::SSE2);
  }
  if cfg!(target_feature = "sse4.1") {
    c = c.union(x86::SSE41);
  }
  if cfg!(target_feature = "pclmulqdq") {
    c = c.union(x86::PCLMULQDQ);
  }
  c
}

#[cfg(target_arch = "aarch64")]
const fn compile_time() -> Caps {
  use crate::caps::aarch64;

  let mut c = Caps::NONE;
  if cfg!(target_feature = "crc") {
    c = c.union(aarch64::CRC);
  }
  c
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
const fn compile_time() -> Caps {
  Caps::NONE
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(feature = "std", target_arch = "x86_64"))]
fn runtime() -> Caps {
  use std::arch::is_x86_feature_detected;

  use crate::caps::x86;

  let mut c = Caps::NONE;
  if is_x86_feature_detected!("sse2") {
    c |= x86::SSE2;
  }
  if is_x86_feature_detected!("sse4.1") {
    c |= x86::SSE41;
  }
  if is_x86_feature_detected!("pclmulqdq") {
    c |= x86::PCLMULQDQ;
  }
  c
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime() -> Caps {
  use std::arch::is_aarch64_feature_detected;

  use crate::caps::aarch64;

  let mut c = Caps::NONE;
  if is_aarch64_feature_detected!("crc") {
    c |= aarch64::CRC;
  }
  c
}

#[cfg(not(all(feature = "std", any(target_arch = "x86_64", target_arch = "aarch64"))))]
fn runtime() -> Caps {
  Caps::NONE
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn compile_time_is_subset_of_detected() {
    let detected = compile_time() | runtime();
    assert!(detected.has(compile_time()));
  }

  #[test]
  fn detection_is_stable() {
    assert_eq!(cached(), cached());
  }

  #[cfg(target_arch = "x86_64")]
  #[test]
  fn x86_64_always_has_sse2() {
    assert!(compile_time().has(crate::caps::x86::SSE2));
  }

  #[test]
  fn override_wins_and_restores() {
    let pinned = Caps::from_raw(0b101);
    set_caps_override(Some(pinned));
    assert_eq!(caps(), pinned);
    set_caps_override(None);
    assert_eq!(caps(), cached());
  }
}
