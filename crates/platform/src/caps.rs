//! CPU capability representation.
//!
//! [`Caps`] answers the question "which instructions may the CRC engines
//! legally run on this machine?". It is a 64-bit bitset: bits 0-31 hold
//! x86_64 features, bits 32-63 hold aarch64 features. The bits are
//! architecture-specific but the API is uniform across targets.
//!
//! # Usage
//!
//! ```
//! use platform::caps::{Caps, x86};
//!
//! let c = platform::caps();
//! if c.has(x86::PCLMUL_READY) {
//!   // Carry-less multiply folding is allowed.
//! }
//! assert!(c.has(Caps::NONE));
//! ```

use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 64-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`, and is freely shared across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) u64);

impl Caps {
  /// Empty capability set (portable code only).
  pub const NONE: Self = Self(0);

  /// Create a capability set from a raw word.
  ///
  /// Intended for tests; normal code should combine the predefined constants.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(word: u64) -> Self {
    Self(word)
  }

  /// The raw underlying word.
  #[inline]
  #[must_use]
  pub const fn bits(self) -> u64 {
    self.0
  }

  /// Single-bit capability.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    Self(1u64 << (bit % 64))
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0 & required.0) == required.0
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0 == 0
  }

  /// Names of the known features present in this set, lowest bit first.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    FEATURE_NAMES
      .iter()
      .filter(move |(cap, _)| self.has(*cap))
      .map(|(_, name)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl fmt::Debug for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}

impl fmt::Display for Caps {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.is_empty() {
      return f.write_str("none");
    }
    let mut first = true;
    for name in self.names() {
      if !first {
        f.write_str(",")?;
      }
      f.write_str(name)?;
      first = false;
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Architecture Identification
// ─────────────────────────────────────────────────────────────────────────────

/// Target architecture family.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Arch {
  X86_64,
  Aarch64,
  #[default]
  Other,
}

impl Arch {
  /// The architecture this binary was compiled for.
  #[inline]
  #[must_use]
  pub const fn current() -> Self {
    #[cfg(target_arch = "x86_64")]
    {
      Self::X86_64
    }
    #[cfg(target_arch = "aarch64")]
    {
      Self::Aarch64
    }
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
      Self::Other
    }
  }

  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::X86_64 => "x86_64",
      Self::Aarch64 => "aarch64",
      Self::Other => "other",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86_64 Features (bits 0-31)
// ─────────────────────────────────────────────────────────────────────────────

pub mod x86 {
  use super::Caps;

  pub const SSE2: Caps = Caps::bit(0);
  pub const SSE41: Caps = Caps::bit(1);
  pub const PCLMULQDQ: Caps = Caps::bit(2);

  /// Everything the 128-bit carry-less folding kernels touch.
  ///
  /// `_mm_extract_epi32` is SSE4.1, the multiplies are PCLMULQDQ.
  pub const PCLMUL_READY: Caps = Caps(PCLMULQDQ.0 | SSE41.0 | SSE2.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 32-63)
// ─────────────────────────────────────────────────────────────────────────────

pub mod aarch64 {
  use super::Caps;

  pub const CRC: Caps = Caps::bit(32);

  /// ARMv8 CRC extension (`crc32*` and `crc32c*`).
  pub const CRC_READY: Caps = CRC;
}

/// Only features some engine requires are tracked.
const FEATURE_NAMES: [(Caps, &str); 4] = [
  (x86::SSE2, "sse2"),
  (x86::SSE41, "sse4.1"),
  (x86::PCLMULQDQ, "pclmulqdq"),
  (aarch64::CRC, "crc"),
];
