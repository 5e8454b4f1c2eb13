//! Variant registry: the four CRC-32 variants and their implementations.

use core::fmt;
use core::str::FromStr;

use crate::accel::{self, Kernels, Selected};
use crate::error::Error;
use crate::{CrcFn, reference};

/// One (polynomial, bit order) combination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Variant {
  /// CRC-32, LSB-first.
  Crc32Refl,
  /// CRC-32C, LSB-first.
  Crc32cRefl,
  /// CRC-32, MSB-first.
  Crc32,
  /// CRC-32C, MSB-first.
  Crc32c,
}

impl Variant {
  /// All variants in registry order.
  pub const ALL: [Self; 4] = [Self::Crc32Refl, Self::Crc32cRefl, Self::Crc32, Self::Crc32c];

  /// Display name, also accepted by [`FromStr`].
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Crc32Refl => "CRC-32 (refl)",
      Self::Crc32cRefl => "CRC-32C (refl)",
      Self::Crc32 => "CRC-32",
      Self::Crc32c => "CRC-32C",
    }
  }

  /// Table-driven reference function.
  #[must_use]
  pub const fn reference(self) -> CrcFn {
    match self {
      Self::Crc32Refl => reference::crc32_refl,
      Self::Crc32cRefl => reference::crc32c_refl,
      Self::Crc32 => reference::crc32,
      Self::Crc32c => reference::crc32c,
    }
  }

  /// Function of this variant in an accelerated kernel table.
  #[must_use]
  pub const fn accelerated(self, kernels: &Kernels) -> CrcFn {
    match self {
      Self::Crc32Refl => kernels.crc32_refl,
      Self::Crc32cRefl => kernels.crc32c_refl,
      Self::Crc32 => kernels.crc32,
      Self::Crc32c => kernels.crc32c,
    }
  }

  /// CRC of `"123456789"` from a zero accumulator.
  #[must_use]
  pub const fn check_value(self) -> u32 {
    match self {
      Self::Crc32Refl => 0xCBF4_3926,
      Self::Crc32cRefl => 0xE306_9283,
      Self::Crc32 => 0xFC89_1918,
      Self::Crc32c => 0x0544_0F15,
    }
  }
}

impl fmt::Display for Variant {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

impl FromStr for Variant {
  type Err = Error;

  /// Exact, case-sensitive name match.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::ALL
      .into_iter()
      .find(|v| v.name() == s)
      .ok_or_else(|| Error::UnknownVariant(s.to_owned()))
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Implementation selector
// ─────────────────────────────────────────────────────────────────────────────

/// Which of a variant's two implementations to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Implementation {
  Reference = 0,
  Accelerated = 1,
}

impl Implementation {
  #[must_use]
  pub const fn index(self) -> u64 {
    self as u64
  }
}

impl TryFrom<u64> for Implementation {
  type Error = Error;

  fn try_from(index: u64) -> Result<Self, Self::Error> {
    match index {
      0 => Ok(Self::Reference),
      1 => Ok(Self::Accelerated),
      n => Err(Error::ImplementationOutOfRange(n)),
    }
  }
}

impl FromStr for Implementation {
  type Err = Error;

  /// Parse an index the way C `strtoul(s, &end, 0)` does, rejecting
  /// trailing characters.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    parse_index(s).and_then(Self::try_from)
  }
}

/// `strtoul` with base 0: optional sign, then `0x`/`0X` hexadecimal, a
/// leading `0` for octal, or decimal. Negative values wrap like C does.
fn parse_index(raw: &str) -> Result<u64, Error> {
  let malformed = || Error::MalformedIndex(raw.to_owned());

  let s = raw.trim_start();
  let (negative, s) = match s.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, s.strip_prefix('+').unwrap_or(s)),
  };

  let (digits, radix) = if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
    (hex, 16)
  } else if let Some(oct) = s.strip_prefix('0').filter(|rest| !rest.is_empty()) {
    (oct, 8)
  } else {
    (s, 10)
  };

  if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
    return Err(malformed());
  }
  // Overflow sets ERANGE in C; treat it like any other unusable input.
  let magnitude = u64::from_str_radix(digits, radix).map_err(|_| malformed())?;
  Ok(if negative { magnitude.wrapping_neg() } else { magnitude })
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

/// Maps (variant, implementation) to a function, given the engine (if any)
/// selected for this process.
#[derive(Clone, Copy, Debug)]
pub struct Registry {
  engine: Option<Selected<Kernels>>,
}

impl Registry {
  /// Registry over an explicit engine choice.
  #[must_use]
  pub const fn new(engine: Option<Selected<Kernels>>) -> Self {
    Self { engine }
  }

  /// Registry over the engine detected for this CPU and configuration.
  #[must_use]
  pub fn detect() -> Self {
    Self::new(accel::detect())
  }

  /// Registry without any accelerated engine.
  #[must_use]
  pub const fn reference_only() -> Self {
    Self::new(None)
  }

  /// Name of the accelerated engine, if one is available.
  #[must_use]
  pub fn engine_name(&self) -> Option<&'static str> {
    self.engine.map(|e| e.name)
  }

  #[must_use]
  pub const fn has_accelerated(&self) -> bool {
    self.engine.is_some()
  }

  /// Function for `variant` under `implementation`.
  ///
  /// # Errors
  ///
  /// [`Error::AcceleratedUnavailable`] when the accelerated implementation
  /// is requested without an engine.
  pub fn function(&self, variant: Variant, implementation: Implementation) -> Result<CrcFn, Error> {
    match implementation {
      Implementation::Reference => Ok(variant.reference()),
      Implementation::Accelerated => self
        .engine
        .as_ref()
        .map(|e| variant.accelerated(&e.func))
        .ok_or(Error::AcceleratedUnavailable),
    }
  }
}
