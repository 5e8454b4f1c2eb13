//! Reference CRC-32 engine: one table lookup per input byte.
//!
//! This is the scalar baseline every accelerated engine is measured against.
//! It is the simplest correct formulation; speed is not a goal.
//!
//! # Accumulator conventions
//!
//! The two bit orders complement at different places, and the public values
//! depend on it:
//!
//! - Reflected: [`compute`] complements the accumulator on entry and on exit.
//! - Normal: [`compute`] applies no complement; the public [`crc32`] and
//!   [`crc32c`] wrappers complement around the raw core.
//!
//! Either way every public entry point composes incrementally:
//!
//! ```
//! use conform::reference::crc32c_refl;
//!
//! let whole = crc32c_refl(0, b"123456789");
//! let split = crc32c_refl(crc32c_refl(0, b"1234"), b"56789");
//! assert_eq!(whole, split);
//! assert_eq!(whole, 0xE306_9283);
//! ```

use crate::tables::{BitOrder, LookupTable, NORMAL_CRC32, NORMAL_CRC32C, REFLECTED_CRC32, REFLECTED_CRC32C};

/// Update a raw LSB-first register, one byte at a time.
#[inline]
#[must_use]
pub fn update_reflected(mut crc: u32, data: &[u8], table: &LookupTable) -> u32 {
  for &b in data {
    crc = table.get((crc ^ b as u32) as u8) ^ (crc >> 8);
  }
  crc
}

/// Update a raw MSB-first register, one byte at a time.
#[inline]
#[must_use]
pub fn update_normal(mut crc: u32, data: &[u8], table: &LookupTable) -> u32 {
  for &b in data {
    crc = table.get((crc >> 24) as u8 ^ b) ^ (crc << 8);
  }
  crc
}

/// Table-driven CRC-32 over `data` in the given bit order.
///
/// Reflected mode complements the accumulator around the update; normal mode
/// leaves complementing to the caller.
#[inline]
#[must_use]
pub fn compute(crc: u32, data: &[u8], table: &LookupTable, order: BitOrder) -> u32 {
  match order {
    BitOrder::Reflected => !update_reflected(!crc, data, table),
    BitOrder::Normal => update_normal(crc, data, table),
  }
}

/// CRC-32 (ISO-HDLC), reflected. Check value `0xCBF43926`.
#[must_use]
pub fn crc32_refl(crc: u32, data: &[u8]) -> u32 {
  compute(crc, data, &REFLECTED_CRC32, BitOrder::Reflected)
}

/// CRC-32C (Castagnoli), reflected. Check value `0xE3069283`.
#[must_use]
pub fn crc32c_refl(crc: u32, data: &[u8]) -> u32 {
  compute(crc, data, &REFLECTED_CRC32C, BitOrder::Reflected)
}

/// CRC-32 (ISO-HDLC polynomial), non-reflected, complemented in and out.
///
/// This is the CRC-32/BZIP2 parameter set; check value `0xFC891918`.
#[must_use]
pub fn crc32(crc: u32, data: &[u8]) -> u32 {
  !compute(!crc, data, &NORMAL_CRC32, BitOrder::Normal)
}

/// CRC-32C (Castagnoli polynomial), non-reflected, complemented in and out.
///
/// Check value `0x05440F15`.
#[must_use]
pub fn crc32c(crc: u32, data: &[u8]) -> u32 {
  !compute(!crc, data, &NORMAL_CRC32C, BitOrder::Normal)
}
