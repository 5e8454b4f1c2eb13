//! Const-fn CRC-32 lookup table generation.
//!
//! A [`LookupTable`] holds, for every byte value `i`, the remainder
//! contribution of processing `i` in isolation under one (polynomial, bit
//! order) pair. The four tables used by the reference engine are computed at
//! compile time and live in the binary as read-only statics, so they are
//! shared freely across threads.
//!
//! # Table Layout
//!
//! | Table | Polynomial | Order | `table[1]` |
//! |-------|------------|-------|------------|
//! | [`REFLECTED_CRC32`] | 0xEDB88320 | LSB-first | 0x77073096 |
//! | [`REFLECTED_CRC32C`] | 0x82F63B78 | LSB-first | 0xF26B8303 |
//! | [`NORMAL_CRC32`] | 0x04C11DB7 | MSB-first | 0x04C11DB7 |
//! | [`NORMAL_CRC32C`] | 0x1EDC6F41 | MSB-first | 0x1EDC6F41 |

// SAFETY: All array indexing in this module uses bounded loop indices (0..256, 0..8)
// or `u8` values into 256-entry tables.
#![allow(clippy::indexing_slicing)]

use crate::polynomial::{CRC32_IEEE, CRC32C};

/// Bit processing order of a CRC engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitOrder {
  /// LSB-first: the register shifts right, input bytes enter at the low end.
  Reflected,
  /// MSB-first: the register shifts left, input bytes enter at the top byte.
  Normal,
}

/// 256-entry CRC-32 lookup table, indexed by one input byte.
#[derive(Clone, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct LookupTable([u32; 256]);

impl LookupTable {
  /// Table entry for byte value `index`.
  #[inline(always)]
  #[must_use]
  pub const fn get(&self, index: u8) -> u32 {
    self.0[index as usize]
  }

  /// All 256 entries.
  #[inline]
  #[must_use]
  pub const fn entries(&self) -> &[u32; 256] {
    &self.0
  }
}

impl core::fmt::Debug for LookupTable {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    write!(f, "LookupTable([{:#010x}, {:#010x}, ..])", self.0[0], self.0[1])
  }
}

/// Remainder of byte value `index` after 8 shift steps.
#[must_use]
pub const fn table_entry(poly: u32, order: BitOrder, index: u8) -> u32 {
  let mut crc = match order {
    BitOrder::Reflected => index as u32,
    BitOrder::Normal => (index as u32) << 24,
  };

  let mut bit = 0;
  while bit < 8 {
    crc = match order {
      BitOrder::Reflected => {
        if crc & 1 != 0 {
          (crc >> 1) ^ poly
        } else {
          crc >> 1
        }
      }
      BitOrder::Normal => {
        if crc & 0x8000_0000 != 0 {
          (crc << 1) ^ poly
        } else {
          crc << 1
        }
      }
    };
    bit += 1;
  }

  crc
}

/// Build the lookup table for one (polynomial, bit order) pair.
///
/// `poly` must already be in the form matching `order`: reflected for
/// [`BitOrder::Reflected`], normal for [`BitOrder::Normal`].
#[must_use]
pub const fn generate_table(poly: u32, order: BitOrder) -> LookupTable {
  let mut table = [0u32; 256];
  let mut i = 0usize;
  while i < 256 {
    table[i] = table_entry(poly, order, i as u8);
    i += 1;
  }
  LookupTable(table)
}

/// Generate slice-by-8 tables for a reflected polynomial.
///
/// Table 0 is the plain byte table; table `k` holds the contribution of a
/// byte that sits `k` positions earlier in the stream.
#[must_use]
pub const fn generate_slicing_tables(reflected_poly: u32) -> [[u32; 256]; 8] {
  let base = generate_table(reflected_poly, BitOrder::Reflected);
  let mut tables = [[0u32; 256]; 8];

  let mut i = 0;
  while i < 256 {
    tables[0][i] = base.0[i];
    i += 1;
  }

  let mut k = 1;
  while k < 8 {
    let mut i = 0;
    while i < 256 {
      let prev = tables[k - 1][i];
      tables[k][i] = (prev >> 8) ^ base.0[(prev & 0xFF) as usize];
      i += 1;
    }
    k += 1;
  }

  tables
}

/// CRC-32 (ISO-HDLC), LSB-first.
pub static REFLECTED_CRC32: LookupTable = generate_table(CRC32_IEEE.reflected, BitOrder::Reflected);

/// CRC-32C (Castagnoli), LSB-first.
pub static REFLECTED_CRC32C: LookupTable = generate_table(CRC32C.reflected, BitOrder::Reflected);

/// CRC-32 (ISO-HDLC), MSB-first.
pub static NORMAL_CRC32: LookupTable = generate_table(CRC32_IEEE.normal, BitOrder::Normal);

/// CRC-32C (Castagnoli), MSB-first.
pub static NORMAL_CRC32C: LookupTable = generate_table(CRC32C.normal, BitOrder::Normal);
