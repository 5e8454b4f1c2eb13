//! Slice-by-8 tail for the accelerated engines.
//!
//! Handles inputs too short for a vector fold and the bytes left over after
//! one. Works on the raw (already complemented) LSB-first register.

// SAFETY: All indexing is `u8`-derived into 256-entry tables, or constant
// indices into fixed 8-element arrays.
#![allow(clippy::indexing_slicing)]

use crate::polynomial::{CRC32_IEEE, CRC32C};
use crate::tables::generate_slicing_tables;

static CRC32_SLICE8: [[u32; 256]; 8] = generate_slicing_tables(CRC32_IEEE.reflected);
static CRC32C_SLICE8: [[u32; 256]; 8] = generate_slicing_tables(CRC32C.reflected);

#[inline]
fn slice8(mut crc: u32, data: &[u8], t: &[[u32; 256]; 8]) -> u32 {
  let (chunks, rest) = data.as_chunks::<8>();
  for chunk in chunks {
    let a = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ crc;
    let b = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);
    crc = t[7][(a & 0xFF) as usize]
      ^ t[6][((a >> 8) & 0xFF) as usize]
      ^ t[5][((a >> 16) & 0xFF) as usize]
      ^ t[4][(a >> 24) as usize]
      ^ t[3][(b & 0xFF) as usize]
      ^ t[2][((b >> 8) & 0xFF) as usize]
      ^ t[1][((b >> 16) & 0xFF) as usize]
      ^ t[0][(b >> 24) as usize];
  }
  for &byte in rest {
    crc = t[0][((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
  }
  crc
}

/// Raw reflected CRC-32 update.
#[inline]
pub(crate) fn crc32_raw(crc: u32, data: &[u8]) -> u32 {
  slice8(crc, data, &CRC32_SLICE8)
}

/// Raw reflected CRC-32C update.
#[inline]
pub(crate) fn crc32c_raw(crc: u32, data: &[u8]) -> u32 {
  slice8(crc, data, &CRC32C_SLICE8)
}
