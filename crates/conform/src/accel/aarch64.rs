//! aarch64 CRC-extension engine.
//!
//! Uses the ARMv8 `crc32*` (ISO-HDLC) and `crc32c*` (Castagnoli)
//! instructions, 8 bytes per step with a 4/2/1-byte tail. Both families
//! operate on the raw LSB-first register.
//!
//! Safety:
//! - This file is allowed to use `unsafe` for ISA-specific intrinsics.
//! - The safe wrappers are only reachable through [`super::select`], which
//!   checks [`platform::caps::aarch64::CRC_READY`] first.

#![allow(unsafe_code)]

use core::arch::aarch64::{
  __crc32b, __crc32cb, __crc32cd, __crc32ch, __crc32cw, __crc32d, __crc32h, __crc32w,
};

use platform::Caps;
use platform::caps::aarch64;

use super::{AcceleratedEngine, normal_via_reflected};

/// Raw reflected update over one instruction family.
macro_rules! hw_update {
  ($name:ident, $d:ident, $w:ident, $h:ident, $b:ident) => {
    /// # Safety
    /// Caller must ensure the CPU supports the `crc` target feature.
    #[target_feature(enable = "crc")]
    unsafe fn $name(mut crc: u32, data: &[u8]) -> u32 {
      let (words, rest) = data.as_chunks::<8>();
      for w in words {
        crc = $d(crc, u64::from_le_bytes(*w));
      }
      let (quads, rest) = rest.as_chunks::<4>();
      if let [q] = quads {
        crc = $w(crc, u32::from_le_bytes(*q));
      }
      let (pairs, rest) = rest.as_chunks::<2>();
      if let [p] = pairs {
        crc = $h(crc, u16::from_le_bytes(*p));
      }
      if let [byte] = rest {
        crc = $b(crc, *byte);
      }
      crc
    }
  };
}

hw_update!(crc32_update, __crc32d, __crc32w, __crc32h, __crc32b);
hw_update!(crc32c_update, __crc32cd, __crc32cw, __crc32ch, __crc32cb);

fn crc32_raw(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only reachable after `select` checked CRC_READY.
  unsafe { crc32_update(crc, data) }
}

fn crc32c_raw(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only reachable after `select` checked CRC_READY.
  unsafe { crc32c_update(crc, data) }
}

/// ARMv8 CRC-extension engine.
pub struct HwCrc;

impl AcceleratedEngine for HwCrc {
  const NAME: &'static str = "aarch64/crc";
  const REQUIRES: Caps = aarch64::CRC_READY;

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
