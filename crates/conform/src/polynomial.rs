//! CRC-32 generator polynomials.
//!
//! Each polynomial is stored in both bit orders. The normal form drives the
//! MSB-first engines, the reflected (bit-reversed) form drives the LSB-first
//! ones.

/// A 32-bit generator polynomial in both bit orders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Polynomial {
  /// Normal (MSB-first) form, without the implicit `x^32` term.
  pub normal: u32,
  /// Reflected (LSB-first) form: `normal.reverse_bits()`.
  pub reflected: u32,
}

impl Polynomial {
  /// Build a polynomial from its normal form.
  #[inline]
  #[must_use]
  pub const fn from_normal(normal: u32) -> Self {
    Self {
      normal,
      reflected: normal.reverse_bits(),
    }
  }

  /// Normal form with the explicit `x^32` term (33 bits).
  #[inline]
  #[must_use]
  pub const fn full(self) -> u64 {
    (1u64 << 32) | self.normal as u64
  }

  /// Whether both stored forms are bit mirrors of each other.
  #[inline]
  #[must_use]
  pub const fn is_consistent(self) -> bool {
    self.normal.reverse_bits() == self.reflected
  }
}

/// ISO-HDLC / ITU-T V.42 CRC-32 (Ethernet, gzip, PNG, zip).
pub const CRC32_IEEE: Polynomial = Polynomial {
  normal: 0x04C1_1DB7,
  reflected: 0xEDB8_8320,
};

/// Castagnoli CRC-32C (iSCSI, SCTP, ext4, Btrfs).
pub const CRC32C: Polynomial = Polynomial {
  normal: 0x1EDC_6F41,
  reflected: 0x82F6_3B78,
};

const _: () = assert!(CRC32_IEEE.is_consistent());
const _: () = assert!(CRC32C.is_consistent());
