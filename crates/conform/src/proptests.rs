use crc::{Algorithm, CRC_32_BZIP2, CRC_32_ISCSI, CRC_32_ISO_HDLC, Crc};
use proptest::prelude::*;

use crate::variant::Variant;
use crate::{accel, reference};

/// CRC-32C, MSB-first, complemented in and out. Not in the catalogue.
const CRC_32C_MSB: Algorithm<u32> = Algorithm {
  width: 32,
  poly: 0x1EDC_6F41,
  init: 0xFFFF_FFFF,
  refin: false,
  refout: false,
  xorout: 0xFFFF_FFFF,
  check: 0x0544_0F15,
  residue: 0x1C2D_19ED,
};

static ORACLE_CRC32_REFL: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
static ORACLE_CRC32C_REFL: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);
static ORACLE_CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_BZIP2);
static ORACLE_CRC32C: Crc<u32> = Crc::<u32>::new(&CRC_32C_MSB);

fn oracle(variant: Variant) -> &'static Crc<u32> {
  match variant {
    Variant::Crc32Refl => &ORACLE_CRC32_REFL,
    Variant::Crc32cRefl => &ORACLE_CRC32C_REFL,
    Variant::Crc32 => &ORACLE_CRC32,
    Variant::Crc32c => &ORACLE_CRC32C,
  }
}

fn any_variant() -> impl Strategy<Value = Variant> {
  prop::sample::select(Variant::ALL.to_vec())
}

proptest! {
  #[test]
  fn reference_matches_crc_crate(variant in any_variant(), data in proptest::collection::vec(any::<u8>(), 0..=4096)) {
    prop_assert_eq!((variant.reference())(0, &data), oracle(variant).checksum(&data));
  }

  #[test]
  fn reference_streaming_matches_crc_crate(
    variant in any_variant(),
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    chunk in 1usize..=257
  ) {
    let f = variant.reference();
    let mut digest = oracle(variant).digest();
    let mut ours = 0;
    for part in data.chunks(chunk) {
      ours = f(ours, part);
      digest.update(part);
    }
    prop_assert_eq!(ours, digest.finalize());
  }

  #[test]
  fn reference_split_composes(data in proptest::collection::vec(any::<u8>(), 0..=2048), split in any::<prop::sample::Index>()) {
    let at = split.index(data.len() + 1);
    let (a, b) = data.split_at(at);
    for f in [reference::crc32_refl, reference::crc32c_refl, reference::crc32, reference::crc32c] {
      prop_assert_eq!(f(f(0, a), b), f(0, &data));
    }
  }

  #[test]
  fn accelerated_matches_reference(
    variant in any_variant(),
    data in proptest::collection::vec(any::<u8>(), 0..=4096),
    seed in any::<u32>()
  ) {
    if let Some(engine) = accel::detect() {
      let accelerated = variant.accelerated(&engine.func);
      prop_assert_eq!(accelerated(seed, &data), (variant.reference())(seed, &data));
    }
  }

  #[test]
  fn accelerated_unaligned_suffixes(data in proptest::collection::vec(any::<u8>(), 64..=1024), offset in 0usize..64) {
    if let Some(engine) = accel::detect() {
      let tail = &data[offset..];
      for variant in Variant::ALL {
        prop_assert_eq!(variant.accelerated(&engine.func)(0, tail), (variant.reference())(0, tail));
      }
    }
  }
}
