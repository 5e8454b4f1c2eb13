//! Differential fuzzing: reference vs accelerated vs the `crc` crate.
//!
//! The first input byte picks a split point so chained updates are
//! exercised too.

#![no_main]

use conform::variant::{Implementation, Registry, Variant};
use crc::{Algorithm, CRC_32_BZIP2, CRC_32_ISCSI, CRC_32_ISO_HDLC, Crc};
use libfuzzer_sys::fuzz_target;

const CRC32_REFL: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);
const CRC32C_REFL: Crc<u32> = Crc::<u32>::new(&CRC_32_ISCSI);
const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_BZIP2);
const CRC32C: Crc<u32> = Crc::<u32>::new(&CRC_32C_MSB);

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

fuzz_target!(|data: &[u8]| {
  let registry = Registry::detect();
  let split = data.first().map_or(0, |&b| b as usize % (data.len() + 1));
  let (head, tail) = data.split_at(split);

  for variant in Variant::ALL {
    let reference = variant.reference();
    let ours = reference(0, data);

    assert_eq!(
      reference(reference(0, head), tail),
      ours,
      "{variant}: chained reference mismatch, split={split}, len={}",
      data.len()
    );

    let expected = match variant {
      Variant::Crc32Refl => CRC32_REFL.checksum(data),
      Variant::Crc32cRefl => CRC32C_REFL.checksum(data),
      Variant::Crc32 => CRC32.checksum(data),
      Variant::Crc32c => CRC32C.checksum(data),
    };
    assert_eq!(ours, expected, "{variant}: reference={ours:#010x}, crc crate={expected:#010x}");

    if let Ok(accelerated) = registry.function(variant, Implementation::Accelerated) {
      let theirs = accelerated(0, data);
      assert_eq!(
        theirs, ours,
        "{variant}: accelerated={theirs:#010x}, reference={ours:#010x}, len={}",
        data.len()
      );
      assert_eq!(accelerated(accelerated(0, head), tail), ours, "{variant}: chained accelerated mismatch");
    }
  }
});
