//! Conformance harness behavior with injected faults.

use conform::accel::{Kernels, Selected};
use conform::harness::{self, check};
use conform::reference;
use conform::variant::{Registry, Variant};

/// Correct up to 4999 bytes, wrong from 5000 on.
fn broken_from_5000(crc: u32, data: &[u8]) -> u32 {
  let out = reference::crc32(crc, data);
  if data.len() >= 5000 { out.rotate_left(1) } else { out }
}

/// Wrong at exactly one length.
fn broken_at_777(crc: u32, data: &[u8]) -> u32 {
  let out = reference::crc32c_refl(crc, data);
  if data.len() == 777 { !out } else { out }
}

fn reference_kernels() -> Kernels {
  Kernels {
    crc32_refl: reference::crc32_refl,
    crc32c_refl: reference::crc32c_refl,
    crc32: reference::crc32,
    crc32c: reference::crc32c,
  }
}

#[test]
fn identical_functions_report_none() {
  let buf = harness::test_buffer(4096, 0xC0FFEE);
  assert_eq!(check(&buf, reference::crc32_refl, reference::crc32_refl), None);
}

#[test]
fn scan_reports_the_full_length_first() {
  let buf = harness::test_buffer(16384, 1);
  assert_eq!(check(&buf, reference::crc32, broken_from_5000), Some(16384));
}

#[test]
fn scan_reports_the_injected_length() {
  let buf = harness::test_buffer(2000, 2);
  assert_eq!(check(&buf, reference::crc32c_refl, broken_at_777), Some(777));
  assert_eq!(check(&buf[..776], reference::crc32c_refl, broken_at_777), None);
}

#[test]
fn reference_kernels_pass_full_self_test() {
  let buf = harness::test_buffer(3000, 3);
  let registry = Registry::new(Some(Selected {
    name: "test/reference",
    func: reference_kernels(),
  }));
  let report = harness::run(&buf, &registry);
  assert!(report.passed(), "{report}");
  assert_eq!(report.outcomes.len(), 4);
  assert_eq!(
    report.to_string(),
    "Testing test/reference: CRC-32 (refl), CRC-32C (refl), CRC-32, CRC-32C."
  );
}

#[test]
fn faulty_kernel_fails_only_its_variant() {
  let buf = harness::test_buffer(1500, 4);
  let mut kernels = reference_kernels();
  kernels.crc32c_refl = broken_at_777;
  let registry = Registry::new(Some(Selected {
    name: "test/faulty",
    func: kernels,
  }));

  let report = harness::run(&buf, &registry);
  assert!(!report.passed());
  let divergences: Vec<_> = report.outcomes.iter().map(|o| (o.variant, o.divergence)).collect();
  assert_eq!(
    divergences,
    [
      (Variant::Crc32Refl, None),
      (Variant::Crc32cRefl, Some(777)),
      (Variant::Crc32, None),
      (Variant::Crc32c, None),
    ]
  );
  assert!(report.to_string().contains("CRC-32C (refl) (failed at 777)"));
}

#[test]
fn parallel_run_matches_sequential() {
  let buf = harness::test_buffer(2500, 5);
  let mut kernels = reference_kernels();
  kernels.crc32 = broken_from_5000;
  kernels.crc32c = broken_at_777;
  let registry = Registry::new(Some(Selected {
    name: "test/mixed",
    func: kernels,
  }));
  assert_eq!(harness::run_parallel(&buf, &registry), harness::run(&buf, &registry));
}

#[test]
fn wrong_check_value_fails_the_run() {
  fn constant(_: u32, _: &[u8]) -> u32 {
    0
  }
  let buf = harness::test_buffer(64, 6);
  let mut kernels = reference_kernels();
  kernels.crc32 = constant;
  let registry = Registry::new(Some(Selected {
    name: "test/constant",
    func: kernels,
  }));
  let report = harness::run(&buf, &registry);
  assert!(!report.passed());
  assert_eq!(report.known_vector_failures.len(), 1);
  assert_eq!(report.known_vector_failures[0].variant, Variant::Crc32);
}

#[test]
fn detected_engine_passes_self_test() {
  let buf = harness::test_buffer(4096, 0x5EED);
  let report = harness::run(&buf, &Registry::detect());
  assert!(report.passed(), "{report}");
}
