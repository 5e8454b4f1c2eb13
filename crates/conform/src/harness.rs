//! Conformance harness: reference vs accelerated, at every prefix length.
//!
//! [`check`] is the core comparison. [`run`] and [`run_parallel`] apply it to
//! every registered variant and add two cheaper sanity passes: the published
//! check values, and chunked-versus-whole composability.

use core::fmt;
use std::thread;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::CrcFn;
use crate::variant::{Implementation, Registry, Variant};

/// Input of the published check values.
pub const CHECK_INPUT: &[u8] = b"123456789";

/// Chunk lengths used for the composability pass.
const CHAIN_CHUNKS: [usize; 3] = [1, 61, 4096];

/// Deterministic pseudo-random test buffer.
#[must_use]
pub fn test_buffer(len: usize, seed: u64) -> Vec<u8> {
  let mut buf = vec![0u8; len];
  StdRng::seed_from_u64(seed).fill_bytes(&mut buf);
  buf
}

/// Compare `reference` and `accelerated` on every prefix of `buffer`.
///
/// Lengths are scanned from `buffer.len()` down to 0, each from a zero
/// accumulator. Returns the first (longest) length where the results differ.
#[must_use]
pub fn check(buffer: &[u8], reference: CrcFn, accelerated: CrcFn) -> Option<usize> {
  (0..=buffer.len()).rev().find(|&len| {
    let (prefix, _) = buffer.split_at(len);
    reference(0, prefix) != accelerated(0, prefix)
  })
}

/// Whether `f` over `buffer` equals `f` threaded through `chunk_len`-byte
/// pieces. A `chunk_len` of 0 is treated as 1.
#[must_use]
pub fn check_chained(buffer: &[u8], f: CrcFn, chunk_len: usize) -> bool {
  let whole = f(0, buffer);
  let chained = buffer.chunks(chunk_len.max(1)).fold(0, |crc, chunk| f(crc, chunk));
  whole == chained
}

// ─────────────────────────────────────────────────────────────────────────────
// Reports
// ─────────────────────────────────────────────────────────────────────────────

/// Result of the prefix sweep for one variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantOutcome {
  pub variant: Variant,
  /// Longest prefix length with differing results, if any.
  pub divergence: Option<usize>,
}

/// A single implementation that failed a sanity pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Failure {
  pub variant: Variant,
  pub implementation: Implementation,
}

/// Everything one self-test run found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelfTestReport {
  /// Accelerated engine under test; `None` skips the sweep.
  pub engine: Option<&'static str>,
  /// Prefix sweep results, in registry order.
  pub outcomes: Vec<VariantOutcome>,
  /// Implementations that missed their check value.
  pub known_vector_failures: Vec<Failure>,
  /// Implementations whose chunked result differed from the one-shot result.
  pub chain_failures: Vec<Failure>,
}

impl SelfTestReport {
  #[must_use]
  pub fn passed(&self) -> bool {
    self.known_vector_failures.is_empty()
      && self.chain_failures.is_empty()
      && self.outcomes.iter().all(|o| o.divergence.is_none())
  }
}

impl fmt::Display for SelfTestReport {
  /// `Testing <engine>: <name>[ (failed at N)], ... .`, followed by one
  /// line per sanity-pass failure.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.engine {
      Some(engine) => {
        write!(f, "Testing {engine}: ")?;
        for (i, outcome) in self.outcomes.iter().enumerate() {
          if i > 0 {
            f.write_str(", ")?;
          }
          f.write_str(outcome.variant.name())?;
          if let Some(len) = outcome.divergence {
            write!(f, " (failed at {len})")?;
          }
        }
        f.write_str(".")?;
      }
      None => f.write_str("Accelerated CRC engine is not available.")?,
    }
    for failure in &self.known_vector_failures {
      write!(
        f,
        "\nCheck value mismatch: {} ({:?})",
        failure.variant, failure.implementation
      )?;
    }
    for failure in &self.chain_failures {
      write!(
        f,
        "\nChunked result mismatch: {} ({:?})",
        failure.variant, failure.implementation
      )?;
    }
    Ok(())
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Runs
// ─────────────────────────────────────────────────────────────────────────────

/// Implementations the registry can run, reference first.
fn implementations(registry: &Registry, variant: Variant) -> Vec<(Implementation, CrcFn)> {
  [Implementation::Reference, Implementation::Accelerated]
    .into_iter()
    .filter_map(|imp| registry.function(variant, imp).ok().map(|f| (imp, f)))
    .collect()
}

fn known_vector_failures(registry: &Registry) -> Vec<Failure> {
  let mut failures = Vec::new();
  for variant in Variant::ALL {
    for (implementation, f) in implementations(registry, variant) {
      let got = f(0, CHECK_INPUT);
      if got != variant.check_value() {
        log::warn!(
          "{variant} ({implementation:?}): check value {got:#010x}, expected {:#010x}",
          variant.check_value()
        );
        failures.push(Failure { variant, implementation });
      }
    }
  }
  failures
}

fn chain_failures(buffer: &[u8], registry: &Registry) -> Vec<Failure> {
  let mut failures = Vec::new();
  for variant in Variant::ALL {
    for (implementation, f) in implementations(registry, variant) {
      if let Some(&chunk) = CHAIN_CHUNKS.iter().find(|&&chunk| !check_chained(buffer, f, chunk)) {
        log::warn!("{variant} ({implementation:?}): chunked result differs at chunk length {chunk}");
        failures.push(Failure { variant, implementation });
      }
    }
  }
  failures
}

fn sweep(buffer: &[u8], registry: &Registry, variant: Variant) -> Option<VariantOutcome> {
  let reference = registry.function(variant, Implementation::Reference).ok()?;
  let accelerated = registry.function(variant, Implementation::Accelerated).ok()?;
  let divergence = check(buffer, reference, accelerated);
  match divergence {
    Some(len) => log::warn!("{variant}: accelerated result diverges at length {len}"),
    None => log::info!("{variant}: {} prefixes match", buffer.len() + 1),
  }
  Some(VariantOutcome { variant, divergence })
}

fn report(buffer: &[u8], registry: &Registry, outcomes: Vec<VariantOutcome>) -> SelfTestReport {
  SelfTestReport {
    engine: registry.engine_name(),
    outcomes,
    known_vector_failures: known_vector_failures(registry),
    chain_failures: chain_failures(buffer, registry),
  }
}

/// Run every variant's sweep in registry order on the calling thread.
#[must_use]
pub fn run(buffer: &[u8], registry: &Registry) -> SelfTestReport {
  let outcomes = Variant::ALL
    .into_iter()
    .filter_map(|variant| sweep(buffer, registry, variant))
    .collect();
  report(buffer, registry, outcomes)
}

/// Like [`run`], with one scoped thread per variant.
#[must_use]
pub fn run_parallel(buffer: &[u8], registry: &Registry) -> SelfTestReport {
  let outcomes: Vec<VariantOutcome> = thread::scope(|scope| {
    let handles: Vec<_> = Variant::ALL
      .into_iter()
      .map(|variant| scope.spawn(move || sweep(buffer, registry, variant)))
      .collect();
    handles
      .into_iter()
      .filter_map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
      .collect()
  });
  report(buffer, registry, outcomes)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reference;

  #[test]
  fn buffer_is_seeded() {
    assert_eq!(test_buffer(256, 7), test_buffer(256, 7));
    assert_ne!(test_buffer(256, 7), test_buffer(256, 8));
    assert_eq!(test_buffer(0, 1).len(), 0);
  }

  #[test]
  fn identical_functions_never_diverge() {
    let buf = test_buffer(512, 1);
    for v in Variant::ALL {
      assert_eq!(check(&buf, v.reference(), v.reference()), None);
    }
  }

  #[test]
  fn empty_buffer_compares_only_length_zero() {
    fn one(_: u32, _: &[u8]) -> u32 {
      1
    }
    assert_eq!(check(&[], reference::crc32, reference::crc32), None);
    assert_eq!(check(&[], reference::crc32, one), Some(0));
  }

  #[test]
  fn reports_longest_diverging_length() {
    fn broken_above_100(crc: u32, data: &[u8]) -> u32 {
      let out = reference::crc32c_refl(crc, data);
      if data.len() > 100 { out ^ 1 } else { out }
    }
    let buf = test_buffer(300, 3);
    assert_eq!(check(&buf, reference::crc32c_refl, broken_above_100), Some(300));
    assert_eq!(check(&buf[..101], reference::crc32c_refl, broken_above_100), Some(101));
    assert_eq!(check(&buf[..100], reference::crc32c_refl, broken_above_100), None);
  }

  #[test]
  fn chained_reference_is_composable() {
    let buf = test_buffer(1000, 9);
    for v in Variant::ALL {
      for chunk in [0, 1, 3, 64, 999, 1000, 5000] {
        assert!(check_chained(&buf, v.reference(), chunk), "{v} chunk {chunk}");
      }
    }
  }

  #[test]
  fn chained_detects_stateless_function() {
    fn ignores_accumulator(_: u32, data: &[u8]) -> u32 {
      reference::crc32(0, data)
    }
    let buf = test_buffer(100, 4);
    assert!(!check_chained(&buf, ignores_accumulator, 10));
  }

  #[test]
  fn reference_only_run_passes_without_sweep() {
    let buf = test_buffer(2048, 5);
    let report = run(&buf, &Registry::reference_only());
    assert!(report.passed());
    assert!(report.outcomes.is_empty());
    assert_eq!(report.to_string(), "Accelerated CRC engine is not available.");
  }

  #[test]
  fn display_lists_variants_in_order() {
    let report = SelfTestReport {
      engine: Some("x86_64/pclmul"),
      outcomes: vec![
        VariantOutcome { variant: Variant::Crc32Refl, divergence: None },
        VariantOutcome { variant: Variant::Crc32cRefl, divergence: Some(17) },
        VariantOutcome { variant: Variant::Crc32, divergence: None },
        VariantOutcome { variant: Variant::Crc32c, divergence: None },
      ],
      known_vector_failures: Vec::new(),
      chain_failures: Vec::new(),
    };
    assert!(!report.passed());
    assert_eq!(
      report.to_string(),
      "Testing x86_64/pclmul: CRC-32 (refl), CRC-32C (refl) (failed at 17), CRC-32, CRC-32C."
    );
  }
}
