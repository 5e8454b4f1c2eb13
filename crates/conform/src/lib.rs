//! Table-driven CRC-32 reference engine and conformance harness.
//!
//! This crate checks accelerated CRC-32 kernels against a plain
//! table-driven reference. It covers two polynomials in two bit
//! orders:
//!
//! | Variant | Polynomial | Order | Check (`"123456789"`) |
//! |---------|------------|-------|-----------------------|
//! | `CRC-32 (refl)` | 0x04C11DB7 | LSB-first | `0xCBF43926` |
//! | `CRC-32C (refl)` | 0x1EDC6F41 | LSB-first | `0xE3069283` |
//! | `CRC-32` | 0x04C11DB7 | MSB-first | `0xFC891918` |
//! | `CRC-32C` | 0x1EDC6F41 | MSB-first | `0x05440F15` |
//!
//! # Example
//!
//! ```rust
//! use conform::harness;
//! use conform::variant::{Implementation, Registry, Variant};
//!
//! let registry = Registry::detect();
//! let reference = registry.function(Variant::Crc32c, Implementation::Reference)?;
//! assert_eq!(reference(0, b"123456789"), 0x0544_0F15);
//!
//! let buffer = harness::test_buffer(1024, 1);
//! let report = harness::run(&buffer, &registry);
//! assert!(report.passed(), "{report}");
//! # Ok::<(), conform::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`tables`]: const-fn lookup tables
//! - [`reference`]: the reference engine
//! - [`accel`]: capability-gated accelerated engines
//! - [`variant`]: variant registry
//! - [`harness`]: prefix-sweep comparison and self-test reports
//! - [`digest`]: file checksums

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![deny(unsafe_code)]

pub mod accel;
pub mod config;
pub mod digest;
mod error;
pub mod harness;
pub mod polynomial;
pub mod reference;
pub mod tables;
pub mod variant;

#[cfg(test)]
mod proptests;

pub use error::Error;

/// Signature shared by every CRC entry point: `fn(crc, data) -> crc`.
pub type CrcFn = fn(u32, &[u8]) -> u32;
