//! CPU capability detection for the CRC-32 conformance tools.
//!
//! This crate is the single source of truth for "may this process execute
//! the accelerated CRC kernels?". Algorithm code asks [`caps()`] and checks
//! the result against the `*_READY` sets in [`caps::x86`] and
//! [`caps::aarch64`]; it never runs its own CPUID probing.
//!
//! ```
//! use platform::caps::{aarch64, x86};
//!
//! let caps = platform::caps();
//! let accelerated = caps.has(x86::PCLMUL_READY) || caps.has(aarch64::CRC_READY);
//! println!("accelerated CRC available: {accelerated}");
//! ```
//!
//! Detection is cached in a `OnceLock` (with `std`) and reports nothing
//! under Miri.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::{Arch, Caps};
#[cfg(any(test, feature = "testing"))]
pub use detect::set_caps_override;

/// Detected CPU capabilities.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}
