//! Error type for variant lookup, argument handling and file digests.
//!
//! Checksum divergence is not an error: the harness reports it as data.

use core::fmt;
use std::io;
use std::path::PathBuf;

/// Everything that can go wrong outside the checksum arithmetic itself.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
  /// No variant has this display name.
  UnknownVariant(String),
  /// Implementation index is not 0 (reference) or 1 (accelerated).
  ImplementationOutOfRange(u64),
  /// Implementation index is not a number.
  MalformedIndex(String),
  /// The accelerated implementation was requested but no engine can run.
  AcceleratedUnavailable,
  /// Reading an input file failed.
  Io { path: PathBuf, source: io::Error },
}

impl Error {
  /// Whether this error comes from arguments or the environment rather than
  /// from the computation.
  #[must_use]
  pub const fn is_configuration(&self) -> bool {
    !matches!(self, Self::Io { .. })
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::UnknownVariant(name) => write!(f, "unknown CRC variant {name:?}"),
      Self::ImplementationOutOfRange(index) => {
        write!(f, "implementation index {index} out of range (expected 0 or 1)")
      }
      Self::MalformedIndex(raw) => write!(f, "malformed implementation index {raw:?}"),
      Self::AcceleratedUnavailable => f.write_str("accelerated CRC engine is not available"),
      Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
    }
  }
}

impl core::error::Error for Error {
  fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
    match self {
      Self::Io { source, .. } => Some(source),
      _ => None,
    }
  }
}
