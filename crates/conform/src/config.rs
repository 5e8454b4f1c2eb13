//! Runtime configuration (environment overrides).
//!
//! | variable | values | default |
//! |----------|--------|---------|
//! | `CRC32_CONFORM_FORCE` | `auto`, `portable` | `auto` |
//! | `CRC32_CONFORM_SEED` | `u64` | [`DEFAULT_SEED`] |
//! | `CRC32_CONFORM_BUFFER_LEN` | `usize` | [`DEFAULT_BUFFER_LEN`] |
//! | `CRC32_CONFORM_CHUNK_LEN` | `usize`, at least 1 | [`DEFAULT_CHUNK_LEN`] |
//! | `CRC32_CONFORM_PARALLEL` | `1/0`, `true/false`, `yes/no`, `on/off` | off |
//!
//! The environment is read once per process. Empty or unparseable values
//! fall back to the default.

use std::sync::OnceLock;

/// Test buffer length used when nothing else is configured.
pub const DEFAULT_BUFFER_LEN: usize = 16384;
/// File read chunk used when nothing else is configured.
pub const DEFAULT_CHUNK_LEN: usize = 16384;
/// Test buffer seed used when nothing else is configured.
pub const DEFAULT_SEED: u64 = 0x0C0F_FEE0_C3C3_2A2A;

/// Forced engine availability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Force {
  /// Use an accelerated engine when the CPU supports one.
  #[default]
  Auto,
  /// Report no accelerated engine, whatever the CPU supports.
  Portable,
}

impl Force {
  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
    }
  }
}

/// Effective configuration after applying overrides.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
  pub force: Force,
  /// Seed of the self-test buffer.
  pub seed: u64,
  /// Length of the self-test buffer.
  pub buffer_len: usize,
  /// Read chunk for file digests.
  pub chunk_len: usize,
  /// Run the self-test variants on scoped threads.
  pub parallel: bool,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      force: Force::Auto,
      seed: DEFAULT_SEED,
      buffer_len: DEFAULT_BUFFER_LEN,
      chunk_len: DEFAULT_CHUNK_LEN,
      parallel: false,
    }
  }
}

impl Config {
  /// Build a configuration from a variable lookup.
  ///
  /// `lookup` returns the raw value of a variable, or `None` when unset.
  #[must_use]
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let value = |name: &str| {
      let v = lookup(name)?;
      let v = v.trim();
      if v.is_empty() { None } else { Some(v.to_owned()) }
    };

    let defaults = Self::default();
    Self {
      force: value("CRC32_CONFORM_FORCE")
        .and_then(|v| parse_force(&v))
        .unwrap_or(defaults.force),
      seed: value("CRC32_CONFORM_SEED")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.seed),
      buffer_len: value("CRC32_CONFORM_BUFFER_LEN")
        .and_then(|v| v.parse().ok())
        .unwrap_or(defaults.buffer_len),
      chunk_len: value("CRC32_CONFORM_CHUNK_LEN")
        .and_then(|v| v.parse().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(defaults.chunk_len),
      parallel: value("CRC32_CONFORM_PARALLEL")
        .and_then(|v| parse_bool(&v))
        .unwrap_or(defaults.parallel),
    }
  }

  /// Configuration from the process environment.
  #[must_use]
  pub fn from_env() -> Self {
    Self::from_lookup(|name| std::env::var(name).ok())
  }
}

fn parse_force(value: &str) -> Option<Force> {
  if value.eq_ignore_ascii_case("auto") {
    return Some(Force::Auto);
  }
  if value.eq_ignore_ascii_case("portable")
    || value.eq_ignore_ascii_case("reference")
    || value.eq_ignore_ascii_case("table")
  {
    return Some(Force::Portable);
  }
  None
}

fn parse_bool(value: &str) -> Option<bool> {
  const TRUE: [&str; 4] = ["1", "true", "yes", "on"];
  const FALSE: [&str; 4] = ["0", "false", "no", "off"];
  if TRUE.iter().any(|t| value.eq_ignore_ascii_case(t)) {
    Some(true)
  } else if FALSE.iter().any(|f| value.eq_ignore_ascii_case(f)) {
    Some(false)
  } else {
    None
  }
}

/// Process-wide configuration, read from the environment on first use.
#[must_use]
pub fn get() -> Config {
  static CONFIG: OnceLock<Config> = OnceLock::new();
  *CONFIG.get_or_init(|| {
    let config = Config::from_env();
    log::debug!("configuration: {config:?}");
    config
  })
}
