//! CRC-32 conformance tool.
//!
//! Without arguments, runs the self-test: every variant's accelerated
//! implementation against the reference at every prefix of a seeded buffer.
//!
//! With `<variant> <impl-index> <file>...`, prints `<crc>\t<file>` for each
//! file, computed by the reference (`0`) or accelerated (`1`)
//! implementation.
//!
//! Exit status: 0 on success, 1 on divergence or I/O failure, 2 on argument
//! or configuration errors.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use conform::variant::{Implementation, Registry, Variant};
use conform::{Error, config, digest, harness};

const EXIT_FAILURE: u8 = 1;
const EXIT_USAGE: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "crc32-conform", version, about = "Check accelerated CRC-32 kernels against a table-driven reference")]
struct Cli {
  /// Variant name: "CRC-32 (refl)", "CRC-32C (refl)", "CRC-32" or "CRC-32C".
  #[arg(requires = "implementation")]
  variant: Option<String>,
  /// 0 for the reference implementation, 1 for the accelerated one
  /// (decimal, 0x hex or 0-prefixed octal).
  #[arg(allow_hyphen_values = true)]
  implementation: Option<String>,
  /// Files to checksum.
  files: Vec<PathBuf>,
}

fn setup_logger() {
  let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| String::from("conform=info,crc32_conform=info"));
  pretty_env_logger::formatted_timed_builder().parse_filters(&filters).init();
}

fn self_test() -> ExitCode {
  let config = config::get();
  let registry = Registry::detect();
  let buffer = harness::test_buffer(config.buffer_len, config.seed);
  log::info!(
    "self-test: {} byte buffer, seed {:#x}, engine {}",
    buffer.len(),
    config.seed,
    registry.engine_name().unwrap_or("none")
  );

  let report = if config.parallel {
    harness::run_parallel(&buffer, &registry)
  } else {
    harness::run(&buffer, &registry)
  };
  eprintln!("{report}");

  if report.passed() {
    ExitCode::SUCCESS
  } else {
    ExitCode::from(EXIT_FAILURE)
  }
}

/// Resolve the requested function before any file is touched.
fn resolve(variant: &str, implementation: &str) -> Result<conform::CrcFn, Error> {
  let implementation: Implementation = implementation.parse()?;
  let registry = Registry::detect();
  if implementation == Implementation::Accelerated && !registry.has_accelerated() {
    return Err(Error::AcceleratedUnavailable);
  }
  let variant: Variant = variant.parse()?;
  registry.function(variant, implementation)
}

fn digest(variant: &str, implementation: &str, files: &[PathBuf]) -> ExitCode {
  let f = match resolve(variant, implementation) {
    Ok(f) => f,
    Err(e) => {
      eprintln!("crc32-conform: {e}");
      return ExitCode::from(if e.is_configuration() { EXIT_USAGE } else { EXIT_FAILURE });
    }
  };

  let mut status = ExitCode::SUCCESS;
  for result in digest::digest_files(files, f, config::get().chunk_len) {
    if !result.is_ok() {
      status = ExitCode::from(EXIT_FAILURE);
    }
    eprintln!("{result}");
  }
  status
}

fn main() -> ExitCode {
  setup_logger();
  let cli = Cli::parse();

  match (cli.variant.as_deref(), cli.implementation.as_deref()) {
    (Some(variant), Some(implementation)) => digest(variant, implementation, &cli.files),
    _ => self_test(),
  }
}
