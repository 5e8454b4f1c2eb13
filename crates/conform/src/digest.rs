//! File digests through one selected CRC function.

use core::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::CrcFn;
use crate::error::Error;

/// CRC of everything `reader` yields, read `chunk_len` bytes at a time.
///
/// The accumulator starts at 0 and is threaded through every chunk, so the
/// result does not depend on `chunk_len`. A `chunk_len` of 0 is treated as 1.
///
/// # Errors
///
/// The first read error other than [`io::ErrorKind::Interrupted`].
pub fn digest_reader<R: Read>(mut reader: R, f: CrcFn, chunk_len: usize) -> io::Result<u32> {
  let mut buf = vec![0u8; chunk_len.max(1)];
  let mut crc = 0;
  loop {
    match reader.read(&mut buf) {
      Ok(0) => return Ok(crc),
      Ok(n) => {
        let (filled, _) = buf.split_at(n);
        crc = f(crc, filled);
      }
      Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
      Err(e) => return Err(e),
    }
  }
}

/// CRC of the file at `path`. The file is closed before returning.
///
/// # Errors
///
/// [`Error::Io`] if the file cannot be opened or read.
pub fn digest_file(path: impl AsRef<Path>, f: CrcFn, chunk_len: usize) -> Result<u32, Error> {
  let path = path.as_ref();
  let io_error = |source| Error::Io {
    path: path.to_path_buf(),
    source,
  };
  let file = File::open(path).map_err(io_error)?;
  digest_reader(file, f, chunk_len).map_err(io_error)
}

/// Digest of one input file.
#[derive(Debug)]
pub struct FileDigest {
  pub path: PathBuf,
  pub crc: Result<u32, Error>,
}

impl FileDigest {
  #[must_use]
  pub fn is_ok(&self) -> bool {
    self.crc.is_ok()
  }
}

impl fmt::Display for FileDigest {
  /// `<crc as 8 lowercase hex digits>\t<path>`, or the error.
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.crc {
      Ok(crc) => write!(f, "{crc:08x}\t{}", self.path.display()),
      Err(e) => write!(f, "{e}"),
    }
  }
}

/// Digest every path in order. A failing file does not stop the others.
#[must_use]
pub fn digest_files<P: AsRef<Path>>(paths: &[P], f: CrcFn, chunk_len: usize) -> Vec<FileDigest> {
  paths
    .iter()
    .map(|path| {
      let path = path.as_ref();
      let crc = digest_file(path, f, chunk_len);
      if let Err(e) = &crc {
        log::debug!("{e}");
      }
      FileDigest {
        path: path.to_path_buf(),
        crc,
      }
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reference;

  /// Reader that returns at most `step` bytes and interrupts every other call.
  struct Stutter<'a> {
    data: &'a [u8],
    step: usize,
    interrupt: bool,
  }

  impl Read for Stutter<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
      self.interrupt = !self.interrupt;
      if self.interrupt {
        return Err(io::Error::from(io::ErrorKind::Interrupted));
      }
      let n = self.step.min(buf.len()).min(self.data.len());
      let (head, tail) = self.data.split_at(n);
      buf[..n].copy_from_slice(head);
      self.data = tail;
      Ok(n)
    }
  }

  #[test]
  fn empty_reader_is_zero() {
    assert_eq!(digest_reader(io::empty(), reference::crc32_refl, 16).ok(), Some(0));
  }

  #[test]
  fn chunk_size_does_not_matter() {
    let data: Vec<u8> = (0..5000u32).map(|i| (i % 251) as u8).collect();
    let expected = reference::crc32c(0, &data);
    for chunk in [0, 1, 13, 4096, 16384] {
      assert_eq!(digest_reader(&data[..], reference::crc32c, chunk).ok(), Some(expected));
    }
  }

  #[test]
  fn interrupted_reads_are_retried() {
    let data = b"123456789";
    let reader = Stutter {
      data,
      step: 2,
      interrupt: false,
    };
    assert_eq!(digest_reader(reader, reference::crc32_refl, 64).ok(), Some(0xCBF4_3926));
  }

  #[test]
  fn missing_file_is_io_error() {
    let path = std::env::temp_dir().join("conform-digest-does-not-exist.bin");
    let err = digest_file(&path, reference::crc32, 16).err();
    assert!(matches!(err, Some(Error::Io { path: p, .. }) if p == path));
  }

  #[test]
  fn display_format() {
    let ok = FileDigest {
      path: "a.bin".into(),
      crc: Ok(0xAB),
    };
    assert_eq!(ok.to_string(), "000000ab\ta.bin");
  }
}
