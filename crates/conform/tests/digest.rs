//! File digests: ordering, chunking and error isolation.

use std::fs;
use std::path::PathBuf;

use conform::digest::{digest_file, digest_files};
use conform::variant::Variant;
use conform::{Error, harness};

/// Scratch directory removed on drop.
struct Scratch(PathBuf);

impl Scratch {
  fn new(name: &str) -> Self {
    let dir = std::env::temp_dir().join(format!("conform-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    Self(dir)
  }

  fn file(&self, name: &str, contents: &[u8]) -> PathBuf {
    let path = self.0.join(name);
    fs::write(&path, contents).expect("write scratch file");
    path
  }
}

impl Drop for Scratch {
  fn drop(&mut self) {
    let _ = fs::remove_dir_all(&self.0);
  }
}

#[test]
fn file_digest_matches_in_memory() {
  let scratch = Scratch::new("in-memory");
  let data = harness::test_buffer(40_000, 11);
  let path = scratch.file("data.bin", &data);
  for variant in Variant::ALL {
    let f = variant.reference();
    assert_eq!(digest_file(&path, f, 16384).ok(), Some(f(0, &data)), "{variant}");
  }
}

#[test]
fn digest_is_independent_of_chunk_size() {
  let scratch = Scratch::new("chunks");
  let path = scratch.file("data.bin", &harness::test_buffer(10_000, 12));
  let f = Variant::Crc32cRefl.reference();
  let expected = digest_file(&path, f, 16384).ok();
  assert!(expected.is_some());
  for chunk in [1, 2, 3, 511, 4096, 9_999, 10_000, 1 << 20] {
    assert_eq!(digest_file(&path, f, chunk).ok(), expected, "chunk {chunk}");
  }
}

#[test]
fn digest_is_independent_of_file_order() {
  let scratch = Scratch::new("order");
  let a = scratch.file("a.bin", b"alpha");
  let b = scratch.file("b.bin", &harness::test_buffer(3000, 13));
  let c = scratch.file("c.bin", b"");
  let f = Variant::Crc32.reference();

  let forward = digest_files(&[a.clone(), b.clone(), c.clone()], f, 16384);
  let backward = digest_files(&[c, b, a], f, 16384);

  let paths: Vec<_> = forward.iter().map(|d| d.path.clone()).collect();
  assert_eq!(paths, [scratch.0.join("a.bin"), scratch.0.join("b.bin"), scratch.0.join("c.bin")]);
  for d in &forward {
    let twin = backward.iter().find(|e| e.path == d.path).expect("same path in both runs");
    assert_eq!(d.crc.as_ref().ok(), twin.crc.as_ref().ok(), "{}", d.path.display());
  }
  assert_eq!(forward[2].crc.as_ref().ok(), Some(&0));
}

#[test]
fn missing_file_does_not_stop_the_rest() {
  let scratch = Scratch::new("missing");
  let good = scratch.file("good.bin", b"123456789");
  let missing = scratch.0.join("missing.bin");
  let f = Variant::Crc32Refl.reference();

  let results = digest_files(&[missing.clone(), good.clone()], f, 4);
  assert_eq!(results.len(), 2);
  assert!(matches!(&results[0].crc, Err(Error::Io { path, .. }) if *path == missing));
  assert_eq!(results[1].crc.as_ref().ok(), Some(&0xCBF4_3926));
  assert_eq!(results[1].to_string(), format!("cbf43926\t{}", good.display()));
}
