//! Pulling bytes out of some opaque data source.

/// A source of PNG datastream bytes.
///
/// One capability: hand over up to `limit` bytes. A shorter (possibly
/// empty) slice means the stream is at its end. Implementations can wrap a
/// memory buffer, a file, a socket, whatever — the caller only ever sees
/// byte slices.
///
/// The outer chunk framer is the main consumer: it reads lengths, type
/// tags, bodies, and checksums through this trait and hands the framed
/// results to the validator and parsers in this crate, which all work over
/// already-framed byte sequences and never touch the source themselves.
pub trait PngByteSource {
  /// Read up to `limit` bytes from the stream.
  fn read(&mut self, limit: usize) -> &[u8];
}

/// A byte slice is its own source: reading advances the slice.
impl PngByteSource for &[u8] {
  #[inline]
  fn read(&mut self, limit: usize) -> &[u8] {
    let all = *self;
    let (head, tail) = all.split_at(limit.min(all.len()));
    *self = tail;
    head
  }
}

#[test]
fn test_slice_source_reads_and_drains() {
  let mut source: &[u8] = &[1, 2, 3, 4, 5];
  assert_eq!(source.read(2), &[1, 2][..]);
  assert!(source.read(0).is_empty());
  assert_eq!(source.read(9), &[3, 4, 5][..]);
  assert!(source.read(1).is_empty());
}
