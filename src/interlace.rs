//! The Adam7 pass layout: reduced image sizes and the stride maps back to
//! full-image coordinates.

use crate::format::{PngPixelFormat, Shape};
use core::{iter::repeat, ops::Range};

/// A finite arithmetic sequence of pixel coordinates.
///
/// Each interlacing pass covers the destination columns (or rows) `start`,
/// `start + step`, `start + 2 * step`, and so on, `count` entries in all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Strider {
  /// First coordinate covered.
  pub start: u32,
  /// Distance between covered coordinates.
  pub step: u32,
  /// How many coordinates are covered.
  pub count: u32,
}
impl Strider {
  /// The `i`th coordinate of the sequence.
  #[inline]
  #[must_use]
  pub const fn get(self, i: u32) -> u32 {
    self.start + self.step * i
  }

  /// Iterate the coordinates in order.
  #[inline]
  pub fn iter(self) -> impl Iterator<Item = u32> {
    (0..self.count).map(move |i| self.get(i))
  }
}

/// One of the seven reduced images of an interlaced PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubImage {
  /// Byte geometry of the reduced image, taken on its own.
  pub shape: Shape,
  /// The full-image columns this pass covers.
  pub strider_x: Strider,
  /// The full-image rows this pass covers.
  pub strider_y: Strider,
}
impl SubImage {
  /// Bytes of this pass's pixel data.
  #[inline]
  #[must_use]
  pub const fn bytes(self) -> usize {
    self.shape.bytes()
  }

  /// A pass can be empty when the full image is small; it covers no pixels
  /// and contributes no bytes.
  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.shape.width == 0 || self.shape.height == 0
  }
}

/// The seven reduced images for one (format, size) pair.
///
/// Which pass covers which pixel follows the 8x8 tile pattern:
///
/// ```text
/// 1 6 4 6 2 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// 3 6 4 6 3 6 4 6
/// 7 7 7 7 7 7 7 7
/// 5 6 5 6 5 6 5 6
/// 7 7 7 7 7 7 7 7
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adam7Layout {
  passes: [SubImage; 7],
}
impl Adam7Layout {
  /// Compute the seven reduced images for a full image of the given size.
  #[must_use]
  pub const fn new(format: PngPixelFormat, width: u32, height: u32) -> Self {
    const fn sub(
      format: PngPixelFormat, w: u32, h: u32, x0: u32, xs: u32, y0: u32, ys: u32,
    ) -> SubImage {
      SubImage {
        shape: format.shape(w, h),
        strider_x: Strider { start: x0, step: xs, count: w },
        strider_y: Strider { start: y0, step: ys, count: h },
      }
    }
    let (w, h) = (width, height);
    Self {
      passes: [
        sub(format, (w + 7) >> 3, (h + 7) >> 3, 0, 8, 0, 8),
        sub(format, (w + 3) >> 3, (h + 7) >> 3, 4, 8, 0, 8),
        sub(format, (w + 3) >> 2, (h + 3) >> 3, 0, 4, 4, 8),
        sub(format, (w + 1) >> 2, (h + 3) >> 2, 2, 4, 0, 4),
        sub(format, (w + 1) >> 1, (h + 1) >> 2, 0, 2, 2, 4),
        sub(format, w >> 1, (h + 1) >> 1, 1, 2, 0, 2),
        sub(format, w, h >> 1, 0, 1, 1, 2),
      ],
    }
  }

  /// All seven passes, in storage order.
  #[inline]
  #[must_use]
  pub const fn passes(&self) -> &[SubImage; 7] {
    &self.passes
  }

  /// Total bytes of all seven passes concatenated.
  #[inline]
  #[must_use]
  pub fn bytes(&self) -> usize {
    self.passes.iter().map(|p| p.bytes()).sum()
  }

  /// Where each pass's bytes sit within a concatenated pass buffer.
  ///
  /// The ranges partition `0..self.bytes()` in pass order; empty passes get
  /// an empty range.
  #[must_use]
  pub fn byte_ranges(&self) -> [Range<usize>; 7] {
    let mut acc = 0_usize;
    self.passes.map(|p| {
      let start = acc;
      acc += p.bytes();
      start..acc
    })
  }

  /// One pitch value per stored scanline, in pass order.
  ///
  /// Pass `i` contributes `height` copies of its own pitch, and empty passes
  /// contribute nothing. Scanline filters work line by line over the
  /// concatenated pass buffer, so this sequence is the line-width schedule
  /// that filter reversal needs.
  pub fn pitches(&self) -> impl Iterator<Item = usize> + '_ {
    self
      .passes
      .iter()
      .filter(|p| !p.is_empty())
      .flat_map(|p| repeat(p.shape.pitch).take(p.shape.height as usize))
  }
}

/// Whether pixel data is stored flat or split into the seven reduced images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngInterlacing {
  /// Scanlines top to bottom, one image.
  None,
  /// Seven reduced images, concatenated in pass order.
  Adam7(Adam7Layout),
}
impl PngInterlacing {
  /// Is this the Adam7 arrangement?
  #[inline]
  #[must_use]
  pub const fn is_interlaced(&self) -> bool {
    matches!(self, Self::Adam7(_))
  }

  /// The pass layout, when there is one.
  #[inline]
  #[must_use]
  pub const fn adam7(&self) -> Option<&Adam7Layout> {
    match self {
      Self::Adam7(layout) => Some(layout),
      Self::None => None,
    }
  }
}

#[test]
fn test_reduced_image_sizes() {
  use PngPixelFormat::Y8;
  let pass_w = |w: u32, p: usize| Adam7Layout::new(Y8, w, 0).passes[p].shape.width;
  let pass_h = |h: u32, p: usize| Adam7Layout::new(Y8, 0, h).passes[p].shape.height;
  // one
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(pass_w(w, 0), ex, "failed w:{w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(pass_h(h, 0), ex, "failed h:{h}");
  }
  // two
  for (w, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(pass_w(w, 1), ex, "failed w:{w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 1, 1, 1, 1]) {
    assert_eq!(pass_h(h, 1), ex, "failed h:{h}");
  }
  // three
  for (w, ex) in (1..=8).zip([1, 1, 1, 1, 2, 2, 2, 2]) {
    assert_eq!(pass_w(w, 2), ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 0, 0, 0, 1, 1, 1, 1]) {
    assert_eq!(pass_h(h, 2), ex, "failed h: {h}");
  }
  // four
  for (w, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(pass_w(w, 3), ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 1, 1, 2, 2, 2, 2]) {
    assert_eq!(pass_h(h, 3), ex, "failed h: {h}");
  }
  // five
  for (w, ex) in (1..=8).zip([1, 1, 2, 2, 3, 3, 4, 4]) {
    assert_eq!(pass_w(w, 4), ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 0, 1, 1, 1, 1, 2, 2]) {
    assert_eq!(pass_h(h, 4), ex, "failed h: {h}");
  }
  // six
  for (w, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(pass_w(w, 5), ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([1, 1, 2, 2, 3, 3, 4, 4]) {
    assert_eq!(pass_h(h, 5), ex, "failed h: {h}");
  }
  // seven
  for (w, ex) in (1..=8).zip([1, 2, 3, 4, 5, 6, 7, 8]) {
    assert_eq!(pass_w(w, 6), ex, "failed w: {w}");
  }
  for (h, ex) in (1..=8).zip([0, 1, 1, 2, 2, 3, 3, 4]) {
    assert_eq!(pass_h(h, 6), ex, "failed h: {h}");
  }
  //
  let sizes = Adam7Layout::new(Y8, 8, 8).passes.map(|p| (p.shape.width, p.shape.height));
  assert_eq!(
    sizes,
    [
      (1, 1), // one
      (1, 1), // two
      (2, 1), // three
      (2, 2), // four
      (4, 2), // five
      (4, 4), // six
      (8, 4), // seven
    ]
  );
}

#[test]
fn test_strider_destinations() {
  // the 8x8 tile: where each pass's (0,0) and (1,0) land in the full image
  let layout = Adam7Layout::new(PngPixelFormat::Y8, 16, 16);
  let p = layout.passes();
  assert_eq!((p[0].strider_x.get(0), p[0].strider_y.get(0)), (0, 0));
  assert_eq!((p[0].strider_x.get(1), p[0].strider_y.get(1)), (8, 8));
  assert_eq!((p[1].strider_x.get(0), p[1].strider_y.get(0)), (4, 0));
  assert_eq!((p[2].strider_x.get(0), p[2].strider_y.get(0)), (0, 4));
  assert_eq!((p[3].strider_x.get(0), p[3].strider_y.get(0)), (2, 0));
  assert_eq!((p[4].strider_x.get(0), p[4].strider_y.get(0)), (0, 2));
  assert_eq!((p[5].strider_x.get(0), p[5].strider_y.get(0)), (1, 0));
  assert_eq!((p[5].strider_x.get(1), p[5].strider_y.get(1)), (3, 2));
  assert_eq!((p[6].strider_x.get(0), p[6].strider_y.get(0)), (0, 1));
}

#[test]
fn test_byte_ranges_partition() {
  // rgb8 at 8x8: per-pass pitches {3,3,6,6,12,12,24} over rows {1,1,1,2,2,4,4}
  let layout = Adam7Layout::new(PngPixelFormat::RGB8, 8, 8);
  let expected = [3, 3, 6, 12, 24, 48, 96];
  for (pass, ex) in layout.passes().iter().zip(expected) {
    assert_eq!(pass.bytes(), ex);
  }
  assert_eq!(layout.bytes(), 192);
  assert_eq!(layout.bytes(), 8 * 8 * 3);
  let mut acc = 0;
  for (range, ex) in layout.byte_ranges().iter().zip(expected) {
    assert_eq!(range.start, acc);
    assert_eq!(range.end - range.start, ex);
    acc = range.end;
  }
  assert_eq!(acc, 192);
}

#[test]
fn test_pitch_schedule() {
  let layout = Adam7Layout::new(PngPixelFormat::RGB8, 8, 8);
  let pitches: [usize; 15] = {
    let mut out = [0; 15];
    let mut it = layout.pitches();
    for slot in out.iter_mut() {
      *slot = it.next().unwrap();
    }
    assert!(it.next().is_none());
    out
  };
  assert_eq!(pitches, [3, 3, 6, 6, 6, 12, 12, 12, 12, 12, 12, 24, 24, 24, 24]);
  // a 1x1 image only has a pass-one scanline
  let tiny = Adam7Layout::new(PngPixelFormat::Y8, 1, 1);
  let mut it = tiny.pitches();
  assert_eq!(it.next(), Some(1));
  assert!(it.next().is_none());
}
