//! The pixel formats a PNG can store, and the byte geometry they produce.

/// The pixel formats allowed in a PNG file.
///
/// This combines a channel ordering with a bit depth per channel. Only the
/// legal pairs are enumerated: greyscale (`Y`) comes in all five depths,
/// indexed color (`I`) is capped at 8 bits per index, and everything with
/// more than one channel is 8 or 16 bits per channel.
///
/// * Formats with a bit depth under 8 pack several pixels into each byte,
///   with the left-most pixel in the highest bits.
/// * Formats with a 16-bit depth store each channel as two big-endian bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum PngPixelFormat {
  Y1,
  Y2,
  Y4,
  Y8,
  Y16,
  RGB8,
  RGB16,
  I1,
  I2,
  I4,
  I8,
  YA8,
  YA16,
  RGBA8,
  RGBA16,
}
impl PngPixelFormat {
  /// Bits per channel sample: 1, 2, 4, 8, or 16.
  #[inline]
  #[must_use]
  pub const fn bit_depth(self) -> usize {
    use PngPixelFormat::*;
    match self {
      Y1 | I1 => 1,
      Y2 | I2 => 2,
      Y4 | I4 => 4,
      Y8 | I8 | RGB8 | YA8 | RGBA8 => 8,
      Y16 | RGB16 | YA16 | RGBA16 => 16,
    }
  }

  /// The color code stored in the image header: 0 (greyscale), 2 (RGB),
  /// 3 (indexed), 4 (greyscale with alpha), or 6 (RGBA).
  #[inline]
  #[must_use]
  pub const fn color_code(self) -> u8 {
    use PngPixelFormat::*;
    match self {
      Y1 | Y2 | Y4 | Y8 | Y16 => 0,
      RGB8 | RGB16 => 2,
      I1 | I2 | I4 | I8 => 3,
      YA8 | YA16 => 4,
      RGBA8 | RGBA16 => 6,
    }
  }

  /// Stored samples are palette indexes rather than colors.
  #[inline]
  #[must_use]
  pub const fn is_indexed(self) -> bool {
    self.color_code() & 1 != 0
  }

  /// The format carries color (directly or through a palette).
  #[inline]
  #[must_use]
  pub const fn has_color(self) -> bool {
    self.color_code() & 2 != 0
  }

  /// The format stores an alpha channel of its own.
  #[inline]
  #[must_use]
  pub const fn has_alpha(self) -> bool {
    self.color_code() & 4 != 0
  }

  /// Channels actually stored per pixel: 1 to 4.
  ///
  /// Indexed data stores one channel (the index), no matter how many
  /// components the palette entries expand to.
  #[inline]
  #[must_use]
  pub const fn channels(self) -> usize {
    if self.is_indexed() {
      1
    } else {
      1 + (if self.has_color() { 2 } else { 0 }) + (if self.has_alpha() { 1 } else { 0 })
    }
  }

  /// Logical components per pixel once any palette is expanded: 1 to 4.
  ///
  /// An indexed pixel stores one channel but *means* three components, so
  /// this differs from [`channels`](Self::channels) exactly for the `I`
  /// formats.
  #[inline]
  #[must_use]
  pub const fn components(self) -> usize {
    1 + (if self.has_color() { 2 } else { 0 }) + (if self.has_alpha() { 1 } else { 0 })
  }

  /// Given an image's *pixel* width, the *bytes* of one packed scanline.
  ///
  /// Packing is MSB-first with no padding between pixels, so the only slack
  /// is the zero-fill out to a byte boundary at the end of each line.
  #[inline]
  #[must_use]
  pub const fn bytes_per_scanline(self, width: u32) -> usize {
    let bits = width as usize * self.channels() * self.bit_depth();
    (bits >> 3) + (((bits & 7) != 0) as usize)
  }

  /// The byte geometry of a whole image of the given size in this format.
  #[inline]
  #[must_use]
  pub const fn shape(self, width: u32, height: u32) -> Shape {
    Shape { pitch: self.bytes_per_scanline(width), width, height }
  }
}

/// The byte geometry of one flat raster: scanline pitch plus pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
  /// Bytes per scanline, including the bit padding in the final byte.
  pub pitch: usize,
  /// Width in pixels.
  pub width: u32,
  /// Height in pixels.
  pub height: u32,
}
impl Shape {
  /// Total bytes of a raster with this shape.
  #[inline]
  #[must_use]
  pub const fn bytes(self) -> usize {
    self.pitch * self.height as usize
  }
}

#[test]
fn test_scanline_geometry() {
  use PngPixelFormat::*;
  // whole-byte formats: pitch is an exact multiple of the pixel size
  assert_eq!(RGBA8.shape(3, 2), Shape { pitch: 12, width: 3, height: 2 });
  assert_eq!(RGBA8.shape(3, 2).bytes(), 24);
  assert_eq!(RGB16.bytes_per_scanline(5), 30);
  assert_eq!(YA8.bytes_per_scanline(7), 14);
  // packed formats: 9 one-bit pixels don't fit in one byte
  assert_eq!(Y1.bytes_per_scanline(9), 2);
  assert_eq!(Y1.bytes_per_scanline(8), 1);
  assert_eq!(I2.bytes_per_scanline(5), 2);
  assert_eq!(Y4.bytes_per_scanline(3), 2);
  // zero-size edge
  assert_eq!(I4.shape(0, 9).bytes(), 0);
  assert_eq!(Y8.shape(9, 0).bytes(), 0);
}

#[test]
fn test_pitch_is_minimal() {
  // the pitch holds the scanline bits, and never a whole spare byte
  let formats = [
    PngPixelFormat::Y1,
    PngPixelFormat::Y2,
    PngPixelFormat::Y4,
    PngPixelFormat::Y8,
    PngPixelFormat::Y16,
    PngPixelFormat::RGB8,
    PngPixelFormat::RGB16,
    PngPixelFormat::I1,
    PngPixelFormat::I2,
    PngPixelFormat::I4,
    PngPixelFormat::I8,
    PngPixelFormat::YA8,
    PngPixelFormat::YA16,
    PngPixelFormat::RGBA8,
    PngPixelFormat::RGBA16,
  ];
  for f in formats {
    for width in 1..=32_u32 {
      let bits = width as usize * f.channels() * f.bit_depth();
      let pitch = f.bytes_per_scanline(width);
      assert!(pitch * 8 >= bits, "{f:?} w{width}");
      assert!(pitch * 8 < bits + 8, "{f:?} w{width}");
    }
  }
}

#[test]
fn test_channels_and_components() {
  use PngPixelFormat::*;
  assert_eq!(Y16.channels(), 1);
  assert_eq!(YA16.channels(), 2);
  assert_eq!(RGB8.channels(), 3);
  assert_eq!(RGBA16.channels(), 4);
  // an index is one stored channel but three logical components
  assert_eq!(I4.channels(), 1);
  assert_eq!(I4.components(), 3);
  assert_eq!(Y2.components(), 1);
  assert_eq!(YA8.components(), 2);
  assert_eq!(RGBA8.components(), 4);
}
