//! Everything about one image's pixel data except the data itself.

use crate::format::{PngPixelFormat, Shape};
use crate::interlace::{Adam7Layout, PngInterlacing};
use alloc::vec::Vec;
use bytemuck::cast_slice;
use core::iter::repeat;
use pixel_formats::r8g8b8_Srgb;

/// A transparent-color key, for formats without an alpha channel.
///
/// Image samples equal to the key are fully transparent, the rest are fully
/// opaque. The wire values are always two big-endian bytes per channel, even
/// when the image's own bit depth is lower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum ChromaKey {
  Y { y: u16 },
  RGB { r: u16, g: u16, b: u16 },
}
impl ChromaKey {
  /// Parse a transparency chunk body for a greyscale or RGB image.
  ///
  /// Indexed images store per-entry alpha in that chunk instead, which is
  /// not a chroma key; anything that isn't 2 or 6 bytes gives `None`.
  #[inline]
  #[must_use]
  pub fn from_trns(data: &[u8]) -> Option<Self> {
    match *data {
      [y0, y1] => Some(ChromaKey::Y { y: u16::from_be_bytes([y0, y1]) }),
      [r0, r1, g0, g1, b0, b1] => Some(ChromaKey::RGB {
        r: u16::from_be_bytes([r0, r1]),
        g: u16::from_be_bytes([g0, g1]),
        b: u16::from_be_bytes([b0, b1]),
      }),
      _ => None,
    }
  }
}

/// View a palette chunk body as `[r, g, b]` entries.
///
/// The body must be a whole number of 3-byte entries, otherwise `None`.
#[inline]
#[must_use]
pub fn palette_from_plte(data: &[u8]) -> Option<&[[u8; 3]]> {
  if data.len() % 3 != 0 {
    None
  } else {
    Some(cast_slice(data))
  }
}

/// The decoded facts about one image: format, geometry, storage layout, and
/// the optional palette / transparency extras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngProperties {
  /// Pixel format of the stored data.
  pub format: PngPixelFormat,
  /// Geometry of the full image.
  pub shape: Shape,
  /// Flat or Adam7 storage.
  pub interlacing: PngInterlacing,
  /// Palette entries: required by indexed images, a quantization hint for
  /// RGB ones.
  pub palette: Option<Vec<[u8; 3]>>,
  /// Transparent-color key, for formats without alpha.
  pub chroma_key: Option<ChromaKey>,
}
impl PngProperties {
  /// Derive the properties of an image of the given size and format.
  ///
  /// The palette and chroma key start out absent; fill them in from the
  /// relevant chunk bodies if the stream carries them.
  #[must_use]
  pub fn new(format: PngPixelFormat, width: u32, height: u32, interlaced: bool) -> Self {
    let interlacing = if interlaced {
      PngInterlacing::Adam7(Adam7Layout::new(format, width, height))
    } else {
      PngInterlacing::None
    };
    Self { format, shape: format.shape(width, height), interlacing, palette: None, chroma_key: None }
  }

  /// The exact byte count of this image's (unfiltered) pixel data.
  ///
  /// Interlaced data is the concatenation of all seven passes, whose total
  /// can differ from the flat byte count because every pass pads its own
  /// scanlines to byte boundaries.
  #[inline]
  #[must_use]
  pub fn data_len(&self) -> usize {
    match &self.interlacing {
      PngInterlacing::None => self.shape.bytes(),
      PngInterlacing::Adam7(layout) => layout.bytes(),
    }
  }

  /// One pitch value per stored scanline, in storage order.
  ///
  /// Flat images repeat their single pitch `height` times; interlaced ones
  /// run through the per-pass schedule. This is the line-width sequence that
  /// scanline filter reversal consumes.
  pub fn scanline_pitches(&self) -> impl Iterator<Item = usize> + '_ {
    let (flat, adam7) = match &self.interlacing {
      PngInterlacing::None => (Some(self.shape), None),
      PngInterlacing::Adam7(layout) => (None, Some(layout)),
    };
    flat
      .into_iter()
      .flat_map(|s| repeat(s.pitch).take(s.height as usize))
      .chain(adam7.into_iter().flat_map(|layout| layout.pitches()))
  }

  /// Iterate the palette as sRGB color values.
  ///
  /// Empty when no palette chunk was recorded.
  pub fn palette_srgb(&self) -> impl Iterator<Item = r8g8b8_Srgb> + '_ {
    self
      .palette
      .iter()
      .flat_map(|entries| entries.iter().copied())
      .map(|[r, g, b]| r8g8b8_Srgb { r, g, b })
  }
}

#[test]
fn test_data_len_interlaced_vs_flat() {
  // packed pass scanlines each pad to their own byte boundary, so the
  // interlaced total can exceed the flat one
  let flat = PngProperties::new(PngPixelFormat::Y1, 9, 9, false);
  assert_eq!(flat.data_len(), 2 * 9);
  let woven = PngProperties::new(PngPixelFormat::Y1, 9, 9, true);
  assert!(woven.data_len() > 0);
  assert_eq!(woven.data_len(), woven.interlacing.adam7().unwrap().bytes());
  // whole-byte 8x8 splits without any extra padding
  let rgb = PngProperties::new(PngPixelFormat::RGB8, 8, 8, true);
  assert_eq!(rgb.data_len(), 192);
}

#[test]
fn test_plte_and_trns_readers() {
  assert_eq!(palette_from_plte(&[1, 2, 3, 4, 5, 6]), Some([[1, 2, 3], [4, 5, 6]].as_slice()));
  assert!(palette_from_plte(&[1, 2, 3, 4]).is_none());
  assert_eq!(ChromaKey::from_trns(&[0, 7]), Some(ChromaKey::Y { y: 7 }));
  assert_eq!(
    ChromaKey::from_trns(&[1, 0, 0, 2, 0, 3]),
    Some(ChromaKey::RGB { r: 256, g: 2, b: 3 })
  );
  assert!(ChromaKey::from_trns(&[1, 2, 3]).is_none());
}
