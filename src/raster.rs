//! Moving pixel data between the interlaced and flat storage arrangements.

use crate::interlace::{Adam7Layout, PngInterlacing};
use crate::properties::PngProperties;
use alloc::vec::Vec;
use bitfrob::U8BitIterHigh;

/// Unfiltered pixel data, possibly still split into the seven Adam7 passes.
///
/// The data is exactly what sits between filter reversal and a usable
/// raster: every scanline is in place, but an interlaced image still stores
/// its passes one after another instead of a single rectangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UncompressedImage {
  properties: PngProperties,
  data: Vec<u8>,
}
impl UncompressedImage {
  /// Bundle properties with their unfiltered data buffer.
  ///
  /// ## Panics
  /// * `data.len()` must be exactly `properties.data_len()`. A mismatch is a
  ///   bug in the caller's byte accounting, not a recoverable condition, so
  ///   this is asserted rather than returned.
  #[must_use]
  pub fn new(properties: PngProperties, data: Vec<u8>) -> Self {
    assert_eq!(data.len(), properties.data_len());
    Self { properties, data }
  }

  /// The image's decoded facts.
  #[inline]
  #[must_use]
  pub const fn properties(&self) -> &PngProperties {
    &self.properties
  }

  /// The raw pixel bytes, in storage order.
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// Merge the seven reduced images into one flat raster.
  ///
  /// Non-interlaced input is already flat and passes through unchanged.
  /// The output keeps the format, size, palette, and chroma key; only the
  /// storage arrangement changes.
  #[must_use]
  pub fn deinterlace(self) -> RectangularImage {
    let Self { mut properties, data } = self;
    let layout = match properties.interlacing {
      PngInterlacing::None => return RectangularImage { properties, data },
      PngInterlacing::Adam7(layout) => layout,
    };
    let depth = properties.format.bit_depth();
    let pitch = properties.shape.pitch;
    // Packed pixels get OR-ed into place bit by bit, so the output buffer
    // must start all zero. This also zero-fills the end-of-line padding.
    let mut out: Vec<u8> = Vec::new();
    out.resize(properties.shape.bytes(), 0);
    let mut base = 0_usize;
    for sub in layout.passes() {
      let sub_pitch = sub.shape.pitch;
      if depth >= 8 {
        let bpp = (properties.format.channels() * depth) / 8;
        for (sy, dy) in sub.strider_y.iter().enumerate() {
          let src_row = base + sub_pitch * sy;
          let dst_row = pitch * dy as usize;
          for (sx, dx) in sub.strider_x.iter().enumerate() {
            let src = src_row + sx * bpp;
            let dst = dst_row + dx as usize * bpp;
            out[dst..dst + bpp].copy_from_slice(&data[src..src + bpp]);
          }
        }
      } else {
        // packed pixels are always single channel, MSB first
        for (sy, dy) in sub.strider_y.iter().enumerate() {
          let src_row = base + sub_pitch * sy;
          let dst_row = pitch * dy as usize;
          for (sx, dx) in sub.strider_x.iter().enumerate() {
            let src_bit = sx * depth;
            let dst_bit = dx as usize * depth;
            let value = (data[src_row + (src_bit >> 3)] << (src_bit & 7)) >> (8 - depth);
            out[dst_row + (dst_bit >> 3)] |= value << (8 - (dst_bit & 7) - depth);
          }
        }
      }
      base += sub.bytes();
    }
    properties.interlacing = PngInterlacing::None;
    RectangularImage { properties, data: out }
  }

  /// Split an interlaced image into its seven standalone passes.
  ///
  /// Each pass comes back as a flat image of its own reduced size, carrying
  /// its slice of the concatenated pass buffer. Empty passes come out as
  /// zero-byte images. Gives `None` when the data isn't interlaced.
  #[must_use]
  pub fn decompose(&self) -> Option<[RectangularImage; 7]> {
    let layout = self.properties.interlacing.adam7()?;
    let ranges = layout.byte_ranges();
    let passes = layout.passes();
    Some(core::array::from_fn(|i| {
      let shape = passes[i].shape;
      let properties = PngProperties::new(self.properties.format, shape.width, shape.height, false);
      RectangularImage { properties, data: self.data[ranges[i].clone()].to_vec() }
    }))
  }
}

/// A flat raster: one scanline per image row, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectangularImage {
  properties: PngProperties,
  data: Vec<u8>,
}
impl RectangularImage {
  /// Bundle properties with a flat raster buffer.
  ///
  /// ## Panics
  /// * The properties must not be interlaced, and `data.len()` must equal
  ///   the shape's byte count. Both are caller bugs when violated.
  #[must_use]
  pub fn new(properties: PngProperties, data: Vec<u8>) -> Self {
    assert!(!properties.interlacing.is_interlaced());
    assert_eq!(data.len(), properties.shape.bytes());
    Self { properties, data }
  }

  /// The image's decoded facts.
  #[inline]
  #[must_use]
  pub const fn properties(&self) -> &PngProperties {
    &self.properties
  }

  /// The raw pixel bytes, scanline by scanline.
  #[inline]
  #[must_use]
  pub fn data(&self) -> &[u8] {
    &self.data
  }

  /// Take the pixel bytes out of the image.
  #[inline]
  #[must_use]
  pub fn into_data(self) -> Vec<u8> {
    self.data
  }

  /// Split a flat raster into the seven Adam7 passes.
  ///
  /// This is the exact inverse of [`deinterlace`](UncompressedImage::deinterlace):
  /// every pixel lands in the pass whose stride map covers its coordinates,
  /// and the passes are stored concatenated in pass order.
  #[must_use]
  pub fn interlace(self) -> UncompressedImage {
    let Self { mut properties, data } = self;
    let layout = Adam7Layout::new(properties.format, properties.shape.width, properties.shape.height);
    let depth = properties.format.bit_depth();
    let pitch = properties.shape.pitch;
    let mut out: Vec<u8> = Vec::new();
    out.resize(layout.bytes(), 0);
    let mut base = 0_usize;
    for sub in layout.passes() {
      let sub_pitch = sub.shape.pitch;
      if depth >= 8 {
        let bpp = (properties.format.channels() * depth) / 8;
        for (sy, dy) in sub.strider_y.iter().enumerate() {
          let pass_row = base + sub_pitch * sy;
          let flat_row = pitch * dy as usize;
          for (sx, dx) in sub.strider_x.iter().enumerate() {
            let dst = pass_row + sx * bpp;
            let src = flat_row + dx as usize * bpp;
            out[dst..dst + bpp].copy_from_slice(&data[src..src + bpp]);
          }
        }
      } else {
        for (sy, dy) in sub.strider_y.iter().enumerate() {
          let pass_row = base + sub_pitch * sy;
          let flat_row = pitch * dy as usize;
          for (sx, dx) in sub.strider_x.iter().enumerate() {
            let pass_bit = sx * depth;
            let flat_bit = dx as usize * depth;
            let value = (data[flat_row + (flat_bit >> 3)] << (flat_bit & 7)) >> (8 - depth);
            out[pass_row + (pass_bit >> 3)] |= value << (8 - (pass_bit & 7) - depth);
          }
        }
      }
      base += sub.bytes();
    }
    properties.interlacing = PngInterlacing::Adam7(layout);
    UncompressedImage { properties, data: out }
  }

  /// Iterate the sample values of a packed raster, row by row.
  ///
  /// Each packed pixel comes out in the low bits of its own byte, and the
  /// end-of-line padding bits are skipped.
  ///
  /// ## Panics
  /// * The format's bit depth must be 1, 2, or 4. Whole-byte formats have
  ///   multi-byte pixels that don't fit this shape; read them from
  ///   [`data`](Self::data) directly.
  pub fn iter_packed_samples(&self) -> impl Iterator<Item = u8> + '_ {
    let depth = self.properties.format.bit_depth();
    assert!(depth < 8);
    let width = self.properties.shape.width as usize;
    // a zero pitch means there's no data at all, but `chunks_exact` insists
    // on a nonzero size
    let pitch = self.properties.shape.pitch.max(1);
    self.data.chunks_exact(pitch).flat_map(move |line| {
      line
        .iter()
        .copied()
        .flat_map(move |bits| U8BitIterHigh::from_count_and_bits(depth as u32, bits))
        .take(width)
    })
  }
}

#[test]
fn test_deinterlace_is_identity_on_flat_data() {
  use crate::format::PngPixelFormat;
  // rgba8 at 3x2: pitch 12, 24 bytes, already flat
  let properties = PngProperties::new(PngPixelFormat::RGBA8, 3, 2, false);
  let bytes: Vec<u8> = (0..24).collect();
  let image = UncompressedImage::new(properties, bytes.clone());
  let flat = image.deinterlace();
  assert_eq!(flat.data(), &bytes[..]);
  assert_eq!(flat.properties().shape.pitch, 12);
}

#[test]
fn test_packed_sample_iteration() {
  use crate::format::PngPixelFormat;
  // 9 one-bit pixels across: bit 7 of the second byte is the ninth pixel
  // and the remaining seven bits are padding
  let properties = PngProperties::new(PngPixelFormat::Y1, 9, 1, false);
  let image = RectangularImage::new(properties, [0b1010_1010, 0b1000_0000].to_vec());
  let samples: Vec<u8> = image.iter_packed_samples().collect();
  assert_eq!(samples, [1, 0, 1, 0, 1, 0, 1, 0, 1]);
}
