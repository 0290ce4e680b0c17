//! The suggested-palette chunk: a named, frequency-ranked palette that a
//! viewer can quantize with when the display can't show the real pixels.
//!
//! Unlike most PNG chunks the body layout here is variable twice over: the
//! name is null-terminated, and a depth code picks between 6-byte and
//! 10-byte entries. Entries are kept sorted by how often their color
//! appears, most frequent first.

use alloc::vec::Vec;
use pixel_formats::r8g8b8a8_Srgb;

/// Why a palette name failed the text-name rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PngNameError {
  /// Names hold at least one byte.
  Empty,
  /// Names hold at most 79 bytes.
  TooLong,
  /// A byte outside the printable Latin-1 ranges.
  IllegalByte(u8),
  /// Names can't open with a space.
  LeadingSpace,
  /// Names can't close with a space.
  TrailingSpace,
  /// Names can't contain two spaces in a row.
  DoubleSpace,
}

/// Errors from reading or building a suggested palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestedPaletteError {
  /// The palette name broke the text-name rules.
  InvalidName(PngNameError),
  /// The chunk body ends before the name, its null, and the depth code can.
  InvalidChunkLength {
    /// Bytes the body actually holds.
    got: usize,
    /// Fewest bytes a body with this name could hold.
    min: usize,
  },
  /// The entry bytes aren't a whole number of entries.
  InvalidDataLength {
    /// Bytes left over after the depth code.
    bytes: usize,
    /// Bytes per entry at the declared depth.
    stride: usize,
  },
  /// The sample depth code was something other than 8 or 16.
  InvalidDepthCode(u8),
  /// Entry frequencies must never increase.
  InvalidFrequency,
}

/// Check a byte string against the PNG text-name rules.
///
/// Names are 1 to 79 bytes of printable Latin-1 (`0x20..=0x7D` or
/// `0xA1..=0xFF`), with no space at either end and no two spaces in a row.
pub fn check_png_text_name(name: &[u8]) -> Result<(), PngNameError> {
  match name {
    [] => return Err(PngNameError::Empty),
    [b' ', ..] => return Err(PngNameError::LeadingSpace),
    [.., b' '] => return Err(PngNameError::TrailingSpace),
    _ if name.len() > 79 => return Err(PngNameError::TooLong),
    _ => (),
  }
  let mut prev_space = false;
  for b in name.iter().copied() {
    if !matches!(b, 0x20..=0x7D | 0xA1..=0xFF) {
      return Err(PngNameError::IllegalByte(b));
    }
    if b == b' ' && prev_space {
      return Err(PngNameError::DoubleSpace);
    }
    prev_space = b == b' ';
  }
  Ok(())
}

/// The entry list of a suggested palette, at one of the two sample depths.
///
/// Either way an entry is an RGBA color paired with its frequency rank.
/// Frequencies are relative: only their order means anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestedPaletteEntries {
  /// One byte per channel.
  Rgba8(Vec<([u8; 4], u16)>),
  /// Two big-endian bytes per channel.
  Rgba16(Vec<([u16; 4], u16)>),
}
impl SuggestedPaletteEntries {
  /// How many entries the list holds.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    match self {
      Self::Rgba8(v) => v.len(),
      Self::Rgba16(v) => v.len(),
    }
  }

  /// Is the list empty? (A palette with no entries is legal.)
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The depth code this list serializes under: 8 or 16.
  #[inline]
  #[must_use]
  pub const fn depth(&self) -> u8 {
    match self {
      Self::Rgba8(_) => 8,
      Self::Rgba16(_) => 16,
    }
  }

  fn frequencies_descend(&self) -> bool {
    fn check<C>(entries: &[(C, u16)]) -> bool {
      entries.windows(2).all(|pair| pair[0].1 >= pair[1].1)
    }
    match self {
      Self::Rgba8(v) => check(v),
      Self::Rgba16(v) => check(v),
    }
  }
}

/// A parsed suggested-palette chunk body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestedPalette {
  name: Vec<u8>,
  entries: SuggestedPaletteEntries,
}
impl SuggestedPalette {
  /// Build a palette, checking the name and the frequency order.
  pub fn new(
    name: Vec<u8>, entries: SuggestedPaletteEntries,
  ) -> Result<Self, SuggestedPaletteError> {
    check_png_text_name(&name).map_err(SuggestedPaletteError::InvalidName)?;
    if !entries.frequencies_descend() {
      return Err(SuggestedPaletteError::InvalidFrequency);
    }
    Ok(Self { name, entries })
  }

  /// The palette's name: printable Latin-1 bytes, not necessarily UTF-8.
  #[inline]
  #[must_use]
  pub fn name(&self) -> &[u8] {
    &self.name
  }

  /// The entries, most frequent first.
  #[inline]
  #[must_use]
  pub const fn entries(&self) -> &SuggestedPaletteEntries {
    &self.entries
  }

  /// View 8-bit entries as sRGB color values with their frequencies.
  ///
  /// Gives `None` for a 16-bit palette; picking how to narrow those samples
  /// is the caller's call.
  pub fn entries_srgb(&self) -> Option<impl Iterator<Item = (r8g8b8a8_Srgb, u16)> + '_> {
    match &self.entries {
      SuggestedPaletteEntries::Rgba8(v) => Some(
        v.iter().copied().map(|([r, g, b, a], freq)| (r8g8b8a8_Srgb { r, g, b, a }, freq)),
      ),
      SuggestedPaletteEntries::Rgba16(_) => None,
    }
  }

  /// Parse a suggested-palette chunk body.
  pub fn parse(data: &[u8]) -> Result<Self, SuggestedPaletteError> {
    use SuggestedPaletteError::*;
    let mut it = data.splitn(2, |u| u == &0_u8);
    let name = it.next().unwrap_or(&[]);
    check_png_text_name(name).map_err(InvalidName)?;
    let rest = match it.next() {
      Some(rest) if !rest.is_empty() => rest,
      _ => return Err(InvalidChunkLength { got: data.len(), min: name.len() + 2 }),
    };
    let (depth, body) = (rest[0], &rest[1..]);
    let entries = match depth {
      8 => {
        if body.len() % 6 != 0 {
          return Err(InvalidDataLength { bytes: body.len(), stride: 6 });
        }
        SuggestedPaletteEntries::Rgba8(
          body
            .chunks_exact(6)
            .map(|e| ([e[0], e[1], e[2], e[3]], u16::from_be_bytes([e[4], e[5]])))
            .collect(),
        )
      }
      16 => {
        if body.len() % 10 != 0 {
          return Err(InvalidDataLength { bytes: body.len(), stride: 10 });
        }
        SuggestedPaletteEntries::Rgba16(
          body
            .chunks_exact(10)
            .map(|e| {
              (
                [
                  u16::from_be_bytes([e[0], e[1]]),
                  u16::from_be_bytes([e[2], e[3]]),
                  u16::from_be_bytes([e[4], e[5]]),
                  u16::from_be_bytes([e[6], e[7]]),
                ],
                u16::from_be_bytes([e[8], e[9]]),
              )
            })
            .collect(),
        )
      }
      code => return Err(InvalidDepthCode(code)),
    };
    if !entries.frequencies_descend() {
      return Err(InvalidFrequency);
    }
    Ok(Self { name: name.to_vec(), entries })
  }

  /// Pack the palette back into chunk-body bytes.
  ///
  /// This is the exact inverse of [`parse`](Self::parse): name bytes, a
  /// null, the depth code, then the packed entries.
  #[must_use]
  pub fn to_bytes(&self) -> Vec<u8> {
    let stride = match &self.entries {
      SuggestedPaletteEntries::Rgba8(_) => 6,
      SuggestedPaletteEntries::Rgba16(_) => 10,
    };
    let mut out = Vec::with_capacity(self.name.len() + 2 + self.entries.len() * stride);
    out.extend_from_slice(&self.name);
    out.push(0);
    out.push(self.entries.depth());
    match &self.entries {
      SuggestedPaletteEntries::Rgba8(v) => {
        for ([r, g, b, a], freq) in v.iter().copied() {
          out.extend_from_slice(&[r, g, b, a]);
          out.extend_from_slice(&freq.to_be_bytes());
        }
      }
      SuggestedPaletteEntries::Rgba16(v) => {
        for (rgba, freq) in v.iter().copied() {
          for sample in rgba {
            out.extend_from_slice(&sample.to_be_bytes());
          }
          out.extend_from_slice(&freq.to_be_bytes());
        }
      }
    }
    out
  }
}

#[test]
fn test_name_rules() {
  assert_eq!(check_png_text_name(b"x"), Ok(()));
  assert_eq!(check_png_text_name(b"gray ramp"), Ok(()));
  assert_eq!(check_png_text_name(b""), Err(PngNameError::Empty));
  assert_eq!(check_png_text_name(b" x"), Err(PngNameError::LeadingSpace));
  assert_eq!(check_png_text_name(b"x "), Err(PngNameError::TrailingSpace));
  assert_eq!(check_png_text_name(b"a  b"), Err(PngNameError::DoubleSpace));
  assert_eq!(check_png_text_name(b"a\x00b"), Err(PngNameError::IllegalByte(0)));
  // 0x7E sits in the printable ascii gap the text-name rules carve out
  assert_eq!(check_png_text_name(b"a~b"), Err(PngNameError::IllegalByte(b'~')));
  assert_eq!(check_png_text_name(&[b'a', 0xA1]), Ok(()));
  assert_eq!(check_png_text_name(&[b'a', 0x80]), Err(PngNameError::IllegalByte(0x80)));
  let long = [b'n'; 80];
  assert_eq!(check_png_text_name(&long), Err(PngNameError::TooLong));
  assert_eq!(check_png_text_name(&long[..79]), Ok(()));
}

#[test]
fn test_depth_code_and_strides() {
  use SuggestedPaletteError::*;
  // no null terminator at all
  assert_eq!(
    SuggestedPalette::parse(b"abc"),
    Err(InvalidChunkLength { got: 3, min: 5 })
  );
  // null but no depth byte
  assert_eq!(
    SuggestedPalette::parse(b"abc\x00"),
    Err(InvalidChunkLength { got: 4, min: 5 })
  );
  assert_eq!(SuggestedPalette::parse(b"abc\x00\x07"), Err(InvalidDepthCode(7)));
  assert_eq!(
    SuggestedPalette::parse(b"abc\x00\x08\x01\x02\x03"),
    Err(InvalidDataLength { bytes: 3, stride: 6 })
  );
  assert_eq!(
    SuggestedPalette::parse(b"abc\x00\x10\x01\x02\x03\x04\x05\x06"),
    Err(InvalidDataLength { bytes: 6, stride: 10 })
  );
  // zero entries at either depth is fine
  assert!(SuggestedPalette::parse(b"abc\x00\x08").is_ok());
  assert!(SuggestedPalette::parse(b"abc\x00\x10").is_ok());
}
