//! The chunk-order grammar of a PNG stream.
//!
//! PNG places every chunk type into a small set of positional classes: some
//! must come before the palette, more must come before the image data, and
//! most of those may only appear once. A decoder that wants to reject
//! malformed streams *before* doing pixel work feeds each chunk's type tag
//! through [`ChunkOrdering`] as it frames the stream.

use crate::format::PngPixelFormat;
use core::fmt::Write;

/// A four-byte chunk type tag, as it appears on the wire.
///
/// The known tags have associated consts, but any four bytes are a value of
/// this type; private and unknown tags just don't get consts. The grammar
/// lets unknown tags appear anywhere after the header.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct PngChunkType(pub [u8; 4]);
#[allow(nonstandard_style, missing_docs)]
impl PngChunkType {
  pub const IHDR: Self = Self(*b"IHDR");
  pub const PLTE: Self = Self(*b"PLTE");
  pub const IDAT: Self = Self(*b"IDAT");
  pub const IEND: Self = Self(*b"IEND");
  pub const cHRM: Self = Self(*b"cHRM");
  pub const gAMA: Self = Self(*b"gAMA");
  pub const iCCP: Self = Self(*b"iCCP");
  pub const sBIT: Self = Self(*b"sBIT");
  pub const sRGB: Self = Self(*b"sRGB");
  pub const bKGD: Self = Self(*b"bKGD");
  pub const hIST: Self = Self(*b"hIST");
  pub const tRNS: Self = Self(*b"tRNS");
  pub const pHYs: Self = Self(*b"pHYs");
  pub const sPLT: Self = Self(*b"sPLT");
  pub const tIME: Self = Self(*b"tIME");
  pub const iTXt: Self = Self(*b"iTXt");
  pub const tEXt: Self = Self(*b"tEXt");
  pub const zTXt: Self = Self(*b"zTXt");
}
impl PngChunkType {
  /// Index into the seen-set, for the tags the grammar tracks.
  const fn bit(self) -> Option<u32> {
    Some(match &self.0 {
      b"IHDR" => 0,
      b"PLTE" => 1,
      b"IDAT" => 2,
      b"IEND" => 3,
      b"cHRM" => 4,
      b"gAMA" => 5,
      b"iCCP" => 6,
      b"sBIT" => 7,
      b"sRGB" => 8,
      b"bKGD" => 9,
      b"hIST" => 10,
      b"tRNS" => 11,
      b"pHYs" => 12,
      b"sPLT" => 13,
      b"tIME" => 14,
      b"iTXt" => 15,
      b"tEXt" => 16,
      b"zTXt" => 17,
      _ => return None,
    })
  }
}
impl core::fmt::Debug for PngChunkType {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char(self.0[0] as char)?;
    f.write_char(self.0[1] as char)?;
    f.write_char(self.0[2] as char)?;
    f.write_char(self.0[3] as char)?;
    Ok(())
  }
}

/// Positional rules for one tag, as flags rather than a rule ladder.
#[derive(Debug, Clone, Copy)]
struct Placement {
  /// Must come before any palette.
  before_plte: bool,
  /// Must come before the image data.
  before_idat: bool,
  /// May appear at most once.
  single: bool,
}
const fn placement(ty: PngChunkType) -> Placement {
  match &ty.0 {
    b"cHRM" | b"gAMA" | b"iCCP" | b"sBIT" | b"sRGB" => {
      Placement { before_plte: true, before_idat: true, single: true }
    }
    b"PLTE" | b"bKGD" | b"hIST" | b"tRNS" | b"pHYs" | b"sPLT" => {
      Placement { before_plte: false, before_idat: true, single: true }
    }
    b"IHDR" | b"tIME" => Placement { before_plte: false, before_idat: false, single: true },
    _ => Placement { before_plte: false, before_idat: false, single: false },
  }
}

/// Why a chunk stream stopped being a legal PNG layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkOrderError {
  /// Something other than the header came first, or the header's format was
  /// never delivered.
  MissingHeader,
  /// A chunk arrived after the trailer, or the trailer arrived before any
  /// image data.
  PrematureEnd,
  /// The chunk can't appear at all given the image's pixel format.
  Illegal(PngChunkType),
  /// The chunk is legal but sits in a spot the positional rules forbid.
  Misplaced(PngChunkType),
  /// A second copy of a chunk that may appear at most once.
  Duplicate(PngChunkType),
  /// An indexed image reached its image data without any palette.
  MissingPalette,
}

/// Validates that the chunks of a PNG stream arrive in a legal order.
///
/// Feed every chunk's type tag in stream order: the header through
/// [`push_ihdr`](Self::push_ihdr) (which also delivers the pixel format the
/// outer parser read from it), everything else through
/// [`push`](Self::push). The first offending tag reports its error and
/// leaves the validator exactly as it was, so a tolerant caller can skip
/// the offender and push on.
#[derive(Debug, Clone, Default)]
pub struct ChunkOrdering {
  last: Option<PngChunkType>,
  seen: u32,
  format: Option<PngPixelFormat>,
}
impl ChunkOrdering {
  /// A validator that has seen nothing yet.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { last: None, seen: 0, format: None }
  }

  /// The pixel format delivered with the header, once the header is in.
  #[inline]
  #[must_use]
  pub const fn format(&self) -> Option<PngPixelFormat> {
    self.format
  }

  /// The most recently accepted tag.
  #[inline]
  #[must_use]
  pub const fn last_accepted(&self) -> Option<PngChunkType> {
    self.last
  }

  /// Push the header tag, along with the pixel format parsed from it.
  #[inline]
  pub fn push_ihdr(&mut self, format: PngPixelFormat) -> Result<(), ChunkOrderError> {
    self.advance(PngChunkType::IHDR, Some(format))
  }

  /// Push any non-header chunk type tag.
  ///
  /// Pushing `IHDR` here can never succeed: as the first chunk it must come
  /// with its format (use [`push_ihdr`](Self::push_ihdr)), and later on
  /// it's a duplicate.
  #[inline]
  pub fn push(&mut self, ty: PngChunkType) -> Result<(), ChunkOrderError> {
    self.advance(ty, None)
  }

  fn saw(&self, ty: PngChunkType) -> bool {
    match ty.bit() {
      Some(bit) => self.seen & (1 << bit) != 0,
      None => false,
    }
  }

  fn advance(
    &mut self, ty: PngChunkType, ihdr_format: Option<PngPixelFormat>,
  ) -> Result<(), ChunkOrderError> {
    use ChunkOrderError::*;
    if self.last.is_none() {
      // nothing may come before the header
      if ty != PngChunkType::IHDR || ihdr_format.is_none() {
        return Err(MissingHeader);
      }
      self.format = ihdr_format;
    } else {
      if self.last == Some(PngChunkType::IEND) {
        return Err(PrematureEnd);
      }
      let format = match self.format {
        Some(format) => format,
        None => return Err(MissingHeader),
      };
      if ty == PngChunkType::tRNS && format.has_alpha() {
        return Err(Illegal(ty));
      }
      if ty == PngChunkType::PLTE {
        if !format.has_color() {
          return Err(Illegal(ty));
        }
        let follows_palette = [PngChunkType::bKGD, PngChunkType::hIST, PngChunkType::tRNS];
        if follows_palette.into_iter().any(|t| self.saw(t)) {
          return Err(Misplaced(ty));
        }
      }
      let rules = placement(ty);
      if rules.before_plte && self.saw(PngChunkType::PLTE) {
        return Err(Misplaced(ty));
      }
      if rules.before_idat && self.saw(PngChunkType::IDAT) {
        return Err(Misplaced(ty));
      }
      if rules.single && self.saw(ty) {
        return Err(Duplicate(ty));
      }
      if ty == PngChunkType::IDAT {
        // image data chunks must sit in one unbroken run
        if self.saw(PngChunkType::IDAT) && self.last != Some(PngChunkType::IDAT) {
          return Err(Misplaced(ty));
        }
        if format.is_indexed() && !self.saw(PngChunkType::PLTE) {
          return Err(MissingPalette);
        }
      }
      if ty == PngChunkType::IEND && !self.saw(PngChunkType::IDAT) {
        return Err(PrematureEnd);
      }
    }
    self.last = Some(ty);
    if let Some(bit) = ty.bit() {
      self.seen |= 1 << bit;
    }
    Ok(())
  }
}

#[test]
fn test_minimal_stream() {
  let mut v = ChunkOrdering::new();
  assert_eq!(v.push_ihdr(PngPixelFormat::Y8), Ok(()));
  assert_eq!(v.push(PngChunkType::IDAT), Ok(()));
  assert_eq!(v.push(PngChunkType::IEND), Ok(()));
  // nothing at all may follow the trailer
  assert_eq!(v.push(PngChunkType::IEND), Err(ChunkOrderError::PrematureEnd));
  assert_eq!(v.push(PngChunkType::tEXt), Err(ChunkOrderError::PrematureEnd));
}

#[test]
fn test_header_must_come_first() {
  let mut v = ChunkOrdering::new();
  assert_eq!(v.push(PngChunkType::gAMA), Err(ChunkOrderError::MissingHeader));
  // a rejected push doesn't advance anything
  assert_eq!(v.last_accepted(), None);
  assert_eq!(v.push(PngChunkType::IHDR), Err(ChunkOrderError::MissingHeader));
  assert_eq!(v.push_ihdr(PngPixelFormat::RGB8), Ok(()));
  assert_eq!(v.push_ihdr(PngPixelFormat::RGB8), Err(ChunkOrderError::Duplicate(PngChunkType::IHDR)));
}

#[test]
fn test_unknown_tags_flow_through() {
  let mut v = ChunkOrdering::new();
  assert_eq!(v.push(PngChunkType(*b"prVt")), Err(ChunkOrderError::MissingHeader));
  assert_eq!(v.push_ihdr(PngPixelFormat::YA8), Ok(()));
  assert_eq!(v.push(PngChunkType(*b"prVt")), Ok(()));
  assert_eq!(v.push(PngChunkType::IDAT), Ok(()));
  assert_eq!(v.push(PngChunkType(*b"prVt")), Ok(()));
  assert_eq!(v.push(PngChunkType::IEND), Ok(()));
}
