#![no_std]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

//! Structural decoding of PNG data.
//!
//! * [Portable Network Graphics (PNG) Specification (Third Edition)][png-spec]
//!
//! [png-spec]: https://www.w3.org/TR/png/
//!
//! This crate covers the parts of a PNG decoder that are pure data
//! transformation over in-memory byte sequences:
//!
//! * The pixel formats and the byte geometry they produce ([`PngPixelFormat`],
//!   [`Shape`]).
//! * The Adam7 pass layout and the deinterlacer that merges the seven reduced
//!   images back into one flat raster ([`Adam7Layout`],
//!   [`UncompressedImage::deinterlace`]).
//! * The chunk-order grammar: a validator that takes chunk type tags in
//!   stream order and rejects the first one that breaks the layout rules
//!   ([`ChunkOrdering`]).
//! * The suggested-palette chunk body, parsed and re-packed byte exactly
//!   ([`SuggestedPalette`]).
//!
//! What it deliberately does *not* cover: Zlib decompression, scanline
//! filter reversal, CRC checks, and the length/type/data/crc chunk framing.
//! All of those work over the same byte sequences this crate produces or
//! consumes, and any implementation of them will do. The deinterlacer in
//! particular assumes its input has already been decompressed *and*
//! unfiltered.
//!
//! Everything here is synchronous, and allocation is confined to the output
//! buffer of the operation you asked for. With `default-features = false`
//! the crate is usable without an allocator at all, keeping the geometry
//! types and the validator.

#[cfg(feature = "alloc")]
extern crate alloc;

mod byte_source;
mod format;
mod interlace;
mod ordering;
#[cfg(feature = "alloc")]
mod properties;
#[cfg(feature = "alloc")]
mod raster;
#[cfg(feature = "alloc")]
mod splt;

pub use byte_source::*;
pub use format::*;
pub use interlace::*;
pub use ordering::*;
#[cfg(feature = "alloc")]
pub use properties::*;
#[cfg(feature = "alloc")]
pub use raster::*;
#[cfg(feature = "alloc")]
pub use splt::*;
