use pngine::{
  Adam7Layout, PngPixelFormat, PngProperties, RectangularImage, UncompressedImage,
};

const ALL_FORMATS: [PngPixelFormat; 15] = [
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

#[test]
fn test_flat_data_passes_through() {
  // rgba8 at 3x2: pitch 12, 24 bytes total, and nothing to reorder
  let properties = PngProperties::new(PngPixelFormat::RGBA8, 3, 2, false);
  assert_eq!(properties.shape.pitch, 12);
  assert_eq!(properties.shape.bytes(), 24);
  let bytes = super::rand_bytes(24);
  let flat = UncompressedImage::new(properties, bytes.clone()).deinterlace();
  assert_eq!(flat.data(), &bytes[..]);
  assert!(!flat.properties().interlacing.is_interlaced());
}

#[test]
fn test_passes_cover_every_pixel_once() {
  for (w, h) in [(1, 1), (7, 3), (8, 8), (9, 9), (12, 5), (31, 17)] {
    let layout = Adam7Layout::new(PngPixelFormat::Y8, w, h);
    let mut hits = vec![0_u8; (w * h) as usize];
    for sub in layout.passes() {
      for dy in sub.strider_y.iter() {
        for dx in sub.strider_x.iter() {
          assert!(dx < w && dy < h, "{w}x{h} hit ({dx},{dy})");
          hits[(dy * w + dx) as usize] += 1;
        }
      }
    }
    assert!(hits.iter().all(|&count| count == 1), "{w}x{h}");
  }
}

#[test]
fn test_deinterlace_rgb8_8x8() {
  // zero-based pass index of every pixel in the 8x8 tile
  const PASS_GRID: [[u8; 8]; 8] = [
    [0, 5, 3, 5, 1, 5, 3, 5],
    [6, 6, 6, 6, 6, 6, 6, 6],
    [4, 5, 4, 5, 4, 5, 4, 5],
    [6, 6, 6, 6, 6, 6, 6, 6],
    [2, 5, 3, 5, 2, 5, 3, 5],
    [6, 6, 6, 6, 6, 6, 6, 6],
    [4, 5, 4, 5, 4, 5, 4, 5],
    [6, 6, 6, 6, 6, 6, 6, 6],
  ];
  // Build the concatenated pass buffer by hand: each pixel carries the
  // full-image position it should land on plus its pass index, so any
  // misrouted copy shows up in the assert below. RGB8 scanlines have no
  // bit padding, so the passes are just pixels back to back.
  let layout = Adam7Layout::new(PngPixelFormat::RGB8, 8, 8);
  let mut woven: Vec<u8> = Vec::new();
  for (p, sub) in layout.passes().iter().enumerate() {
    for dy in sub.strider_y.iter() {
      for dx in sub.strider_x.iter() {
        woven.extend_from_slice(&[dx as u8, dy as u8, p as u8]);
      }
    }
  }
  assert_eq!(woven.len(), 192);
  let properties = PngProperties::new(PngPixelFormat::RGB8, 8, 8, true);
  assert_eq!(properties.data_len(), 192);
  let flat = UncompressedImage::new(properties, woven).deinterlace();
  let data = flat.data();
  for y in 0..8_usize {
    for x in 0..8_usize {
      let off = y * 24 + x * 3;
      assert_eq!(
        &data[off..off + 3],
        &[x as u8, y as u8, PASS_GRID[y][x]][..],
        "pixel ({x},{y})"
      );
    }
  }
}

#[test]
fn test_deinterlace_packed_1bpp() {
  // gray1 at 9x1 has four non-empty passes, one scanline each, and every
  // pass scanline rounds up to its own whole byte
  let properties = PngProperties::new(PngPixelFormat::Y1, 9, 1, true);
  assert_eq!(properties.data_len(), 4);
  // pixel at column x holds x & 1: pass one covers 0 and 8, pass two
  // covers 4, pass four covers 2 and 6, pass six covers the odd columns
  let woven = vec![0b0000_0000, 0b0000_0000, 0b0000_0000, 0b1111_0000];
  let flat = UncompressedImage::new(properties, woven).deinterlace();
  assert_eq!(flat.data(), &[0b0101_0101, 0b0000_0000][..]);

  // all-ones input: the seven padding bits of the last byte stay zero
  let properties = PngProperties::new(PngPixelFormat::Y1, 9, 1, true);
  let woven = vec![0b1100_0000, 0b1000_0000, 0b1100_0000, 0b1111_0000];
  let flat = UncompressedImage::new(properties, woven).deinterlace();
  assert_eq!(flat.data(), &[0b1111_1111, 0b1000_0000][..]);
  let samples: Vec<u8> = flat.iter_packed_samples().collect();
  assert_eq!(samples, [1; 9]);
}

#[test]
fn test_interlace_round_trips() {
  for format in ALL_FORMATS {
    for (w, h) in [(1, 1), (3, 2), (8, 8), (9, 5), (13, 1), (1, 13), (16, 16)] {
      let properties = PngProperties::new(format, w, h, false);
      let pitch = properties.shape.pitch;
      let bytes = super::rand_bytes(properties.shape.bytes());
      let start = RectangularImage::new(properties, bytes.clone());
      let back = start.interlace().deinterlace();
      if format.bit_depth() >= 8 {
        // whole-byte rasters survive the trip byte for byte
        assert_eq!(back.data(), &bytes[..], "{format:?} {w}x{h}");
      } else {
        // packed rasters come back with their padding bits cleared, but a
        // second trip must be a fixed point
        let depth = format.bit_depth();
        let used_bits = w as usize * depth;
        let rem = used_bits & 7;
        if rem != 0 {
          for line in back.data().chunks_exact(pitch) {
            assert_eq!(line[used_bits >> 3] & (0xFF >> rem), 0, "{format:?} {w}x{h}");
          }
        }
        let again = back.clone().interlace().deinterlace();
        assert_eq!(back, again, "{format:?} {w}x{h}");
      }
    }
  }
}

#[test]
fn test_decompose_matches_byte_ranges() {
  let properties = PngProperties::new(PngPixelFormat::RGB8, 8, 8, true);
  let data = super::rand_bytes(192);
  let image = UncompressedImage::new(properties, data.clone());
  let passes = image.decompose().unwrap();
  let layout = Adam7Layout::new(PngPixelFormat::RGB8, 8, 8);
  for ((pass, range), sub) in passes.iter().zip(layout.byte_ranges()).zip(layout.passes()) {
    assert_eq!(pass.data(), &data[range]);
    assert_eq!(pass.properties().shape, sub.shape);
    assert!(!pass.properties().interlacing.is_interlaced());
  }
  // a flat image has no passes to split out
  let flat = UncompressedImage::new(
    PngProperties::new(PngPixelFormat::RGB8, 2, 2, false),
    super::rand_bytes(12),
  );
  assert!(flat.decompose().is_none());
}

#[test]
fn test_decompose_then_reassemble() {
  // gluing the decomposed passes back together gives the source buffer
  let properties = PngProperties::new(PngPixelFormat::YA8, 11, 7, true);
  let data = super::rand_bytes(properties.data_len());
  let image = UncompressedImage::new(properties, data.clone());
  let mut glued: Vec<u8> = Vec::new();
  for pass in image.decompose().unwrap() {
    glued.extend_from_slice(pass.data());
  }
  assert_eq!(glued, data);
}
