use pngine::{PngNameError, SuggestedPalette, SuggestedPaletteEntries, SuggestedPaletteError};
use walkdir::WalkDir;

#[test]
fn test_serialized_layout_is_byte_exact() {
  let entries = SuggestedPaletteEntries::Rgba8(vec![([1, 2, 3, 4], 10), ([5, 6, 7, 8], 5)]);
  let pal = SuggestedPalette::new(b"x".to_vec(), entries).unwrap();
  assert_eq!(pal.to_bytes(), [b'x', 0x00, 0x08, 1, 2, 3, 4, 0x00, 0x0A, 5, 6, 7, 8, 0x00, 0x05]);
  //
  let entries = SuggestedPaletteEntries::Rgba16(vec![([0x0102, 0x0304, 0x0506, 0x0708], 0x0910)]);
  let pal = SuggestedPalette::new(b"deep".to_vec(), entries).unwrap();
  assert_eq!(
    pal.to_bytes(),
    [b'd', b'e', b'e', b'p', 0x00, 0x10, 1, 2, 3, 4, 5, 6, 7, 8, 9, 0x10]
  );
}

#[test]
fn test_parse_inverts_serialize() {
  let palettes = [
    SuggestedPalette::new(
      b"x".to_vec(),
      SuggestedPaletteEntries::Rgba8(vec![([1, 2, 3, 4], 10), ([5, 6, 7, 8], 5)]),
    )
    .unwrap(),
    // equal frequencies are allowed: descending is non-strict
    SuggestedPalette::new(
      b"flat ranks".to_vec(),
      SuggestedPaletteEntries::Rgba8(vec![([9, 9, 9, 9], 7), ([0, 0, 0, 0], 7)]),
    )
    .unwrap(),
    SuggestedPalette::new(
      b"deep".to_vec(),
      SuggestedPaletteEntries::Rgba16(vec![
        ([0xFFFF, 0, 0, 0xFFFF], 3),
        ([0, 0xFFFF, 0, 0xFFFF], 2),
        ([0, 0, 0xFFFF, 0xFFFF], 2),
      ]),
    )
    .unwrap(),
    SuggestedPalette::new(b"empty".to_vec(), SuggestedPaletteEntries::Rgba8(vec![])).unwrap(),
  ];
  for pal in palettes {
    assert_eq!(SuggestedPalette::parse(&pal.to_bytes()), Ok(pal));
  }
}

#[test]
fn test_frequencies_must_descend() {
  // both construction and parsing reject a rising frequency
  let rising = SuggestedPaletteEntries::Rgba8(vec![([1, 2, 3, 4], 5), ([5, 6, 7, 8], 10)]);
  assert_eq!(
    SuggestedPalette::new(b"x".to_vec(), rising),
    Err(SuggestedPaletteError::InvalidFrequency)
  );
  let bytes = [b'x', 0x00, 0x08, 1, 2, 3, 4, 0x00, 0x05, 5, 6, 7, 8, 0x00, 0x0A];
  assert_eq!(SuggestedPalette::parse(&bytes), Err(SuggestedPaletteError::InvalidFrequency));
  //
  let rising16 = SuggestedPaletteEntries::Rgba16(vec![([0, 0, 0, 0], 1), ([0, 0, 0, 0], 2)]);
  assert_eq!(
    SuggestedPalette::new(b"x".to_vec(), rising16),
    Err(SuggestedPaletteError::InvalidFrequency)
  );
}

#[test]
fn test_bad_names_are_rejected_everywhere() {
  let entries = SuggestedPaletteEntries::Rgba8(vec![]);
  assert_eq!(
    SuggestedPalette::new(b" pad".to_vec(), entries),
    Err(SuggestedPaletteError::InvalidName(PngNameError::LeadingSpace))
  );
  assert_eq!(
    SuggestedPalette::parse(b"a  b\x00\x08"),
    Err(SuggestedPaletteError::InvalidName(PngNameError::DoubleSpace))
  );
  assert_eq!(
    SuggestedPalette::parse(b"\x00\x08"),
    Err(SuggestedPaletteError::InvalidName(PngNameError::Empty))
  );
}

#[test]
fn test_srgb_entry_view() {
  let pal = SuggestedPalette::new(
    b"x".to_vec(),
    SuggestedPaletteEntries::Rgba8(vec![([1, 2, 3, 4], 9)]),
  )
  .unwrap();
  let entries: Vec<_> = pal.entries_srgb().unwrap().collect();
  assert_eq!(entries.len(), 1);
  let (color, freq) = entries[0];
  assert_eq!((color.r, color.g, color.b, color.a), (1, 2, 3, 4));
  assert_eq!(freq, 9);
  //
  let deep = SuggestedPalette::new(
    b"deep".to_vec(),
    SuggestedPaletteEntries::Rgba16(vec![([1, 2, 3, 4], 9)]),
  )
  .unwrap();
  assert!(deep.entries_srgb().is_none());
}

#[test]
fn test_parse_never_panics() {
  // every file under tests/ is fair game as a hostile chunk body, and so
  // are plain random bytes
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(_) => continue,
    };
    let _ = SuggestedPalette::parse(&v);
  }
  for _ in 0..10 {
    let v = super::rand_bytes(1024);
    let _ = SuggestedPalette::parse(&v);
  }
}
