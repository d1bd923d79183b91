use image::{ImageFormat, Rgba, RgbaImage};
use palette::Srgb;
use portfolio_gallery_wasm::extractor::{PaletteSlot, read_image};
use portfolio_gallery_wasm::{ImageLoadError, extract_palette};

#[test]
fn palette_from_a_png_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cover.png");
    RgbaImage::from_pixel(320, 200, Rgba([30, 60, 250, 255]))
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();

    let bytes = read_image(&path).unwrap();
    let swatches = extract_palette(&bytes, 4);

    assert_eq!(swatches.len(), 1);
    assert_eq!(swatches[0].rgb(), Srgb::new(32, 64, 255));
    assert_eq!(swatches[0].css(), "rgb(32, 64, 255)");
}

#[test]
fn missing_file_resolves_slot_to_empty_palette() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gone.png");

    let mut slot = PaletteSlot::new();
    let ticket = slot.request("gone.png", 5).unwrap();
    let loaded = read_image(&path);
    assert!(matches!(loaded, Err(ImageLoadError::Io { .. })));

    assert!(slot.resolve(ticket, Err(loaded.unwrap_err())));
    assert!(slot.is_resolved());
    assert!(slot.swatches().is_empty());
}
