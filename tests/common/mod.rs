//! Shared synthetic-image fixtures for the integration test suites

// Each test binary compiles its own copy; not every binary uses every helper.
#![allow(dead_code)]

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};

/// Build an image with a uniform border of `border` pixels around a
/// uniform interior.
pub(crate) fn framed_image(
    width: u32,
    height: u32,
    border: u32,
    frame: [u8; 3],
    interior: [u8; 3],
) -> DynamicImage {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_fn(width, height, |x, y| {
        let inside = x >= border && x < width - border && y >= border && y < height - border;
        if inside {
            Rgb(interior)
        } else {
            Rgb(frame)
        }
    });
    DynamicImage::ImageRgb8(img)
}

/// Build a single uniform fill image.
pub(crate) fn solid_image(width: u32, height: u32, color: [u8; 3]) -> DynamicImage {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::from_pixel(width, height, Rgb(color));
    DynamicImage::ImageRgb8(img)
}

/// Encode an image into the given format in memory.
pub(crate) fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut std::io::Cursor::new(&mut bytes), format)
        .expect("in-memory encoding of a synthetic image should not fail");
    bytes
}

/// PNG bytes for a black-bordered artwork: the canonical clear-frame case.
pub(crate) fn black_border_png() -> Vec<u8> {
    encode(
        &framed_image(500, 500, 50, [0, 0, 0], [255, 200, 100]),
        ImageFormat::Png,
    )
}
