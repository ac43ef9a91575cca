//! Bitmap helpers: decoding, lossless PNG encoding and validation.

use crate::result::{VistaError, VistaResult};
use image::{ImageEncoder, RgbImage};
use std::io::Write;
use std::path::Path;

/// Dense RGB8 pixel grid as produced by capture or loaded from storage.
pub type Bitmap = RgbImage;

/// Decode an encoded image (PNG, JPEG) into an RGB bitmap.
///
/// Alpha is discarded.
///
/// # Errors
///
/// Returns [`VistaError::InvalidImage`] if the data cannot be decoded.
pub fn decode(bytes: &[u8]) -> VistaResult<Bitmap> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| VistaError::invalid_image(format!("Failed to decode image: {e}")))?;
    Ok(img.to_rgb8())
}

/// Load an image file into an RGB bitmap.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or
/// [`VistaError::InvalidImage`] if it cannot be decoded.
pub fn load(path: &Path) -> VistaResult<Bitmap> {
    let bytes = std::fs::read(path)?;
    decode(&bytes).map_err(|e| match e {
        VistaError::InvalidImage { message } => {
            VistaError::invalid_image(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

/// Encode a bitmap as PNG into any writer.
///
/// # Errors
///
/// Returns [`VistaError::ImageProcessing`] if encoding fails.
pub fn write_png<W: Write>(bitmap: &Bitmap, writer: W) -> VistaResult<()> {
    image::codecs::png::PngEncoder::new(writer)
        .write_image(
            bitmap.as_raw(),
            bitmap.width(),
            bitmap.height(),
            image::ExtendedColorType::Rgb8,
        )
        .map_err(|e| VistaError::image_processing(format!("Failed to encode PNG: {e}")))
}

/// Encode a bitmap as PNG bytes.
///
/// # Errors
///
/// Returns [`VistaError::ImageProcessing`] if encoding fails.
pub fn encode_png(bitmap: &Bitmap) -> VistaResult<Vec<u8>> {
    let mut buffer = Vec::new();
    write_png(bitmap, &mut buffer)?;
    Ok(buffer)
}

/// Reject bitmaps with a zero dimension.
///
/// # Errors
///
/// Returns [`VistaError::InvalidImage`] naming `role` when width or height is zero.
pub fn ensure_non_empty(bitmap: &Bitmap, role: &str) -> VistaResult<()> {
    if bitmap.width() == 0 || bitmap.height() == 0 {
        return Err(VistaError::invalid_image(format!(
            "{role} image has zero dimension ({}x{})",
            bitmap.width(),
            bitmap.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_png_is_lossless() {
        let mut img = Bitmap::new(7, 5);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgb([(x * 31) as u8, (y * 47) as u8, ((x + y) * 13) as u8]);
        }
        let bytes = encode_png(&img).unwrap();
        let back = decode(&bytes).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode(&[0, 1, 2, 3, 4]);
        assert!(matches!(result, Err(VistaError::InvalidImage { .. })));
    }

    #[test]
    fn test_decode_drops_alpha() {
        let mut rgba = image::RgbaImage::new(2, 2);
        for pixel in rgba.pixels_mut() {
            *pixel = image::Rgba([10, 20, 30, 128]);
        }
        let mut buffer = Vec::new();
        image::codecs::png::PngEncoder::new(&mut buffer)
            .write_image(rgba.as_raw(), 2, 2, image::ExtendedColorType::Rgba8)
            .unwrap();
        let rgb = decode(&buffer).unwrap();
        assert_eq!(*rgb.get_pixel(1, 1), Rgb([10, 20, 30]));
    }

    #[test]
    fn test_ensure_non_empty() {
        assert!(ensure_non_empty(&Bitmap::new(1, 1), "current").is_ok());
        let err = ensure_non_empty(&Bitmap::new(0, 4), "baseline").unwrap_err();
        assert!(err.to_string().contains("baseline"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = load(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(VistaError::Io(_))));
    }
}
