use bytes::Bytes;
use image::{imageops::FilterType, DynamicImage, RgbImage};
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};
use tower::Service;

use crate::common::Color;
use crate::error::ExtractionError;

/// Side length of the canvas every image is reduced to before counting colors.
pub const CANVAS_SIZE: u32 = 64;

/// Reduces an encoded image to its single most frequent RGB value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorExtractionService;

impl ColorExtractionService {
    pub fn new() -> Self {
        Self
    }

    /// Decodes `bytes` (format auto-detected) and returns the dominant color.
    pub fn extract_dominant_color(bytes: &[u8]) -> Result<Color, ExtractionError> {
        let image = image::load_from_memory(bytes)?;
        tracing::debug!(
            "Decoded {}x{} image from {} bytes",
            image.width(),
            image.height(),
            bytes.len()
        );
        Ok(Self::dominant_color(&image))
    }

    /// Dominant color of an already decoded image.
    ///
    /// Alpha is discarded. Images with no pixels yield [`Color::FALLBACK`].
    pub fn dominant_color(image: &DynamicImage) -> Color {
        if image.width() == 0 || image.height() == 0 {
            tracing::warn!("Image has no pixels, using fallback color");
            return Color::FALLBACK;
        }

        let canvas = Self::downscale(image.to_rgb8());
        Self::most_frequent(&canvas).unwrap_or_else(|| {
            tracing::warn!("No colors counted, using fallback color");
            Color::FALLBACK
        })
    }

    fn downscale(rgb_image: RgbImage) -> RgbImage {
        if rgb_image.dimensions() == (CANVAS_SIZE, CANVAS_SIZE) {
            return rgb_image;
        }
        image::imageops::resize(&rgb_image, CANVAS_SIZE, CANVAS_SIZE, FilterType::CatmullRom)
    }

    // Highest count wins; ties go to the largest (r, g, b) tuple.
    fn most_frequent(image: &RgbImage) -> Option<Color> {
        let mut color_counts: HashMap<Color, u32> = HashMap::new();
        for px in image.pixels() {
            *color_counts.entry(Color::from(*px)).or_insert(0) += 1;
        }

        color_counts
            .into_iter()
            .max_by_key(|&(color, count)| (count, color))
            .map(|(color, _)| color)
    }
}

impl Service<Bytes> for ColorExtractionService {
    type Response = Color;
    type Error = ExtractionError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, image: Bytes) -> Self::Future {
        Box::pin(async move {
            tokio::task::spawn_blocking(move || Self::extract_dominant_color(&image))
                .await
                .map_err(|e| ExtractionError::Join(e.to_string()))?
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, ImageFormat, Rgb, Rgba, RgbaImage};
    use std::io::Cursor;
    use tower::ServiceExt;

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, format).unwrap();
        bytes.into_inner()
    }

    fn solid_png(width: u32, height: u32, rgb: [u8; 3]) -> Vec<u8> {
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(width, height, Rgb(rgb));
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    #[test]
    fn frequency_beats_tie_break() {
        let mut img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(64, 64, Rgb([10, 10, 10]));
        img.put_pixel(17, 42, Rgb([250, 250, 250]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Png);

        let color = ColorExtractionService::extract_dominant_color(&bytes).unwrap();
        assert_eq!(color, Color::new(10, 10, 10));
    }

    #[test]
    fn equal_counts_pick_largest_rgb_tuple() {
        // Left half (0, 0, 200), right half (0, 200, 0): equal counts.
        let img = ImageBuffer::from_fn(64, 64, |x, _| {
            if x < 32 {
                Rgb([0u8, 0, 200])
            } else {
                Rgb([0u8, 200, 0])
            }
        });
        let image = DynamicImage::ImageRgb8(img);
        for _ in 0..5 {
            assert_eq!(
                ColorExtractionService::dominant_color(&image),
                Color::new(0, 200, 0)
            );
        }
    }

    #[test]
    fn solid_images_of_any_size_keep_their_color() {
        for (w, h) in [(1, 1), (64, 64), (300, 120)] {
            let bytes = solid_png(w, h, [200, 0, 100]);
            let color = ColorExtractionService::extract_dominant_color(&bytes).unwrap();
            // resampling may be off by one after rounding
            assert!(color.r.abs_diff(200) <= 1, "{w}x{h}: {color}");
            assert_eq!(color.g, 0, "{w}x{h}: {color}");
            assert!(color.b.abs_diff(100) <= 1, "{w}x{h}: {color}");
        }
    }

    #[test]
    fn single_black_pixel() {
        let bytes = solid_png(1, 1, [0, 0, 0]);
        let color = ColorExtractionService::extract_dominant_color(&bytes).unwrap();
        assert_eq!(color, Color::new(0, 0, 0));
        let hsv = color.to_hsv();
        assert_eq!((hsv.h, hsv.s, hsv.v), (0.0, 0.0, 0.0));
    }

    #[test]
    fn alpha_channel_is_discarded() {
        let img = RgbaImage::from_pixel(64, 64, Rgba([0, 0, 255, 10]));
        let bytes = encode(DynamicImage::ImageRgba8(img), ImageFormat::Png);
        let color = ColorExtractionService::extract_dominant_color(&bytes).unwrap();
        assert_eq!(color, Color::new(0, 0, 255));
    }

    #[test]
    fn jpeg_input_decodes() {
        let img = ImageBuffer::<Rgb<u8>, Vec<u8>>::from_pixel(96, 96, Rgb([220, 20, 20]));
        let bytes = encode(DynamicImage::ImageRgb8(img), ImageFormat::Jpeg);
        let color = ColorExtractionService::extract_dominant_color(&bytes).unwrap();
        assert!(color.r > 180 && color.g < 70 && color.b < 70, "{color}");
    }

    #[test]
    fn empty_image_uses_fallback() {
        let image = DynamicImage::new_rgb8(0, 0);
        assert_eq!(
            ColorExtractionService::dominant_color(&image),
            Color::FALLBACK
        );
    }

    #[test]
    fn corrupt_bytes_are_a_decode_error() {
        let mut bytes = solid_png(4, 4, [1, 2, 3]);
        bytes.truncate(12);
        let result = ColorExtractionService::extract_dominant_color(&bytes);
        assert!(matches!(result, Err(ExtractionError::Decode(_))));

        let result = ColorExtractionService::extract_dominant_color(b"definitely not an image");
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }

    #[tokio::test]
    async fn service_extracts_on_blocking_pool() {
        let service = ColorExtractionService::new();
        let color = service
            .oneshot(Bytes::from(solid_png(64, 64, [0, 255, 0])))
            .await
            .unwrap();
        assert_eq!(color, Color::new(0, 255, 0));
    }

    #[tokio::test]
    async fn service_propagates_decode_errors() {
        let service = ColorExtractionService::new();
        let result = service.oneshot(Bytes::from_static(b"\x89PNG")).await;
        assert!(matches!(result, Err(ExtractionError::Decode(_))));
    }
}
