//! Plate name and synthetic plate image builders.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use ishihara_core::PlateCategory;

/// Red channel step used to encode the digit in the marker pixel.
pub const MARKER_STEP: u8 = 20;

/// Builds plate filenames in the `<digit>_<font>theme_<n> type_<c>.<ext>`
/// convention.
#[derive(Debug, Clone)]
pub struct PlateNameBuilder {
    digit: u8,
    font: String,
    theme: u32,
    category: u8,
    extension: String,
}

impl PlateNameBuilder {
    /// Starts a name for `digit` with font `Arial`, theme 1, category 1, `.png`.
    #[must_use]
    pub fn new(digit: u8) -> Self {
        Self {
            digit,
            font: "Arial".to_string(),
            theme: 1,
            category: 1,
            extension: "png".to_string(),
        }
    }

    /// Sets the font label.
    #[must_use]
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Sets the theme number.
    #[must_use]
    pub fn theme(mut self, theme: u32) -> Self {
        self.theme = theme;
        self
    }

    /// Sets the category.
    #[must_use]
    pub fn category(mut self, category: PlateCategory) -> Self {
        self.category = category.into();
        self
    }

    /// Sets a raw category number, including out-of-range ones.
    #[must_use]
    pub fn raw_category(mut self, category: u8) -> Self {
        self.category = category;
        self
    }

    /// Sets the file extension (without the dot).
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Builds the filename.
    #[must_use]
    pub fn build(&self) -> String {
        format!(
            "{}_{}theme_{} type_{}.{}",
            self.digit, self.font, self.theme, self.category, self.extension
        )
    }
}

/// Builds small dotted images standing in for real plates.
///
/// The digit is stored in the red channel of the top-left pixel
/// (`digit * MARKER_STEP`), which `MockDigitClassifier::reading_marker`
/// reads back.
#[derive(Debug, Clone)]
pub struct SyntheticPlateBuilder {
    digit: u8,
    size: u32,
    figure: Rgb<u8>,
    background: Rgb<u8>,
}

impl SyntheticPlateBuilder {
    /// Starts a 64x64 red-on-green plate for `digit`.
    #[must_use]
    pub const fn new(digit: u8) -> Self {
        Self {
            digit,
            size: 64,
            figure: Rgb([214, 110, 80]),
            background: Rgb([120, 160, 90]),
        }
    }

    /// Sets the side length in pixels.
    #[must_use]
    pub const fn size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets the figure and background dot colours.
    #[must_use]
    pub const fn colours(mut self, figure: [u8; 3], background: [u8; 3]) -> Self {
        self.figure = Rgb(figure);
        self.background = Rgb(background);
        self
    }

    /// Builds the image.
    #[must_use]
    pub fn build(&self) -> DynamicImage {
        let size = self.size.max(8);
        let cell = (size / 8).max(2);
        let (lo, hi) = (size / 3, size - size / 3);

        let mut img = RgbImage::from_fn(size, size, |x, y| {
            // dots on a grid, figure is a vertical bar through the middle
            let in_dot = (x % cell).abs_diff(cell / 2) + (y % cell).abs_diff(cell / 2) < cell / 2;
            if !in_dot {
                Rgb([250, 245, 235])
            } else if (lo..hi).contains(&x) {
                self.figure
            } else {
                self.background
            }
        });

        img.put_pixel(0, 0, Rgb([self.digit.saturating_mul(MARKER_STEP), 0, 0]));
        DynamicImage::ImageRgb8(img)
    }

    /// Builds the image encoded as PNG.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn png_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.build()
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .expect("encoding an in-memory RGB image as PNG");
        buf
    }
}

/// Reads the digit marker written by [`SyntheticPlateBuilder`].
#[must_use]
pub fn read_marker(image: &DynamicImage) -> u8 {
    let rgb = image.to_rgb8();
    rgb.get_pixel(0, 0)[0] / MARKER_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use ishihara_core::engine::parse_plate_name;

    #[test]
    fn test_name_builder_output_parses() {
        let name = PlateNameBuilder::new(7)
            .font("Comic Sans")
            .theme(3)
            .category(PlateCategory::RedGray)
            .build();
        assert_eq!(name, "7_Comic Sanstheme_3 type_3.png");

        let meta = parse_plate_name(&name).unwrap_or_else(|| panic!("should parse"));
        assert_eq!(meta.digit, 7);
        assert_eq!(meta.font, "Comic Sans");
        assert_eq!(meta.category, PlateCategory::RedGray);
    }

    #[test]
    fn test_synthetic_plate_marker_survives_png() {
        for digit in 0..=9 {
            let bytes = SyntheticPlateBuilder::new(digit).png_bytes();
            let decoded =
                image::load_from_memory(&bytes).unwrap_or_else(|e| panic!("decode failed: {e}"));
            assert_eq!(read_marker(&decoded), digit);
        }
    }

    #[test]
    fn test_synthetic_plate_size() {
        let img = SyntheticPlateBuilder::new(1).size(128).build();
        assert_eq!((img.width(), img.height()), (128, 128));
    }
}
