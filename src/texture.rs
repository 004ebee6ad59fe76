//! Texture structure analysis
//!
//! Textures are decoded once per run. [`TextureAnalyzer`] keeps the result
//! for every file it has seen so the format, alpha and size checks can all
//! ask about the same texture without decoding it again.

use crate::error::Result;
use image::{ColorType, DynamicImage, ImageReader};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{trace, warn};

/// Color mode of a decoded texture
///
/// The names follow the conventional single-letter image mode codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorMode {
    /// 1-bit bilevel
    Bilevel,
    /// 8-bit grayscale
    L,
    /// Grayscale with alpha
    La,
    /// 8-bit palette
    P,
    /// True color
    Rgb,
    /// True color with alpha
    Rgba,
    /// Four-channel print color
    Cmyk,
    /// Luma plus chroma
    YCbCr,
    /// CIE L*a*b*
    Lab,
    /// Hue, saturation, value
    Hsv,
    /// 32-bit signed integer grayscale
    I,
    /// 32-bit float grayscale
    F,
    /// The file could not be decoded
    Unknown,
}

impl ColorMode {
    /// Mode code as used in reports
    pub fn name(&self) -> &'static str {
        match self {
            ColorMode::Bilevel => "1",
            ColorMode::L => "L",
            ColorMode::La => "LA",
            ColorMode::P => "P",
            ColorMode::Rgb => "RGB",
            ColorMode::Rgba => "RGBA",
            ColorMode::Cmyk => "CMYK",
            ColorMode::YCbCr => "YCbCr",
            ColorMode::Lab => "LAB",
            ColorMode::Hsv => "HSV",
            ColorMode::I => "I",
            ColorMode::F => "F",
            ColorMode::Unknown => "Unknown",
        }
    }

    /// Bits per pixel and whether the mode carries alpha by default
    pub fn info(&self) -> (u32, bool) {
        match self {
            ColorMode::Bilevel => (1, false),
            ColorMode::L => (8, false),
            ColorMode::La => (16, true),
            ColorMode::P => (8, false),
            ColorMode::Rgb => (24, false),
            ColorMode::Rgba => (32, true),
            ColorMode::Cmyk => (32, false),
            ColorMode::YCbCr => (24, false),
            ColorMode::Lab => (24, false),
            ColorMode::Hsv => (24, false),
            ColorMode::I => (32, false),
            ColorMode::F => (32, false),
            ColorMode::Unknown => (0, false),
        }
    }

    /// Mode of a decoded image's color type
    pub fn from_color_type(color: ColorType) -> Self {
        match color {
            ColorType::L8 => ColorMode::L,
            ColorType::L16 => ColorMode::I,
            ColorType::La8 | ColorType::La16 => ColorMode::La,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => ColorMode::Rgb,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => ColorMode::Rgba,
            _ => ColorMode::Unknown,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the checks need to know about one texture file
#[derive(Debug, Clone, PartialEq)]
pub struct TextureStructure {
    /// Color mode
    pub color_mode: ColorMode,
    /// Bits per pixel for the mode
    pub bits_per_pixel: u32,
    /// Bits per channel as decoded
    pub bits_per_channel: u32,
    /// Whether the texture carries meaningful alpha
    pub has_alpha_channel: bool,
    /// Width and height in pixels
    pub size: (u32, u32),
    /// Lower-cased file extension including the dot
    pub format: String,
}

impl TextureStructure {
    /// Structure reported for files that cannot be decoded
    pub fn unknown(path: &Path) -> Self {
        Self {
            color_mode: ColorMode::Unknown,
            bits_per_pixel: 0,
            bits_per_channel: 0,
            has_alpha_channel: false,
            size: (0, 0),
            format: extension_of(path),
        }
    }

    /// Decode a texture file and describe it
    ///
    /// For RGBA images alpha only counts as present when at least one pixel
    /// is not fully opaque.
    pub fn from_file(path: &Path) -> Result<Self> {
        let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
        Ok(Self::from_image(&image, extension_of(path)))
    }

    /// Describe an already decoded image
    pub fn from_image(image: &DynamicImage, format: String) -> Self {
        let color = image.color();
        let color_mode = ColorMode::from_color_type(color);
        let (bits_per_pixel, default_alpha) = color_mode.info();
        let has_alpha_channel = if color_mode == ColorMode::Rgba {
            has_translucent_pixel(image)
        } else {
            default_alpha
        };
        let channels = u32::from(color.channel_count().max(1));

        Self {
            color_mode,
            bits_per_pixel,
            bits_per_channel: u32::from(color.bits_per_pixel()) / channels,
            has_alpha_channel,
            size: (image.width(), image.height()),
            format,
        }
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

fn has_translucent_pixel(image: &DynamicImage) -> bool {
    match image {
        DynamicImage::ImageRgba8(buffer) => buffer.pixels().any(|p| p[3] < u8::MAX),
        DynamicImage::ImageRgba16(buffer) => buffer.pixels().any(|p| p[3] < u16::MAX),
        DynamicImage::ImageRgba32F(buffer) => buffer.pixels().any(|p| p[3] < 1.0),
        other => other.to_rgba8().pixels().any(|p| p[3] < u8::MAX),
    }
}

/// Per-run texture analysis cache keyed by resolved file path
#[derive(Debug, Default)]
pub struct TextureAnalyzer {
    cache: HashMap<PathBuf, TextureStructure>,
}

impl TextureAnalyzer {
    /// Create an empty analyzer
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyze a texture, decoding it only on first request
    ///
    /// Undecodable files are logged and described as
    /// [`TextureStructure::unknown`]; the result is cached either way.
    pub fn analyze(&mut self, path: &Path) -> &TextureStructure {
        self.cache.entry(path.to_path_buf()).or_insert_with(|| {
            match TextureStructure::from_file(path) {
                Ok(structure) => {
                    trace!(
                        "Texture {}: mode={}, bits={}, has_alpha={}, size={:?}, format={}",
                        path.display(),
                        structure.color_mode,
                        structure.bits_per_channel,
                        structure.has_alpha_channel,
                        structure.size,
                        structure.format
                    );
                    structure
                }
                Err(e) => {
                    warn!("Error analyzing texture {}: {}", path.display(), e);
                    TextureStructure::unknown(path)
                }
            }
        })
    }

    /// Number of textures decoded so far
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether nothing has been analyzed yet
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
