use image::{imageops, io::Reader as ImageReader, DynamicImage, ImageError};
use std::path::Path;

/// RGB pixels scaled to [0,1], laid out height, width, channel.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTensor {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl NormalizedTensor {
    pub const CHANNELS: usize = 3;

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize, channel: usize) -> f32 {
        self.data[(y * self.width as usize + x) * Self::CHANNELS + channel]
    }
}

/// Decodes by sniffing the file contents, so a mislabelled extension still
/// loads and a non-image fails here rather than in the model.
pub fn decode_image(path: &Path) -> Result<DynamicImage, ImageError> {
    let image = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(image)
}

pub fn normalize(image: &DynamicImage, width: u32, height: u32) -> NormalizedTensor {
    let resized = image.resize_exact(width, height, imageops::FilterType::Nearest);
    let rgb = resized.to_rgb8();

    let data = rgb
        .pixels()
        .flat_map(|p| p.0)
        .map(|v| v as f32 / 255.0)
        .collect();

    NormalizedTensor {
        width,
        height,
        data,
    }
}

pub fn load_normalized(
    path: &Path,
    width: u32,
    height: u32,
) -> Result<NormalizedTensor, ImageError> {
    let image = decode_image(path)?;
    Ok(normalize(&image, width, height))
}
