//! # 通道映射模块
//!
//! 把解码后的图像统一转换为 RGB 或 RGBA，并确定可以嵌入数据的通道。

use crate::constants::{MAX_BITS_PER_CHANNEL, MIN_BITS_PER_CHANNEL};
use crate::error::{Result, StegoError};
use crate::models::{ColorMode, ImageMetadata};
use image::error::{ImageError, ParameterError, ParameterErrorKind};
use image::{DynamicImage, RgbImage, RgbaImage};

/// 转换后的工作图像：元数据加上行优先的原始像素缓冲区。
#[derive(Debug, Clone)]
pub struct PreparedImage {
    pub metadata: ImageMetadata,
    pub pixels: Vec<u8>,
}

impl PreparedImage {
    pub fn channels(&self) -> usize {
        self.metadata.mode.channel_count()
    }

    /// 按工作颜色模式重新构造图像，用于写回文件。
    pub fn into_image(self) -> Result<DynamicImage> {
        let ImageMetadata {
            width,
            height,
            mode,
            ..
        } = self.metadata;

        let image = match mode {
            ColorMode::Rgb => RgbImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageRgb8),
            ColorMode::Rgba => {
                RgbaImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageRgba8)
            }
        };

        image.ok_or_else(|| {
            ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            ))
            .into()
        })
    }
}

pub fn validate_bits_per_channel(value: u8) -> Result<u8> {
    if (MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL).contains(&value) {
        Ok(value)
    } else {
        Err(StegoError::InvalidBitsPerChannel { value })
    }
}

/// 可嵌入通道：工作模式下除 alpha 之外的所有通道。
pub fn embeddable_channels(mode: ColorMode) -> Vec<usize> {
    (0..mode.channel_count())
        .filter(|&idx| Some(idx) != mode.alpha_index())
        .collect()
}

pub fn prepare_image(image: &DynamicImage) -> PreparedImage {
    let (mode, width, height, pixels) = if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        (ColorMode::Rgba, rgba.width(), rgba.height(), rgba.into_raw())
    } else {
        let rgb = image.to_rgb8();
        (ColorMode::Rgb, rgb.width(), rgb.height(), rgb.into_raw())
    };

    PreparedImage {
        metadata: ImageMetadata {
            width,
            height,
            mode,
            embed_indexes: embeddable_channels(mode),
        },
        pixels,
    }
}
