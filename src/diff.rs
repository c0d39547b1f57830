//! # 差异分析模块
//!
//! 逐通道比较两幅尺寸相同的图像。统计和可视化都在 RGB 视图上进行，
//! 与嵌入时使用的颜色模式无关。

use crate::error::{Result, StegoError};
use crate::models::DiffReport;
use image::{Rgb, RgbImage};
use log::debug;
use std::array;
use std::fs;
use std::path::Path;

/// 纯像素层面的差异统计 (不含文件大小)。
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DiffStats {
    pub total_channels: u64,
    pub changed_channels: u64,
    pub avg_abs_diff: f64,
    pub max_abs_diff: u8,
}

fn ensure_same_dimensions(left: &RgbImage, right: &RgbImage) -> Result<()> {
    if left.dimensions() != right.dimensions() {
        return Err(StegoError::DimensionMismatch {
            left: left.dimensions(),
            right: right.dimensions(),
        });
    }
    Ok(())
}

pub fn diff_stats(original: &RgbImage, modified: &RgbImage) -> Result<DiffStats> {
    ensure_same_dimensions(original, modified)?;

    let (changed, total_diff, max_diff) = original
        .as_raw()
        .iter()
        .zip(modified.as_raw())
        .map(|(&a, &b)| a.abs_diff(b))
        .filter(|&diff| diff > 0)
        .fold((0u64, 0u64, 0u8), |(changed, sum, max), diff| {
            (changed + 1, sum + u64::from(diff), max.max(diff))
        });

    let (width, height) = original.dimensions();
    Ok(DiffStats {
        total_channels: u64::from(width) * u64::from(height) * 3,
        changed_channels: changed,
        avg_abs_diff: if changed > 0 {
            total_diff as f64 / changed as f64
        } else {
            0.0
        },
        max_abs_diff: max_diff,
    })
}

/// 比较两个图像文件。尺寸不同时返回 [`StegoError::DimensionMismatch`]。
pub fn analyze_images(original: impl AsRef<Path>, modified: impl AsRef<Path>) -> Result<DiffReport> {
    let (original, modified) = (original.as_ref(), modified.as_ref());

    let left = image::open(original)?.to_rgb8();
    let right = image::open(modified)?.to_rgb8();

    let stats = diff_stats(&left, &right)?;
    debug!("{:?}", stats);

    Ok(DiffReport {
        total_channels: stats.total_channels,
        changed_channels: stats.changed_channels,
        avg_abs_diff: stats.avg_abs_diff,
        max_abs_diff: stats.max_abs_diff,
        file_size_before: fs::metadata(original)?.len(),
        file_size_after: fs::metadata(modified)?.len(),
    })
}

/// 逐通道绝对差图像。`amplify > 1` 时每个值乘以放大倍数并截断到 255。
pub fn difference_image(original: &RgbImage, modified: &RgbImage, amplify: u32) -> Result<RgbImage> {
    ensure_same_dimensions(original, modified)?;

    let factor = amplify.max(1);
    let (width, height) = original.dimensions();

    Ok(RgbImage::from_fn(width, height, |x, y| {
        let (a, b) = (original.get_pixel(x, y), modified.get_pixel(x, y));
        Rgb(array::from_fn(|c| {
            (u32::from(a[c].abs_diff(b[c])) * factor).min(255) as u8
        }))
    }))
}

pub fn visualize_diff(
    original: impl AsRef<Path>,
    modified: impl AsRef<Path>,
    output: impl AsRef<Path>,
    amplify: u32,
) -> Result<()> {
    let left = image::open(original)?.to_rgb8();
    let right = image::open(modified)?.to_rgb8();

    difference_image(&left, &right, amplify)?.save(output)?;
    Ok(())
}
