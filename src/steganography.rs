//! # 隐写核心模块
//!
//! 按行优先 (从左到右、从上到下) 的像素顺序，把载荷比特写入每个可嵌入通道的
//! 最低 `bits_per_channel` 位，提取时以完全相同的顺序读回。

use crate::bits::{BitReader, bits_to_bytes, lsb_bits};
use crate::channels::{PreparedImage, prepare_image, validate_bits_per_channel};
use crate::constants::{HEADER_SIZE, PROGRESS_INTERVAL};
use crate::error::{Result, StegoError};
use crate::models::EmbedReport;
use crate::payload::{build_payload, decrypt_body, parse_header};
use log::debug;
use std::fs;
use std::path::Path;

/// 把已组帧的载荷写入工作图像，返回实际发生变化的像素数。
///
/// 容量不足时在修改任何像素之前返回 [`StegoError::CapacityExceeded`]。
/// `progress` 每处理 [`PROGRESS_INTERVAL`] 个像素被调用一次，参数为
/// (当前像素索引, 像素总数)。
pub fn embed_payload<F>(
    image: &mut PreparedImage,
    payload: &[u8],
    bits_per_channel: u8,
    mut progress: F,
) -> Result<u64>
where
    F: FnMut(usize, usize),
{
    let bits_per_channel = validate_bits_per_channel(bits_per_channel)?;
    if image.metadata.embed_indexes.is_empty() {
        return Err(StegoError::NoEmbeddableChannels);
    }

    let mut reader = BitReader::new(payload);
    let required = reader.total_bits() as u64;
    let available = image.metadata.capacity_bits(bits_per_channel);
    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    let channels = image.channels();
    let total_pixels = image.pixels.len() / channels;
    let mask = (1u8 << bits_per_channel) - 1;
    let mut pixels_touched = 0u64;

    for (idx, pixel) in image.pixels.chunks_exact_mut(channels).enumerate() {
        if !reader.has_bits() {
            break;
        }
        if idx % PROGRESS_INTERVAL == 0 {
            progress(idx, total_pixels);
        }

        let mut changed = false;
        for &channel in &image.metadata.embed_indexes {
            let Some(chunk) = reader.read(u32::from(bits_per_channel)) else {
                break;
            };

            let value = (pixel[channel] & !mask) | chunk as u8;
            changed |= value != pixel[channel];
            pixel[channel] = value;
        }

        if changed {
            pixels_touched += 1;
        }
    }

    if reader.has_bits() {
        return Err(StegoError::IncompleteEmbed {
            remaining: reader.remaining_bits(),
        });
    }

    debug!(
        "Embedded {} bits into {} of {} bits capacity, {} pixels touched",
        required, available, total_pixels, pixels_touched
    );

    Ok(pixels_touched)
}

/// 从工作图像中读出帧、校验魔数并解密正文。
pub fn extract_payload(
    image: &PreparedImage,
    password: Option<&str>,
    bits_per_channel: u8,
) -> Result<String> {
    let bits_per_channel = validate_bits_per_channel(bits_per_channel)?;
    if image.metadata.embed_indexes.is_empty() {
        return Err(StegoError::NoEmbeddableChannels);
    }

    let mut bits = lsb_bits(
        &image.pixels,
        image.channels(),
        &image.metadata.embed_indexes,
        bits_per_channel,
    );

    // 连帧头都放不下的图像不可能含有载荷
    let header = bits_to_bytes(&mut bits, HEADER_SIZE * 8).map_err(|err| match err {
        StegoError::Truncated { .. } => StegoError::NoPayload,
        other => other,
    })?;
    let body_length = parse_header(&header)?;
    debug!("Found payload header, body length {} bytes", body_length);

    let body = bits_to_bytes(&mut bits, body_length.saturating_mul(8))?;
    decrypt_body(&body, password)
}

/// 把消息隐藏到 `input` 图像中并保存到 `output`。
///
/// 所有校验 (每通道位数、可嵌入通道、容量) 都在写文件之前完成，
/// 失败时不会创建或修改 `output`。
pub fn hide_message(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    message: &str,
    password: Option<&str>,
    bits_per_channel: u8,
) -> Result<EmbedReport> {
    hide_message_with_progress(input, output, message, password, bits_per_channel, |_, _| {})
}

pub fn hide_message_with_progress<F>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    message: &str,
    password: Option<&str>,
    bits_per_channel: u8,
    progress: F,
) -> Result<EmbedReport>
where
    F: FnMut(usize, usize),
{
    let (input, output) = (input.as_ref(), output.as_ref());
    let bits_per_channel = validate_bits_per_channel(bits_per_channel)?;

    let payload = build_payload(message, password)?;
    let payload_bits = payload.len() as u64 * 8;

    let file_size_before = fs::metadata(input)?.len();
    let mut working = prepare_image(&image::open(input)?);
    let metadata = working.metadata.clone();
    debug!(
        "Opened {}: {}x{} {:?}, embedding into channels {:?}",
        input.display(),
        metadata.width,
        metadata.height,
        metadata.mode,
        metadata.embed_indexes
    );

    let pixels_touched = embed_payload(&mut working, &payload, bits_per_channel, progress)?;
    working.into_image()?.save(output)?;

    Ok(EmbedReport {
        payload_bits,
        capacity_bits: metadata.capacity_bits(bits_per_channel),
        total_pixels: metadata.total_pixels(),
        channels_used: metadata.channels_count(),
        bits_per_channel,
        pixels_touched,
        file_size_before,
        file_size_after: fs::metadata(output)?.len(),
    })
}

/// 从 `input` 图像中提取隐藏的消息。
pub fn extract_message(
    input: impl AsRef<Path>,
    password: Option<&str>,
    bits_per_channel: u8,
) -> Result<String> {
    let bits_per_channel = validate_bits_per_channel(bits_per_channel)?;
    let working = prepare_image(&image::open(input)?);
    extract_payload(&working, password, bits_per_channel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorMode, ImageMetadata};

    fn blank(width: u32, height: u32, mode: ColorMode) -> PreparedImage {
        let channels = mode.channel_count();
        PreparedImage {
            metadata: ImageMetadata {
                width,
                height,
                mode,
                embed_indexes: crate::channels::embeddable_channels(mode),
            },
            pixels: (0..width as usize * height as usize * channels)
                .map(|i| (i * 37 % 251) as u8)
                .collect(),
        }
    }

    #[test]
    fn round_trip_in_memory() {
        for mode in [ColorMode::Rgb, ColorMode::Rgba] {
            for bits in [1, 2] {
                for password in [None, Some("pässwörd")] {
                    let mut image = blank(20, 20, mode);
                    let payload = build_payload("Hello, LSB! 你好", password).unwrap();
                    embed_payload(&mut image, &payload, bits, |_, _| {}).unwrap();
                    assert_eq!(
                        extract_payload(&image, password, bits).unwrap(),
                        "Hello, LSB! 你好"
                    );
                }
            }
        }
    }

    #[test]
    fn only_low_bits_of_color_channels_change() {
        let original = blank(16, 16, ColorMode::Rgba);
        let mut image = original.clone();
        let payload = build_payload(&"z".repeat(40), None).unwrap();
        embed_payload(&mut image, &payload, 2, |_, _| {}).unwrap();

        for (before, after) in original.pixels.chunks(4).zip(image.pixels.chunks(4)) {
            assert_eq!(before[3], after[3], "alpha must never change");
            for channel in 0..3 {
                assert_eq!(before[channel] & !0b11, after[channel] & !0b11);
            }
        }
    }

    #[test]
    fn pixels_after_payload_are_untouched() {
        let original = blank(30, 30, ColorMode::Rgb);
        let mut image = original.clone();
        let payload = build_payload("short", None).unwrap();
        embed_payload(&mut image, &payload, 1, |_, _| {}).unwrap();

        // 16 字节 = 128 比特 = 42 个完整像素 + 2 个通道
        let used_pixels = (payload.len() * 8).div_ceil(3);
        assert_eq!(original.pixels[used_pixels * 3..], image.pixels[used_pixels * 3..]);
    }

    #[test]
    fn unchanged_pixels_are_not_counted_as_touched() {
        let mut image = blank(10, 10, ColorMode::Rgb);
        let payload = build_payload("abc", None).unwrap();
        let first = embed_payload(&mut image, &payload, 1, |_, _| {}).unwrap();
        assert!(first > 0);

        let second = embed_payload(&mut image, &payload, 1, |_, _| {}).unwrap();
        assert_eq!(second, 0);
    }

    #[test]
    fn capacity_is_checked_before_writing() {
        let original = blank(4, 4, ColorMode::Rgb);
        let mut image = original.clone();
        let payload = build_payload("this message is far too long", None).unwrap();

        let err = embed_payload(&mut image, &payload, 1, |_, _| {}).unwrap_err();
        assert!(matches!(
            err,
            StegoError::CapacityExceeded {
                required: 312,
                available: 48
            }
        ));
        assert_eq!(original.pixels, image.pixels);
    }

    #[test]
    fn payload_filling_capacity_exactly_fits() {
        // 12 字节 = 96 比特 = 4x4 像素 × 3 通道 × 2 位
        let mut image = blank(4, 4, ColorMode::Rgb);
        let payload = build_payload("x", None).unwrap();
        assert_eq!(payload.len() * 8, 96);
        embed_payload(&mut image, &payload, 2, |_, _| {}).unwrap();
        assert_eq!(extract_payload(&image, None, 2).unwrap(), "x");
    }

    #[test]
    fn progress_is_reported_periodically() {
        let mut image = blank(200, 200, ColorMode::Rgb);
        let payload = build_payload(&"p".repeat(12_000), None).unwrap();
        let mut calls = Vec::new();
        embed_payload(&mut image, &payload, 1, |idx, total| calls.push((idx, total))).unwrap();
        assert_eq!(calls, vec![(0, 40_000), (10_000, 40_000), (20_000, 40_000), (30_000, 40_000)]);
    }

    #[test]
    fn cover_without_payload_reports_no_payload() {
        let image = blank(20, 20, ColorMode::Rgb);
        assert!(matches!(
            extract_payload(&image, None, 1),
            Err(StegoError::NoPayload)
        ));
    }

    #[test]
    fn cover_smaller_than_header_reports_no_payload() {
        // 5x5 RGB、每通道 1 位只有 75 比特，不足 88 比特的帧头
        let image = blank(5, 5, ColorMode::Rgb);
        assert!(matches!(
            extract_payload(&image, None, 1),
            Err(StegoError::NoPayload)
        ));
    }

    #[test]
    fn declared_length_beyond_image_is_truncated() {
        let mut image = blank(10, 10, ColorMode::Rgb);
        let mut payload = build_payload("hi", None).unwrap();
        payload[7..11].copy_from_slice(&1_000u32.to_be_bytes());
        embed_payload(&mut image, &payload, 1, |_, _| {}).unwrap();

        assert!(matches!(
            extract_payload(&image, None, 1),
            Err(StegoError::Truncated {
                expected: 8_000,
                available: 212
            })
        ));
    }

    #[test]
    fn wrong_password_never_returns_message() {
        let mut image = blank(20, 20, ColorMode::Rgb);
        let payload = build_payload("attack at dawn", Some("correct")).unwrap();
        embed_payload(&mut image, &payload, 1, |_, _| {}).unwrap();

        match extract_payload(&image, Some("wrong"), 1) {
            Ok(text) => assert_ne!(text, "attack at dawn"),
            Err(err) => assert!(matches!(err, StegoError::Unreadable(_))),
        }
    }

    #[test]
    fn invalid_bits_per_channel_is_rejected() {
        let mut image = blank(4, 4, ColorMode::Rgb);
        assert!(matches!(
            embed_payload(&mut image, b"x", 3, |_, _| {}),
            Err(StegoError::InvalidBitsPerChannel { value: 3 })
        ));
        assert!(matches!(
            extract_payload(&image, None, 0),
            Err(StegoError::InvalidBitsPerChannel { value: 0 })
        ));
    }
}
