//! # 位编解码模块
//!
//! 按高位在前 (MSB-first) 的顺序从字节缓冲区中读取任意宽度的整数，
//! 以及把逐位产生的比特流重新打包成字节。

use crate::error::{Result, StegoError};

/// 字节缓冲区上的顺序位读取器。
///
/// 游标只会向前移动，在一次操作中不会被重置。
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    pub fn total_bits(&self) -> usize {
        self.data.len() * 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.total_bits() - self.position
    }

    pub fn has_bits(&self) -> bool {
        self.position < self.total_bits()
    }

    /// 读取 `width` (1..=32) 个比特并返回它们组成的无符号整数。
    ///
    /// 剩余比特不足时返回 `None`，游标保持不变。
    pub fn read(&mut self, width: u32) -> Option<u32> {
        debug_assert!((1..=32).contains(&width));

        let width = width as usize;
        if self.remaining_bits() < width {
            return None;
        }

        let value = (0..width).fold(0u32, |acc, _| {
            let byte = self.data[self.position / 8];
            let bit = (byte >> (7 - self.position % 8)) & 1;
            self.position += 1;
            (acc << 1) | u32::from(bit)
        });

        Some(value)
    }
}

/// 从比特迭代器中取出恰好 `bit_count` 个比特，每 8 位组成一个字节。
///
/// 最后不足 8 位的分组在低位补零。迭代器提前耗尽时返回
/// [`StegoError::Truncated`]。
pub fn bits_to_bytes<I>(bits: &mut I, bit_count: usize) -> Result<Vec<u8>>
where
    I: Iterator<Item = u8>,
{
    let mut bytes = Vec::new();
    let mut accumulator = 0u8;
    let mut filled = 0u32;

    for consumed in 0..bit_count {
        let bit = bits.next().ok_or(StegoError::Truncated {
            expected: bit_count,
            available: consumed,
        })?;

        accumulator = (accumulator << 1) | (bit & 1);
        filled += 1;

        if filled == 8 {
            bytes.push(accumulator);
            accumulator = 0;
            filled = 0;
        }
    }

    if filled > 0 {
        bytes.push(accumulator << (8 - filled));
    }

    Ok(bytes)
}

/// 按像素存储顺序惰性地产生每个可嵌入通道最低 `bits_per_channel` 位的比特。
///
/// `pixels` 是行优先、每像素 `channels` 字节的原始缓冲区。每个通道内的比特
/// 从高到低输出，与 [`BitReader::read`] 的写入顺序一致。
pub fn lsb_bits<'a>(
    pixels: &'a [u8],
    channels: usize,
    embed_indexes: &'a [usize],
    bits_per_channel: u8,
) -> impl Iterator<Item = u8> + 'a {
    let mask = (1u8 << bits_per_channel) - 1;

    pixels
        .chunks_exact(channels)
        .flat_map(move |pixel| embed_indexes.iter().map(move |&idx| pixel[idx] & mask))
        .flat_map(move |chunk| (0..bits_per_channel).rev().map(move |shift| (chunk >> shift) & 1))
}
