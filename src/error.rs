//! # 错误类型模块
//!
//! 核心库的所有失败都以 [`StegoError`] 返回，调用方可以区分校验错误、
//! 格式错误、截断、解码失败以及内部不变量被破坏的情况。

use crate::constants::{MAX_BITS_PER_CHANNEL, MIN_BITS_PER_CHANNEL};
use std::string::FromUtf8Error;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    #[error(
        "Bits per channel must be between {} and {}, got {value}",
        MIN_BITS_PER_CHANNEL,
        MAX_BITS_PER_CHANNEL
    )]
    InvalidBitsPerChannel { value: u8 },

    #[error("The image has no writable color channels")]
    NoEmbeddableChannels,

    #[error(
        "The message exceeds the image capacity: {required} bits required, but only {available} bits available"
    )]
    CapacityExceeded { required: u64, available: u64 },

    #[error("Images must have the same dimensions: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    DimensionMismatch { left: (u32, u32), right: (u32, u32) },

    #[error("No embedded payload found")]
    NoPayload,

    #[error("Bitstream truncated: expected {expected} bits, only {available} available")]
    Truncated { expected: usize, available: usize },

    #[error("The embedded payload is unreadable (wrong password or corrupted data)")]
    Unreadable(#[source] FromUtf8Error),

    #[error("Failed to embed the whole payload: {remaining} bits left unwritten")]
    IncompleteEmbed { remaining: usize },

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("File operation error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
