//! # lsb_vault 库
//!
//! 本库包含 LSB 隐写工具的核心逻辑：位编解码、基于密码的流密码、
//! 自描述的载荷帧、通道映射、嵌入/提取引擎以及图像差异分析。

// 声明库包含的所有模块。

pub mod bits;
pub mod channels;
pub mod cli;
pub mod constants;
pub mod crypto;
pub mod diff;
pub mod error;
pub mod handler;
pub mod models;
pub mod payload;
pub mod steganography;

pub use diff::{analyze_images, visualize_diff};
pub use error::StegoError;
pub use models::{DiffReport, EmbedReport, ImageMetadata};
pub use steganography::{extract_message, hide_message};
