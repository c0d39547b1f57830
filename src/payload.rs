//! # 载荷帧模块
//!
//! 嵌入图像的字节结构：
//!
//! | 偏移 | 大小 | 字段 |
//! |---|---|---|
//! | 0 | 7 | 魔数 `LSBMSG1` |
//! | 7 | 4 | 正文长度 (大端序 `u32`) |
//! | 11 | 可变 | 正文：与密钥流异或后的消息 (无密码时为明文) |

use crate::constants::{HEADER_MAGIC, HEADER_SIZE};
use crate::crypto::apply_keystream;
use crate::error::{Result, StegoError};

/// 计算长度字段的值。正文超过 `u32::MAX` 字节时无法用长度字段表示。
fn length_field(body_len: usize) -> Result<u32> {
    u32::try_from(body_len).map_err(|_| StegoError::CapacityExceeded {
        required: (HEADER_SIZE as u64 + body_len as u64).saturating_mul(8),
        available: (HEADER_SIZE as u64 + u64::from(u32::MAX)) * 8,
    })
}

/// 把消息组装成待嵌入的完整帧。
pub fn build_payload(message: &str, password: Option<&str>) -> Result<Vec<u8>> {
    let length = length_field(message.len())?;
    let body = apply_keystream(message.as_bytes(), password);

    let mut payload = Vec::with_capacity(HEADER_SIZE + body.len());
    payload.extend_from_slice(HEADER_MAGIC);
    payload.extend_from_slice(&length.to_be_bytes());
    payload.extend_from_slice(&body);
    Ok(payload)
}

/// 校验帧头并返回正文长度 (字节)。
pub fn parse_header(header: &[u8]) -> Result<usize> {
    let (magic, length) = header
        .split_at_checked(HEADER_MAGIC.len())
        .ok_or(StegoError::NoPayload)?;

    if magic != HEADER_MAGIC {
        return Err(StegoError::NoPayload);
    }

    let length: [u8; 4] = length
        .get(..4)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(StegoError::NoPayload)?;

    Ok(u32::from_be_bytes(length) as usize)
}

/// 解密正文并按 UTF-8 解码。
pub fn decrypt_body(body: &[u8], password: Option<&str>) -> Result<String> {
    String::from_utf8(apply_keystream(body, password)).map_err(StegoError::Unreadable)
}
