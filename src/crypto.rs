//! # 流密码模块
//!
//! 以 SHA-256 计数器模式从密码派生确定性的密钥流，并与数据逐字节异或。
//! 加密与解密是同一个操作。这里不产生任何认证标签：密码错误或密文被篡改时
//! 只会得到错误的明文，而不会被检测出来。

use sha2::{Digest, Sha256};

/// 生成恰好 `length` 字节的密钥流。
///
/// 依次计算 `SHA256(password || counter_be32)`，`counter` 从 0 开始递增，
/// 拼接所有摘要后截断到 `length`。
pub fn derive_keystream(password: &str, length: usize) -> Vec<u8> {
    let mut stream = Vec::with_capacity(length.next_multiple_of(32));
    let mut counter: u32 = 0;

    while stream.len() < length {
        let mut hasher = Sha256::new();
        hasher.update(password.as_bytes());
        hasher.update(counter.to_be_bytes());
        stream.extend_from_slice(&hasher.finalize());
        counter = counter.wrapping_add(1);
    }

    stream.truncate(length);
    stream
}

/// 用密码派生的密钥流与 `data` 异或。
///
/// 没有密码 (或密码为空) 时原样返回数据。
pub fn apply_keystream(data: &[u8], password: Option<&str>) -> Vec<u8> {
    match password.filter(|p| !p.is_empty()) {
        Some(password) => data
            .iter()
            .zip(derive_keystream(password, data.len()))
            .map(|(byte, key)| byte ^ key)
            .collect(),
        None => data.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keystream_is_deterministic_and_exact_length() {
        let a = derive_keystream("secret", 70);
        let b = derive_keystream("secret", 70);
        assert_eq!(a.len(), 70);
        assert_eq!(a, b);
        assert_ne!(a, derive_keystream("Secret", 70));
    }

    #[test]
    fn keystream_blocks_follow_counter() {
        let stream = derive_keystream("pw", 64);

        let mut first = Sha256::new();
        first.update(b"pw\x00\x00\x00\x00");
        let mut second = Sha256::new();
        second.update(b"pw\x00\x00\x00\x01");

        assert_eq!(&stream[..32], first.finalize().as_slice());
        assert_eq!(&stream[32..], second.finalize().as_slice());
    }

    #[test]
    fn shorter_keystream_is_prefix_of_longer() {
        let long = derive_keystream("pw", 100);
        assert_eq!(derive_keystream("pw", 33), long[..33]);
        assert!(derive_keystream("pw", 0).is_empty());
    }

    #[test]
    fn apply_keystream_is_symmetric() {
        let data = "Привіт, світ!".as_bytes();
        let encrypted = apply_keystream(data, Some("key"));
        assert_ne!(encrypted, data);
        assert_eq!(apply_keystream(&encrypted, Some("key")), data);
    }

    #[test]
    fn missing_or_empty_password_is_identity() {
        let data = b"plain text";
        assert_eq!(apply_keystream(data, None), data);
        assert_eq!(apply_keystream(data, Some("")), data);
    }
}
