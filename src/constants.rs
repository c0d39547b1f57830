/// 嵌入数据的魔数标记，提取时逐字节校验。
pub const HEADER_MAGIC: &[u8; 7] = b"LSBMSG1";

/// 长度字段占用的字节数 (大端序 `u32`)。
pub const LENGTH_FIELD_SIZE: usize = 4;

/// 帧头总大小 (字节)：魔数 + 长度字段。
pub const HEADER_SIZE: usize = HEADER_MAGIC.len() + LENGTH_FIELD_SIZE;

/// 默认每个颜色通道使用的最低有效位数。
pub const DEFAULT_BITS_PER_CHANNEL: u8 = 1;

/// 每个通道允许使用的最少位数。
pub const MIN_BITS_PER_CHANNEL: u8 = 1;

/// 每个通道允许使用的最多位数，更多的位会让改动肉眼可见。
pub const MAX_BITS_PER_CHANNEL: u8 = 2;

/// 每处理多少个像素回调一次进度。
pub const PROGRESS_INTERVAL: usize = 10_000;

/// 差异可视化的默认放大倍数。
pub const DEFAULT_AMPLIFY: u32 = 16;

/// 可以安全保存隐写结果的无损格式扩展名。
pub const LOSSLESS_EXTENSIONS: &[&str] = &["png", "bmp", "tif", "tiff", "webp", "qoi"];
