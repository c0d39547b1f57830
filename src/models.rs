//! # 数据模型模块
//!
//! 图像元数据以及嵌入、差异分析的报告。报告在创建后不可修改，
//! 比率等派生值每次访问时由存储字段计算。

/// 工作颜色模式。带 alpha 的图像统一转换为 RGBA，其余转换为 RGB。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Rgb,
    Rgba,
}

impl ColorMode {
    pub fn channel_count(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Rgba => 4,
        }
    }

    pub fn alpha_index(self) -> Option<usize> {
        match self {
            ColorMode::Rgb => None,
            ColorMode::Rgba => Some(3),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageMetadata {
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    /// 可嵌入通道在像素内的索引，按嵌入顺序排列，不含 alpha。
    pub embed_indexes: Vec<usize>,
}

impl ImageMetadata {
    pub fn total_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn channels_count(&self) -> usize {
        self.embed_indexes.len()
    }

    /// 嵌入容量 (比特) = 宽 × 高 × 可嵌入通道数 × 每通道位数。
    pub fn capacity_bits(&self, bits_per_channel: u8) -> u64 {
        self.total_pixels() * self.channels_count() as u64 * u64::from(bits_per_channel)
    }
}

/// 一次嵌入操作的结果统计。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedReport {
    pub payload_bits: u64,
    pub capacity_bits: u64,
    pub total_pixels: u64,
    pub channels_used: usize,
    pub bits_per_channel: u8,
    pub pixels_touched: u64,
    pub file_size_before: u64,
    pub file_size_after: u64,
}

impl EmbedReport {
    /// 已使用容量的比例 (0.0 ~ 1.0)。
    pub fn utilization(&self) -> f64 {
        if self.capacity_bits == 0 {
            return 0.0;
        }
        self.payload_bits as f64 / self.capacity_bits as f64
    }

    pub fn payload_bytes(&self) -> u64 {
        self.payload_bits / 8
    }

    pub fn file_size_diff(&self) -> i64 {
        self.file_size_after as i64 - self.file_size_before as i64
    }
}

/// 两幅图像逐通道比较的结果统计。
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    pub total_channels: u64,
    pub changed_channels: u64,
    /// 仅在发生变化的通道上求平均。
    pub avg_abs_diff: f64,
    pub max_abs_diff: u8,
    pub file_size_before: u64,
    pub file_size_after: u64,
}

impl DiffReport {
    pub fn change_ratio(&self) -> f64 {
        if self.total_channels == 0 {
            return 0.0;
        }
        self.changed_channels as f64 / self.total_channels as f64
    }

    pub fn file_size_diff(&self) -> i64 {
        self.file_size_after as i64 - self.file_size_before as i64
    }
}
