//! # 错误类型模块
//!
//! 库中所有可能失败的操作都返回 [`StegoError`]。
//! 每个变体都携带导致失败的具体数值，方便调用者给出清晰的报告。

use std::path::PathBuf;
use thiserror::Error;

/// 库内统一使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 错误的大类，用于调用者决定如何处理 (缩短消息、换一张更大的图像等)。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 消息无法被组帧。
    Encoding,
    /// 图像的可用通道槽位不足。
    Capacity,
    /// 解码时读到的位流前后矛盾。
    Framing,
    /// 像素缓冲区本身的形状不合法。
    Buffer,
    /// 图像文件的读写失败。
    Image,
}

#[derive(Error, Debug)]
pub enum StegoError {
    /// 消息中的字符超出了单字节 (0-255) 能表示的范围
    #[error("Character {ch:?} at index {index} cannot be represented as a single byte")]
    UnrepresentableChar { ch: char, index: usize },

    /// 消息过长，16 位长度头部无法记录其载荷位数
    #[error("Message of {bytes} bytes needs {bits} payload bits, but the length header holds at most {max}")]
    HeaderOverflow { bytes: usize, bits: usize, max: usize },

    /// 图像的可用槽位少于需要写入或读取的位数
    #[error("Not enough channel slots: required {required}, available {available}")]
    Capacity { required: usize, available: usize },

    /// 声明的载荷位数不是 8 的倍数
    #[error("Declared payload length of {declared} bits is not a multiple of 8")]
    MisalignedPayload { declared: usize },

    /// 位序列连 16 位长度头部都不完整
    #[error("Frame has only {available} bits, too short for the 16-bit length header")]
    MissingHeader { available: usize },

    /// 位序列比头部声明的要短
    #[error("Frame declares {declared} payload bits but only {available} bits follow the header")]
    TruncatedFrame { declared: usize, available: usize },

    /// 头部声明的长度超出了图像能容纳的范围，图像可能已损坏或不含隐藏消息
    #[error("Declared payload length of {declared} bits exceeds the {available} slots left in the image")]
    DeclaredLengthExceedsCapacity { declared: usize, available: usize },

    /// 像素缓冲区的通道数少于 3
    #[error("Pixel buffer needs at least 3 channels, got {0}")]
    TooFewChannels(usize),

    /// 像素数据长度与声明的形状不一致
    #[error("Pixel data length {actual} does not match shape {height}x{width}x{channels}")]
    ShapeMismatch {
        height: usize,
        width: usize,
        channels: usize,
        actual: usize,
    },

    /// 输出格式不是无损格式，隐藏的数据将无法存活
    #[error("Output format of '{}' is not lossless; use png, bmp, tiff, webp or qoi", .0.display())]
    LossyOutputFormat(PathBuf),

    /// 图像编解码失败
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

impl StegoError {
    /// 返回该错误所属的大类。
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnrepresentableChar { .. } | Self::HeaderOverflow { .. } => ErrorKind::Encoding,
            Self::Capacity { .. } => ErrorKind::Capacity,
            Self::MisalignedPayload { .. }
            | Self::MissingHeader { .. }
            | Self::TruncatedFrame { .. }
            | Self::DeclaredLengthExceedsCapacity { .. } => ErrorKind::Framing,
            Self::TooFewChannels(_) | Self::ShapeMismatch { .. } => ErrorKind::Buffer,
            Self::LossyOutputFormat(_) | Self::Image(_) => ErrorKind::Image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_variants() {
        let err = StegoError::Capacity {
            required: 24,
            available: 12,
        };
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(
            StegoError::MisalignedPayload { declared: 3 }.kind(),
            ErrorKind::Framing
        );
        assert_eq!(
            StegoError::UnrepresentableChar { ch: '中', index: 0 }.kind(),
            ErrorKind::Encoding
        );
    }

    #[test]
    fn capacity_message_names_both_counts() {
        let msg = StegoError::Capacity {
            required: 24,
            available: 12,
        }
        .to_string();
        assert!(msg.contains("24"));
        assert!(msg.contains("12"));
    }
}
