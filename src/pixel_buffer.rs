//! # 像素缓冲区
//!
//! 形状为 `(height, width, channels)` 的 8 位无符号像素数据，按行优先连续存储。
//! 前三个通道视为 R, G, B；其余通道 (例如 alpha) 只被携带，从不参与隐写。

use crate::constants::USABLE_CHANNELS;
use crate::error::{Result, StegoError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// 用已有的像素数据构造缓冲区。
    ///
    /// # Errors
    ///
    /// * 通道数少于 3 时返回 [`StegoError::TooFewChannels`]。
    /// * `data` 的长度不等于 `height * width * channels` 时返回 [`StegoError::ShapeMismatch`]。
    pub fn new(height: usize, width: usize, channels: usize, data: Vec<u8>) -> Result<Self> {
        if channels < USABLE_CHANNELS {
            return Err(StegoError::TooFewChannels(channels));
        }

        let expected = height
            .checked_mul(width)
            .and_then(|n| n.checked_mul(channels));
        if expected != Some(data.len()) {
            return Err(StegoError::ShapeMismatch {
                height,
                width,
                channels,
                actual: data.len(),
            });
        }

        Ok(Self {
            height,
            width,
            channels,
            data,
        })
    }

    /// 构造一个全零的缓冲区。
    pub fn zeroed(height: usize, width: usize, channels: usize) -> Result<Self> {
        Self::new(height, width, channels, vec![0; height * width * channels])
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    /// `(height, width, channels)`
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }

    /// 可用于隐写的通道槽位数，即 `height * width * 3`。
    pub fn usable_slots(&self) -> usize {
        self.height * self.width * USABLE_CHANNELS
    }

    /// 读取 `(row, col, channel)` 处的通道值，越界时返回 `None`。
    pub fn get(&self, row: usize, col: usize, channel: usize) -> Option<u8> {
        self.offset(row, col, channel).map(|i| self.data[i])
    }

    /// 写入 `(row, col, channel)` 处的通道值，越界时返回 `None`。
    pub fn set(&mut self, row: usize, col: usize, channel: usize, value: u8) -> Option<()> {
        let i = self.offset(row, col, channel)?;
        self.data[i] = value;
        Some(())
    }

    /// 取得 `(row, col, channel)` 处通道值的可变引用。
    pub fn get_mut(&mut self, row: usize, col: usize, channel: usize) -> Option<&mut u8> {
        let i = self.offset(row, col, channel)?;
        self.data.get_mut(i)
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    fn offset(&self, row: usize, col: usize, channel: usize) -> Option<usize> {
        (row < self.height && col < self.width && channel < self.channels)
            .then(|| (row * self.width + col) * self.channels + channel)
    }
}
