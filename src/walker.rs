//! # 通道遍历模块
//!
//! 定义编码与解码共用的槽位遍历顺序：先按行，再按行内的列，最后按像素内的 R → G → B。
//! 这个顺序就是编码端与解码端之间的约定，两边必须完全一致。

use crate::constants::USABLE_CHANNELS;
use crate::pixel_buffer::PixelBuffer;
use std::iter::FusedIterator;

/// 一个通道槽位的地址。`channel` 只会是 0 (R)、1 (G) 或 2 (B)。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelSlot {
    pub row: usize,
    pub col: usize,
    pub channel: usize,
}

impl ChannelSlot {
    /// 该槽位在连续像素数据中的字节下标。
    pub fn offset(&self, width: usize, channels: usize) -> usize {
        (self.row * width + self.col) * channels + self.channel
    }
}

/// 惰性、有限的槽位序列，长度为 `height * width * 3`。
///
/// 需要从头再走一遍时，克隆一个初始状态的遍历器或重新构造即可。
#[derive(Debug, Clone)]
pub struct ChannelWalker {
    width: usize,
    next: usize,
    end: usize,
}

impl ChannelWalker {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            width,
            next: 0,
            end: height * width * USABLE_CHANNELS,
        }
    }

    pub fn for_buffer(buffer: &PixelBuffer) -> Self {
        Self::new(buffer.height(), buffer.width())
    }

    /// 序列的总长度，与当前遍历位置无关。
    pub fn slot_count(&self) -> usize {
        self.end
    }

    fn slot_at(&self, index: usize) -> ChannelSlot {
        let pixel = index / USABLE_CHANNELS;
        ChannelSlot {
            row: pixel / self.width,
            col: pixel % self.width,
            channel: index % USABLE_CHANNELS,
        }
    }
}

impl Iterator for ChannelWalker {
    type Item = ChannelSlot;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next == self.end {
            return None;
        }
        let slot = self.slot_at(self.next);
        self.next += 1;
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end - self.next;
        (left, Some(left))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.next = self.next.saturating_add(n).min(self.end);
        self.next()
    }
}

impl ExactSizeIterator for ChannelWalker {}

impl FusedIterator for ChannelWalker {}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(row: usize, col: usize, channel: usize) -> ChannelSlot {
        ChannelSlot { row, col, channel }
    }

    #[test]
    fn visits_rows_then_columns_then_rgb() {
        let slots: Vec<_> = ChannelWalker::new(2, 2).collect();
        assert_eq!(
            slots,
            vec![
                slot(0, 0, 0),
                slot(0, 0, 1),
                slot(0, 0, 2),
                slot(0, 1, 0),
                slot(0, 1, 1),
                slot(0, 1, 2),
                slot(1, 0, 0),
                slot(1, 0, 1),
                slot(1, 0, 2),
                slot(1, 1, 0),
                slot(1, 1, 1),
                slot(1, 1, 2),
            ]
        );
    }

    #[test]
    fn never_yields_alpha_and_has_exact_length() {
        let buffer = PixelBuffer::zeroed(3, 5, 4).unwrap();
        let walker = ChannelWalker::for_buffer(&buffer);
        assert_eq!(walker.len(), 45);
        assert_eq!(walker.slot_count(), buffer.usable_slots());
        assert!(walker.clone().all(|s| s.channel < 3));
        assert_eq!(walker.count(), 45);
    }

    #[test]
    fn offsets_skip_extra_channels() {
        let offsets: Vec<_> = ChannelWalker::new(1, 2)
            .map(|s| s.offset(2, 4))
            .collect();
        assert_eq!(offsets, vec![0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn restarting_yields_the_same_sequence() {
        let mut walker = ChannelWalker::new(4, 3);
        let fresh = walker.clone();
        let first: Vec<_> = walker.by_ref().take(7).collect();
        assert_eq!(walker.len(), 36 - 7);
        let again: Vec<_> = fresh.take(7).collect();
        assert_eq!(first, again);
    }

    #[test]
    fn nth_jumps_and_stays_exhausted() {
        let mut walker = ChannelWalker::new(2, 2);
        assert_eq!(walker.nth(4), Some(slot(0, 1, 1)));
        assert_eq!(walker.nth(100), None);
        assert_eq!(walker.next(), None);
    }

    #[test]
    fn empty_image_yields_nothing() {
        assert_eq!(ChannelWalker::new(0, 7).count(), 0);
        assert_eq!(ChannelWalker::new(7, 0).count(), 0);
    }
}
