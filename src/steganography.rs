//! # LSB 隐写核心
//!
//! [`LsbCodec`] 把 [`framer`](crate::framer) 生成的位帧按 [`ChannelWalker`] 的顺序
//! 逐位写入 R/G/B 通道字节的最低有效位，解码时按同样的顺序读回。
//!
//! 编码在写入任何像素之前完成全部容量校验，校验失败时缓冲区保持原样。

use crate::constants::{BITS_PER_BYTE, LENGTH_HEADER_BITS, LSB_CLEAR_MASK, MAX_MESSAGE_BYTES};
use crate::error::{Result, StegoError};
use crate::framer::{self, BitSequence};
use crate::latin1;
use crate::pixel_buffer::PixelBuffer;
use crate::walker::{ChannelSlot, ChannelWalker};
use log::{debug, trace};

/// 无状态的编解码器，所有操作都只依赖传入的缓冲区和消息。
#[derive(Debug, Clone, Copy, Default)]
pub struct LsbCodec;

impl LsbCodec {
    /// 图像可用于隐写的总位数 (`height * width * 3`)。
    pub fn capacity_bits(buffer: &PixelBuffer) -> usize {
        buffer.usable_slots()
    }

    /// 该图像能容纳的最长消息字节数。连长度头部都放不下时为 0。
    pub fn max_message_len(buffer: &PixelBuffer) -> usize {
        (Self::capacity_bits(buffer)
            .saturating_sub(LENGTH_HEADER_BITS)
            / BITS_PER_BYTE)
            .min(MAX_MESSAGE_BYTES)
    }

    /// 把消息原地隐藏到缓冲区中。
    ///
    /// 只改动遍历顺序中前 `16 + 8 * len` 个 R/G/B 字节的最低位，其余位与通道保持不变。
    ///
    /// # Errors
    ///
    /// * 消息无法组帧时返回编码类错误，缓冲区不被修改。
    /// * 图像容量不足时返回 [`StegoError::Capacity`]，缓冲区不被修改。
    pub fn encode(buffer: &mut PixelBuffer, message: &str) -> Result<()> {
        let frame = framer::encode_frame(message)?;
        embed(buffer, &frame)
    }

    /// 与 [`LsbCodec::encode`] 相同，但接管缓冲区的所有权并返回修改后的缓冲区。
    pub fn encoded(mut buffer: PixelBuffer, message: &str) -> Result<PixelBuffer> {
        Self::encode(&mut buffer, message)?;
        Ok(buffer)
    }

    /// 以原始字节作为载荷进行隐藏。
    pub fn encode_bytes(buffer: &mut PixelBuffer, payload: &[u8]) -> Result<()> {
        let frame = framer::encode_frame_bytes(payload)?;
        embed(buffer, &frame)
    }

    /// 从缓冲区中恢复消息，每个字节映射为一个字符。
    ///
    /// # Errors
    ///
    /// * 图像连 16 位头部都放不下时返回 [`StegoError::Capacity`]。
    /// * 头部声明的长度不是 8 的倍数或超出图像容量时返回帧错误。
    pub fn decode(buffer: &PixelBuffer) -> Result<String> {
        Self::decode_bytes(buffer).map(|bytes| latin1::from_bytes(&bytes))
    }

    /// 从缓冲区中恢复原始字节载荷。
    pub fn decode_bytes(buffer: &PixelBuffer) -> Result<Vec<u8>> {
        let frame = extract(buffer)?;
        framer::decode_frame_bytes(&frame)
    }
}

/// 把整个位帧写入缓冲区。先校验容量，再逐位写入。
fn embed(buffer: &mut PixelBuffer, frame: &BitSequence) -> Result<()> {
    let available = buffer.usable_slots();
    if frame.len() > available {
        return Err(StegoError::Capacity {
            required: frame.len(),
            available,
        });
    }

    debug!("Embedding {} bits into {available} channel slots", frame.len());
    let walker = ChannelWalker::for_buffer(buffer);
    modify(frame.iter(), buffer, walker);
    Ok(())
}

/// 读取头部、校验声明的长度，再读出整个位帧。
fn extract(buffer: &PixelBuffer) -> Result<BitSequence> {
    let available = buffer.usable_slots();
    if available < LENGTH_HEADER_BITS {
        return Err(StegoError::Capacity {
            required: LENGTH_HEADER_BITS,
            available,
        });
    }

    let mut walker = ChannelWalker::for_buffer(buffer);
    let mut frame = recover(buffer, walker.by_ref(), LENGTH_HEADER_BITS);
    let declared = framer::payload_bits(frame.as_slice())?;
    trace!("Length header declares {declared} payload bits");

    let remaining = available - LENGTH_HEADER_BITS;
    if declared > remaining {
        return Err(StegoError::DeclaredLengthExceedsCapacity {
            declared,
            available: remaining,
        });
    }

    frame.extend(recover(buffer, walker, declared).iter());
    debug!("Extracted a frame of {} bits", frame.len());
    Ok(frame)
}

/// 依次把每一位写入对应槽位字节的最低位，位用完即停止。
fn modify(bits: impl Iterator<Item = bool>, pix: &mut PixelBuffer, walker: ChannelWalker) {
    for (slot, bit) in walker.zip(bits) {
        if let Some(byte) = pix.get_mut(slot.row, slot.col, slot.channel) {
            *byte = (*byte & LSB_CLEAR_MASK) | u8::from(bit);
        }
    }
}

/// 从遍历器的当前位置起读取 `count` 个槽位的最低位。
fn recover(pix: &PixelBuffer, walker: impl Iterator<Item = ChannelSlot>, count: usize) -> BitSequence {
    walker
        .take(count)
        .filter_map(|slot| pix.get(slot.row, slot.col, slot.channel))
        .map(|byte| byte & 1 == 1)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    /// 构造像素值按下标递增的缓冲区，便于检查哪些字节被动过。
    fn ramp(height: usize, width: usize, channels: usize) -> PixelBuffer {
        let data = (0..height * width * channels).map(|i| (i * 37 % 256) as u8).collect();
        PixelBuffer::new(height, width, channels, data).unwrap()
    }

    #[test]
    fn two_by_two_is_too_small_for_one_char() {
        let mut buffer = ramp(2, 2, 3);
        let before = buffer.clone();
        let err = LsbCodec::encode(&mut buffer, "A").unwrap_err();

        assert!(matches!(
            err,
            StegoError::Capacity {
                required: 24,
                available: 12
            }
        ));
        assert_eq!(buffer, before, "a rejected encode must not touch the buffer");
    }

    #[test]
    fn four_by_four_round_trips_one_char() {
        let mut buffer = ramp(4, 4, 3);
        LsbCodec::encode(&mut buffer, "A").unwrap();
        assert_eq!(LsbCodec::decode(&buffer).unwrap(), "A");
    }

    #[test]
    fn exact_capacity_fits_and_one_more_byte_does_not() {
        // 4x4 = 48 槽位 = 16 位头部 + 4 字节
        let mut buffer = ramp(4, 4, 3);
        LsbCodec::encode(&mut buffer, "abcd").unwrap();
        assert_eq!(LsbCodec::decode(&buffer).unwrap(), "abcd");

        let err = LsbCodec::encode(&mut ramp(4, 4, 3), "abcde").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Capacity);
        assert_eq!(LsbCodec::max_message_len(&buffer), 4);
    }

    #[test]
    fn only_the_lsb_of_the_frame_prefix_changes() {
        let original = ramp(5, 4, 4);
        let message = "Hi!";
        let encoded = LsbCodec::encoded(original.clone(), message).unwrap();
        let frame_bits = 16 + 8 * message.len();

        let touched: Vec<usize> = ChannelWalker::for_buffer(&original)
            .take(frame_bits)
            .map(|s| s.offset(original.width(), original.channels()))
            .collect();

        for (i, (&a, &b)) in original.as_raw().iter().zip(encoded.as_raw()).enumerate() {
            if touched.contains(&i) {
                assert_eq!(a & LSB_CLEAR_MASK, b & LSB_CLEAR_MASK, "byte {i} changed above the LSB");
            } else {
                assert_eq!(a, b, "byte {i} lies outside the frame and must be untouched");
            }
        }
        // alpha 通道从不参与
        assert!(touched.iter().all(|i| i % 4 != 3));
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = LsbCodec::encoded(ramp(6, 6, 3), "same").unwrap();
        let b = LsbCodec::encoded(ramp(6, 6, 3), "same").unwrap();
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn re_encoding_overwrites_the_previous_message() {
        let mut buffer = ramp(10, 10, 3);
        LsbCodec::encode(&mut buffer, "a much longer first message").unwrap();
        LsbCodec::encode(&mut buffer, "short").unwrap();
        assert_eq!(LsbCodec::decode(&buffer).unwrap(), "short");
    }

    #[test]
    fn decode_needs_room_for_a_header() {
        // 1x5 = 15 槽位 < 16
        let buffer = PixelBuffer::zeroed(1, 5, 3).unwrap();
        let err = LsbCodec::decode(&buffer).unwrap_err();
        assert!(matches!(
            err,
            StegoError::Capacity {
                required: 16,
                available: 15
            }
        ));
        assert_eq!(LsbCodec::max_message_len(&buffer), 0);
    }

    #[test]
    fn smallest_header_only_image_decodes_empty_message() {
        // 1x6 = 18 槽位，头部全零即空消息
        let mut buffer = ramp(1, 6, 3);
        LsbCodec::encode(&mut buffer, "").unwrap();
        assert_eq!(LsbCodec::decode(&buffer).unwrap(), "");
    }

    #[test]
    fn nonzero_header_in_header_only_image_is_a_framing_error() {
        let mut buffer = PixelBuffer::zeroed(1, 6, 3).unwrap();
        // 头部最后一位 -> 声明 1 位载荷
        buffer.set(0, 5, 0, 1).unwrap();
        let err = LsbCodec::decode(&buffer).unwrap_err();
        assert!(matches!(err, StegoError::MisalignedPayload { declared: 1 }));

        let mut buffer = PixelBuffer::zeroed(1, 6, 3).unwrap();
        // 头部倒数第四位 -> 声明 8 位载荷，但只剩 2 个槽位
        buffer.set(0, 4, 0, 1).unwrap();
        let err = LsbCodec::decode(&buffer).unwrap_err();
        assert!(matches!(
            err,
            StegoError::DeclaredLengthExceedsCapacity {
                declared: 8,
                available: 2
            }
        ));
    }

    #[test]
    fn wide_chars_are_rejected_before_any_write() {
        let mut buffer = ramp(10, 10, 3);
        let before = buffer.clone();
        let err = LsbCodec::encode(&mut buffer, "naïve ✓").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert_eq!(buffer, before);
    }

    #[test]
    fn bytes_round_trip_through_rgba() {
        let payload = "隐藏的 UTF-8 文本".as_bytes();
        let mut buffer = ramp(12, 12, 4);
        LsbCodec::encode_bytes(&mut buffer, payload).unwrap();
        assert_eq!(LsbCodec::decode_bytes(&buffer).unwrap(), payload);
    }
}
