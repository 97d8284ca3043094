//! # 位帧模块
//!
//! 把消息转换为自定界的位序列，以及反向还原。
//!
//! 帧的布局：
//!
//! ```text
//! | 16 位长度头部 (大端序，载荷位数) | 载荷：每字节 8 位，高位在前 |
//! ```

use crate::constants::{BITS_PER_BYTE, LENGTH_HEADER_BITS, MAX_PAYLOAD_BITS};
use crate::error::{Result, StegoError};
use crate::latin1;

/// 一串有序的单个位。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitSequence(Vec<bool>);

impl BitSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(bits: usize) -> Self {
        Self(Vec::with_capacity(bits))
    }

    pub fn push(&mut self, bit: bool) {
        self.0.push(bit);
    }

    /// 追加 `value` 的低 `width` 位，高位在前。
    pub fn push_bits(&mut self, value: u16, width: usize) {
        for shift in (0..width).rev() {
            self.0.push((value >> shift) & 1 == 1);
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// 把一段位 (高位在前) 拼成整数，最多 16 位。
    pub(crate) fn read_u16(bits: &[bool]) -> u16 {
        bits.iter().fold(0u16, |acc, &bit| (acc << 1) | u16::from(bit))
    }
}

impl From<Vec<bool>> for BitSequence {
    fn from(bits: Vec<bool>) -> Self {
        Self(bits)
    }
}

impl Extend<bool> for BitSequence {
    fn extend<I: IntoIterator<Item = bool>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl FromIterator<bool> for BitSequence {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 为字节序列组帧。
///
/// # Errors
///
/// 载荷位数超过 65535 时返回 [`StegoError::HeaderOverflow`]。
pub fn encode_frame_bytes(payload: &[u8]) -> Result<BitSequence> {
    let payload_bits = payload
        .len()
        .checked_mul(BITS_PER_BYTE)
        .filter(|&bits| bits <= MAX_PAYLOAD_BITS)
        .ok_or(StegoError::HeaderOverflow {
            bytes: payload.len(),
            bits: payload.len().saturating_mul(BITS_PER_BYTE),
            max: MAX_PAYLOAD_BITS,
        })?;

    let mut bits = BitSequence::with_capacity(LENGTH_HEADER_BITS + payload_bits);
    bits.push_bits(payload_bits as u16, LENGTH_HEADER_BITS);
    for &byte in payload {
        bits.push_bits(u16::from(byte), BITS_PER_BYTE);
    }

    Ok(bits)
}

/// 为消息组帧，每个字符必须能用单字节表示。
///
/// # Errors
///
/// * 字符码位大于 255 时返回 [`StegoError::UnrepresentableChar`]。
/// * 消息过长时返回 [`StegoError::HeaderOverflow`]。
pub fn encode_frame(message: &str) -> Result<BitSequence> {
    encode_frame_bytes(&latin1::to_bytes(message)?)
}

/// 从位序列中还原字节序列。头部之后多余的位会被忽略。
///
/// # Errors
///
/// * 位数不足 16 时返回 [`StegoError::MissingHeader`]。
/// * 位数少于 `16 + n` 时返回 [`StegoError::TruncatedFrame`]。
/// * `n` 不是 8 的倍数时返回 [`StegoError::MisalignedPayload`]。
pub fn decode_frame_bytes(bits: &BitSequence) -> Result<Vec<u8>> {
    let bits = bits.as_slice();
    if bits.len() < LENGTH_HEADER_BITS {
        return Err(StegoError::MissingHeader {
            available: bits.len(),
        });
    }

    let (header, rest) = bits.split_at(LENGTH_HEADER_BITS);
    let declared = payload_bits(header)?;
    if rest.len() < declared {
        return Err(StegoError::TruncatedFrame {
            declared,
            available: rest.len(),
        });
    }

    Ok(rest[..declared]
        .chunks_exact(BITS_PER_BYTE)
        .map(|chunk| BitSequence::read_u16(chunk) as u8)
        .collect())
}

/// 从位序列中还原消息。
///
/// # Errors
///
/// 与 [`decode_frame_bytes`] 相同。
pub fn decode_frame(bits: &BitSequence) -> Result<String> {
    decode_frame_bytes(bits).map(|bytes| latin1::from_bytes(&bytes))
}

/// 解析 16 位长度头部，并校验载荷位数是 8 的倍数。
pub(crate) fn payload_bits(header: &[bool]) -> Result<usize> {
    let declared = BitSequence::read_u16(header) as usize;
    if declared % BITS_PER_BYTE != 0 {
        return Err(StegoError::MisalignedPayload { declared });
    }
    Ok(declared)
}
