//! 消息字符与单字节之间的转换。
//!
//! 每个字符的码位必须落在 0-255 之间，对应 Latin-1 字符集。

use crate::error::{Result, StegoError};

/// 把消息转换为字节序列，每个字符对应一个字节。
///
/// # Errors
///
/// 任一字符码位大于 255 时返回 [`StegoError::UnrepresentableChar`]。
pub fn to_bytes(message: &str) -> Result<Vec<u8>> {
    message
        .chars()
        .enumerate()
        .map(|(index, ch)| u8::try_from(ch).map_err(|_| StegoError::UnrepresentableChar { ch, index }))
        .collect()
}

/// 把字节序列逐字节映射回字符。任何字节都有对应字符，因此不会失败。
pub fn from_bytes(bytes: &[u8]) -> String {
    bytes.iter().copied().map(char::from).collect()
}
