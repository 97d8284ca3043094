/// 长度头部占用的位数。
/// 头部是一个大端序的 `u16`，记录载荷的位数 (不是字节数)。
pub const LENGTH_HEADER_BITS: usize = 16;

/// 每个消息字节展开后的位数，高位在前。
pub const BITS_PER_BYTE: usize = 8;

/// 每个像素参与隐写的通道数 (R, G, B)。
/// 第 4 个及之后的通道 (如 alpha) 永远不会被修改。
pub const USABLE_CHANNELS: usize = 3;

/// 长度头部能表示的最大载荷位数。
pub const MAX_PAYLOAD_BITS: usize = u16::MAX as usize;

/// 单条消息允许的最大字节数。
/// 65535 不是 8 的倍数，因此实际上限是 65528 / 8 = 8191 字节。
pub const MAX_MESSAGE_BYTES: usize = MAX_PAYLOAD_BITS / BITS_PER_BYTE;

/// 清除最低有效位所用的掩码。
pub const LSB_CLEAR_MASK: u8 = 0xFE;
