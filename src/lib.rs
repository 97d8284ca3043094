//! # lsb_frame 库
//!
//! 本库包含带长度帧的 1 位 LSB 隐写编解码器，以及围绕它的图像读写与命令行逻辑。
//!
//! ```
//! use lsb_frame::{LsbCodec, PixelBuffer};
//!
//! let mut pixels = PixelBuffer::zeroed(4, 4, 3)?;
//! LsbCodec::encode(&mut pixels, "A")?;
//! assert_eq!(LsbCodec::decode(&pixels)?, "A");
//! # Ok::<(), lsb_frame::StegoError>(())
//! ```

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod framer;
pub mod handler;
pub mod image_io;
pub mod latin1;
pub mod pixel_buffer;
pub mod steganography;
pub mod walker;

pub use error::{ErrorKind, Result, StegoError};
pub use framer::BitSequence;
pub use pixel_buffer::PixelBuffer;
pub use steganography::LsbCodec;
pub use walker::{ChannelSlot, ChannelWalker};
