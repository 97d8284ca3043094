//! # 图像读写模块
//!
//! 负责在图像文件与 [`PixelBuffer`] 之间转换。隐写核心只接触内存中的像素，
//! 文件格式的细节全部留在这里。

use crate::error::{Result, StegoError};
use crate::pixel_buffer::PixelBuffer;
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use log::debug;
use std::path::Path;

/// 读取图像文件并转换为 8 位像素缓冲区。
///
/// 带 alpha 通道的图像得到 4 通道 RGBA 缓冲区，其余得到 3 通道 RGB 缓冲区。
/// 16 位图像会被降为 8 位。
///
/// # Errors
///
/// 文件无法打开或解码时返回 [`StegoError::Image`]。
pub fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    let img = image::open(path)?;
    debug!(
        "Loaded {} as {:?} ({}x{})",
        path.display(),
        img.color(),
        img.width(),
        img.height()
    );
    from_dynamic(img)
}

/// 把已解码的图像转换为像素缓冲区。
pub fn from_dynamic(img: DynamicImage) -> Result<PixelBuffer> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    if img.color().has_alpha() {
        PixelBuffer::new(height, width, 4, img.into_rgba8().into_raw())
    } else {
        PixelBuffer::new(height, width, 3, img.into_rgb8().into_raw())
    }
}

/// 把像素缓冲区写入图像文件，格式由扩展名决定且必须是无损格式。
///
/// 多于 4 个通道的缓冲区只保留前 4 个通道。
///
/// # Errors
///
/// * 扩展名对应有损格式或无法识别时返回 [`StegoError::LossyOutputFormat`]，不会写入任何文件。
/// * 编码或写入失败时返回 [`StegoError::Image`]。
pub fn save_pixels(buffer: &PixelBuffer, path: &Path) -> Result<()> {
    ensure_lossless(path)?;
    to_dynamic(buffer)?.save(path)?;
    debug!("Saved {}x{} pixels to {}", buffer.width(), buffer.height(), path.display());
    Ok(())
}

/// 确认目标路径的扩展名对应无损格式。
pub fn ensure_lossless(path: &Path) -> Result<()> {
    match ImageFormat::from_path(path) {
        Ok(
            ImageFormat::Png
            | ImageFormat::Bmp
            | ImageFormat::Tiff
            | ImageFormat::WebP
            | ImageFormat::Qoi,
        ) => Ok(()),
        _ => Err(StegoError::LossyOutputFormat(path.to_path_buf())),
    }
}

/// 把像素缓冲区转换回 `image` 的图像类型。
pub fn to_dynamic(buffer: &PixelBuffer) -> Result<DynamicImage> {
    let shape_error = || StegoError::ShapeMismatch {
        height: buffer.height(),
        width: buffer.width(),
        channels: buffer.channels(),
        actual: buffer.as_raw().len(),
    };
    let width = u32::try_from(buffer.width()).map_err(|_| shape_error())?;
    let height = u32::try_from(buffer.height()).map_err(|_| shape_error())?;

    let img = match buffer.channels() {
        3 => RgbImage::from_raw(width, height, buffer.as_raw().to_vec()).map(DynamicImage::ImageRgb8),
        n => {
            let rgba: Vec<u8> = buffer
                .as_raw()
                .chunks_exact(n)
                .flat_map(|px| px[..4].iter().copied())
                .collect();
            RgbaImage::from_raw(width, height, rgba).map(DynamicImage::ImageRgba8)
        }
    };
    img.ok_or_else(shape_error)
}
