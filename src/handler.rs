//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::image_io::{ensure_lossless, load_pixels, save_pixels};
use crate::steganography::LsbCodec;
use anyhow::{Context, Result};
use colored::Colorize;
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// 未指定消息来源时，隐藏的时间戳格式 (ISO-8601，微秒精度)。
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取图像和消息、检查隐写空间是否足够、调用隐写核心函数写入长度帧，
/// 最后将结果写入目标图像文件。
///
/// 消息来源依次为：`--text` 文件的原始字节、`--message` 的 UTF-8 字节、当前本地时间戳。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 目标文件的扩展名不是无损格式。
/// * 无法读取输入的图像或文本文件。
/// * 图像文件没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_output(&args.image, "doctored_", "png"));
    check_overwrite(&dest, args.force)?;
    ensure_lossless(&dest).with_context(|| {
        format!(
            "Refusing to write hidden data to {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    let payload = read_payload(&args)?;

    let mut pixels = load_pixels(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let available = LsbCodec::max_message_len(&pixels);
    anyhow::ensure!(
        payload.len() <= available,
        "Not enough space in the image to hide the text. \nRequired: {} bytes, Available: {} bytes",
        payload.len().to_string().red().bold(),
        available.to_string().green().bold()
    );

    LsbCodec::encode_bytes(&mut pixels, &payload)
        .with_context(|| "Failed to hide the message in the image.")?;

    save_pixels(&pixels, &dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像文件、调用恢复核心函数解析长度帧，
/// 最后将恢复的原始字节写入目标文本文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入的图像文件。
/// * 图像中没有合法的长度帧。
/// * 无法写入到目标文本文件。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    let dest = args
        .text
        .clone()
        .unwrap_or_else(|| default_output(&args.image, "recovered_", "txt"));
    check_overwrite(&dest, args.force)?;

    let pixels = load_pixels(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let text = LsbCodec::decode_bytes(&pixels).with_context(|| {
        format!(
            "Failed to recover the hidden message from '{}'. \nThe image may not contain a hidden message or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("Recovered {} bytes", text.len());

    fs::write(&dest, text).with_context(|| {
        format!(
            "Unable to write to target text file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑，返回图像能隐藏的最大字节数。
///
/// # Errors
///
/// 无法读取输入的图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<usize> {
    let pixels = load_pixels(&args.image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    let max_len = LsbCodec::max_message_len(&pixels);
    println!(
        "{}: {} channel slots, up to {} bytes of text",
        args.image.to_string_lossy().bold(),
        LsbCodec::capacity_bits(&pixels).to_string().green(),
        max_len.to_string().green().bold()
    );
    Ok(max_len)
}

/// 按 `--text`、`--message`、时间戳的顺序确定要隐藏的字节。
fn read_payload(args: &HideArgs) -> Result<Vec<u8>> {
    if let Some(path) = &args.text {
        return fs::read(path).with_context(|| {
            format!(
                "Unable to read text file: {}",
                path.to_string_lossy().red().bold()
            )
        });
    }

    if let Some(message) = &args.message {
        return Ok(message.as_bytes().to_vec());
    }

    let stamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    info!("No message given, hiding timestamp {stamp}");
    Ok(stamp.into_bytes())
}

/// 在输入文件所在目录下生成 `<prefix><stem>.<ext>` 形式的默认输出路径。
fn default_output(input: &Path, prefix: &str, ext: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    let path = input.with_file_name(format!("{prefix}{stem}.{ext}"));
    info!("No output path given, using {}", path.display());
    path
}

/// 目标文件已存在时，只有在 `force` 为真时才允许继续。
fn check_overwrite(path: &Path, force: bool) -> Result<()> {
    if path.exists() {
        anyhow::ensure!(
            force,
            "Output file already exists: {}. \nUse --force to overwrite it.",
            path.to_string_lossy().red().bold()
        );
        warn!("Overwriting existing file {}", path.display());
    }
    Ok(())
}
