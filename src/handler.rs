//! # 命令处理逻辑模块
//!
//! 包含各个子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{AnalyzeArgs, ExtractArgs, HideArgs, VisualizeArgs};
use crate::constants::LOSSLESS_EXTENSIONS;
use crate::diff::{analyze_images, visualize_diff};
use crate::models::{DiffReport, EmbedReport};
use crate::steganography::{extract_message, hide_message_with_progress};
use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

/// 在源文件所在目录下生成 `<prefix>_<名称>.png` 形式的默认输出路径。
fn default_output_path(source: &Path, prefix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());

    source.with_file_name(format!("{prefix}_{stem}.png"))
}

/// 拒绝覆盖已存在的文件，除非指定了 `--force`。
fn ensure_can_write(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 隐写结果只能保存为无损格式，否则隐藏的比特会被压缩破坏。
fn ensure_lossless(path: &Path) -> Result<()> {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    anyhow::ensure!(
        LOSSLESS_EXTENSIONS.contains(&extension.as_str()),
        "Unsupported output format: {}. \nUse one of: {}",
        path.to_string_lossy().red().bold(),
        LOSSLESS_EXTENSIONS.join(", ").green()
    );
    Ok(())
}

fn format_bytes(size: i64) -> String {
    if size.abs() < 1024 {
        return format!("{size} B");
    }

    let mut value = size as f64;
    for unit in ["KB", "MB", "GB"] {
        value /= 1024.0;
        if value.abs() < 1024.0 {
            return format!("{value:.1} {unit}");
        }
    }
    format!("{:.1} TB", value / 1024.0)
}

fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

fn colorize_utilization(value: f64) -> ColoredString {
    let text = format_percentage(value);
    let colored = match value {
        v if v < 0.3 => text.green(),
        v if v < 0.6 => text.yellow(),
        v if v < 0.9 => text.magenta(),
        _ => text.red(),
    };
    colored.bold()
}

fn print_row(label: &str, value: impl std::fmt::Display) {
    println!("  {:<24} {}", label.cyan(), value);
}

fn print_embed_report(report: &EmbedReport) {
    println!("{}", "Embedding report".green().bold());
    print_row(
        "Payload",
        format!("{} bytes ({} bits)", report.payload_bytes(), report.payload_bits),
    );
    print_row("Bits per channel", report.bits_per_channel);
    print_row(
        "Capacity used",
        format!("{} of {} bits", colorize_utilization(report.utilization()), report.capacity_bits),
    );
    print_row(
        "Pixels touched",
        format!(
            "{} of {} ({} channels each)",
            report.pixels_touched, report.total_pixels, report.channels_used
        ),
    );
    print_row(
        "File size",
        format!(
            "{} -> {}",
            format_bytes(report.file_size_before as i64),
            format_bytes(report.file_size_after as i64)
        ),
    );

    let diff = report.file_size_diff();
    let sign = if diff >= 0 { "+" } else { "" };
    print_row("Size difference", format!("{sign}{}", format_bytes(diff)));
}

fn print_diff_report(report: &DiffReport) {
    println!("{}", "Difference analysis".blue().bold());
    print_row(
        "Changed channels",
        format!("{} of {}", report.changed_channels, report.total_channels),
    );
    print_row("Change ratio", format_percentage(report.change_ratio()));
    print_row("Average difference", format!("{:.4}", report.avg_abs_diff));
    print_row("Maximum difference", report.max_abs_diff);
    print_row(
        "File size",
        format!(
            "{} -> {}",
            format_bytes(report.file_size_before as i64),
            format_bytes(report.file_size_after as i64)
        ),
    );
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取消息、检查输出路径，然后调用隐写核心函数完成嵌入并打印报告。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像或文本文件。
/// * 输出文件已存在且未指定 `--force`，或输出格式不是无损格式。
/// * 每通道位数无效，或图像没有足够的空间来隐藏文本。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<EmbedReport> {
    let message = match (&args.message, &args.text) {
        (Some(message), _) => message.clone(),
        (None, Some(text)) => fs::read_to_string(text).with_context(|| {
            format!(
                "Unable to read text file: {}",
                text.to_string_lossy().red().bold()
            )
        })?,
        (None, None) => anyhow::bail!("Either --text or --message must be provided."),
    };

    let dest = args
        .dest
        .unwrap_or_else(|| default_output_path(&args.image, "doctored"));
    ensure_lossless(&dest)?;
    ensure_can_write(&dest, args.force)?;

    let password = args.password.as_deref().filter(|p| !p.is_empty());
    info!(
        "Hiding {} bytes in {} ({} bit(s) per channel, {})",
        message.len(),
        args.image.display(),
        args.bits,
        if password.is_some() { "encrypted" } else { "plain" }
    );

    let report = hide_message_with_progress(
        &args.image,
        &dest,
        &message,
        password,
        args.bits,
        |done, total| debug!("Embedding: {done}/{total} pixels"),
    )
    .with_context(|| {
        format!(
            "Failed to hide the message in {}",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The text has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    print_embed_report(&report);

    Ok(report)
}

/// 处理 'Extract' 命令的执行逻辑。
///
/// 提取并解密隐藏的文本，打印到终端；指定了 `--output` 时改为写入文件。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有隐藏数据、数据被截断或密码错误导致无法解码。
/// * 无法写入到目标文本文件。
pub fn handle_extract(args: ExtractArgs) -> Result<String> {
    if let Some(output) = &args.output {
        ensure_can_write(output, args.force)?;
    }

    let password = args.password.as_deref().filter(|p| !p.is_empty());
    let message = extract_message(&args.image, password, args.bits).with_context(|| {
        format!(
            "Failed to recover the message from '{}'. \nThe image may not contain a hidden message, or the password and bit depth do not match.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!("Recovered {} bytes from {}", message.len(), args.image.display());

    match &args.output {
        Some(output) => {
            fs::write(output, &message).with_context(|| {
                format!(
                    "Unable to write to target text file: {}",
                    output.to_string_lossy().red().bold()
                )
            })?;
            println!(
                "The text has been successfully recovered and saved: {}",
                output.to_string_lossy().green().bold()
            );
        }
        None => {
            println!("{}", "Recovered message:".green().bold());
            println!("{message}");
        }
    }

    Ok(message)
}

/// 处理 'Analyze' 命令：比较两幅图像并打印差异报告。
pub fn handle_analyze(args: AnalyzeArgs) -> Result<DiffReport> {
    let report = analyze_images(&args.original, &args.modified).with_context(|| {
        format!(
            "Unable to compare {} with {}",
            args.original.to_string_lossy().red().bold(),
            args.modified.to_string_lossy().red().bold()
        )
    })?;

    print_diff_report(&report);
    Ok(report)
}

/// 处理 'Visualize' 命令：保存放大后的差异图像。
pub fn handle_visualize(args: VisualizeArgs) -> Result<PathBuf> {
    let dest = args
        .dest
        .unwrap_or_else(|| default_output_path(&args.modified, "diff"));
    ensure_lossless(&dest)?;
    ensure_can_write(&dest, args.force)?;

    visualize_diff(&args.original, &args.modified, &dest, args.amplify).with_context(|| {
        format!(
            "Unable to build the difference image for {} and {}",
            args.original.to_string_lossy().red().bold(),
            args.modified.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The difference image has been saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(dest)
}
