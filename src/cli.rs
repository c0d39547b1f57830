//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::constants::{DEFAULT_AMPLIFY, DEFAULT_BITS_PER_CHANNEL, MAX_BITS_PER_CHANNEL, MIN_BITS_PER_CHANNEL};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，可在无损格式图像中隐藏、加密并恢复文本。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具。消息带有自描述的帧头，可选用密码加密，并支持比较两幅图像的差异。"
)]
pub struct Cli {
    /// 输出调试日志。
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 在无损格式图像 (如 PNG, BMP) 中隐藏一段文本。
    Hide(HideArgs),

    /// 从经过隐写的图像中提取隐藏的文本。
    #[command(alias = "recover")]
    Extract(ExtractArgs),

    /// 统计两幅同尺寸图像之间的逐通道差异。
    Analyze(AnalyzeArgs),

    /// 生成放大后的差异图像，便于肉眼观察。
    Visualize(VisualizeArgs),
}

fn bits_parser() -> clap::builder::RangedI64ValueParser<u8> {
    clap::value_parser!(u8).range(i64::from(MIN_BITS_PER_CHANNEL)..=i64::from(MAX_BITS_PER_CHANNEL))
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct HideArgs {
    /// 用于隐写的输入图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容的文件路径。
    #[arg(short, long, conflicts_with = "message", required_unless_present = "message")]
    pub text: Option<PathBuf>,

    /// 直接在命令行中给出要隐藏的文本。
    #[arg(short, long)]
    pub message: Option<String>,

    /// 结果图像的输出路径。省略时保存为源文件旁的 `doctored_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 加密用的密码，省略则以明文嵌入。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 每个颜色通道使用的最低有效位数 (1 或 2)。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = bits_parser())]
    pub bits: u8,

    /// 如果输出文件已存在，则强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'extract' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// 已隐藏文本数据的图像文件路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 将恢复的文本保存到此文件，省略时仅打印到终端。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 嵌入时使用的密码。
    #[arg(short, long)]
    pub password: Option<String>,

    /// 嵌入时使用的每通道位数。
    #[arg(short, long, default_value_t = DEFAULT_BITS_PER_CHANNEL, value_parser = bits_parser())]
    pub bits: u8,

    /// 如果输出文件已存在，则强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'analyze' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// 原始图像路径。
    #[arg(short, long)]
    pub original: PathBuf,

    /// 修改后的图像路径。
    #[arg(short, long)]
    pub modified: PathBuf,
}

/// 'visualize' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct VisualizeArgs {
    /// 原始图像路径。
    #[arg(short, long)]
    pub original: PathBuf,

    /// 修改后的图像路径。
    #[arg(short, long)]
    pub modified: PathBuf,

    /// 差异图像的输出路径。省略时保存为 `diff_<名称>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 差异放大倍数，结果截断到 255。
    #[arg(short, long, default_value_t = DEFAULT_AMPLIFY)]
    pub amplify: u32,

    /// 如果输出文件已存在，则强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}
