use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use lsb_vault::{
    cli::{Cli, Commands},
    handler::{handle_analyze, handle_extract, handle_hide, handle_visualize},
};

/// 初始化日志系统。
///
/// 默认输出 `warn` 及以上级别，`--verbose` 时输出 `debug`，
/// `RUST_LOG` 环境变量仍然可以覆盖这一设置。
fn init_logger(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();
    init_logger(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args).map(|_| ()),
        Commands::Extract(args) => handle_extract(args).map(|_| ()),
        Commands::Analyze(args) => handle_analyze(args).map(|_| ()),
        Commands::Visualize(args) => handle_visualize(args).map(|_| ()),
    }
}
