use clap::Parser;
use env_logger::{Builder, Env};
use log::LevelFilter;

use lsb_frame::{
    cli::{Cli, Commands},
    handler::{handle_capacity, handle_hide, handle_recover},
};

/// 程序的主入口点
///
/// 负责解析命令行参数、初始化日志，并根据指定的子命令
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 解析命令行参数
    let cli = Cli::parse();

    // 默认 warn，可由 RUST_LOG 调整；-v 会覆盖全局级别
    let mut logger = Builder::from_env(Env::default().default_filter_or("warn"));
    match cli.verbose {
        0 => {}
        1 => {
            logger.filter_level(LevelFilter::Info);
        }
        _ => {
            logger.filter_level(LevelFilter::Debug);
        }
    }
    logger.init();

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Hide(args) => handle_hide(args),
        Commands::Recover(args) => handle_recover(args),
        Commands::Capacity(args) => handle_capacity(args).map(|_| ()),
    }
}
