use anyhow::Result;
use clap::Parser;
use jcut_regress::cli::{self, Cli};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    // 初始化日志系统
    jcut_regress::logger::init_logger();

    let cli = Cli::parse();
    let code = cli::run(cli)?;
    Ok(ExitCode::from(code))
}
