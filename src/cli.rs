use clap::Parser;
use std::path::{Path, PathBuf};

use crate::Result;
use crate::error::RegressError;
use crate::runner::{
    IgnoreSet, JsonReport, RunConfig, TestReporter, ensure_tests_dir, run_suite, select_groups,
};
use crate::utils::OutputStyle;

/// 前置条件错误时的退出码
pub const PRECONDITION_EXIT_CODE: u8 = 1;

#[derive(Parser, Debug)]
#[command(name = "run-tests", author, version, about, long_about = None)]
pub struct Cli {
    /// 跳过名称包含该片段的测试组（可重复，替换默认列表 groupH, groupJ）
    #[arg(long = "ignore", value_name = "FRAGMENT")]
    pub ignore: Vec<String>,

    /// 该组的 stderr 属于预期输出，不报告为异常（可重复，替换默认列表 groupH）
    #[arg(long = "expect-stderr", value_name = "GROUP")]
    pub expect_stderr: Vec<String>,

    /// 捕获文件不超过该字节数时删除
    #[arg(long, value_name = "BYTES")]
    pub prune_threshold: Option<u64>,

    /// 只列出将要运行的测试组
    #[arg(long)]
    pub list: bool,

    /// 报告前打印逐组汇总表
    #[arg(long)]
    pub summary: bool,

    /// 额外写出 JSON 报告
    #[arg(long, value_name = "PATH")]
    pub json_report: Option<PathBuf>,

    #[arg(long)]
    pub no_color: bool,

    /// 测试程序路径，其后的参数原样传给测试程序
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        value_name = "BINARY [EXTRA_ARGS]"
    )]
    pub args: Vec<String>,
}

impl Cli {
    /// 校验前置条件并构建运行配置
    ///
    /// 先检查工作目录，再检查测试程序参数。
    pub fn prepare(&self, root: &Path) -> Result<RunConfig> {
        ensure_tests_dir(root)?;

        let (binary, extra_args) = self
            .args
            .split_first()
            .ok_or_else(|| RegressError::Precondition(usage()))?;

        let mut config = RunConfig::new(PathBuf::from(binary), extra_args.to_vec());
        if !self.ignore.is_empty() {
            config = config.with_ignore(IgnoreSet::new(self.ignore.iter().cloned()));
        }
        if !self.expect_stderr.is_empty() {
            config = config.with_expected_stderr(self.expect_stderr.clone());
        }
        if let Some(bytes) = self.prune_threshold {
            config = config.with_prune_threshold(bytes);
        }
        Ok(config)
    }
}

fn program_name() -> String {
    std::env::args()
        .next()
        .as_deref()
        .and_then(|arg0| Path::new(arg0).file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "run-tests".to_string())
}

/// 缺少测试程序参数时的两行用法说明
pub fn usage() -> String {
    format!(
        "You need to supply the path to the unit-testing binary.\nUsage: {} /path/to/binary [extra-args...]",
        program_name()
    )
}

/// 在当前工作目录运行
pub fn run(cli: Cli) -> Result<u8> {
    let cwd = std::env::current_dir()?;
    run_in(&cwd, &cli)
}

/// 在指定的 tests 目录运行，返回编排器的退出码
pub fn run_in(root: &Path, cli: &Cli) -> Result<u8> {
    let config = match cli.prepare(root) {
        Ok(config) => config,
        Err(e) if e.is_precondition() => {
            eprintln!("{}", e);
            return Ok(PRECONDITION_EXIT_CODE);
        }
        Err(e) => return Err(e),
    };

    let reporter = TestReporter::new(OutputStyle::detect(cli.no_color));

    if cli.list {
        let groups = select_groups(root, &config)?;
        println!("{}", reporter.render_group_list(&groups));
        return Ok(0);
    }

    reporter.print_command(&config);
    let report = run_suite(root, &config)?;

    if cli.summary {
        reporter.print_summary_table(&report);
    }
    reporter.print_report(&report);

    if let Some(path) = &cli.json_report {
        JsonReport::new(&report, &config).write_to(path)?;
    }

    Ok(report.exit_code())
}
