pub mod artifacts;
pub mod config;
pub mod discovery;
pub mod executor;
pub mod json;
pub mod reporter;
pub mod types;

pub use config::RunConfig;
pub use discovery::{GroupPredicate, NameFilter, discover_groups, ensure_tests_dir};
pub use executor::GroupExecutor;
pub use json::JsonReport;
pub use reporter::TestReporter;
pub use types::{
    GroupVerdict, HarnessProblem, IgnoreSet, Report, RunResult, RunStatus, TestGroup, Verdict,
};

use crate::Result;
use std::path::Path;
use std::time::Instant;

/// 校验运行目录并按配置选出测试组
pub fn select_groups(root: &Path, config: &RunConfig) -> Result<Vec<TestGroup>> {
    ensure_tests_dir(root)?;
    let filter = NameFilter::new(config.ignore.clone());
    discover_groups(root, &filter)
}

/// 完整流程：发现 → 逐组执行 → 汇总
///
/// 只有前置条件错误和目录读取失败会返回 Err，单个组的问题都体现在报告中。
pub fn run_suite(root: &Path, config: &RunConfig) -> Result<Report> {
    let start = Instant::now();
    let groups = select_groups(root, config)?;

    tracing::info!(
        binary = %config.binary.display(),
        args = ?config.invocation_args(),
        groups = groups.len(),
        "Running test groups"
    );

    let executor = GroupExecutor::new(config.clone());
    let results = executor.execute_all(&groups);
    let report = Report::from_results(results, start.elapsed());

    tracing::info!(
        verdict = %report.verdict(),
        failed = report.total_failed_tests,
        elapsed_ms = report.elapsed.as_millis() as u64,
        "Run finished"
    );
    Ok(report)
}
