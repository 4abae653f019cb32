use crate::Result;
use crate::runner::config::RunConfig;
use crate::runner::types::{GroupVerdict, Report, Verdict};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// 机器可读的运行报告
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub generated_at: DateTime<Utc>,
    pub verdict: Verdict,
    pub total_failed_tests: u64,
    pub crashed_groups: Vec<String>,
    pub error_output_groups: Vec<String>,
    pub elapsed_ms: u64,
    pub config: RunConfig,
    pub groups: Vec<GroupRecord>,
}

/// 单个测试组的记录
#[derive(Debug, Clone, Serialize)]
pub struct GroupRecord {
    pub name: String,

    /// 对外兼容的退出码，启动失败同样记为 255
    pub exit_code: i32,

    /// passed / failed / harness
    pub outcome: &'static str,

    pub failed_tests: u32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_path: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,

    pub duration_ms: u64,
}

impl JsonReport {
    pub fn new(report: &Report, config: &RunConfig) -> Self {
        let groups = report
            .results
            .iter()
            .map(|r| {
                let (outcome, problem) = match r.verdict() {
                    GroupVerdict::Passed => ("passed", None),
                    GroupVerdict::Failed(_) => ("failed", None),
                    GroupVerdict::HarnessProblem(p) => ("harness", Some(p.to_string())),
                };
                GroupRecord {
                    name: r.group.name.clone(),
                    exit_code: r.legacy_exit_code(),
                    outcome,
                    failed_tests: r.failed_tests(),
                    problem,
                    stdout_path: r.stdout_path.clone(),
                    stderr_path: r.stderr_path.clone(),
                    stderr: r.stderr.clone(),
                    duration_ms: r.duration.as_millis() as u64,
                }
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            verdict: report.verdict(),
            total_failed_tests: report.total_failed_tests,
            crashed_groups: report.crashed_groups.clone(),
            error_output_groups: report.error_output_groups.clone(),
            elapsed_ms: report.elapsed.as_millis() as u64,
            config: config.clone(),
            groups,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        tracing::info!(path = %path.display(), "JSON report written");
        Ok(())
    }
}
