use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// 保留退出码：测试程序自身无法评估该组，而不是 255 个测试失败
pub const SENTINEL_EXIT_CODE: i32 = 255;

/// 一个测试组目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestGroup {
    /// 目录名（包含 "group"）
    pub name: String,

    /// 调用测试程序时的工作目录
    pub path: PathBuf,
}

impl TestGroup {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// 名称片段集合，组名包含任一片段即被跳过
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IgnoreSet {
    fragments: Vec<String>,
}

impl IgnoreSet {
    pub fn new<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self::default();
        for fragment in fragments {
            set.insert(fragment);
        }
        set
    }

    pub fn insert(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if !self.fragments.contains(&fragment) {
            self.fragments.push(fragment);
        }
    }

    pub fn matches(&self, name: &str) -> bool {
        self.fragments.iter().any(|f| name.contains(f.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|s| s.as_str())
    }
}

/// 一次调用的原始结果
///
/// 启动失败与退出码 255 在内部始终分开记录，
/// 只在对外报告时才映射为 255（见 [`RunResult::legacy_exit_code`]）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// 子进程正常结束并返回退出码
    Exited(i32),

    /// 子进程被信号终止，没有退出码
    Terminated(Option<i32>),

    /// 子进程无法启动
    LaunchFailed(String),

    /// 捕获文件无法创建，测试程序没有被调用
    CaptureFailed(String),
}

impl RunStatus {
    pub fn verdict(&self) -> GroupVerdict {
        match self {
            RunStatus::Exited(0) => GroupVerdict::Passed,
            RunStatus::Exited(code @ 1..=254) => GroupVerdict::Failed(*code as u32),
            RunStatus::Exited(SENTINEL_EXIT_CODE) => {
                GroupVerdict::HarnessProblem(HarnessProblem::Sentinel)
            }
            RunStatus::Exited(code) => {
                GroupVerdict::HarnessProblem(HarnessProblem::UnexpectedCode(*code))
            }
            RunStatus::Terminated(signal) => {
                GroupVerdict::HarnessProblem(HarnessProblem::Terminated(*signal))
            }
            RunStatus::LaunchFailed(reason) => {
                GroupVerdict::HarnessProblem(HarnessProblem::LaunchFailed(reason.clone()))
            }
            RunStatus::CaptureFailed(reason) => {
                GroupVerdict::HarnessProblem(HarnessProblem::CaptureFailed(reason.clone()))
            }
        }
    }
}

/// 单个测试组的分类结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupVerdict {
    Passed,

    /// 失败的测试用例数（1..=254）
    Failed(u32),

    /// 测试程序本身出了问题，该组未被评估
    HarnessProblem(HarnessProblem),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessProblem {
    /// 退出码 255
    Sentinel,
    LaunchFailed(String),
    CaptureFailed(String),
    Terminated(Option<i32>),
    /// 负数或大于 255 的退出码
    UnexpectedCode(i32),
}

impl fmt::Display for HarnessProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessProblem::Sentinel => write!(
                f,
                "the test binary could not evaluate this group (exit code {})",
                SENTINEL_EXIT_CODE
            ),
            HarnessProblem::LaunchFailed(reason) => {
                write!(f, "the test binary could not be launched: {}", reason)
            }
            HarnessProblem::CaptureFailed(reason) => {
                write!(f, "output capture could not be set up: {}", reason)
            }
            HarnessProblem::Terminated(Some(signal)) => {
                write!(f, "the test binary was terminated by signal {}", signal)
            }
            HarnessProblem::Terminated(None) => {
                write!(f, "the test binary terminated without an exit code")
            }
            HarnessProblem::UnexpectedCode(code) => {
                write!(f, "the test binary returned an unexpected exit code {}", code)
            }
        }
    }
}

/// 单个测试组的执行结果
#[derive(Debug, Clone)]
pub struct RunResult {
    pub group: TestGroup,

    pub status: RunStatus,

    /// 捕获的标准输出文件，被清理后为 None
    pub stdout_path: Option<PathBuf>,

    /// 捕获的标准错误文件，被清理后为 None
    pub stderr_path: Option<PathBuf>,

    /// 未被清理的 stderr 内容
    pub stderr: Option<String>,

    /// 该组属于专门产生诊断输出的组
    pub stderr_expected: bool,

    /// 执行耗时
    pub duration: Duration,
}

impl RunResult {
    pub fn new(group: TestGroup, status: RunStatus, duration: Duration) -> Self {
        Self {
            group,
            status,
            stdout_path: None,
            stderr_path: None,
            stderr: None,
            stderr_expected: false,
            duration,
        }
    }

    pub fn verdict(&self) -> GroupVerdict {
        self.status.verdict()
    }

    /// 计入总数的失败测试数，哨兵值和其他问题不计入
    pub fn failed_tests(&self) -> u32 {
        match self.verdict() {
            GroupVerdict::Failed(count) => count,
            _ => 0,
        }
    }

    pub fn harness_problem(&self) -> Option<HarnessProblem> {
        match self.verdict() {
            GroupVerdict::HarnessProblem(problem) => Some(problem),
            _ => None,
        }
    }

    /// 存在实质性 stderr 且不在预期列表中
    pub fn has_unexpected_stderr(&self) -> bool {
        self.stderr.is_some() && !self.stderr_expected
    }

    /// 对外报告使用的退出码，非正常退出统一映射为 255
    pub fn legacy_exit_code(&self) -> i32 {
        match self.status {
            RunStatus::Exited(code) => code,
            _ => SENTINEL_EXIT_CODE,
        }
    }
}

/// 整体结论
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Success,
    Failed,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Success => write!(f, "SUCCESS"),
            Verdict::Failed => write!(f, "FAILED"),
        }
    }
}

/// 整次运行的汇总，完全由结果序列推导
#[derive(Debug, Clone)]
pub struct Report {
    pub results: Vec<RunResult>,

    /// 所有非哨兵结果的失败测试数之和
    pub total_failed_tests: u64,

    /// 测试程序出问题的组
    pub crashed_groups: Vec<String>,

    /// 有非预期 stderr 的组
    pub error_output_groups: Vec<String>,

    /// 整次运行的墙钟时间（不参与分类）
    pub elapsed: Duration,
}

impl Report {
    pub fn from_results(results: Vec<RunResult>, elapsed: Duration) -> Self {
        let total_failed_tests = results.iter().map(|r| u64::from(r.failed_tests())).sum();
        let crashed_groups = results
            .iter()
            .filter(|r| r.harness_problem().is_some())
            .map(|r| r.group.name.clone())
            .collect();
        let error_output_groups = results
            .iter()
            .filter(|r| r.has_unexpected_stderr())
            .map(|r| r.group.name.clone())
            .collect();

        Self {
            results,
            total_failed_tests,
            crashed_groups,
            error_output_groups,
            elapsed,
        }
    }

    /// 有失败测试或测试程序出了问题
    pub fn has_failures(&self) -> bool {
        self.total_failed_tests > 0 || !self.crashed_groups.is_empty()
    }

    pub fn has_error_output(&self) -> bool {
        !self.error_output_groups.is_empty()
    }

    pub fn verdict(&self) -> Verdict {
        if self.has_failures() || self.has_error_output() {
            Verdict::Failed
        } else {
            Verdict::Success
        }
    }

    /// 编排器自身的退出码
    pub fn exit_code(&self) -> u8 {
        match self.verdict() {
            Verdict::Success => 0,
            Verdict::Failed => 1,
        }
    }

    /// 非预期 stderr 的 (组名, 内容)，按运行顺序
    pub fn error_outputs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results
            .iter()
            .filter(|r| r.has_unexpected_stderr())
            .filter_map(|r| {
                r.stderr
                    .as_deref()
                    .map(|content| (r.group.name.as_str(), content))
            })
    }
}
