use serde::Serialize;
use std::path::PathBuf;

use crate::runner::types::IgnoreSet;

/// 测试组目录名必须包含的标记
pub const GROUP_MARKER: &str = "group";

/// 运行目录必须的名称
pub const TESTS_DIR_NAME: &str = "tests";

/// 固定参数模板，追加在测试程序路径之后
pub const TEMPLATE_ARGS: [&str; 3] = ["test_group.c", "-t", "test-file.txt"];

pub const STDOUT_FILE: &str = "stdout.txt";
pub const STDERR_FILE: &str = "stderr.txt";

/// 捕获文件不超过此大小（字节）视为空，运行后删除
pub const PRUNE_THRESHOLD_BYTES: u64 = 2;

/// 默认跳过的测试组
///
/// groupH 的测试文件故意充满错误，用于检验错误报告机制；
/// groupJ 只包含被其他组引用的源文件。
pub const DEFAULT_IGNORE: [&str; 2] = ["groupH", "groupJ"];

/// 专门产生诊断输出的测试组，其 stderr 不算异常
pub const DEFAULT_EXPECTED_STDERR: [&str; 1] = ["groupH"];

/// 单次运行的全部配置
#[derive(Debug, Clone, Serialize)]
pub struct RunConfig {
    /// 被测程序路径
    pub binary: PathBuf,

    /// 追加在固定模板之后的参数，原样传递
    pub extra_args: Vec<String>,

    pub ignore: IgnoreSet,

    pub expected_stderr: Vec<String>,

    pub prune_threshold: u64,
}

impl RunConfig {
    pub fn new(binary: impl Into<PathBuf>, extra_args: Vec<String>) -> Self {
        Self {
            binary: binary.into(),
            extra_args,
            ignore: IgnoreSet::new(DEFAULT_IGNORE),
            expected_stderr: DEFAULT_EXPECTED_STDERR
                .iter()
                .map(|s| s.to_string())
                .collect(),
            prune_threshold: PRUNE_THRESHOLD_BYTES,
        }
    }

    pub fn with_ignore(mut self, ignore: IgnoreSet) -> Self {
        self.ignore = ignore;
        self
    }

    pub fn with_expected_stderr(mut self, groups: Vec<String>) -> Self {
        self.expected_stderr = groups;
        self
    }

    pub fn with_prune_threshold(mut self, bytes: u64) -> Self {
        self.prune_threshold = bytes;
        self
    }

    /// 该组的 stderr 是否属于预期输出
    pub fn expects_stderr(&self, group: &str) -> bool {
        self.expected_stderr.iter().any(|g| g == group)
    }

    /// 完整的调用参数（不含程序本身）
    pub fn invocation_args(&self) -> Vec<String> {
        TEMPLATE_ARGS
            .iter()
            .map(|s| s.to_string())
            .chain(self.extra_args.iter().cloned())
            .collect()
    }

    /// 每个组都会执行的完整命令行，含空白的参数加引号
    pub fn command_line(&self) -> String {
        std::iter::once(self.binary.display().to_string())
            .chain(self.invocation_args())
            .map(|arg| {
                if arg.is_empty() || arg.contains(char::is_whitespace) {
                    format!("{:?}", arg)
                } else {
                    arg
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
