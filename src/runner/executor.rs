use crate::Result;
use crate::error::RegressError;
use crate::runner::artifacts::{prune_if_trivial, read_capture};
use crate::runner::config::{RunConfig, STDERR_FILE, STDOUT_FILE};
use crate::runner::types::{RunResult, RunStatus, TestGroup};
use std::fs::File;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::time::Instant;

pub struct GroupExecutor {
    config: RunConfig,
}

impl GroupExecutor {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// 按给定顺序逐个执行所有测试组
    ///
    /// 单个组的任何失败都记录在结果中，不会中断后续组。
    pub fn execute_all(&self, groups: &[TestGroup]) -> Vec<RunResult> {
        let mut results = Vec::with_capacity(groups.len());

        for group in groups {
            let result = self.execute_one(group);
            results.push(result);
        }

        results
    }

    /// 执行单个测试组（阻塞直到子进程结束，没有超时）
    pub fn execute_one(&self, group: &TestGroup) -> RunResult {
        // 开始计时
        let start = Instant::now();

        let status = match self.spawn_group(group) {
            Ok(exit) => Self::status_from_exit(exit),
            Err(e @ RegressError::Capture { .. }) => {
                tracing::warn!(group = %group.name, error = %e, "Output capture failed");
                RunStatus::CaptureFailed(e.to_string())
            }
            Err(e) => {
                tracing::warn!(
                    group = %group.name,
                    error = %e,
                    "Test binary could not be launched"
                );
                RunStatus::LaunchFailed(e.to_string())
            }
        };
        let mut result = RunResult::new(group.clone(), status, start.elapsed());

        tracing::debug!(
            group = %group.name,
            status = ?result.status,
            duration_ms = result.duration.as_millis() as u64,
            "Group finished"
        );

        self.collect_artifacts(&mut result);
        result
    }

    /// 启动测试程序并等待结束
    ///
    /// 工作目录通过 `current_dir` 显式传给子进程，进程自身的当前目录保持不变。
    /// 捕获文件在此函数返回时已经关闭。
    fn spawn_group(&self, group: &TestGroup) -> Result<ExitStatus> {
        let binary = self.config.binary.display().to_string();
        let stdout = create_capture(&group.path.join(STDOUT_FILE))?;
        let stderr = create_capture(&group.path.join(STDERR_FILE))?;

        Command::new(&self.config.binary)
            .args(self.config.invocation_args())
            .current_dir(&group.path)
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .status()
            .map_err(|source| RegressError::Launch { binary, source })
    }

    #[cfg(unix)]
    fn status_from_exit(exit: ExitStatus) -> RunStatus {
        use std::os::unix::process::ExitStatusExt;

        match exit.code() {
            Some(code) => RunStatus::Exited(code),
            None => RunStatus::Terminated(exit.signal()),
        }
    }

    #[cfg(not(unix))]
    fn status_from_exit(exit: ExitStatus) -> RunStatus {
        match exit.code() {
            Some(code) => RunStatus::Exited(code),
            None => RunStatus::Terminated(None),
        }
    }

    /// 清理空的捕获文件，读取保留下来的 stderr
    fn collect_artifacts(&self, result: &mut RunResult) {
        let threshold = self.config.prune_threshold;
        let dir = result.group.path.clone();

        match prune_if_trivial(&dir.join(STDOUT_FILE), threshold) {
            Ok(path) => result.stdout_path = path,
            Err(e) => {
                tracing::warn!(
                    group = %result.group.name,
                    error = %e,
                    "Failed to prune stdout capture"
                );
                result.stdout_path = Some(dir.join(STDOUT_FILE));
            }
        }

        let stderr_path = match prune_if_trivial(&dir.join(STDERR_FILE), threshold) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(
                    group = %result.group.name,
                    error = %e,
                    "Failed to prune stderr capture"
                );
                Some(dir.join(STDERR_FILE))
            }
        };

        if let Some(path) = &stderr_path {
            result.stderr = match read_capture(path) {
                Ok(content) => Some(content),
                Err(e) => Some(format!("<failed to read {}: {}>", path.display(), e)),
            };
            result.stderr_expected = self.config.expects_stderr(&result.group.name);
        }
        result.stderr_path = stderr_path;
    }
}

/// 创建（截断）捕获文件
fn create_capture(path: &Path) -> Result<File> {
    File::create(path).map_err(|source| RegressError::Capture {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::runner::types::{GroupVerdict, HarnessProblem};
    use std::fs;
    use tempfile::TempDir;

    /// 用 /bin/sh 代替测试程序：`sh test_group.c -t test-file.txt ...`
    fn sh_group(root: &TempDir, name: &str, script: &str) -> TestGroup {
        let dir = root.path().join(name);
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("test_group.c"), script).unwrap();
        TestGroup::new(name, dir)
    }

    fn sh_executor() -> GroupExecutor {
        GroupExecutor::new(RunConfig::new("/bin/sh", vec![]))
    }

    #[test]
    fn test_exit_code_and_pruning() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupB", "exit 3\n");

        let result = sh_executor().execute_one(&group);

        assert_eq!(result.status, RunStatus::Exited(3));
        assert_eq!(result.verdict(), GroupVerdict::Failed(3));
        assert!(result.stdout_path.is_none());
        assert!(result.stderr_path.is_none());
        assert!(!group.path.join(STDOUT_FILE).exists());
        assert!(!group.path.join(STDERR_FILE).exists());
    }

    #[test]
    fn test_argument_template_and_working_dir() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupA", "printf '%s\\n' \"$*\"\npwd\n");
        let config = RunConfig::new("/bin/sh", vec!["-v".to_string(), "extra".to_string()]);

        let result = GroupExecutor::new(config).execute_one(&group);

        assert_eq!(result.status, RunStatus::Exited(0));
        let stdout_path = result.stdout_path.expect("stdout should be kept");
        let stdout = fs::read_to_string(stdout_path).unwrap();
        let mut lines = stdout.lines();
        assert_eq!(lines.next(), Some("-t test-file.txt -v extra"));
        let cwd = lines.next().unwrap();
        assert!(cwd.ends_with("groupA"), "unexpected cwd {}", cwd);
    }

    #[test]
    fn test_stderr_is_captured() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupD", "echo 'warning: leak detected' >&2\n");

        let result = sh_executor().execute_one(&group);

        assert_eq!(result.status, RunStatus::Exited(0));
        assert_eq!(result.stderr.as_deref(), Some("warning: leak detected\n"));
        assert!(result.has_unexpected_stderr());
        assert!(group.path.join(STDERR_FILE).exists());
    }

    #[test]
    fn test_expected_stderr_group() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupH", "echo 'error: malformed test file' >&2\nexit 2\n");

        let result = sh_executor().execute_one(&group);

        assert!(result.stderr.is_some());
        assert!(result.stderr_expected);
        assert!(!result.has_unexpected_stderr());
    }

    #[test]
    fn test_previous_capture_is_truncated() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupA", "exit 0\n");
        fs::write(group.path.join(STDERR_FILE), "stale output from last run").unwrap();

        let result = sh_executor().execute_one(&group);

        assert!(result.stderr.is_none());
        assert!(!group.path.join(STDERR_FILE).exists());
    }

    #[test]
    fn test_launch_failure_is_distinct() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupA", "exit 0\n");
        let executor = GroupExecutor::new(RunConfig::new(root.path().join("no-such-jcut"), vec![]));

        let result = executor.execute_one(&group);

        assert!(matches!(result.status, RunStatus::LaunchFailed(_)));
        assert!(matches!(
            result.harness_problem(),
            Some(HarnessProblem::LaunchFailed(_))
        ));
        assert_eq!(result.legacy_exit_code(), 255);
        assert!(result.stdout_path.is_none());
        assert!(result.stderr_path.is_none());
    }

    #[test]
    fn test_capture_failure_is_distinct_from_launch() {
        let root = TempDir::new().unwrap();
        // 组目录不存在，捕获文件无法创建
        let group = TestGroup::new("groupX", root.path().join("groupX"));

        let result = sh_executor().execute_one(&group);

        match &result.status {
            RunStatus::CaptureFailed(reason) => assert!(reason.contains(STDOUT_FILE)),
            other => panic!("Expected CaptureFailed, got {:?}", other),
        }
        assert!(matches!(
            result.harness_problem(),
            Some(HarnessProblem::CaptureFailed(_))
        ));
        assert!(result.stdout_path.is_none());
        assert!(result.stderr_path.is_none());
    }

    #[test]
    fn test_killed_by_signal() {
        let root = TempDir::new().unwrap();
        let group = sh_group(&root, "groupK", "kill -9 $$\n");

        let result = sh_executor().execute_one(&group);

        assert_eq!(result.status, RunStatus::Terminated(Some(9)));
    }

    #[test]
    fn test_execute_all_keeps_order() {
        let root = TempDir::new().unwrap();
        let groups = vec![
            sh_group(&root, "groupA", "exit 0\n"),
            sh_group(&root, "groupB", "exit 255\n"),
            sh_group(&root, "groupC", "exit 1\n"),
        ];

        let results = sh_executor().execute_all(&groups);

        let statuses: Vec<_> = results.iter().map(|r| r.status.clone()).collect();
        assert_eq!(
            statuses,
            vec![RunStatus::Exited(0), RunStatus::Exited(255), RunStatus::Exited(1)]
        );
    }
}
