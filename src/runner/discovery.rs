use crate::Result;
use crate::error::RegressError;
use crate::runner::config::{GROUP_MARKER, TESTS_DIR_NAME};
use crate::runner::types::{IgnoreSet, TestGroup};
use std::fs;
use std::path::Path;

/// 决定目录是否作为测试组运行
pub trait GroupPredicate {
    fn accepts(&self, name: &str) -> bool;
}

impl<F> GroupPredicate for F
where
    F: Fn(&str) -> bool,
{
    fn accepts(&self, name: &str) -> bool {
        self(name)
    }
}

/// 默认规则：名称包含 "group"，且不匹配任何忽略片段
#[derive(Debug, Clone)]
pub struct NameFilter {
    marker: String,
    ignore: IgnoreSet,
}

impl NameFilter {
    pub fn new(ignore: IgnoreSet) -> Self {
        Self {
            marker: GROUP_MARKER.to_string(),
            ignore,
        }
    }
}

impl GroupPredicate for NameFilter {
    fn accepts(&self, name: &str) -> bool {
        name.contains(self.marker.as_str()) && !self.ignore.matches(name)
    }
}

/// 检查运行目录的最后一级名称是否正好为 "tests"
pub fn ensure_tests_dir(dir: &Path) -> Result<()> {
    let name = dir.file_name().and_then(|n| n.to_str());
    if name == Some(TESTS_DIR_NAME) {
        return Ok(());
    }

    Err(RegressError::Precondition(format!(
        "run-tests has to be executed under the '{}' folder (current directory: {})",
        TESTS_DIR_NAME,
        dir.display()
    )))
}

/// 列出 root 下被接受的子目录，按名称升序
pub fn discover_groups(root: &Path, predicate: &dyn GroupPredicate) -> Result<Vec<TestGroup>> {
    let mut groups = Vec::new();

    for entry in fs::read_dir(root)? {
        let entry = entry?;
        if !entry.file_type()?.is_dir() {
            continue;
        }

        let Some(name) = entry.file_name().to_str().map(|s| s.to_string()) else {
            tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 directory name");
            continue;
        };

        if predicate.accepts(&name) {
            groups.push(TestGroup::new(name, entry.path()));
        } else {
            tracing::debug!(group = %name, "Directory not selected");
        }
    }

    groups.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(groups)
}
