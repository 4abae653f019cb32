use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegressError {
    /// 运行前置条件不满足（工作目录错误、缺少参数），不会执行任何测试组
    #[error("{0}")]
    Precondition(String),

    /// 外部测试程序无法启动
    #[error("failed to launch {binary}: {source}")]
    Launch {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    /// 组目录下的捕获文件无法创建，测试程序没有被调用
    #[error("failed to create {path}: {source}")]
    Capture {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl RegressError {
    /// 是否为前置条件错误（CLI 以状态码 1 退出，不打印报告）
    pub fn is_precondition(&self) -> bool {
        matches!(self, RegressError::Precondition(_))
    }
}

/// Result type for jcut-regress crate
pub type Result<T> = std::result::Result<T, RegressError>;
