use colored::*;
use std::time::Duration;

/// 报告输出的着色方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStyle {
    Color,
    Plain,
}

impl OutputStyle {
    /// 根据 --no-color 和终端检测选择样式
    pub fn detect(no_color: bool) -> Self {
        use std::io::IsTerminal;

        if no_color || !std::io::stdout().is_terminal() {
            OutputStyle::Plain
        } else {
            OutputStyle::Color
        }
    }

    pub fn color(&self) -> bool {
        matches!(self, OutputStyle::Color)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |s| s.green().bold())
    }

    pub fn failure(&self, text: &str) -> String {
        self.paint(text, |s| s.red().bold())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color() {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

/// 以秒为单位、毫秒精度格式化耗时
pub fn format_seconds(duration: Duration) -> String {
    format!("{:.3}", duration.as_secs_f64())
}
