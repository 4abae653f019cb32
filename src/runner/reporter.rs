use crate::runner::config::RunConfig;
use crate::runner::types::{GroupVerdict, Report, TestGroup, Verdict};
use crate::utils::{OutputStyle, format_seconds};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

const SEPARATOR: &str = "---------------------------------------------";

pub struct TestReporter {
    style: OutputStyle,
}

impl TestReporter {
    pub fn new(style: OutputStyle) -> Self {
        Self { style }
    }

    /// 打印即将对每个组执行的命令
    pub fn print_command(&self, config: &RunConfig) {
        println!("{}", self.render_command(config));
    }

    pub fn render_command(&self, config: &RunConfig) -> String {
        format!("Command: {}", config.command_line())
    }

    /// 打印完整报告（含耗时）
    pub fn print_report(&self, report: &Report) {
        println!("{}", self.render(report));
    }

    /// 完整报告：结论部分 + 耗时
    pub fn render(&self, report: &Report) -> String {
        let mut output = self.render_verdict(report);
        output.push(String::new());
        output.push(format!("Finished in {} seconds", format_seconds(report.elapsed)));
        output.join("\n")
    }

    /// 不含耗时的报告正文，同样的输入总是得到同样的文本
    pub fn render_body(&self, report: &Report) -> String {
        self.render_verdict(report).join("\n")
    }

    fn render_verdict(&self, report: &Report) -> Vec<String> {
        let mut output = Vec::new();
        let verdict = report.verdict();

        if verdict == Verdict::Failed {
            output.push(self.style.failure(&verdict.to_string()));
        }

        if report.has_failures() {
            if !report.crashed_groups.is_empty() {
                output.push(format!(
                    "Failed to run directories: [{}]",
                    report.crashed_groups.join(", ")
                ));
            }
            output.push(format!(
                "Total number of tests failed: {}",
                report.total_failed_tests
            ));

            for result in &report.results {
                match result.verdict() {
                    GroupVerdict::Passed => {}
                    GroupVerdict::Failed(count) => output.push(format!(
                        "\tDirectory {} has {} failed test(s)",
                        result.group.name, count
                    )),
                    GroupVerdict::HarnessProblem(problem) => output.push(format!(
                        "\t{} {}: {}",
                        self.style.warning("Harness problem in"),
                        result.group.name,
                        problem
                    )),
                }
            }
        }

        if report.has_error_output() {
            output.push(format!(
                "Unexpected error output in {} group(s).",
                report.error_output_groups.len()
            ));
            output.push(SEPARATOR.to_string());
            for (group, content) in report.error_outputs() {
                output.push(format!("Group {} has the following errors:", group));
                output.push(content.trim_end_matches(['\r', '\n']).to_string());
                output.push(SEPARATOR.to_string());
            }
        }

        if verdict == Verdict::Success {
            output.push(self.style.success(&verdict.to_string()));
        }

        output
    }

    /// 打印逐组汇总表
    pub fn print_summary_table(&self, report: &Report) {
        println!("{}", self.render_summary_table(report));
    }

    pub fn render_summary_table(&self, report: &Report) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Group",
            "Result",
            "Failed",
            "Exit code",
            "Duration",
            "Artifacts",
        ]);

        for result in &report.results {
            let (label, color) = match result.verdict() {
                GroupVerdict::Passed if result.has_unexpected_stderr() => ("stderr", Color::Yellow),
                GroupVerdict::Passed => ("passed", Color::Green),
                GroupVerdict::Failed(_) => ("failed", Color::Red),
                GroupVerdict::HarnessProblem(_) => ("harness", Color::Magenta),
            };

            let artifacts: Vec<String> = [&result.stdout_path, &result.stderr_path]
                .into_iter()
                .flatten()
                .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .collect();

            let mut result_cell = Cell::new(label);
            if self.style.color() {
                result_cell = result_cell.fg(color);
            }

            table.add_row(vec![
                Cell::new(&result.group.name),
                result_cell,
                Cell::new(result.failed_tests()),
                Cell::new(result.legacy_exit_code()),
                Cell::new(format!("{}ms", result.duration.as_millis())),
                Cell::new(artifacts.join(", ")).add_attribute(Attribute::Dim),
            ]);
        }

        table.to_string()
    }

    /// 按运行顺序列出将要执行的测试组
    pub fn render_group_list(&self, groups: &[TestGroup]) -> String {
        let mut output = Vec::with_capacity(groups.len() + 1);
        output.push(format!("{} test group(s) selected:", groups.len()));
        for group in groups {
            output.push(format!("\t{}", group.name));
        }
        output.join("\n")
    }
}

impl Default for TestReporter {
    fn default() -> Self {
        Self::new(OutputStyle::Plain)
    }
}
