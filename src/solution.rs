//! 解题程序侧的运行框架
//!
//! 解题程序每个部分输出一行 `Part N (in Xms): answer`，`aoc run` 据此记录答案和耗时。
//! [`run`] 负责：先跑示例，再读取输入，逐个部分求解并计时。
//!
//! ```no_run
//! use aoc_runner::solution::{run, PartSolver, RunOptions};
//!
//! fn part1(input: &str) -> usize {
//!     input.lines().count()
//! }
//!
//! fn main() -> aoc_runner::AppResult<()> {
//!     let options = RunOptions {
//!         part1: Some(PartSolver::new(part1).example("a\nb", 2)),
//!         part2: None,
//!         only_tests: false,
//!     };
//!     run(&options, None)?;
//!     Ok(())
//! }
//! ```

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::error::{AppError, AppResult};
use crate::models::{Day, Part};
use crate::utils::logging;
use crate::utils::ms_fixed;

/// 一个示例：输入与期望答案
#[derive(Debug, Clone, PartialEq)]
pub struct Example {
    pub input: String,
    pub expected: String,
}

/// 某个部分的求解函数及其示例
pub struct PartSolver<'a> {
    solve: Box<dyn Fn(&str) -> String + 'a>,
    examples: Vec<Example>,
}

impl<'a> PartSolver<'a> {
    pub fn new<F, T>(solve: F) -> Self
    where
        F: Fn(&str) -> T + 'a,
        T: Display,
    {
        Self {
            solve: Box::new(move |input: &str| solve(input).to_string()),
            examples: Vec::new(),
        }
    }

    /// 追加一个示例，答案按文本比较
    pub fn example(mut self, input: impl Into<String>, expected: impl Display) -> Self {
        self.examples.push(Example {
            input: input.into(),
            expected: expected.to_string(),
        });
        self
    }

    fn solve(&self, input: &str) -> String {
        (self.solve)(input)
    }
}

/// 运行选项
#[derive(Default)]
pub struct RunOptions<'a> {
    pub part1: Option<PartSolver<'a>>,
    pub part2: Option<PartSolver<'a>>,
    /// 只跑示例，不读取输入
    pub only_tests: bool,
}

impl<'a> RunOptions<'a> {
    fn parts(&self) -> impl Iterator<Item = (Part, &PartSolver<'a>)> {
        [(Part::One, &self.part1), (Part::Two, &self.part2)]
            .into_iter()
            .filter_map(|(part, solver)| solver.as_ref().map(|s| (part, s)))
    }
}

/// 单个示例的检查结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleResult {
    pub part: Part,
    /// 从 1 开始
    pub index: usize,
    pub expected: String,
    pub actual: String,
}

impl ExampleResult {
    pub fn passed(&self) -> bool {
        self.actual == self.expected
    }
}

/// 单个部分的求解结果
#[derive(Debug, Clone, PartialEq)]
pub struct PartAnswer {
    pub part: Part,
    pub answer: String,
    pub elapsed: Duration,
}

/// 一次运行的汇总
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarnessReport {
    pub examples: Vec<ExampleResult>,
    pub answers: Vec<PartAnswer>,
}

impl HarnessReport {
    pub fn total(&self) -> Duration {
        self.answers.iter().map(|a| a.elapsed).sum()
    }

    pub fn failed_examples(&self) -> usize {
        self.examples.iter().filter(|e| !e.passed()).count()
    }
}

/// 运行解题程序
///
/// # 参数
/// - `options`: 各部分的求解函数和示例
/// - `input_file`: 输入文件路径，缺省时见 [`default_input_path`]
///
/// # 返回
/// 示例检查结果和各部分答案；输入文件不存在时返回 `MissingInput`
pub fn run(options: &RunOptions<'_>, input_file: Option<&Path>) -> AppResult<HarnessReport> {
    logging::init(false);

    let mut report = HarnessReport {
        examples: check_examples(options),
        answers: Vec::new(),
    };
    if options.only_tests {
        return Ok(report);
    }

    let path = input_file
        .map(Path::to_path_buf)
        .unwrap_or_else(default_input_path);
    let input = read_input(&path)?;

    report.answers = solve_all(options, &input);
    for answer in &report.answers {
        println!("{}", format_line(answer.part, &answer.answer, answer.elapsed));
    }
    info!("总耗时: {}", ms_fixed(report.total().as_secs_f64() * 1000.0));

    Ok(report)
}

/// 默认输入路径
///
/// 由 `aoc run` 启动时（设置了 `AOC_DAY`）为 `src/dayNN/input.txt`，否则为当前目录下的 `input.txt`
pub fn default_input_path() -> PathBuf {
    match std::env::var("AOC_DAY").ok().and_then(|v| v.parse::<Day>().ok()) {
        Some(day) => PathBuf::from("src")
            .join(format!("day{}", day.padded()))
            .join("input.txt"),
        None => PathBuf::from("input.txt"),
    }
}

/// 逐个运行示例并记录通过情况
pub fn check_examples(options: &RunOptions<'_>) -> Vec<ExampleResult> {
    let mut results = Vec::new();
    for (part, solver) in options.parts() {
        for (i, example) in solver.examples.iter().enumerate() {
            let result = ExampleResult {
                part,
                index: i + 1,
                expected: example.expected.clone(),
                actual: solver.solve(&example.input),
            };
            if result.passed() {
                info!("✓ 第 {} 部分 示例 {} 通过", part, result.index);
            } else {
                error!("❌ 第 {} 部分 示例 {} 未通过", part, result.index);
                info!("期望: {:?}", result.expected);
                info!("实际: {:?}", result.actual);
            }
            results.push(result);
        }
    }
    results
}

/// 对真实输入求解各部分并计时
pub fn solve_all(options: &RunOptions<'_>, input: &str) -> Vec<PartAnswer> {
    options
        .parts()
        .map(|(part, solver)| {
            let started = Instant::now();
            let answer = solver.solve(input);
            PartAnswer {
                part,
                answer,
                elapsed: started.elapsed(),
            }
        })
        .collect()
}

fn read_input(path: &Path) -> AppResult<String> {
    match std::fs::read_to_string(path) {
        Ok(input) => Ok(input),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            error!("❌ 未找到输入文件: {}", path.display());
            Err(AppError::MissingInput {
                path: path.display().to_string(),
            })
        }
        Err(e) => Err(AppError::file(path, e)),
    }
}

/// 格式化一个部分的结果行
pub fn format_line(part: Part, answer: impl Display, elapsed: Duration) -> String {
    format!(
        "Part {} (in {:.3}ms): {}",
        part,
        elapsed.as_secs_f64() * 1000.0,
        answer
    )
}

/// 输出一个部分的结果
pub fn report(part: Part, answer: impl Display, elapsed: Duration) {
    println!("{}", format_line(part, answer, elapsed));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::services::SolutionRunner;

    fn count_lines(input: &str) -> usize {
        input.lines().count()
    }

    fn longest_line(input: &str) -> String {
        input.lines().max_by_key(|l| l.len()).unwrap_or("").to_string()
    }

    fn options() -> RunOptions<'static> {
        RunOptions {
            part1: Some(PartSolver::new(count_lines).example("a\nb\nc", 3).example("a", 2)),
            part2: Some(PartSolver::new(longest_line).example("x\nyyy", "yyy")),
            only_tests: false,
        }
    }

    #[test]
    fn test_report_line_is_understood_by_runner() {
        let line = format_line(Part::Two, "xyz", Duration::from_micros(1500));
        assert_eq!(line, "Part 2 (in 1.500ms): xyz");

        let runner = SolutionRunner::new(&Config::default()).unwrap();
        let parts = runner.parse_output(&line, 0.0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].part, Part::Two);
        assert_eq!(parts[0].time_ms, 1.5);
    }

    #[test]
    fn test_examples_pass_and_fail() {
        let results = check_examples(&options());
        assert_eq!(results.len(), 3);
        assert!(results[0].passed());
        assert!(!results[1].passed());
        assert_eq!(results[1].index, 2);
        assert_eq!(results[1].actual, "1");
        assert_eq!(results[2].part, Part::Two);
        assert!(results[2].passed());
    }

    #[test]
    fn test_only_tests_skips_input() {
        let options = RunOptions {
            only_tests: true,
            ..options()
        };
        let missing = Path::new("/definitely/not/here/input.txt");
        let report = run(&options, Some(missing)).unwrap();
        assert_eq!(report.examples.len(), 3);
        assert_eq!(report.failed_examples(), 1);
        assert!(report.answers.is_empty());
    }

    #[test]
    fn test_missing_input_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        assert!(matches!(
            run(&options(), Some(&path)),
            Err(AppError::MissingInput { .. })
        ));
    }

    #[test]
    fn test_run_solves_each_part_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, "ab\nabcd\nabc\n").unwrap();

        let report = run(&options(), Some(&path)).unwrap();
        let answers: Vec<_> = report
            .answers
            .iter()
            .map(|a| (a.part, a.answer.as_str()))
            .collect();
        assert_eq!(answers, vec![(Part::One, "3"), (Part::Two, "abcd")]);
        assert_eq!(
            report.total(),
            report.answers[0].elapsed + report.answers[1].elapsed
        );
    }

    #[test]
    fn test_solve_all_skips_missing_parts() {
        let options = RunOptions {
            part1: None,
            part2: Some(PartSolver::new(count_lines)),
            only_tests: false,
        };
        let answers = solve_all(&options, "1\n2");
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].part, Part::Two);
        assert_eq!(answers[0].answer, "2");
    }
}
