//! 解题程序运行服务 - 业务能力层
//!
//! 以子进程方式运行某一天的解题程序，转发其输出并解析答案

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::{Answer, Day, DayRecord, Part};

/// 某个部分的一次运行结果
#[derive(Debug, Clone, PartialEq)]
pub struct PartRun {
    pub part: Part,
    pub answer: Answer,
    /// 解题程序自报的耗时，缺省时为整个进程的耗时
    pub time_ms: f64,
}

/// 一次运行的汇总
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub day: Day,
    /// 子进程是否正常退出；异常退出前打印的答案仍会记录
    pub success: bool,
    pub elapsed_ms: f64,
    pub parts: Vec<PartRun>,
}

impl RunOutcome {
    /// 把本次运行的答案和耗时写入记录（同时更新，不动提交状态）
    pub fn apply_to(&self, record: &DayRecord) -> DayRecord {
        let mut next = record.clone();
        for run in &self.parts {
            let part = next.part(run.part).with_run(run.answer.clone(), run.time_ms);
            *next.part_mut(run.part) = part;
        }
        next
    }
}

/// 解题程序运行服务
///
/// 职责：
/// - 每次只运行一个子进程
/// - 原样转发 stdout / stderr
/// - 从 stdout 中解析 `Part N (in Xms): answer` 行
pub struct SolutionRunner {
    workspace_dir: PathBuf,
    command_template: String,
    line_re: Regex,
}

impl SolutionRunner {
    /// 创建新的运行服务
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            workspace_dir: config.workspace_dir.clone(),
            command_template: config.run_command.clone(),
            line_re: Regex::new(
                r"(?m)^\s*Part ([12])(?: \(in ([0-9]+(?:\.[0-9]+)?)ms\))?:[ \t]*(\S.*?)\s*$",
            )?,
        })
    }

    /// 该天的解题目录 `src/dayNN`
    pub fn day_dir(&self, day: Day) -> PathBuf {
        self.workspace_dir.join("src").join(format!("day{}", day.padded()))
    }

    pub fn has_day(&self, day: Day) -> bool {
        self.day_dir(day).is_dir()
    }

    /// 展开命令模板
    pub fn command_for(&self, day: Day) -> AppResult<(String, Vec<String>)> {
        let expanded = self.command_template.replace("{day}", &day.padded());
        let mut words = expanded.split_whitespace().map(str::to_string);
        let program = words
            .next()
            .ok_or_else(|| AppError::Run("运行命令为空 (AOC_RUN_COMMAND)".to_string()))?;
        Ok((program, words.collect()))
    }

    /// 运行某一天的解题程序
    pub async fn run(&self, day: Day) -> AppResult<RunOutcome> {
        let (program, args) = self.command_for(day)?;
        debug!("运行命令: {} {}", program, args.join(" "));

        let started = Instant::now();
        let output = Command::new(&program)
            .args(&args)
            .current_dir(&self.workspace_dir)
            .env("AOC_DAY", day.number().to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| AppError::Run(format!("无法启动 `{}`: {}", program, e)))?;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;

        relay(&output.stdout, &output.stderr);
        if !output.status.success() {
            debug!("退出状态: {}", output.status);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(RunOutcome {
            day,
            success: output.status.success(),
            elapsed_ms,
            parts: self.parse_output(&stdout, elapsed_ms),
        })
    }

    /// 解析答案行，同一部分出现多次时以最后一次为准
    pub fn parse_output(&self, stdout: &str, fallback_ms: f64) -> Vec<PartRun> {
        let mut parts: Vec<PartRun> = Vec::new();
        for caps in self.line_re.captures_iter(stdout) {
            let Some(part) = caps
                .get(1)
                .and_then(|m| m.as_str().parse().ok())
                .and_then(Part::from_level)
            else {
                continue;
            };
            let Some(answer) = caps.get(3).map(|m| Answer::from_output(m.as_str())) else {
                continue;
            };
            let time_ms = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(fallback_ms);

            parts.retain(|p| p.part != part);
            parts.push(PartRun {
                part,
                answer,
                time_ms,
            });
        }
        parts.sort_by_key(|p| p.part.level());
        parts
    }
}

fn relay(stdout: &[u8], stderr: &[u8]) {
    println!();
    if let Err(e) = std::io::stdout().write_all(stdout) {
        warn!("⚠️ 无法转发解题程序的 stdout: {}", e);
    }
    if let Err(e) = std::io::stderr().write_all(stderr) {
        warn!("⚠️ 无法转发解题程序的 stderr: {}", e);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runner() -> SolutionRunner {
        SolutionRunner::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_command_template() {
        let (program, args) = runner().command_for(Day::new(7).unwrap()).unwrap();
        assert_eq!(program, "cargo");
        assert_eq!(args, vec!["run", "--release", "--quiet", "--bin", "day07"]);
    }

    #[test]
    fn test_empty_command_is_error() {
        let config = Config {
            run_command: "   ".to_string(),
            ..Config::default()
        };
        let runner = SolutionRunner::new(&config).unwrap();
        assert!(runner.command_for(Day::new(1).unwrap()).is_err());
    }

    #[test]
    fn test_parse_output() {
        let stdout = "debug line\nPart 1 (in 1.25ms): 24000\nPart 2: abc def\n";
        let parts = runner().parse_output(stdout, 99.0);
        assert_eq!(
            parts,
            vec![
                PartRun {
                    part: Part::One,
                    answer: Answer::from_output("24000"),
                    time_ms: 1.25,
                },
                PartRun {
                    part: Part::Two,
                    answer: Answer::Text("abc def".to_string()),
                    time_ms: 99.0,
                },
            ]
        );
    }

    #[test]
    fn test_parse_output_last_wins_and_blank_ignored() {
        let stdout = "Part 2 (in 3ms): 1\nPart 1:   \nPart 2 (in 4ms): 2\n";
        let parts = runner().parse_output(stdout, 10.0);
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].part, Part::Two);
        assert_eq!(parts[0].answer.to_string(), "2");
        assert_eq!(parts[0].time_ms, 4.0);
    }

    #[test]
    fn test_apply_run_updates_result_and_time_together() {
        let mut record = DayRecord::default();
        record.part1.solved = true;
        record.part2.attempts.push("5".to_string());

        let outcome = RunOutcome {
            day: Day::new(1).unwrap(),
            success: true,
            elapsed_ms: 8.0,
            parts: vec![PartRun {
                part: Part::Two,
                answer: Answer::from_output("6"),
                time_ms: 2.0,
            }],
        };
        let next = outcome.apply_to(&record);
        assert!(next.part1.solved);
        assert!(next.part1.result.is_none());
        assert_eq!(next.part2.submission().as_deref(), Some("6"));
        assert_eq!(next.part2.time, Some(2.0));
        assert_eq!(next.part2.attempts, vec!["5".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_reports_exit_status_and_answers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("solve.sh"),
            "echo \"Part 1 (in 2ms): $AOC_DAY\"\nexit 3\n",
        )
        .unwrap();
        let config = Config {
            workspace_dir: dir.path().to_path_buf(),
            run_command: "sh solve.sh".to_string(),
            ..Config::default()
        };

        let outcome = SolutionRunner::new(&config)
            .unwrap()
            .run(Day::new(9).unwrap())
            .await
            .unwrap();

        assert_eq!(outcome.day, Day::new(9).unwrap());
        assert!(!outcome.success);
        assert_eq!(outcome.parts.len(), 1);
        assert_eq!(outcome.parts[0].answer.to_string(), "9");
        assert_eq!(outcome.parts[0].time_ms, 2.0);
    }
}
