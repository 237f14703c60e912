//! 本地运行记录（`.aoc.json` 的内存形式）
//!
//! 字段布局与磁盘上的 JSON 保持一致，`result` 缺失表示"尚未运行"。

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::day::{Day, Part, DAYS_PER_YEAR};

/// 一次本地运行得到的候选答案
///
/// 大整数以字符串保存，避免 JSON 数字精度丢失。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Number(serde_json::Number),
    Text(String),
}

impl Answer {
    /// 根据解题程序输出的文本构造答案
    ///
    /// 只有规范写法的整数按数字保存，`007`、`+5`、`-0` 等保留原文
    pub fn from_output(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<i64>() {
            Ok(n) if n.to_string() == raw => Answer::Number(n.into()),
            _ => Answer::Text(raw.to_string()),
        }
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Text(s) => f.write_str(s),
            Answer::Number(n) => match n.as_f64() {
                // 3.0 提交为 "3"
                Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < 1e15 => {
                    write!(f, "{}", v as i64)
                }
                _ => write!(f, "{}", n),
            },
        }
    }
}

/// 单个部分的记录
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PartRecord {
    #[serde(default)]
    pub solved: bool,
    /// 上一次本地运行耗时（毫秒）
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Answer>,
    /// 已被判定为错误的答案，按提交顺序
    #[serde(default, deserialize_with = "deserialize_attempts")]
    pub attempts: Vec<String>,
}

impl PartRecord {
    /// 当前结果的提交形式
    pub fn submission(&self) -> Option<String> {
        self.result.as_ref().map(|r| r.to_string())
    }

    pub fn has_attempted(&self, answer: &str) -> bool {
        self.attempts.iter().any(|a| a == answer)
    }

    /// 一次本地运行同时产生 `result` 与 `time`
    pub fn with_run(&self, result: Answer, time_ms: f64) -> Self {
        Self {
            result: Some(result),
            time: Some(time_ms),
            ..self.clone()
        }
    }
}

/// 一天的两个部分
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DayRecord {
    pub part1: PartRecord,
    pub part2: PartRecord,
}

impl DayRecord {
    pub fn part(&self, part: Part) -> &PartRecord {
        match part {
            Part::One => &self.part1,
            Part::Two => &self.part2,
        }
    }

    pub fn part_mut(&mut self, part: Part) -> &mut PartRecord {
        match part {
            Part::One => &mut self.part1,
            Part::Two => &mut self.part2,
        }
    }

    pub fn fully_solved(&self) -> bool {
        self.part1.solved && self.part2.solved
    }
}

/// 工作区的完整记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub year: i32,
    pub days: Vec<DayRecord>,
}

impl RunConfig {
    /// 初始化工作区时的空记录：25 天全部未解
    pub fn new(year: i32) -> Self {
        Self {
            year,
            days: vec![DayRecord::default(); usize::from(DAYS_PER_YEAR)],
        }
    }

    pub fn day(&self, day: Day) -> Option<&DayRecord> {
        self.days.get(day.index())
    }

    pub fn day_mut(&mut self, day: Day) -> Option<&mut DayRecord> {
        self.days.get_mut(day.index())
    }

    /// 已获得的星星数
    pub fn stars(&self) -> usize {
        self.days
            .iter()
            .map(|d| usize::from(d.part1.solved) + usize::from(d.part2.solved))
            .sum()
    }
}

// 旧记录中 attempts 可能混有数字
fn deserialize_attempts<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Vec<Answer>> = Option::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .map(|a| a.to_string())
        .collect())
}
