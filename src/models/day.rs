use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// 每年的谜题天数
pub const DAYS_PER_YEAR: u8 = 25;

/// 谜题日期（1..=25）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Day(u8);

impl Day {
    pub fn new(day: u8) -> Result<Self, AppError> {
        if (1..=DAYS_PER_YEAR).contains(&day) {
            Ok(Self(day))
        } else {
            Err(AppError::InvalidDay(day.to_string()))
        }
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// 在 `RunConfig::days` 中的下标
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// 补零后的形式，如 `07`
    pub fn padded(self) -> String {
        format!("{:02}", self.0)
    }

    pub fn all() -> impl Iterator<Item = Day> {
        (1..=DAYS_PER_YEAR).map(Day)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Day {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: u8 = s
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidDay(s.to_string()))?;
        Day::new(n)
    }
}

/// 每天的两个部分
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Part {
    One = 1,
    Two = 2,
}

impl Part {
    /// 提交表单中的 `level` 字段
    pub fn level(self) -> u8 {
        self as u8
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Part::One),
            2 => Some(Part::Two),
            _ => None,
        }
    }
}

impl fmt::Display for Part {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// 命令行中的日期参数：单日或全部
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaySelector {
    Single(Day),
    All,
}

impl FromStr for DaySelector {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(DaySelector::All)
        } else {
            s.parse().map(DaySelector::Single)
        }
    }
}
