//! 提交上下文
//!
//! 封装"我正在提交哪一年的第几天"这一信息

use std::fmt::Display;

use crate::models::Day;

/// 提交上下文
#[derive(Debug, Clone, Copy)]
pub struct SubmitCtx {
    /// 年份
    pub year: i32,

    /// 日期
    pub day: Day,
}

impl SubmitCtx {
    pub fn new(year: i32, day: Day) -> Self {
        Self { year, day }
    }
}

impl Display for SubmitCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} 第 {} 天]", self.year, self.day)
    }
}
