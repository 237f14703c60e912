//! 远程判题结果的分类

use std::fmt;

/// 远程返回的结果类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    /// 答案正确
    PartSolved,
    /// 答案错误
    PartWrong,
    /// 提交过于频繁
    TooSoon,
    /// 当前关卡不可提交（未解锁或已完成）
    Locked,
    /// 无法识别的页面或请求失败
    Error,
}

impl OutcomeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OutcomeKind::PartSolved => "PART_SOLVED",
            OutcomeKind::PartWrong => "PART_WRONG",
            OutcomeKind::TooSoon => "TOO_SOON",
            OutcomeKind::Locked => "LOCKED",
            OutcomeKind::Error => "ERROR",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 附加信息：页面说明文字，或需要等待的毫秒数
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomePayload {
    Text(String),
    WaitMs(u64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedOutcome {
    pub kind: OutcomeKind,
    pub payload: Option<OutcomePayload>,
}

impl ClassifiedOutcome {
    pub fn new(kind: OutcomeKind) -> Self {
        Self {
            kind,
            payload: None,
        }
    }

    pub fn with_text(kind: OutcomeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            payload: Some(OutcomePayload::Text(text.into())),
        }
    }

    pub fn with_wait(kind: OutcomeKind, wait_ms: u64) -> Self {
        Self {
            kind,
            payload: Some(OutcomePayload::WaitMs(wait_ms)),
        }
    }

    /// 需要等待的时长（毫秒）
    pub fn wait_ms(&self) -> Option<u64> {
        match self.payload {
            Some(OutcomePayload::WaitMs(ms)) => Some(ms),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Some(OutcomePayload::Text(t)) => Some(t),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        self.kind == OutcomeKind::PartSolved
    }
}
