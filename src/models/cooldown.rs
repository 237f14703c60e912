/// 某一天的提交冷却：截止时间（毫秒时间戳）之前不允许提交
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cooldown {
    pub deadline_ms: i64,
}

impl Cooldown {
    pub fn until(deadline_ms: i64) -> Self {
        Self { deadline_ms }
    }

    /// 从 `now` 开始等待 `wait_ms`
    pub fn starting_at(now_ms: i64, wait_ms: u64) -> Self {
        let wait = i64::try_from(wait_ms).unwrap_or(i64::MAX);
        Self {
            deadline_ms: now_ms.saturating_add(wait),
        }
    }

    /// 剩余等待时间，已过期时为 `None`
    pub fn remaining_ms(&self, now_ms: i64) -> Option<u64> {
        let left = self.deadline_ms.saturating_sub(now_ms);
        if left > 0 {
            u64::try_from(left).ok()
        } else {
            None
        }
    }
}
