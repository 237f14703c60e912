//! 答案提交流程 - 流程层
//!
//! 核心职责：决定一次提交是否合法，并把远程结果落到记录上
//!
//! 流程顺序：
//! 1. 清理已过期的冷却
//! 2. 第 1 部分没有运行结果 → 直接拒绝
//! 3. 两部分都已解决 → 直接返回
//! 4. 第 1 部分：已解决 / 冷却中 / 重复答案 → 本地拒绝，否则提交
//! 5. 第 2 部分：第 1 部分本次刚解决则跳过，否则按同样规则处理
//!
//! 本层不做任何文件读写，更新后的记录和冷却交给调用方保存

use tracing::{error, info, warn};

use crate::clients::RemoteClient;
use crate::error::RemoteError;
use crate::models::{ClassifiedOutcome, Cooldown, DayRecord, OutcomeKind, Part, PartRecord};
use crate::services::{CooldownGate, ResponseClassifier};
use crate::utils::truncate_text;
use crate::workflow::submit_ctx::SubmitCtx;

/// 单个部分的处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum PartAction {
    /// 本地还没有运行结果
    MissingLocalResult,
    /// 已经解决，无需提交
    AlreadySolved,
    /// 冷却未结束
    CooldownActive { remaining_ms: u64 },
    /// 该答案已被判定为错误
    DuplicateAttempt { answer: String },
    /// 没有有效的会话密钥
    NoKey,
    /// 第 1 部分刚刚解决，避免重复提交同一答案
    SkippedDoubleSubmit,
    /// 已提交并得到判定
    Submitted {
        answer: String,
        outcome: ClassifiedOutcome,
    },
    /// 请求失败，答案未被判定
    TransportFailed { answer: String, error: String },
}

impl PartAction {
    /// 状态码形式，便于日志和断言
    pub fn code(&self) -> &'static str {
        match self {
            PartAction::MissingLocalResult => "MISSING_LOCAL_RESULT",
            PartAction::AlreadySolved => "ALREADY_SOLVED",
            PartAction::CooldownActive { .. } => "COOLDOWN_ACTIVE",
            PartAction::DuplicateAttempt { .. } => "DUPLICATE_ATTEMPT",
            PartAction::NoKey => "NO_KEY",
            PartAction::SkippedDoubleSubmit => "SKIPPED_DOUBLE_SUBMIT",
            PartAction::Submitted { outcome, .. } => outcome.kind.as_str(),
            PartAction::TransportFailed { .. } => "ERROR",
        }
    }

    /// 本次调用被拒绝或失败，需要用户处理后重试
    pub fn is_failure(&self) -> bool {
        match self {
            PartAction::MissingLocalResult
            | PartAction::CooldownActive { .. }
            | PartAction::DuplicateAttempt { .. }
            | PartAction::NoKey
            | PartAction::TransportFailed { .. } => true,
            PartAction::Submitted { outcome, .. } => !outcome.is_solved(),
            PartAction::AlreadySolved | PartAction::SkippedDoubleSubmit => false,
        }
    }

    /// 之后的部分不再继续
    fn halts(&self) -> bool {
        matches!(
            self,
            PartAction::MissingLocalResult | PartAction::CooldownActive { .. } | PartAction::NoKey
        )
    }
}

/// 一次提交调用的结果
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitReport {
    pub actions: Vec<(Part, PartAction)>,
    /// 更新后的记录
    pub record: DayRecord,
    /// 更新后的冷却，`None` 表示应删除
    pub cooldown: Option<Cooldown>,
}

impl SubmitReport {
    pub fn action(&self, part: Part) -> Option<&PartAction> {
        self.actions.iter().find(|(p, _)| *p == part).map(|(_, a)| a)
    }

    pub fn has_failure(&self) -> bool {
        self.actions.iter().any(|(_, a)| a.is_failure())
    }
}

/// 把一次判定落到某个部分的记录上，返回新记录
///
/// - 正确：标记已解决，且正确答案不出现在 attempts 中
/// - 错误 / 锁定 / 无法识别：答案追加到 attempts
/// - 过于频繁：不改动
pub fn apply_outcome(part: &PartRecord, answer: &str, outcome: &ClassifiedOutcome) -> PartRecord {
    let mut next = part.clone();
    match outcome.kind {
        OutcomeKind::PartSolved => {
            next.solved = true;
            next.attempts.retain(|a| a != answer);
        }
        OutcomeKind::PartWrong | OutcomeKind::Locked | OutcomeKind::Error => {
            if !next.has_attempted(answer) {
                next.attempts.push(answer.to_string());
            }
        }
        OutcomeKind::TooSoon => {}
    }
    next
}

/// 判定中带有等待时长时产生新的冷却
pub fn cooldown_after(outcome: &ClassifiedOutcome, now_ms: i64) -> Option<Cooldown> {
    outcome
        .wait_ms()
        .map(|wait| Cooldown::starting_at(now_ms, wait))
}

/// 答案提交流程
///
/// - 持有远程客户端和分类服务的引用
/// - 不持有任何文件路径
pub struct SubmissionFlow<'a, C: RemoteClient> {
    client: &'a C,
    classifier: &'a ResponseClassifier,
}

impl<'a, C: RemoteClient> SubmissionFlow<'a, C> {
    /// 创建新的提交流程
    pub fn new(client: &'a C, classifier: &'a ResponseClassifier) -> Self {
        Self { client, classifier }
    }

    pub async fn try_submit(
        &self,
        ctx: &SubmitCtx,
        record: &DayRecord,
        cooldown: Option<Cooldown>,
        now_ms: i64,
    ) -> SubmitReport {
        let mut record = record.clone();
        let mut cooldown = cooldown;

        if cooldown.is_some() && !CooldownGate::is_active(cooldown.as_ref(), now_ms) {
            info!("{} 冷却已结束", ctx);
            cooldown = None;
        }

        if record.part1.result.is_none() {
            return SubmitReport {
                actions: vec![(Part::One, PartAction::MissingLocalResult)],
                record,
                cooldown,
            };
        }

        if record.fully_solved() {
            return SubmitReport {
                actions: vec![
                    (Part::One, PartAction::AlreadySolved),
                    (Part::Two, PartAction::AlreadySolved),
                ],
                record,
                cooldown,
            };
        }

        let mut actions = Vec::with_capacity(2);

        let part1 = self
            .submit_part(ctx, &mut record, &mut cooldown, Part::One, now_ms)
            .await;
        let just_solved = matches!(&part1, PartAction::Submitted { outcome, .. } if outcome.is_solved());
        let halted = part1.halts();
        actions.push((Part::One, part1));

        if !halted {
            let part2 = if just_solved {
                PartAction::SkippedDoubleSubmit
            } else {
                self.submit_part(ctx, &mut record, &mut cooldown, Part::Two, now_ms)
                    .await
            };
            actions.push((Part::Two, part2));
        }

        SubmitReport {
            actions,
            record,
            cooldown,
        }
    }

    async fn submit_part(
        &self,
        ctx: &SubmitCtx,
        record: &mut DayRecord,
        cooldown: &mut Option<Cooldown>,
        part: Part,
        now_ms: i64,
    ) -> PartAction {
        let current = record.part(part);

        let Some(answer) = current.submission() else {
            return PartAction::MissingLocalResult;
        };
        if current.solved {
            return PartAction::AlreadySolved;
        }
        if let Some(remaining_ms) = cooldown.as_ref().and_then(|c| c.remaining_ms(now_ms)) {
            return PartAction::CooldownActive { remaining_ms };
        }
        if current.has_attempted(&answer) {
            return PartAction::DuplicateAttempt { answer };
        }

        info!("{} 📤 正在提交第 {} 部分: {}", ctx, part, answer);

        let body = match self
            .client
            .submit_answer(ctx.year, ctx.day, part, &answer)
            .await
        {
            Ok(body) => body,
            Err(RemoteError::NoKey) => return PartAction::NoKey,
            Err(e) => {
                error!("{} ❌ 提交第 {} 部分失败: {}", ctx, part, e);
                return PartAction::TransportFailed {
                    answer,
                    error: e.to_string(),
                };
            }
        };

        let outcome = self.classifier.classify(&body);
        if let Some(text) = outcome.text() {
            info!("{} 远程返回: {}", ctx, truncate_text(text, 200));
        }
        if outcome.kind == OutcomeKind::Error {
            warn!("{} ⚠️ 无法识别的响应页面", ctx);
        }

        let updated = apply_outcome(record.part(part), &answer, &outcome);
        *record.part_mut(part) = updated;
        if let Some(next) = cooldown_after(&outcome, now_ms) {
            *cooldown = Some(next);
        }

        PartAction::Submitted { answer, outcome }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Answer;

    fn part(result: Option<&str>, solved: bool, attempts: &[&str]) -> PartRecord {
        PartRecord {
            solved,
            time: result.map(|_| 1.0),
            result: result.map(Answer::from_output),
            attempts: attempts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_apply_solved_marks_and_keeps_attempts_clean() {
        let before = part(Some("42"), false, &["41"]);
        let after = apply_outcome(
            &before,
            "42",
            &ClassifiedOutcome::with_text(OutcomeKind::PartSolved, "ok"),
        );
        assert!(after.solved);
        assert_eq!(after.attempts, vec!["41".to_string()]);
        // 原记录不变
        assert!(!before.solved);
    }

    #[test]
    fn test_apply_rejections_append_once() {
        let before = part(Some("7"), false, &[]);
        for kind in [OutcomeKind::PartWrong, OutcomeKind::Locked, OutcomeKind::Error] {
            let after = apply_outcome(&before, "7", &ClassifiedOutcome::new(kind));
            assert_eq!(after.attempts, vec!["7".to_string()], "{}", kind);
            assert!(!after.solved);

            let again = apply_outcome(&after, "7", &ClassifiedOutcome::new(kind));
            assert_eq!(again.attempts.len(), 1);
        }
    }

    #[test]
    fn test_apply_too_soon_is_noop() {
        let before = part(Some("7"), false, &["6"]);
        let after = apply_outcome(
            &before,
            "7",
            &ClassifiedOutcome::with_wait(OutcomeKind::TooSoon, 60_000),
        );
        assert_eq!(after, before);
    }

    #[test]
    fn test_cooldown_after() {
        let now = 10_000;
        assert_eq!(
            cooldown_after(&ClassifiedOutcome::with_wait(OutcomeKind::PartWrong, 300_000), now),
            Some(Cooldown::until(310_000))
        );
        assert_eq!(cooldown_after(&ClassifiedOutcome::new(OutcomeKind::TooSoon), now), None);
        assert_eq!(
            cooldown_after(&ClassifiedOutcome::with_text(OutcomeKind::PartWrong, "no"), now),
            None
        );
    }

    #[test]
    fn test_action_codes() {
        assert_eq!(PartAction::SkippedDoubleSubmit.code(), "SKIPPED_DOUBLE_SUBMIT");
        assert_eq!(
            PartAction::Submitted {
                answer: "1".into(),
                outcome: ClassifiedOutcome::new(OutcomeKind::Locked),
            }
            .code(),
            "LOCKED"
        );
        assert!(!PartAction::SkippedDoubleSubmit.is_failure());
        assert!(PartAction::NoKey.is_failure());
    }
}
