//! 判题结果分类服务 - 业务能力层
//!
//! 只负责"把提交接口返回的页面翻译成结果类型"，不关心记录和冷却

use phf::phf_map;
use regex::Regex;
use tracing::debug;

use crate::error::AppResult;
use crate::models::{ClassifiedOutcome, OutcomeKind};

/// 限流页面的标志文字，结构与普通结果页不同，直接在原始响应中查找
pub const RATE_LIMIT_MARKER: &str = "don't repeatedly request this endpoint";

/// 答案正确的标志文字
pub const SOLVED_PHRASE: &str = "That's the right answer";

/// 其余结果的标志文字，按顺序匹配，先命中者生效
pub const OUTCOME_PHRASES: &[(&str, OutcomeKind)] = &[
    ("That's not the right answer", OutcomeKind::PartWrong),
    ("You gave an answer too recently", OutcomeKind::TooSoon),
    ("You don't seem to be solving the right level", OutcomeKind::Locked),
];

static SPELLED_NUMBERS: phf::Map<&'static str, u64> = phf_map! {
    "one" => 1,
    "two" => 2,
    "three" => 3,
    "four" => 4,
    "five" => 5,
    "six" => 6,
    "seven" => 7,
    "eight" => 8,
    "nine" => 9,
    "ten" => 10,
};

/// 判题结果分类服务
///
/// 职责：
/// - 识别限流页面
/// - 提取 `<main>` 中的可见文字
/// - 按短语表确定结果类型
/// - 提取等待时长并换算为毫秒
pub struct ResponseClassifier {
    main_re: Regex,
    tag_re: Regex,
    citation_re: Regex,
    wait_re: Regex,
}

impl ResponseClassifier {
    /// 创建新的分类服务
    pub fn new() -> AppResult<Self> {
        Ok(Self {
            main_re: Regex::new(r"(?is)<main[^>]*>(.*?)</main>")?,
            tag_re: Regex::new(r"(?s)<[^>]*>")?,
            citation_re: Regex::new(r"\[[^\]]*\]")?,
            wait_re: Regex::new(
                r"\b(\d+|one|two|three|four|five|six|seven|eight|nine|ten) (second|minute|hour|day)s?\b",
            )?,
        })
    }

    /// 分类一次提交的响应页面
    ///
    /// # 参数
    /// - `body`: 提交接口返回的完整 HTML
    ///
    /// # 返回
    /// 结果类型；页面中出现等待时长时，附加信息为毫秒数，否则为说明文字
    pub fn classify(&self, body: &str) -> ClassifiedOutcome {
        if body.contains(RATE_LIMIT_MARKER) {
            debug!("命中限流页面");
            return ClassifiedOutcome::new(OutcomeKind::TooSoon);
        }

        let main_text = self.main_text(body);
        let info = self.citation_re.replace_all(&main_text, "").trim().to_string();

        if info.is_empty() {
            debug!("页面中没有可识别的 <main> 内容");
            return ClassifiedOutcome::with_text(OutcomeKind::Error, main_text);
        }

        if info.contains(SOLVED_PHRASE) {
            return ClassifiedOutcome::with_text(OutcomeKind::PartSolved, info);
        }

        let kind = OUTCOME_PHRASES
            .iter()
            .find(|(phrase, _)| info.contains(phrase))
            .map(|(_, kind)| *kind)
            .unwrap_or(OutcomeKind::Error);

        match self.wait_ms(&info) {
            Some(ms) => ClassifiedOutcome::with_wait(kind, ms),
            None => ClassifiedOutcome::with_text(kind, info),
        }
    }

    /// 从文字中提取等待时长，如 "five minutes" / "30 seconds"
    pub fn wait_ms(&self, text: &str) -> Option<u64> {
        let caps = self.wait_re.captures(text)?;
        let quantity = caps.get(1).map(|m| m.as_str()).filter(|s| !s.is_empty())?;
        let unit = caps.get(2).map(|m| m.as_str()).filter(|s| !s.is_empty())?;

        let count = match quantity.parse::<u64>() {
            Ok(n) => n,
            Err(_) => *SPELLED_NUMBERS.get(quantity)?,
        };
        debug!("页面要求等待 {} {}", count, unit);

        parse_duration(count, unit)
    }

    /// `<main>` 元素的纯文本，没有该元素时为空串
    fn main_text(&self, body: &str) -> String {
        let Some(inner) = self.main_re.captures(body).and_then(|c| c.get(1)) else {
            return String::new();
        };
        let text = self.tag_re.replace_all(inner.as_str(), "");
        decode_entities(&text)
    }
}

/// 数量 + 单位换算为毫秒
fn parse_duration(count: u64, unit: &str) -> Option<u64> {
    let unit_ms: u64 = match unit {
        "second" => 1_000,
        "minute" => 60_000,
        "hour" => 3_600_000,
        "day" => 86_400_000,
        _ => return None,
    };
    count.checked_mul(unit_ms)
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OutcomePayload;

    fn page(main: &str) -> String {
        format!(
            "<html><head><title>Day 1</title></head><body><header>[Log Out]</header>\
             <main>\n<article><p>{}</p></article>\n</main></body></html>",
            main
        )
    }

    fn classifier() -> ResponseClassifier {
        ResponseClassifier::new().unwrap()
    }

    #[test]
    fn test_rate_limit_marker_dominates() {
        let body = format!(
            "Please don't repeatedly request this endpoint before it unlocks! {}",
            page("That's the right answer!")
        );
        let outcome = classifier().classify(&body);
        assert_eq!(outcome.kind, OutcomeKind::TooSoon);
        assert_eq!(outcome.payload, None);
    }

    #[test]
    fn test_right_answer() {
        let body = page(
            "That's the right answer! You are one gold star closer. \
             <a href=\"/2023/day/1#part2\">[Continue to Part Two]</a>",
        );
        let outcome = classifier().classify(&body);
        assert_eq!(outcome.kind, OutcomeKind::PartSolved);
        let text = outcome.text().unwrap();
        assert!(text.starts_with("That's the right answer!"));
        assert!(!text.contains("[Continue"));
    }

    #[test]
    fn test_wrong_answer_with_wait_overrides_text() {
        let body = page("That's not the right answer. You have 5 minutes left");
        let outcome = classifier().classify(&body);
        assert_eq!(outcome, ClassifiedOutcome::with_wait(OutcomeKind::PartWrong, 300_000));
    }

    #[test]
    fn test_wrong_answer_spelled_out_wait() {
        let body = page(
            "That&#39;s not the right answer; your answer is too low. \
             Please wait one minute before trying again. [<a href=\"/2023/day/1\">Return to Day 1</a>]",
        );
        let outcome = classifier().classify(&body);
        assert_eq!(outcome.kind, OutcomeKind::PartWrong);
        assert_eq!(outcome.wait_ms(), Some(60_000));
    }

    #[test]
    fn test_wrong_answer_without_wait_keeps_text() {
        let body = page("That's not the right answer. [Return to Day 1]");
        let outcome = classifier().classify(&body);
        assert_eq!(outcome.kind, OutcomeKind::PartWrong);
        assert_eq!(
            outcome.payload,
            Some(OutcomePayload::Text("That's not the right answer.".to_string()))
        );
    }

    #[test]
    fn test_too_recently() {
        let body = page("You gave an answer too recently; you have to wait after submitting an answer before trying again. You have 30 seconds left to wait.");
        let outcome = classifier().classify(&body);
        assert_eq!(outcome, ClassifiedOutcome::with_wait(OutcomeKind::TooSoon, 30_000));
    }

    #[test]
    fn test_locked_level() {
        let body = page("You don't seem to be solving the right level.  Did you already complete it? [Return to Day 1]");
        let outcome = classifier().classify(&body);
        assert_eq!(outcome.kind, OutcomeKind::Locked);
        assert!(outcome.text().is_some());
    }

    #[test]
    fn test_unknown_text_is_error() {
        let outcome = classifier().classify(&page("Something unexpected happened."));
        assert_eq!(outcome.kind, OutcomeKind::Error);
        assert_eq!(outcome.text(), Some("Something unexpected happened."));
    }

    #[test]
    fn test_missing_main_is_error() {
        let outcome = classifier().classify("<html><body>That's the right answer</body></html>");
        assert_eq!(outcome, ClassifiedOutcome::with_text(OutcomeKind::Error, ""));

        // 只剩引用时，附加信息是 <main> 的原文
        let outcome = classifier().classify(&page("[Return to Day 1]"));
        assert_eq!(outcome.kind, OutcomeKind::Error);
        assert_eq!(outcome.text().map(str::trim), Some("[Return to Day 1]"));
    }

    #[test]
    fn test_wait_units() {
        let c = classifier();
        assert_eq!(c.wait_ms("wait two hours"), Some(7_200_000));
        assert_eq!(c.wait_ms("wait 1 day"), Some(86_400_000));
        assert_eq!(c.wait_ms("wait ten seconds"), Some(10_000));
        assert_eq!(c.wait_ms("wait Five minutes"), None);
        assert_eq!(c.wait_ms("no duration here"), None);
    }
}
