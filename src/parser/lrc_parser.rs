//! 逐行 LRC 歌词解析器。

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::trace;

use crate::{types::LrcLine, utils::fraction_to_ms};

/// 行首的时间标签，`[mm:ss.f]` 或 `<mm:ss.f>`，小数部分 1 到 6 位。
static LRC_TIME_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\[(?P<m1>[0-9]{2,}):(?P<s1>[0-9]{2})\.(?P<f1>[0-9]{1,6})\]|<(?P<m2>[0-9]{2,}):(?P<s2>[0-9]{2})\.(?P<f2>[0-9]{1,6})>)",
    )
    .expect("编译 LRC_TIME_TAG_REGEX 失败")
});

/// 表示“本行无翻译”的占位文本。
const EMPTY_LINE_PLACEHOLDER: &str = "//";

/// 从捕获组中计算毫秒数。数值溢出时返回 `None`。
fn captures_to_ms(caps: &Captures<'_>) -> Option<u64> {
    let (minutes, seconds, fraction) = match (caps.name("m1"), caps.name("s1"), caps.name("f1")) {
        (Some(m), Some(s), Some(f)) => (m, s, f),
        _ => (caps.name("m2")?, caps.name("s2")?, caps.name("f2")?),
    };

    let minutes: u64 = minutes.as_str().parse().ok()?;
    let seconds: u64 = seconds.as_str().parse().ok()?;
    let fraction_ms = fraction_to_ms(fraction.as_str())?;

    minutes
        .checked_mul(60)?
        .checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(fraction_ms)
}

/// 解析单个完整的时间标签，例如 `[01:02.345]`，返回毫秒数。
///
/// 与 [`format_lrc_time_ms`](crate::utils::format_lrc_time_ms) 互逆。
#[must_use]
pub fn parse_time_tag(tag: &str) -> Option<u64> {
    let caps = LRC_TIME_TAG_REGEX.captures(tag)?;
    if caps.get(0)?.end() != tag.len() {
        return None;
    }
    captures_to_ms(&caps)
}

/// 解析单行 LRC。时间标签必须位于行的第一个字符，否则返回 `None`。
///
/// 标签之后的内容原样保留；内容恰好为 `//` 时视为空行。
#[must_use]
pub fn parse_lrc_line(line: &str) -> Option<LrcLine> {
    let caps = LRC_TIME_TAG_REGEX.captures(line)?;
    let timestamp_ms = captures_to_ms(&caps)?;
    let content = &line[caps.get(0)?.end()..];

    let text = if content == EMPTY_LINE_PLACEHOLDER {
        String::new()
    } else {
        content.to_string()
    };

    Some(LrcLine { timestamp_ms, text })
}

/// 解析 LRC 文本。元数据行、空行和无法识别的行会被丢弃，输出保持原文顺序。
#[must_use]
pub fn parse_lrc(content: &str) -> Vec<LrcLine> {
    content
        .lines()
        .enumerate()
        .filter_map(|(line_num, line)| {
            let parsed = parse_lrc_line(line);
            if parsed.is_none() && !line.trim().is_empty() {
                trace!("LRC 第 {} 行未匹配时间标签，已忽略: {line}", line_num + 1);
            }
            parsed
        })
        .collect()
}
