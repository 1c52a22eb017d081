//! QRC 逐字歌词解析器。
//!
//! 每行以 `[行开始,行时长]` 开头，之后是若干 `(开始,时长)` 逐字标签。QQ 音乐
//! 原生的写法是文本在前、标签在后，例如 `星(0,500)光(500,500)`；也兼容标签在前、
//! 文本在后的写法，例如 `(1000,500)Hi(1500,500)there`。
//!
//! 只有当第一个标签紧跟行标签、且最后一个标签之后还有文本时才按标签在前处理。
//! `(0,100)星(100,500)河(600,400)` 这类以空字开头的原生写法仍按文本在前解析。

use std::{ops::Range, sync::LazyLock};

use regex::Regex;
use tracing::{trace, warn};

use crate::types::{QrcLine, QrcWord};

static QRC_LINE_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(?P<start>[0-9]+),\s?(?P<duration>[0-9]+)\]")
        .expect("编译 QRC_LINE_TIMESTAMP_REGEX 失败")
});

static WORD_TIMESTAMP_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\((?P<start>[0-9]+),\s?(?P<duration>[0-9]+)\)")
        .expect("编译 WORD_TIMESTAMP_REGEX 失败")
});

/// 一个逐字时间标签在行内的位置及其数值。数值溢出时 `timing` 为 `None`。
struct WordTag {
    span: Range<usize>,
    timing: Option<(u64, u64)>,
}

fn collect_word_tags(content: &str) -> Vec<WordTag> {
    WORD_TIMESTAMP_REGEX
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let start = caps.name("start")?.as_str().parse::<u64>().ok();
            let duration = caps.name("duration")?.as_str().parse::<u64>().ok();
            Some(WordTag {
                span: whole.range(),
                timing: start.zip(duration),
            })
        })
        .collect()
}

/// 解析单行 QRC。行标签不在行首或解析不出任何字的行返回 `None`。
#[must_use]
pub fn parse_qrc_line(line: &str) -> Option<QrcLine> {
    let caps = QRC_LINE_TIMESTAMP_REGEX.captures(line)?;
    let line_start_ms: u64 = caps.name("start")?.as_str().parse().ok()?;
    let line_duration_ms: u64 = caps.name("duration")?.as_str().parse().ok()?;
    let content = &line[caps.get(0)?.end()..];

    let tags = collect_word_tags(content);
    let tag_first = tags.first().is_some_and(|tag| tag.span.start == 0)
        && tags
            .last()
            .is_some_and(|tag| !content[tag.span.end..].trim().is_empty());

    let mut words = Vec::with_capacity(tags.len());
    let mut text_cursor = 0;
    for (i, tag) in tags.iter().enumerate() {
        let text_range = if tag_first {
            let next_start = tags.get(i + 1).map_or(content.len(), |next| next.span.start);
            tag.span.end..next_start
        } else {
            let range = text_cursor..tag.span.start;
            text_cursor = tag.span.end;
            range
        };

        let text = &content[text_range];
        let Some((start_ms, duration_ms)) = tag.timing else {
            warn!("QRC 逐字时间戳数值溢出，已忽略: '{text}'");
            continue;
        };
        if text.is_empty() {
            continue;
        }

        words.push(QrcWord {
            text: text.to_string(),
            start_ms,
            duration_ms,
        });
    }

    if !tag_first && text_cursor < content.len() {
        trace!(
            "QRC 行末存在没有时间戳的文本，已忽略: '{}'",
            &content[text_cursor..]
        );
    }

    if words.is_empty() {
        return None;
    }

    Some(QrcLine {
        line_start_ms,
        line_duration_ms,
        words,
    })
}

/// 解析 QRC 文本，丢弃元数据行和没有任何字的行。
#[must_use]
pub fn parse_qrc(content: &str) -> Vec<QrcLine> {
    content.lines().filter_map(parse_qrc_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, start_ms: u64, duration_ms: u64) -> QrcWord {
        QrcWord {
            text: text.to_string(),
            start_ms,
            duration_ms,
        }
    }

    #[test]
    fn test_tag_first_layout() {
        let line = parse_qrc_line("[1000,2000](1000,500)Hi(1500,500)there").unwrap();
        assert_eq!(line.line_start_ms, 1000);
        assert_eq!(line.line_duration_ms, 2000);
        assert_eq!(
            line.words,
            vec![word("Hi", 1000, 500), word("there", 1500, 500)]
        );
    }

    #[test]
    fn test_text_first_layout() {
        let line = parse_qrc_line("[3000,2500]Hel(3000,500)lo (3500,500)world(4000,1500)").unwrap();
        assert_eq!(
            line.words,
            vec![
                word("Hel", 3000, 500),
                word("lo ", 3500, 500),
                word("world", 4000, 1500),
            ]
        );
        assert_eq!(line.text(), "Hello world");
    }

    #[test]
    fn test_leading_empty_word_keeps_text_first_layout() {
        let line = parse_qrc_line("[0,1000](0,100)星(100,500)河(600,400)").unwrap();
        assert_eq!(line.words, vec![word("星", 100, 500), word("河", 600, 400)]);
        assert_eq!(line.text(), "星河");
    }

    #[test]
    fn test_line_tag_must_start_the_line() {
        assert!(parse_qrc_line(" [0,1000]a(0,1000)").is_none());
        assert!(parse_qrc_line("\t[0,1000]a(0,1000)").is_none());
        assert_eq!(parse_qrc(" [0,500]a(0,500)\n[500,500]b(500,500)").len(), 1);
    }

    #[test]
    fn test_space_after_comma() {
        let line = parse_qrc_line("[0, 1000]a(0, 500)b(500, 500)").unwrap();
        assert_eq!(line.line_duration_ms, 1000);
        assert_eq!(line.words, vec![word("a", 0, 500), word("b", 500, 500)]);
    }

    #[test]
    fn test_empty_words_are_skipped() {
        let line = parse_qrc_line("[0,1000]a(0,500)(500,100)b(600,400)").unwrap();
        assert_eq!(line.words, vec![word("a", 0, 500), word("b", 600, 400)]);
    }

    #[test]
    fn test_lines_without_words_are_dropped() {
        assert!(parse_qrc_line("[5500,2000](5500,1000)").is_none());
        assert!(parse_qrc_line("[5500,2000]").is_none());
        assert!(parse_qrc_line("[5500,2000]no tags here").is_none());
        assert!(parse_qrc_line("[ti:标题]").is_none());
        assert!(parse_qrc_line("[00:01.000]lrc line").is_none());
    }

    #[test]
    fn test_overflowing_numbers_are_misses() {
        assert!(parse_qrc_line("[99999999999999999999999,10]a(0,10)").is_none());
        let line = parse_qrc_line("[0,1000]a(99999999999999999999999,10)b(10,10)").unwrap();
        assert_eq!(line.words, vec![word("b", 10, 10)]);
    }

    #[test]
    fn test_parse_document() {
        let content = "[ti:星河]\n[offset:0]\n[0,1000]星(0,500)河(500,500)\n\n[1000,500]end(1000,500)\n";
        let lines = parse_qrc(content);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "星河");
        assert_eq!(lines[1].effective_end_ms(), 1500);
    }
}
