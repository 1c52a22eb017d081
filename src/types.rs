//! 歌词处理过程中使用的数据类型。

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::{config::WordTimingStyle, utils::format_lrc_time_ms};

/// 歌词来源格式。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
pub enum LyricFormat {
    /// 普通逐行 LRC。
    #[strum(serialize = "lrc")]
    Lrc,
    /// QQ 音乐逐字 QRC。
    #[strum(serialize = "qrc")]
    Qrc,
}

// --- LRC ---

/// 一行带时间戳的歌词，也是对齐和输出时的规范表示。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LrcLine {
    /// 时间戳（毫秒）
    pub timestamp_ms: u64,
    /// 歌词文本
    pub text: String,
}

impl LrcLine {
    #[must_use]
    pub fn new(timestamp_ms: u64, text: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            text: text.into(),
        }
    }
}

impl fmt::Display for LrcLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", format_lrc_time_ms(self.timestamp_ms), self.text)
    }
}

// --- QRC ---

/// QRC 中的一个字（音节）。时间均为绝对毫秒。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrcWord {
    pub text: String,
    pub start_ms: u64,
    pub duration_ms: u64,
}

impl QrcWord {
    #[must_use]
    pub const fn end_ms(&self) -> u64 {
        self.start_ms.saturating_add(self.duration_ms)
    }
}

/// QRC 中的一行。`line_start_ms` 与 `line_duration_ms` 保留行标签中的原始值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrcLine {
    pub line_start_ms: u64,
    pub line_duration_ms: u64,
    pub words: Vec<QrcWord>,
}

impl QrcLine {
    /// 由第一个字得出的实际开始时间，没有字时退回行标签的值。
    #[must_use]
    pub fn effective_start_ms(&self) -> u64 {
        self.words
            .first()
            .map_or(self.line_start_ms, |word| word.start_ms)
    }

    /// 由最后一个字得出的实际结束时间，没有字时退回行标签的值。
    #[must_use]
    pub fn effective_end_ms(&self) -> u64 {
        self.words.last().map_or_else(
            || self.line_start_ms.saturating_add(self.line_duration_ms),
            QrcWord::end_ms,
        )
    }

    /// 所有字拼接成的整行文本。
    #[must_use]
    pub fn text(&self) -> String {
        self.words.iter().map(|word| word.text.as_str()).collect()
    }

    /// 转换为以行开始时间为时间戳的 LRC 行。
    #[must_use]
    pub fn to_lrc_line(&self, style: WordTimingStyle) -> LrcLine {
        let text = match style {
            WordTimingStyle::Plain => self.text(),
            WordTimingStyle::Enhanced => self
                .words
                .iter()
                .map(|word| format!("{}{}", word.text, format_lrc_time_ms(word.end_ms())))
                .collect(),
        };
        LrcLine::new(self.line_start_ms, text)
    }
}
