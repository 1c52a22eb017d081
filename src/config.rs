//! 处理流程的可调参数，可从 TOML 文本或文件加载。

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;

/// 逐字 QRC 行转换为 LRC 行时采用的输出样式。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordTimingStyle {
    /// 只保留行首时间戳，逐字文本直接拼接。
    Plain,
    /// 每个字后附带其结束时间标签，例如 `星[00:00.500]光[00:01.000]`。
    #[default]
    Enhanced,
}

/// 解密与对齐流程的配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    /// 翻译行吸附到主歌词行的最大时间差（毫秒，不含边界）。
    pub alignment_tolerance_ms: u64,
    /// 对齐后是否移除时间戳与文本都完全相同的重复行。
    pub dedup_identical_lines: bool,
    /// QRC 行的输出样式。
    pub word_timing: WordTimingStyle,
    /// 解压后是否移除开头的 UTF-8 BOM。
    pub strip_bom: bool,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            alignment_tolerance_ms: crate::aligner::DEFAULT_TOLERANCE_MS,
            dedup_identical_lines: true,
            word_timing: WordTimingStyle::Enhanced,
            strip_bom: true,
        }
    }
}

impl ProcessorConfig {
    /// 从 TOML 文本解析配置，缺失的字段使用默认值。
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 从文件加载配置。
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("已从 {} 加载配置。", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = ProcessorConfig::from_toml_str("").unwrap();
        assert_eq!(config, ProcessorConfig::default());
        assert_eq!(config.alignment_tolerance_ms, 100);
        assert!(config.strip_bom);
        assert_eq!(config.word_timing, WordTimingStyle::Enhanced);
    }

    #[test]
    fn test_partial_override() {
        let config = ProcessorConfig::from_toml_str(
            "alignment_tolerance_ms = 250\nword_timing = \"plain\"\n",
        )
        .unwrap();
        assert_eq!(config.alignment_tolerance_ms, 250);
        assert_eq!(config.word_timing, WordTimingStyle::Plain);
        assert!(config.dedup_identical_lines);
    }

    #[test]
    fn test_invalid_toml_is_error() {
        let result = ProcessorConfig::from_toml_str("alignment_tolerance_ms = \"soon\"");
        assert!(matches!(
            result,
            Err(crate::error::ProcessorError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ProcessorConfig::load_from_file("/nonexistent/qrc_processor.toml");
        assert!(matches!(result, Err(crate::error::ProcessorError::Io(_))));
    }
}
