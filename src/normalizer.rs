//! 解密、解析、对齐、输出的完整流程。

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    aligner::{AlignOptions, align_with_options},
    codec::QrcCodec,
    config::ProcessorConfig,
    lrc_generator::generate_lrc,
    parser::{extract_lyric_content, parse_lrc, parse_qrc},
    types::{LrcLine, LyricFormat},
};

/// 将 QQ 音乐返回的加密歌词字段转换为规范 LRC 文本。
///
/// 编解码器在构造时创建一次，之后每次调用只读取。可以通过
/// [`LyricNormalizer::with_codec`] 在多个实例间共享同一个编解码器。
#[derive(Debug, Clone)]
pub struct LyricNormalizer {
    codec: Arc<QrcCodec>,
    config: ProcessorConfig,
}

impl Default for LyricNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl LyricNormalizer {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ProcessorConfig::default())
    }

    #[must_use]
    pub fn with_config(config: ProcessorConfig) -> Self {
        let codec = QrcCodec::new().with_strip_bom(config.strip_bom);
        Self::with_codec(Arc::new(codec), config)
    }

    #[must_use]
    pub const fn with_codec(codec: Arc<QrcCodec>, config: ProcessorConfig) -> Self {
        Self { codec, config }
    }

    #[must_use]
    pub fn codec(&self) -> &QrcCodec {
        &self.codec
    }

    #[must_use]
    pub const fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// 解析主歌词文本。能解析出逐字行时按 QRC 处理，否则按 LRC 处理。
    #[must_use]
    pub fn parse_primary(&self, text: &str) -> (LyricFormat, Vec<LrcLine>) {
        let qrc_lines = parse_qrc(text);
        if qrc_lines.is_empty() {
            return (LyricFormat::Lrc, parse_lrc(text));
        }

        let lines = qrc_lines
            .iter()
            .map(|line| line.to_lrc_line(self.config.word_timing))
            .collect();
        (LyricFormat::Qrc, lines)
    }

    /// 处理加密的主歌词与可选的加密翻译。
    ///
    /// 对齐输出为空时退回到解密出的歌词正文；主歌词无法解密时退回到原始字段。
    /// 只有最终结果为空白时才返回 `None`。
    #[must_use]
    #[instrument(skip_all, fields(lyric_len = raw_lyric.len(), has_trans = raw_trans.is_some()))]
    pub fn normalize(&self, raw_lyric: &str, raw_trans: Option<&str>) -> Option<String> {
        let lyric_content = self
            .codec
            .decrypt_lyric_payload(raw_lyric)
            .map(|text| extract_lyric_content(&text));
        if lyric_content.is_none() {
            warn!("主歌词解密失败");
        }

        let trans_content = raw_trans
            .filter(|field| !field.trim().is_empty())
            .and_then(|field| self.codec.decrypt_lyric_payload(field));

        let rendered = self.render(lyric_content.as_deref(), trans_content.as_deref());

        let result = if rendered.trim().is_empty() {
            debug!("对齐结果为空，退回到未处理的文本");
            lyric_content.unwrap_or_else(|| raw_lyric.to_string())
        } else {
            rendered
        };

        if result.trim().is_empty() {
            info!("没有可用的歌词");
            None
        } else {
            Some(result)
        }
    }

    /// 与 [`Self::normalize`] 相同，但输入是已经解密的文本。
    #[must_use]
    #[instrument(skip_all)]
    pub fn normalize_text(&self, primary_text: &str, trans_text: Option<&str>) -> Option<String> {
        let lyric_content = extract_lyric_content(primary_text);
        let rendered = self.render(Some(&lyric_content), trans_text);

        let result = if rendered.trim().is_empty() {
            lyric_content
        } else {
            rendered
        };
        (!result.trim().is_empty()).then_some(result)
    }

    fn render(&self, lyric_content: Option<&str>, trans_content: Option<&str>) -> String {
        let primary = lyric_content.map_or_else(Vec::new, |text| {
            let (format, lines) = self.parse_primary(text);
            debug!(%format, lines = lines.len(), "主歌词解析完成");
            lines
        });
        let translation = trans_content.map(parse_lrc).unwrap_or_default();
        debug!(lines = translation.len(), "翻译解析完成");

        let aligned = align_with_options(&primary, &translation, AlignOptions::from(&self.config));
        generate_lrc(&aligned)
    }
}
