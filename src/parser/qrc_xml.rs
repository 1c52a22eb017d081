//! 解密后 QRC 的 `QrcInfos` XML 外壳。
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <QrcInfos>
//! <QrcHeadInfo SaveTime="1704038400" Version="100"/>
//! <LyricInfo LyricCount="1">
//! <Lyric_1 LyricType="1" LyricContent="[0,1000]星(0,500)河(500,500)"/>
//! </LyricInfo>
//! </QrcInfos>
//! ```

use std::{borrow::Cow, sync::LazyLock};

use quick_xml::{
    Reader,
    escape::unescape,
    events::{BytesStart, Event},
};
use regex::Regex;
use tracing::{debug, instrument, warn};

use crate::error::{ProcessorError, Result};

static QRC_LYRIC_CONTENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"LyricContent="(?P<content>[^"]*)""#)
        .expect("编译 QRC_LYRIC_CONTENT_REGEX 失败")
});

/// 匹配不属于实体引用的 `&`。
static BARE_AMPERSAND_REGEX: LazyLock<fancy_regex::Regex> = LazyLock::new(|| {
    fancy_regex::Regex::new(r"&(?![a-zA-Z]{2,6};|#[0-9]{2,4};)")
        .expect("编译 BARE_AMPERSAND_REGEX 失败")
});

const LYRIC_CONTENT_PREFIX: &str = "LyricContent=\"";

/// `QrcHeadInfo` 元素。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrcHeadInfo {
    pub save_time: Option<u64>,
    pub version: Option<String>,
}

/// 一个 XML 元素及其全部属性（已反转义）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub tag_name: String,
    pub attributes: Vec<(String, String)>,
}

impl XmlElement {
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// `LyricInfo` 的直接子节点。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    /// 注释、CDATA、处理指令等。
    Other,
}

/// 一条歌词条目，对应 `LyricInfo` 下的一个子元素。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrcLyricItem {
    pub tag_name: String,
    pub lyric_type: Option<u32>,
    pub lyric_content: String,
}

/// 解析后的 `QrcInfos` 文档。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QrcDocument {
    pub head: Option<QrcHeadInfo>,
    pub lyric_count: Option<usize>,
    pub nodes: Vec<XmlNode>,
}

impl QrcDocument {
    /// 只由元素节点构造歌词条目，文本与其他节点被跳过。
    #[must_use]
    pub fn items(&self) -> Vec<QrcLyricItem> {
        self.nodes
            .iter()
            .filter_map(|node| match node {
                XmlNode::Element(element) => Some(QrcLyricItem {
                    tag_name: element.tag_name.clone(),
                    lyric_type: element
                        .attribute("LyricType")
                        .and_then(|value| value.trim().parse().ok()),
                    lyric_content: element
                        .attribute("LyricContent")
                        .unwrap_or_default()
                        .to_string(),
                }),
                XmlNode::Text(_) | XmlNode::Other => None,
            })
            .collect()
    }
}

fn read_element(start: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlElement> {
    let tag_name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.decode_and_unescape_value(reader.decoder())?;
        attributes.push((key, value.into_owned()));
    }
    Ok(XmlElement {
        tag_name,
        attributes,
    })
}

/// 解析 `QrcInfos` 文档。
///
/// 文档必须是格式良好的 XML，且包含 `LyricInfo` 元素。
pub fn parse_qrc_document(xml: &str) -> Result<QrcDocument> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut document = QrcDocument::default();
    let mut found_lyric_info = false;
    let mut depth = 0usize;
    let mut lyric_info_depth: Option<usize> = None;

    loop {
        let event = reader.read_event_into(&mut buf)?;
        let is_child = lyric_info_depth.is_some_and(|d| depth == d + 1);

        match event {
            Event::Start(ref start) | Event::Empty(ref start) => {
                let has_children = matches!(event, Event::Start(_));
                let element = read_element(start, &reader)?;

                match element.tag_name.as_str() {
                    "QrcHeadInfo" => {
                        document.head = Some(QrcHeadInfo {
                            save_time: element
                                .attribute("SaveTime")
                                .and_then(|value| value.trim().parse().ok()),
                            version: element.attribute("Version").map(str::to_string),
                        });
                    }
                    "LyricInfo" if lyric_info_depth.is_none() => {
                        found_lyric_info = true;
                        document.lyric_count = element
                            .attribute("LyricCount")
                            .and_then(|value| value.trim().parse().ok());
                        if has_children {
                            lyric_info_depth = Some(depth);
                        }
                    }
                    _ if is_child => document.nodes.push(XmlNode::Element(element)),
                    _ => {}
                }

                if has_children {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                if lyric_info_depth == Some(depth) {
                    lyric_info_depth = None;
                }
            }
            Event::Text(ref text) if is_child => {
                document
                    .nodes
                    .push(XmlNode::Text(String::from_utf8_lossy(text).into_owned()));
            }
            Event::Eof => break,
            _ if is_child => document.nodes.push(XmlNode::Other),
            _ => {}
        }
        buf.clear();
    }

    if !found_lyric_info {
        return Err(ProcessorError::InvalidXmlStructure(
            "缺少 LyricInfo 元素".to_string(),
        ));
    }
    Ok(document)
}

/// 解析成功时返回第一条歌词条目的内容（可能为空）。
fn first_lyric_content(xml: &str) -> Result<String> {
    let document = parse_qrc_document(xml)?;
    Ok(document
        .items()
        .into_iter()
        .next()
        .map(|item| item.lyric_content)
        .unwrap_or_default())
}

/// 转义游离的 `&`，并转义 `LyricContent` 值内部的双引号。
fn repair_lyric_xml(xml: &str) -> String {
    let escaped = BARE_AMPERSAND_REGEX.replace_all(xml, "&amp;");

    let Some(prefix_idx) = escaped.find(LYRIC_CONTENT_PREFIX) else {
        return escaped.into_owned();
    };
    let content_start = prefix_idx + LYRIC_CONTENT_PREFIX.len();
    let tail = &escaped[content_start..];
    let Some(content_len) = tail
        .rfind("\"/>")
        .or_else(|| tail.rfind("\">"))
        .or_else(|| tail.rfind('"'))
    else {
        return escaped.into_owned();
    };

    let content = &tail[..content_len];
    format!(
        "{}{}{}",
        &escaped[..content_start],
        content.replace('"', "&quot;"),
        &tail[content_len..]
    )
}

fn is_qrc_container(text: &str) -> bool {
    text.starts_with("<?xml") || text.starts_with("<QrcInfos")
}

/// 从解密后的文本中取出歌词正文。
///
/// 只有以 `<?xml` 或 `<QrcInfos` 开头的文本才按 QRC 容器处理，其余原样返回，
/// 例如 `<00:01.00>` 开头的 LRC。依次尝试：直接解析，修复常见的转义问题后再解析，
/// 正则提取。取不到非空内容时返回原文本。
#[must_use]
#[instrument(skip_all, fields(len = text.len()))]
pub fn extract_lyric_content(text: &str) -> String {
    let xml = text.trim_start_matches('\u{feff}').trim_start();
    if !is_qrc_container(xml) {
        return text.to_string();
    }

    match first_lyric_content(xml) {
        Ok(content) => {
            if content.trim().is_empty() {
                debug!("XML 中没有歌词内容，返回原始文本。");
                return text.to_string();
            }
            return content;
        }
        Err(e) => debug!("QRC XML 解析失败，尝试修复: {e}"),
    }

    let repaired = repair_lyric_xml(xml);
    match first_lyric_content(&repaired) {
        Ok(content) if !content.trim().is_empty() => return content,
        Ok(_) => {}
        Err(e) => debug!("修复后的 XML 仍然无法解析: {e}"),
    }

    if let Some(raw) = QRC_LYRIC_CONTENT_REGEX
        .captures(&repaired)
        .and_then(|caps| caps.name("content"))
        .map(|m| m.as_str())
        && !raw.trim().is_empty()
    {
        return unescape(raw).map_or_else(|_| raw.to_string(), Cow::into_owned);
    }

    warn!("所有提取歌词的方法均失败，返回原始文本。");
    text.to_string()
}
