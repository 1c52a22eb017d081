//! 歌词文本解析器。

pub mod lrc_parser;
pub mod qrc_parser;
pub mod qrc_xml;

pub use lrc_parser::{parse_lrc, parse_lrc_line, parse_time_tag};
pub use qrc_parser::{parse_qrc, parse_qrc_line};
pub use qrc_xml::{QrcDocument, QrcLyricItem, XmlNode, extract_lyric_content, parse_qrc_document};
