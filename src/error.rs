use std::io;

use quick_xml::events::attributes::AttrError as QuickXmlAttrError;
use thiserror::Error;

/// 定义歌词解密、解析与对齐过程中可能发生的各种错误。
#[derive(Error, Debug)]
pub enum ProcessorError {
    /// 十六进制密文中含有非法字符。
    #[error("无效的十六进制字符串: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// 十六进制密文为空，或长度不是 16 的倍数（即不能整除为 8 字节分组）。
    #[error("加密数据长度无效: {0} 个十六进制字符")]
    InvalidCiphertextLength(usize),
    /// 3DES 密钥长度不是 24 字节。
    #[error("密钥长度必须为 24 字节，实际为 {0} 字节")]
    InvalidKeyLength(usize),
    /// Zlib 解压缩失败。
    #[error("Zlib 解压缩失败: {0}")]
    Decompression(#[source] io::Error),
    /// Zlib 压缩失败。
    #[error("Zlib 压缩失败: {0}")]
    Compression(#[source] io::Error),
    /// 从字节序列转换为 UTF-8 字符串失败。
    #[error("UTF-8 转换错误: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),
    /// XML 解析错误，来自 `quick-xml` 库。
    #[error("解析 XML 错误: {0}")]
    Xml(#[from] quick_xml::Error),
    /// XML 属性解析错误，来自 `quick-xml` 库。
    #[error("XML 属性错误: {0}")]
    Attribute(#[from] QuickXmlAttrError),
    /// XML 文档中缺少所需的结构。
    #[error("XML 结构无效: {0}")]
    InvalidXmlStructure(String),
    /// 配置文件解析错误。
    #[error("配置解析错误: {0}")]
    Config(#[from] toml::de::Error),
    /// 文件读写等IO错误。
    #[error("IO 错误: {0}")]
    Io(#[from] io::Error),
}

/// 本库通用的 `Result` 类型别名。
pub type Result<T> = std::result::Result<T, ProcessorError>;
