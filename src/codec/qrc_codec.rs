//! 十六进制密文与明文歌词之间的完整编解码流程。

use std::io::{Read, Write};

use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};
use tracing::{debug, trace};

use super::{
    QQ_KEY,
    des::{BLOCK_SIZE, Mode},
    triple_des::{CipherKey, TripleDesSchedule, triple_setup, triple_transform},
};
use crate::error::{ProcessorError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// 每个分组对应的十六进制字符数。
const HEX_BLOCK_LEN: usize = BLOCK_SIZE * 2;

/// QRC 编解码器。
///
/// 加解密两个方向的轮密钥表在构造时一次性派生，之后只读，可以放进 `Arc`
/// 在线程间共享。
#[derive(Clone)]
pub struct QrcCodec {
    encrypt_schedule: TripleDesSchedule,
    decrypt_schedule: TripleDesSchedule,
    strip_bom: bool,
}

impl std::fmt::Debug for QrcCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrcCodec")
            .field("strip_bom", &self.strip_bom)
            .finish_non_exhaustive()
    }
}

impl Default for QrcCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl QrcCodec {
    /// 使用 QQ 音乐内置密钥创建编解码器。
    #[must_use]
    pub fn new() -> Self {
        Self::with_key(&CipherKey::new(*QQ_KEY))
    }

    /// 使用自定义密钥创建编解码器。
    #[must_use]
    pub fn with_key(key: &CipherKey) -> Self {
        Self {
            encrypt_schedule: triple_setup(key, Mode::Encrypt),
            decrypt_schedule: triple_setup(key, Mode::Decrypt),
            strip_bom: true,
        }
    }

    /// 设置解压后是否移除开头的 UTF-8 BOM。
    #[must_use]
    pub const fn with_strip_bom(mut self, strip_bom: bool) -> Self {
        self.strip_bom = strip_bom;
        self
    }

    /// 将十六进制密文解密为（仍经过压缩的）字节。
    ///
    /// 含有任何非十六进制字符（包括空白）、长度为 0 或不是 16 的倍数时直接报错，
    /// 不会产生部分结果。
    pub fn decode(&self, encrypted_hex: &str) -> Result<Vec<u8>> {
        if let Some((index, c)) = encrypted_hex
            .chars()
            .enumerate()
            .find(|(_, c)| !c.is_ascii_hexdigit())
        {
            return Err(hex::FromHexError::InvalidHexCharacter { c, index }.into());
        }
        if encrypted_hex.is_empty() || encrypted_hex.len() % HEX_BLOCK_LEN != 0 {
            return Err(ProcessorError::InvalidCiphertextLength(encrypted_hex.len()));
        }

        let encrypted_bytes = hex::decode(encrypted_hex)?;
        Ok(apply_schedule(&encrypted_bytes, &self.decrypt_schedule))
    }

    /// 使用 Zlib 解压缩，并按设置移除 BOM，最后转换为 UTF-8 字符串。
    pub fn inflate(&self, compressed: &[u8]) -> Result<String> {
        let mut decoder = ZlibDecoder::new(compressed);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(ProcessorError::Decompression)?;

        if self.strip_bom && decompressed.starts_with(&UTF8_BOM) {
            decompressed.drain(..UTF8_BOM.len());
        }

        Ok(String::from_utf8(decompressed)?)
    }

    /// 解密 QQ 音乐歌词：十六进制解码、三重 DES 解密、Zlib 解压、UTF-8 解码。
    pub fn decrypt_lyrics(&self, encrypted_hex: &str) -> Result<String> {
        let compressed = self.decode(encrypted_hex)?;
        let text = self.inflate(&compressed)?;
        trace!(
            ciphertext_len = encrypted_hex.len(),
            plaintext_len = text.len(),
            "QRC 解密完成"
        );
        Ok(text)
    }

    /// 与 [`Self::decrypt_lyrics`] 相同，但任何失败都返回 `None`。
    #[must_use]
    pub fn decrypt_lyric_payload(&self, encrypted_hex: &str) -> Option<String> {
        match self.decrypt_lyrics(encrypted_hex) {
            Ok(text) => Some(text),
            Err(e) => {
                debug!("解密歌词失败: {e}");
                None
            }
        }
    }

    /// 加密明文歌词：Zlib 压缩、零填充、三重 DES 加密，输出大写十六进制。
    pub fn encrypt_lyrics(&self, plaintext: &str) -> Result<String> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(plaintext.as_bytes())
            .map_err(ProcessorError::Compression)?;
        let compressed = encoder.finish().map_err(ProcessorError::Compression)?;

        let padded = zero_pad(compressed);
        let encrypted = apply_schedule(&padded, &self.encrypt_schedule);
        Ok(hex::encode_upper(encrypted))
    }
}

/// ECB 模式：逐个 8 字节分组独立变换，保持分组顺序。
///
/// 调用方保证 `data` 的长度是分组长度的整数倍。
fn apply_schedule(data: &[u8], schedule: &TripleDesSchedule) -> Vec<u8> {
    let mut output = Vec::with_capacity(data.len());
    for chunk in data.chunks_exact(BLOCK_SIZE) {
        let mut block = [0u8; BLOCK_SIZE];
        block.copy_from_slice(chunk);
        output.extend_from_slice(&triple_transform(&block, schedule));
    }
    output
}

/// QQ 音乐使用零字节填充到分组长度的整数倍。
fn zero_pad(mut data: Vec<u8>) -> Vec<u8> {
    let remainder = data.len() % BLOCK_SIZE;
    if remainder != 0 {
        data.resize(data.len() + BLOCK_SIZE - remainder, 0);
    }
    data
}
