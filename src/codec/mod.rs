//! QQ 音乐 QRC 歌词的加解密。
//!
//! 密文为十六进制字符串，解出的字节经过 Zlib 压缩。分组密码是 QQ 音乐私有的
//! 三重 DES 变体（EDE，ECB 模式，无 IV，零填充）。
//!
//! ## 致谢
//!
//! - Brad Conte 的原始 DES 实现。
//! - `LyricDecoder` 项目针对 QQ 音乐的改编。

pub mod des;
pub mod qrc_codec;
pub mod triple_des;

pub use des::{Mode, RoundKeySchedule};
pub use qrc_codec::QrcCodec;
pub use triple_des::{CipherKey, TripleDesSchedule, triple_setup, triple_transform};

/// QQ 音乐内置的 24 字节三重 DES 密钥。
pub const QQ_KEY: &[u8; triple_des::KEY_SIZE] = b"!@#)(*$%123ZXC!@!@#)(NHL";
