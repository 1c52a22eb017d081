//! # `qrc_processor`
//!
//! QQ 音乐加密歌词的处理库：
//!
//! - 私有三重 DES 变体的加解密（[`codec`]）；
//! - LRC、QRC 逐字歌词与 `QrcInfos` XML 外壳的解析（[`parser`]）；
//! - 翻译轨道按最近时间戳对齐到主歌词（[`aligner`]）；
//! - 将以上步骤串联起来、带逐级回退的 [`LyricNormalizer`]。
//!
//! ```no_run
//! use qrc_processor::LyricNormalizer;
//!
//! let normalizer = LyricNormalizer::new();
//! let lyric_hex = "..."; // 接口返回的加密歌词
//! if let Some(lrc) = normalizer.normalize(lyric_hex, None) {
//!     println!("{lrc}");
//! }
//! ```

pub mod aligner;
pub mod codec;
pub mod config;
pub mod error;
pub mod logger;
pub mod lrc_generator;
pub mod normalizer;
pub mod parser;
pub mod types;
pub mod utils;

pub use aligner::{AlignOptions, DEFAULT_TOLERANCE_MS, align, align_with_options};
pub use codec::{CipherKey, QrcCodec};
pub use config::{ProcessorConfig, WordTimingStyle};
pub use error::{ProcessorError, Result};
pub use normalizer::LyricNormalizer;
pub use types::{LrcLine, LyricFormat, QrcLine, QrcWord};
