//! 由三个 [`des`](super::des) 变换组成的 EDE 三重 DES。

use super::des::{self, BLOCK_SIZE, Mode, RoundKeySchedule};
use crate::error::{ProcessorError, Result};

/// 三重 DES 密钥长度（字节）。
pub const KEY_SIZE: usize = 24;

/// 一个 24 字节的三重 DES 密钥，依次为子密钥 K1、K2、K3。
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey([u8; KEY_SIZE]);

impl CipherKey {
    #[must_use]
    pub const fn new(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// 拆分出三个 8 字节子密钥。
    #[must_use]
    pub fn sub_keys(&self) -> [[u8; BLOCK_SIZE]; 3] {
        std::array::from_fn(|i| {
            let mut sub_key = [0u8; BLOCK_SIZE];
            sub_key.copy_from_slice(&self.0[i * BLOCK_SIZE..(i + 1) * BLOCK_SIZE]);
            sub_key
        })
    }
}

impl TryFrom<&[u8]> for CipherKey {
    type Error = ProcessorError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let array: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| ProcessorError::InvalidKeyLength(bytes.len()))?;
        Ok(Self(array))
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(..)")
    }
}

/// 按应用顺序排列的三个轮密钥表。
pub type TripleDesSchedule = [RoundKeySchedule; 3];

/// 为指定方向准备三个轮密钥表。
///
/// - 加密：K1 加密、K2 解密、K3 加密
/// - 解密：K3 解密、K2 加密、K1 解密
#[must_use]
pub fn triple_setup(key: &CipherKey, mode: Mode) -> TripleDesSchedule {
    let [k1, k2, k3] = key.sub_keys();
    let ops = match mode {
        Mode::Encrypt => [
            (k1, Mode::Encrypt),
            (k2, Mode::Decrypt),
            (k3, Mode::Encrypt),
        ],
        Mode::Decrypt => [
            (k3, Mode::Decrypt),
            (k2, Mode::Encrypt),
            (k1, Mode::Decrypt),
        ],
    };
    ops.map(|(sub_key, sub_mode)| des::derive_schedule(&sub_key, sub_mode))
}

/// 依次用三个轮密钥表变换一个分组。
#[must_use]
pub fn triple_transform(input: &[u8; BLOCK_SIZE], schedules: &TripleDesSchedule) -> [u8; BLOCK_SIZE] {
    schedules
        .iter()
        .fold(*input, |block, schedule| des::transform_block(&block, schedule))
}
