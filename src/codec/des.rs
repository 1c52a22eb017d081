//! QQ 音乐 QRC 所用的单 DES 分组变换。
//!
//! **警告**：这不是标准 DES。结构上与 DES 相同（PC-1/PC-2 密钥编排、IP/FP、
//! 16 轮 Feistel、8 个 S 盒与 P 置换），但有以下私有差异：
//!
//! - 8 字节分组与密钥按两个小端序 32 位字读入和写出；
//! - 第 2、4 个 S 盒各有一处与标准表不同；
//! - PC-2 在选取右半密钥的位时存在一位偏移，越界的位恒为 0。
//!
//! 本实现仅用于歌词解密，不应用于任何安全目的。
//!
//! 所有置换表都采用从 0 开始、最高位优先的位编号。

/// DES 分组长度（字节）。
pub const BLOCK_SIZE: usize = 8;
/// 轮数。
pub const ROUNDS: usize = 16;
/// 每个轮密钥的字节数（48 位）。
pub const ROUND_KEY_SIZE: usize = 6;

/// 单个 48 位轮密钥。
pub type RoundKey = [u8; ROUND_KEY_SIZE];

/// 一个子密钥派生出的 16 个轮密钥，已按 [`Mode`] 排好应用顺序。
pub type RoundKeySchedule = [RoundKey; ROUNDS];

/// 密钥编排的方向。解密方向的轮密钥顺序与加密相反。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

#[rustfmt::skip]
const INITIAL_PERMUTATION: [u8; 64] = [
    57, 49, 41, 33, 25, 17,  9,  1,  59, 51, 43, 35, 27, 19, 11,  3,
    61, 53, 45, 37, 29, 21, 13,  5,  63, 55, 47, 39, 31, 23, 15,  7,
    56, 48, 40, 32, 24, 16,  8,  0,  58, 50, 42, 34, 26, 18, 10,  2,
    60, 52, 44, 36, 28, 20, 12,  4,  62, 54, 46, 38, 30, 22, 14,  6,
];

#[rustfmt::skip]
const FINAL_PERMUTATION: [u8; 64] = [
    39,  7, 47, 15, 55, 23, 63, 31,  38,  6, 46, 14, 54, 22, 62, 30,
    37,  5, 45, 13, 53, 21, 61, 29,  36,  4, 44, 12, 52, 20, 60, 28,
    35,  3, 43, 11, 51, 19, 59, 27,  34,  2, 42, 10, 50, 18, 58, 26,
    33,  1, 41,  9, 49, 17, 57, 25,  32,  0, 40,  8, 48, 16, 56, 24,
];

/// 右半部 32 位扩展为 48 位。
#[rustfmt::skip]
const EXPANSION: [u8; 48] = [
    31,  0,  1,  2,  3,  4,   3,  4,  5,  6,  7,  8,
     7,  8,  9, 10, 11, 12,  11, 12, 13, 14, 15, 16,
    15, 16, 17, 18, 19, 20,  19, 20, 21, 22, 23, 24,
    23, 24, 25, 26, 27, 28,  27, 28, 29, 30, 31,  0,
];

#[rustfmt::skip]
const P_PERMUTATION: [u8; 32] = [
    15,  6, 19, 20, 28, 11, 27, 16,
     0, 14, 22, 25,  4, 17, 30,  9,
     1,  7, 23, 13, 31, 26,  2,  8,
    18, 12, 29,  5, 21, 10,  3, 24,
];

/// PC-1 左半（C）。
#[rustfmt::skip]
const PC1_C: [u8; 28] = [
    56, 48, 40, 32, 24, 16,  8,
     0, 57, 49, 41, 33, 25, 17,
     9,  1, 58, 50, 42, 34, 26,
    18, 10,  2, 59, 51, 43, 35,
];

/// PC-1 右半（D）。
#[rustfmt::skip]
const PC1_D: [u8; 28] = [
    62, 54, 46, 38, 30, 22, 14,
     6, 61, 53, 45, 37, 29, 21,
    13,  5, 60, 52, 44, 36, 28,
    20, 12,  4, 27, 19, 11,  3,
];

/// PC-2。`< 28` 的位置取自 C，其余取自 D（见 [`pc2_bit`]）。
#[rustfmt::skip]
const PC2: [u8; 48] = [
    13, 16, 10, 23,  0,  4,  2, 27, 14,  5, 20,  9,
    22, 18, 11,  3, 25,  7, 15,  6, 26, 19, 12,  1,
    40, 51, 30, 36, 46, 54, 29, 39, 50, 44, 32, 47,
    43, 48, 38, 55, 33, 52, 45, 41, 49, 35, 28, 31,
];

const KEY_ROTATIONS: [u32; ROUNDS] = [1, 1, 2, 2, 2, 2, 2, 2, 1, 2, 2, 2, 2, 2, 2, 1];

const HALF_KEY_MASK: u32 = 0x0FFF_FFFF;

/// QQ 音乐的 S 盒。按 [`sbox_index`] 的顺序存放，每个 64 项。
#[rustfmt::skip]
const S_BOXES: [[u8; 64]; 8] = [
    [
        14,  4, 13,  1,  2, 15, 11,  8,  3, 10,  6, 12,  5,  9,  0,  7,
         0, 15,  7,  4, 14,  2, 13,  1, 10,  6, 12, 11,  9,  5,  3,  8,
         4,  1, 14,  8, 13,  6,  2, 11, 15, 12,  9,  7,  3, 10,  5,  0,
        15, 12,  8,  2,  4,  9,  1,  7,  5, 11,  3, 14, 10,  0,  6, 13,
    ],
    [
        15,  1,  8, 14,  6, 11,  3,  4,  9,  7,  2, 13, 12,  0,  5, 10,
         3, 13,  4,  7, 15,  2,  8, 15, 12,  0,  1, 10,  6,  9, 11,  5,
         0, 14,  7, 11, 10,  4, 13,  1,  5,  8, 12,  6,  9,  3,  2, 15,
        13,  8, 10,  1,  3, 15,  4,  2, 11,  6,  7, 12,  0,  5, 14,  9,
    ],
    [
        10,  0,  9, 14,  6,  3, 15,  5,  1, 13, 12,  7, 11,  4,  2,  8,
        13,  7,  0,  9,  3,  4,  6, 10,  2,  8,  5, 14, 12, 11, 15,  1,
        13,  6,  4,  9,  8, 15,  3,  0, 11,  1,  2, 12,  5, 10, 14,  7,
         1, 10, 13,  0,  6,  9,  8,  7,  4, 15, 14,  3, 11,  5,  2, 12,
    ],
    [
         7, 13, 14,  3,  0,  6,  9, 10,  1,  2,  8,  5, 11, 12,  4, 15,
        13,  8, 11,  5,  6, 15,  0,  3,  4,  7,  2, 12,  1, 10, 14,  9,
        10,  6,  9,  0, 12, 11,  7, 13, 15,  1,  3, 14,  5,  2,  8,  4,
         3, 15,  0,  6, 10, 10, 13,  8,  9,  4,  5, 11, 12,  7,  2, 14,
    ],
    [
         2, 12,  4,  1,  7, 10, 11,  6,  8,  5,  3, 15, 13,  0, 14,  9,
        14, 11,  2, 12,  4,  7, 13,  1,  5,  0, 15, 10,  3,  9,  8,  6,
         4,  2,  1, 11, 10, 13,  7,  8, 15,  9, 12,  5,  6,  3,  0, 14,
        11,  8, 12,  7,  1, 14,  2, 13,  6, 15,  0,  9, 10,  4,  5,  3,
    ],
    [
        12,  1, 10, 15,  9,  2,  6,  8,  0, 13,  3,  4, 14,  7,  5, 11,
        10, 15,  4,  2,  7, 12,  9,  5,  6,  1, 13, 14,  0, 11,  3,  8,
         9, 14, 15,  5,  2,  8, 12,  3,  7,  0,  4, 10,  1, 13, 11,  6,
         4,  3,  2, 12,  9,  5, 15, 10, 11, 14,  1,  7,  6,  0,  8, 13,
    ],
    [
         4, 11,  2, 14, 15,  0,  8, 13,  3, 12,  9,  7,  5, 10,  6,  1,
        13,  0, 11,  7,  4,  9,  1, 10, 14,  3,  5, 12,  2, 15,  8,  6,
         1,  4, 11, 13, 12,  3,  7, 14, 10, 15,  6,  8,  0,  5,  9,  2,
         6, 11, 13,  8,  1,  4, 10,  7,  9,  5,  0, 15, 14,  2,  3, 12,
    ],
    [
        13,  2,  8,  4,  6, 15, 11,  1, 10,  9,  3, 14,  5,  0, 12,  7,
         1, 15, 13,  8, 10,  3,  7,  4, 12,  5,  6, 11,  0, 14,  9,  2,
         7, 11,  4,  1,  9, 12, 14,  2,  0,  6, 10, 13, 15,  3,  5,  8,
         2,  1, 14,  7,  4, 10,  8, 13, 15, 12,  9,  0,  3,  5,  6, 11,
    ],
];

/// 以两个小端序 32 位字读取 8 字节，高位字在前。
fn load_block(bytes: &[u8; BLOCK_SIZE]) -> u64 {
    let high = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    let low = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
    (u64::from(high) << 32) | u64::from(low)
}

/// [`load_block`] 的逆操作。
fn store_block(value: u64) -> [u8; BLOCK_SIZE] {
    let high = ((value >> 32) as u32).to_le_bytes();
    let low = (value as u32).to_le_bytes();
    [
        high[0], high[1], high[2], high[3], low[0], low[1], low[2], low[3],
    ]
}

/// 按 `table` 从宽度为 `width` 的输入中依次取位，拼成新的整数。
fn permute(input: u64, width: u32, table: &[u8]) -> u64 {
    table.iter().fold(0u64, |acc, &pos| {
        (acc << 1) | ((input >> (width - 1 - u32::from(pos))) & 1)
    })
}

/// 6 位分组中，外侧两位选行、内侧四位选列，换算成 S 盒数组下标。
const fn sbox_index(group: u8) -> usize {
    ((group & 0x20) | ((group & 0x1f) >> 1) | ((group & 0x01) << 4)) as usize
}

const fn rotate_half(half: u32, amount: u32) -> u32 {
    ((half << amount) | (half >> (28 - amount))) & HALF_KEY_MASK
}

/// 取 PC-2 中一个位置对应的密钥位。D 半部的下标偏移一位，第 28 位之后恒为 0。
const fn pc2_bit(c: u32, d: u32, pos: u8) -> u64 {
    if pos < 28 {
        ((c >> (27 - pos)) & 1) as u64
    } else {
        let offset = pos - 27;
        if offset <= 27 {
            ((d >> (27 - offset)) & 1) as u64
        } else {
            0
        }
    }
}

/// 由 8 字节子密钥派生 16 个轮密钥。
///
/// `Mode::Decrypt` 时轮密钥以相反顺序存放，因此加解密都使用同一个
/// [`transform_block`]。
#[must_use]
pub fn derive_schedule(subkey: &[u8; BLOCK_SIZE], mode: Mode) -> RoundKeySchedule {
    let key = load_block(subkey);
    let mut c = permute(key, 64, &PC1_C) as u32;
    let mut d = permute(key, 64, &PC1_D) as u32;

    let mut schedule = [[0u8; ROUND_KEY_SIZE]; ROUNDS];
    for (round, &shift) in KEY_ROTATIONS.iter().enumerate() {
        c = rotate_half(c, shift);
        d = rotate_half(d, shift);

        let round_key = PC2
            .iter()
            .fold(0u64, |acc, &pos| (acc << 1) | pc2_bit(c, d, pos))
            .to_be_bytes();

        let slot = match mode {
            Mode::Encrypt => round,
            Mode::Decrypt => ROUNDS - 1 - round,
        };
        schedule[slot].copy_from_slice(&round_key[2..]);
    }
    schedule
}

/// Feistel 轮函数。
fn feistel(right: u32, round_key: &RoundKey) -> u32 {
    let key = round_key
        .iter()
        .fold(0u64, |acc, &byte| (acc << 8) | u64::from(byte));
    let mixed = permute(u64::from(right), 32, &EXPANSION) ^ key;

    let substituted = S_BOXES
        .iter()
        .enumerate()
        .fold(0u64, |acc, (i, sbox)| {
            let group = ((mixed >> (42 - 6 * i)) & 0x3f) as u8;
            (acc << 4) | u64::from(sbox[sbox_index(group)])
        });

    permute(substituted, 32, &P_PERMUTATION) as u32
}

/// 用一个轮密钥表变换单个 8 字节分组。
#[must_use]
pub fn transform_block(input: &[u8; BLOCK_SIZE], schedule: &RoundKeySchedule) -> [u8; BLOCK_SIZE] {
    let state = permute(load_block(input), 64, &INITIAL_PERMUTATION);
    let mut left = (state >> 32) as u32;
    let mut right = state as u32;

    for round_key in &schedule[..ROUNDS - 1] {
        let next = left ^ feistel(right, round_key);
        left = right;
        right = next;
    }
    // 最后一轮不交换左右两半
    left ^= feistel(right, &schedule[ROUNDS - 1]);

    let preoutput = (u64::from(left) << 32) | u64::from(right);
    store_block(permute(preoutput, 64, &FINAL_PERMUTATION))
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_1: &[u8; 8] = b"!@#)(*$%";

    #[test]
    fn verify_key_schedule() {
        #[rustfmt::skip]
        let expected: RoundKeySchedule = [
            [0x40, 0x0C, 0x26, 0x10, 0x28, 0x08], [0x40, 0xA6, 0x20, 0x14, 0x04, 0x15],
            [0xC0, 0x94, 0x26, 0x8B, 0x00, 0xC0], [0xE0, 0x82, 0x42, 0x00, 0xE2, 0x01],
            [0x20, 0xD2, 0x22, 0x32, 0x04, 0x04], [0xA0, 0x11, 0x52, 0xC8, 0x00, 0x82],
            [0x24, 0x42, 0x51, 0x04, 0x62, 0x09], [0x07, 0x51, 0x10, 0x72, 0x10, 0x40],
            [0x06, 0x41, 0x49, 0x4A, 0x80, 0x16], [0x0B, 0x41, 0x11, 0x05, 0x44, 0x88],
            [0x0D, 0x09, 0x89, 0x08, 0x10, 0x41], [0x13, 0x20, 0x89, 0xC2, 0xC0, 0x24],
            [0x19, 0x0C, 0x80, 0x00, 0x0E, 0x88], [0x50, 0x28, 0x8C, 0x98, 0x10, 0x11],
            [0x10, 0xA4, 0x04, 0x43, 0x42, 0x20], [0xD0, 0x2C, 0x04, 0x00, 0xCA, 0x82],
        ];

        assert_eq!(derive_schedule(KEY_1, Mode::Encrypt), expected);
    }

    #[test]
    fn test_decrypt_schedule_is_reversed() {
        let mut encrypt = derive_schedule(KEY_1, Mode::Encrypt);
        encrypt.reverse();
        assert_eq!(derive_schedule(KEY_1, Mode::Decrypt), encrypt);
    }

    #[test]
    fn test_known_answer_zero_block() {
        let schedule = derive_schedule(KEY_1, Mode::Encrypt);
        let ciphertext = transform_block(&[0u8; 8], &schedule);
        assert_eq!(ciphertext, [0x8F, 0x77, 0x58, 0xB4, 0xDB, 0x4D, 0x35, 0x9E]);
    }

    #[test]
    fn test_single_block_round_trip() {
        let key = b"8bytekey";
        let encrypt = derive_schedule(key, Mode::Encrypt);
        let decrypt = derive_schedule(key, Mode::Decrypt);

        for block in [*b"ABCDEFGH", [0u8; 8], [0xFF; 8], *b"\x00\x01\x02\x03lrc!"] {
            let ciphertext = transform_block(&block, &encrypt);
            assert_ne!(ciphertext, block);
            assert_eq!(transform_block(&ciphertext, &decrypt), block);
        }
    }

    #[test]
    fn test_block_layout_helpers() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8];
        assert_eq!(load_block(&bytes), 0x0403_0201_0807_0605);
        assert_eq!(store_block(load_block(&bytes)), bytes);
    }

    #[test]
    fn test_sbox_index_selects_row_and_column() {
        // 外侧位 1..1 -> 第 3 行，内侧 0000 -> 第 0 列
        assert_eq!(sbox_index(0b10_0001), 48);
        assert_eq!(sbox_index(0b01_1110), 15);
        assert_eq!(sbox_index(0), 0);
    }
}
