//! 时间标签的格式化与换算。

/// 将毫秒格式化为 LRC 时间标签 `[mm:ss.mmm]`。分钟数超过 99 时位数随之增加。
#[must_use]
pub fn format_lrc_time_ms(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    let milliseconds = ms % 1000;
    format!("[{minutes:02}:{seconds:02}.{milliseconds:03}]")
}

/// 将 1 到 6 位的秒小数部分换算为毫秒。
///
/// `5`、`50`、`500`、`5000`、`50000`、`500000` 都表示 500 毫秒。
/// 位数不在范围内或含有非数字字符时返回 `None`。
#[must_use]
pub fn fraction_to_ms(fraction: &str) -> Option<u64> {
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = fraction.parse().ok()?;
    match fraction.len() {
        1 => Some(value * 100),
        2 => Some(value * 10),
        3 => Some(value),
        4 => Some(value / 10),
        5 => Some(value / 100),
        6 => Some(value / 1000),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lrc_time_ms() {
        assert_eq!(format_lrc_time_ms(0), "[00:00.000]");
        assert_eq!(format_lrc_time_ms(62_345), "[01:02.345]");
        assert_eq!(format_lrc_time_ms(3_599_999), "[59:59.999]");
        assert_eq!(format_lrc_time_ms(6_000_000), "[100:00.000]");
    }

    #[test]
    fn test_fraction_scaling() {
        for fraction in ["5", "50", "500", "5000", "50000", "500000"] {
            assert_eq!(fraction_to_ms(fraction), Some(500), "fraction {fraction}");
        }
        assert_eq!(fraction_to_ms("05"), Some(50));
        assert_eq!(fraction_to_ms("1234"), Some(123));
        assert_eq!(fraction_to_ms(""), None);
        assert_eq!(fraction_to_ms("1234567"), None);
        assert_eq!(fraction_to_ms("+12"), None);
    }
}
