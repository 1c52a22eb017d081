//! 将独立计时的翻译轨道对齐到主歌词轨道。

use std::collections::HashSet;

use tracing::trace;

use crate::{config::ProcessorConfig, types::LrcLine};

/// 翻译行吸附到主歌词行的默认容差（毫秒）。
pub const DEFAULT_TOLERANCE_MS: u64 = 100;

/// 对齐选项。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignOptions {
    /// 时间差严格小于该值时，翻译行改用主歌词行的时间戳。
    pub tolerance_ms: u64,
    /// 是否移除时间戳与文本都相同的重复行（保留第一次出现的）。
    pub dedup_identical: bool,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            tolerance_ms: DEFAULT_TOLERANCE_MS,
            dedup_identical: true,
        }
    }
}

impl From<&ProcessorConfig> for AlignOptions {
    fn from(config: &ProcessorConfig) -> Self {
        Self {
            tolerance_ms: config.alignment_tolerance_ms,
            dedup_identical: config.dedup_identical_lines,
        }
    }
}

/// 找出与 `timestamp_ms` 最接近的主歌词时间戳。距离相同时取靠前的一行。
fn nearest_timestamp(primary: &[LrcLine], timestamp_ms: u64) -> Option<u64> {
    primary
        .iter()
        .min_by_key(|line| line.timestamp_ms.abs_diff(timestamp_ms))
        .map(|line| line.timestamp_ms)
}

/// 使用指定容差对齐，不去重。
///
/// 每条翻译行找到时间最接近的主歌词行，差值小于 `tolerance_ms` 时改用其时间戳，
/// 否则保留自身时间戳。结果为主歌词行在前、翻译行在后，再按时间戳稳定排序。
#[must_use]
pub fn align(primary: &[LrcLine], secondary: &[LrcLine], tolerance_ms: u64) -> Vec<LrcLine> {
    align_with_options(
        primary,
        secondary,
        AlignOptions {
            tolerance_ms,
            dedup_identical: false,
        },
    )
}

/// 按给定选项对齐主歌词与翻译。
#[must_use]
pub fn align_with_options(
    primary: &[LrcLine],
    secondary: &[LrcLine],
    options: AlignOptions,
) -> Vec<LrcLine> {
    let mut merged = Vec::with_capacity(primary.len() + secondary.len());
    merged.extend_from_slice(primary);

    for line in secondary {
        let timestamp_ms = match nearest_timestamp(primary, line.timestamp_ms) {
            Some(nearest) if nearest.abs_diff(line.timestamp_ms) < options.tolerance_ms => {
                if nearest != line.timestamp_ms {
                    trace!(
                        from = line.timestamp_ms,
                        to = nearest,
                        "翻译行时间戳已吸附到主歌词行"
                    );
                }
                nearest
            }
            _ => line.timestamp_ms,
        };
        merged.push(LrcLine {
            timestamp_ms,
            text: line.text.clone(),
        });
    }

    merged.sort_by_key(|line| line.timestamp_ms);

    if options.dedup_identical {
        let mut seen = HashSet::new();
        merged.retain(|line| seen.insert((line.timestamp_ms, line.text.clone())));
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[(u64, &str)]) -> Vec<LrcLine> {
        items.iter().map(|&(ts, text)| LrcLine::new(ts, text)).collect()
    }

    #[test]
    fn test_retimes_close_translation() {
        let primary = lines(&[(1000, "A")]);
        let secondary = lines(&[(1050, "甲")]);
        assert_eq!(
            align(&primary, &secondary, DEFAULT_TOLERANCE_MS),
            lines(&[(1000, "A"), (1000, "甲")])
        );
    }

    #[test]
    fn test_keeps_distant_translation() {
        let primary = lines(&[(1000, "A")]);
        let secondary = lines(&[(1300, "甲")]);
        assert_eq!(
            align(&primary, &secondary, DEFAULT_TOLERANCE_MS),
            lines(&[(1000, "A"), (1300, "甲")])
        );
    }

    #[test]
    fn test_tolerance_is_exclusive() {
        let primary = lines(&[(1000, "A")]);
        let secondary = lines(&[(1100, "甲"), (901, "乙")]);
        assert_eq!(
            align(&primary, &secondary, 100),
            lines(&[(1000, "A"), (1000, "乙"), (1100, "甲")])
        );
    }

    #[test]
    fn test_tie_prefers_first_primary_line() {
        let primary = lines(&[(1000, "A"), (1080, "B")]);
        let secondary = lines(&[(1040, "甲")]);
        assert_eq!(
            align(&primary, &secondary, DEFAULT_TOLERANCE_MS),
            lines(&[(1000, "A"), (1000, "甲"), (1080, "B")])
        );
    }

    #[test]
    fn test_primary_precedes_secondary_at_same_time() {
        let primary = lines(&[(2000, "B"), (1000, "A")]);
        let secondary = lines(&[(1000, "甲"), (2000, "乙")]);
        assert_eq!(
            align(&primary, &secondary, DEFAULT_TOLERANCE_MS),
            lines(&[(1000, "A"), (1000, "甲"), (2000, "B"), (2000, "乙")])
        );
    }

    #[test]
    fn test_empty_tracks() {
        let primary = lines(&[(1000, "A")]);
        assert_eq!(align(&primary, &[], DEFAULT_TOLERANCE_MS), primary);

        let secondary = lines(&[(500, "甲"), (100, "乙")]);
        assert_eq!(
            align(&[], &secondary, DEFAULT_TOLERANCE_MS),
            lines(&[(100, "乙"), (500, "甲")])
        );
    }

    #[test]
    fn test_output_is_sorted() {
        let primary = lines(&[(3000, "C"), (1000, "A"), (2000, "B")]);
        let secondary = lines(&[(2950, "丙"), (10, "零"), (1020, "甲")]);
        let merged = align(&primary, &secondary, DEFAULT_TOLERANCE_MS);
        assert!(merged.windows(2).all(|w| w[0].timestamp_ms <= w[1].timestamp_ms));
        assert_eq!(merged.len(), 6);
    }

    #[test]
    fn test_dedup_identical_lines() {
        let primary = lines(&[(1000, "同"), (2000, "B")]);
        let secondary = lines(&[(1030, "同"), (2000, "乙")]);

        let merged = align_with_options(&primary, &secondary, AlignOptions::default());
        assert_eq!(merged, lines(&[(1000, "同"), (2000, "B"), (2000, "乙")]));

        let kept = align(&primary, &secondary, DEFAULT_TOLERANCE_MS);
        assert_eq!(kept.len(), 4);
    }
}
