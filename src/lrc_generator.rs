//! 将时间轴序列化为规范的 LRC 文本。

use std::fmt::Write as FmtWrite;

use crate::types::LrcLine;

/// 生成 `[mm:ss.mmm]文本` 形式的 LRC，行间以 `\n` 分隔，末尾不带换行。
#[must_use]
pub fn generate_lrc(lines: &[LrcLine]) -> String {
    let mut output = String::with_capacity(lines.len() * 24);
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        // 写入 String 不会失败
        let _ = write!(output, "{line}");
    }
    output
}
