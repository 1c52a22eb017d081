//! 日志初始化。

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// 安装一个全局 `tracing` 订阅器。
///
/// 优先读取 `RUST_LOG` 环境变量，未设置时使用 `default_directive`，
/// 例如 `"info,qrc_processor=debug"`。重复调用不会报错，仅第一次生效。
pub fn init_tracing(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .try_init();
}

/// 与 [`init_tracing`] 相同，但输出写入测试捕获器。
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,qrc_processor=trace"));
    let _ = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
