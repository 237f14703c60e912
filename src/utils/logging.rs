/// 日志工具模块
///
/// 提供日志初始化和输出格式化的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则 `verbose` 为真时输出 debug 级别
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .try_init();
}

/// 记录命令启动信息
///
/// # 参数
/// - `command`: 命令名称
/// - `year`: 工作区年份（未初始化时为 `None`）
pub fn log_startup(command: &str, year: Option<i32>) {
    info!("{}", "=".repeat(60));
    match year {
        Some(year) => info!("🎄 aoc {} - {} 年", command, year),
        None => info!("🎄 aoc {}", command),
    }
    info!("{}", "=".repeat(60));
}

/// 格式化耗时
///
/// # 参数
/// - `ms`: 毫秒数
///
/// # 返回
/// 超过 1 秒显示整秒，其余按量级保留不同小数位
pub fn ms_fixed(ms: f64) -> String {
    if ms > 1000.0 {
        format!("{}s", (ms / 1000.0).floor())
    } else if ms > 100.0 {
        format!("{}ms", ms.trunc())
    } else if ms > 10.0 {
        format!("{:.1}ms", ms)
    } else {
        format!("{:.2}ms", ms)
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
