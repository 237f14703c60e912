use std::path::PathBuf;

/// 会话密钥的最短长度，更短的值视为未配置
pub const MIN_SESSION_KEY_LEN: usize = 96;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 工作区根目录（`.aoc.json` 所在目录）
    pub workspace_dir: PathBuf,
    /// 会话密钥（session cookie）
    pub session_key: String,
    /// 远程服务地址
    pub base_url: String,
    /// 运行全部天数时，两天之间的间隔（毫秒）
    pub day_delay_ms: u64,
    /// 运行某一天解题程序的命令，`{day}` 替换为补零后的日期
    pub run_command: String,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_dir: PathBuf::from("."),
            session_key: String::new(),
            base_url: "https://adventofcode.com".to_string(),
            day_delay_ms: 500,
            run_command: "cargo run --release --quiet --bin day{day}".to_string(),
            request_timeout_secs: 30,
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            workspace_dir: std::env::var("AOC_WORKSPACE").map(PathBuf::from).unwrap_or(default.workspace_dir),
            session_key: std::env::var("AOC_SESSION_KEY").map(|v| v.trim().to_string()).unwrap_or(default.session_key),
            base_url: std::env::var("AOC_BASE_URL").unwrap_or(default.base_url),
            day_delay_ms: std::env::var("AOC_DAY_DELAY_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.day_delay_ms),
            run_command: std::env::var("AOC_RUN_COMMAND").unwrap_or(default.run_command),
            request_timeout_secs: std::env::var("AOC_REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 有效的会话密钥：存在且长度不少于 96
    pub fn session_key(&self) -> Option<&str> {
        if self.session_key.len() >= MIN_SESSION_KEY_LEN {
            Some(&self.session_key)
        } else {
            None
        }
    }
}
