use std::path::Path;

use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 当前目录没有 `.aoc.json`
    #[error("工作区尚未初始化，请先运行 `aoc init`")]
    NotInitialized,

    /// 重复初始化
    #[error("工作区已经初始化: {path}")]
    AlreadyInitialized { path: String },

    /// 目录结构不符合预期
    #[error("工作区结构异常: {0}")]
    MalformedWorkspace(String),

    /// 日期参数非法
    #[error("无效的日期: {0} (应为 1-25)")]
    InvalidDay(String),

    /// 记录文件无法解析
    #[error("记录文件解析失败 ({path}): {source}")]
    Record {
        path: String,
        source: serde_json::Error,
    },

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    File {
        path: String,
        source: std::io::Error,
    },

    /// 远程服务错误
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// 解题程序找不到输入文件
    #[error("未找到输入文件: {path}，请传入输入文件路径，或先运行 `aoc download`")]
    MissingInput { path: String },

    /// 解题程序无法启动或运行
    #[error("运行解题程序失败: {0}")]
    Run(String),

    /// 正则表达式编译失败
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

/// 远程服务错误
///
/// HTTP 状态码按含义归类，网络层错误单独保留。
#[derive(Debug, Error)]
pub enum RemoteError {
    /// 会话密钥缺失或过短，不会发起请求
    #[error("未找到有效的会话密钥，请设置环境变量 AOC_SESSION_KEY")]
    NoKey,

    /// 400 / 500：通常是会话密钥失效
    #[error("会话密钥可能无效 (HTTP {status})")]
    InvalidSession { status: u16 },

    /// 404：题目尚未解锁
    #[error("该题目尚未解锁 (HTTP 404)")]
    NotUnlocked,

    /// 其它 5xx
    #[error("服务器错误，请稍后重试 (HTTP {status})")]
    Server { status: u16 },

    #[error("意外的响应状态 (HTTP {status})")]
    UnexpectedStatus { status: u16 },

    /// 连接、超时、DNS 等
    #[error("网络请求失败: {0}")]
    Network(#[from] reqwest::Error),
}

impl RemoteError {
    /// 将非 2xx 状态码归类，2xx 返回 `None`
    pub fn from_status(status: u16) -> Option<Self> {
        match status {
            200..=299 => None,
            400 | 500 => Some(RemoteError::InvalidSession { status }),
            404 => Some(RemoteError::NotUnlocked),
            501..=599 => Some(RemoteError::Server { status }),
            _ => Some(RemoteError::UnexpectedStatus { status }),
        }
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读写错误
    pub fn file(path: &Path, source: std::io::Error) -> Self {
        AppError::File {
            path: path.display().to_string(),
            source,
        }
    }

    /// 创建记录解析错误
    pub fn record(path: &Path, source: serde_json::Error) -> Self {
        AppError::Record {
            path: path.display().to_string(),
            source,
        }
    }
}

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
