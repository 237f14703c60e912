//! # AoC Runner
//!
//! 谜题网站的工作区脚手架与答案提交工具
//!
//! ## 架构设计
//!
//! ### ① 远程服务层（Clients）
//! - `clients/` - 只负责 HTTP 调用，返回原始页面或归类后的错误
//! - `AocClient` - 提交答案、下载输入
//!
//! ### ② 业务能力层（Services）
//! - `ResponseClassifier` - 把提交结果页面翻译成结果类型
//! - `CooldownGate` / `CooldownStore` - 提交冷却的判断与持久化
//! - `RunRecordStore` - `.aoc.json` 的读写
//! - `SolutionRunner` - 以子进程运行解题程序
//!
//! ### ③ 流程层（Workflow）
//! - `SubmissionFlow` - 一次提交的状态流转，不做文件读写
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 每个命令：读取记录 → 调用下层 → 写回记录
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod solution;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{AocClient, RemoteClient};
pub use config::Config;
pub use error::{AppError, AppResult, RemoteError};
pub use models::{ClassifiedOutcome, Cooldown, Day, DayRecord, OutcomeKind, Part, PartRecord, RunConfig};
pub use orchestrator::App;
pub use services::{CooldownGate, ResponseClassifier, RunRecordStore};
pub use workflow::{PartAction, SubmissionFlow, SubmitCtx, SubmitReport};
