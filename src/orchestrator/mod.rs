//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 每个命令一次性读取记录、调用下层能力、最后写回记录。
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (init / download / run / submit)
//!     ↓
//! workflow::SubmissionFlow (一次提交的状态流转)
//!     ↓
//! services (分类 / 冷却 / 记录 / 运行)
//!     ↓
//! clients (远程服务)
//! ```

pub mod app;

pub use app::App;
