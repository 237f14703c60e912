//! 运行记录存储 - 业务能力层
//!
//! 读写工作区根目录下的 `.aoc.json`

use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::RunConfig;

/// 记录文件名
pub const RECORD_FILE: &str = ".aoc.json";

/// 运行记录存储
///
/// 每个命令开始时重新读取，结束时整体写回；
/// 不处理多进程并发写入（后写者覆盖）
pub struct RunRecordStore {
    path: PathBuf,
}

impl RunRecordStore {
    pub fn new(workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: workspace_dir.into().join(RECORD_FILE),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::try_exists(&self.path).await.unwrap_or(false)
    }

    /// 读取记录，文件不存在时返回 `None`（工作区未初始化）
    pub async fn load(&self) -> AppResult<Option<RunConfig>> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::file(&self.path, e)),
        };

        // 旧版工具在未初始化时会写入 null
        let config: Option<RunConfig> =
            serde_json::from_str(&content).map_err(|e| AppError::record(&self.path, e))?;

        if let Some(config) = &config {
            debug!("已读取 {} 年的记录，共 {} 颗星", config.year, config.stars());
        }
        Ok(config)
    }

    /// 读取记录，未初始化视为错误
    pub async fn load_required(&self) -> AppResult<RunConfig> {
        self.load().await?.ok_or(AppError::NotInitialized)
    }

    /// 写回记录：先写临时文件再重命名，避免中途退出留下半个文件
    pub async fn save(&self, config: &RunConfig) -> AppResult<()> {
        let json = serde_json::to_string_pretty(config).map_err(|e| AppError::record(&self.path, e))?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json)
            .await
            .map_err(|e| AppError::file(&tmp, e))?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| AppError::file(&self.path, e))?;

        debug!("记录已保存: {}", self.path.display());
        Ok(())
    }
}
