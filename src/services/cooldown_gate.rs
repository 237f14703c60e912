//! 提交冷却 - 业务能力层
//!
//! `CooldownGate` 只做判断，`CooldownStore` 负责 `.aoc-timeout-day-N` 文件

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};
use crate::models::{Cooldown, Day};

/// 冷却判断
pub struct CooldownGate;

impl CooldownGate {
    /// 冷却存在且尚未到期
    pub fn is_active(cooldown: Option<&Cooldown>, now_ms: i64) -> bool {
        cooldown.is_some_and(|c| now_ms < c.deadline_ms)
    }
}

/// 冷却文件存储
///
/// 每天一个文件，内容为截止时间的毫秒时间戳
pub struct CooldownStore {
    dir: PathBuf,
}

impl CooldownStore {
    pub fn new(workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: workspace_dir.into(),
        }
    }

    pub fn path_for(&self, day: Day) -> PathBuf {
        self.dir.join(format!(".aoc-timeout-day-{}", day.number()))
    }

    /// 读取某天的冷却，文件不存在或内容无法解析时视为没有冷却
    pub async fn load(&self, day: Day) -> AppResult<Option<Cooldown>> {
        let path = self.path_for(day);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(AppError::file(&path, e)),
        };

        match content.trim().parse::<i64>() {
            Ok(deadline_ms) => Ok(Some(Cooldown::until(deadline_ms))),
            Err(_) => {
                warn!("⚠️ 冷却文件内容无效，已忽略: {}", path.display());
                Ok(None)
            }
        }
    }

    /// 写入或删除冷却文件，使磁盘状态与 `cooldown` 一致
    pub async fn sync(&self, day: Day, cooldown: Option<&Cooldown>) -> AppResult<()> {
        let path = self.path_for(day);
        match cooldown {
            Some(c) => {
                debug!("写入冷却文件 {}: {}", path.display(), c.deadline_ms);
                fs::write(&path, c.deadline_ms.to_string())
                    .await
                    .map_err(|e| AppError::file(&path, e))
            }
            None => remove_if_exists(&path).await,
        }
    }
}

async fn remove_if_exists(path: &Path) -> AppResult<()> {
    match fs::remove_file(path).await {
        Ok(()) => {
            debug!("已删除过期的冷却文件 {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::file(path, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_active() {
        let now = 1_000_000;
        assert!(!CooldownGate::is_active(None, now));
        assert!(CooldownGate::is_active(Some(&Cooldown::until(now + 1)), now));
        assert!(!CooldownGate::is_active(Some(&Cooldown::until(now)), now));
        assert!(!CooldownGate::is_active(Some(&Cooldown::until(now - 1)), now));
    }

    #[test]
    fn test_remaining_never_zero() {
        let now = 5_000;
        assert_eq!(Cooldown::until(now + 250).remaining_ms(now), Some(250));
        assert_eq!(Cooldown::until(now).remaining_ms(now), None);
        assert_eq!(Cooldown::until(now - 10).remaining_ms(now), None);
    }

    #[tokio::test]
    async fn test_store_round_trip_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CooldownStore::new(dir.path());
        let day = Day::new(4).unwrap();

        assert_eq!(store.load(day).await.unwrap(), None);

        let cooldown = Cooldown::until(1_700_000_000_000);
        store.sync(day, Some(&cooldown)).await.unwrap();
        assert!(dir.path().join(".aoc-timeout-day-4").exists());
        assert_eq!(store.load(day).await.unwrap(), Some(cooldown));

        store.sync(day, None).await.unwrap();
        assert!(!dir.path().join(".aoc-timeout-day-4").exists());
        // 重复删除不报错
        store.sync(day, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_store_ignores_garbage() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(".aoc-timeout-day-2"), "soon").unwrap();
        let store = CooldownStore::new(dir.path());
        assert_eq!(store.load(Day::new(2).unwrap()).await.unwrap(), None);
    }
}
