use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use tokio::fs;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::clients::{AocClient, RemoteClient};
use crate::config::Config;
use crate::error::{AppError, RemoteError};
use crate::models::{Day, DaySelector, OutcomeKind, Part, RunConfig};
use crate::services::{CooldownStore, ResponseClassifier, RunRecordStore, SolutionRunner};
use crate::utils::logging::{log_startup, ms_fixed};
use crate::workflow::{PartAction, SubmissionFlow, SubmitCtx, SubmitReport};

/// 应用主结构
///
/// 持有配置与各项服务，每个命令对应一个方法
pub struct App {
    config: Config,
    store: RunRecordStore,
    cooldowns: CooldownStore,
    client: AocClient,
    classifier: ResponseClassifier,
    runner: SolutionRunner,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let client = AocClient::new(&config).context("无法创建 HTTP 客户端")?;
        Ok(Self {
            store: RunRecordStore::new(&config.workspace_dir),
            cooldowns: CooldownStore::new(&config.workspace_dir),
            classifier: ResponseClassifier::new()?,
            runner: SolutionRunner::new(&config)?,
            client,
            config,
        })
    }

    /// 初始化工作区：写入空记录并创建 `src/`
    pub async fn init(&self, year: Option<i32>) -> Result<()> {
        log_startup("init", year);

        if self.store.exists().await {
            return Err(AppError::AlreadyInitialized {
                path: self.store.path().display().to_string(),
            }
            .into());
        }

        let year = year.unwrap_or_else(|| chrono::Local::now().year());
        let src = self.config.workspace_dir.join("src");
        fs::create_dir_all(&src)
            .await
            .with_context(|| format!("无法创建目录: {}", src.display()))?;

        self.store.save(&RunConfig::new(year)).await?;

        info!("✓ 已初始化 {} 年的工作区: {}", year, self.config.workspace_dir.display());
        info!("💡 使用 `aoc init <day>` 创建某一天的目录并下载输入");
        Ok(())
    }

    /// 初始化某一天：创建 `src/dayNN` 并下载输入
    pub async fn init_day(&self, selector: DaySelector) -> Result<()> {
        let day = single_day(selector)?;
        let record = self.store.load_required().await?;
        log_startup("init", Some(record.year));

        self.ensure_src_dir()?;

        let dir = self.runner.day_dir(day);
        if dir.is_dir() {
            let mut entries = fs::read_dir(&dir).await?;
            if entries.next_entry().await?.is_some() {
                bail!(
                    "第 {} 天的文件已存在，如需下载输入请使用 `aoc download {}`",
                    day,
                    day
                );
            }
            info!("正在为第 {} 天创建文件...", day);
        } else {
            info!("正在为第 {} 天生成目录结构...", day);
            fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("无法创建目录: {}", dir.display()))?;
        }

        match self.download_into(record.year, day).await {
            Ok(()) => Ok(()),
            Err(e) => match e.downcast_ref::<RemoteError>() {
                Some(RemoteError::NoKey) => {
                    warn!("⚠️ {}", RemoteError::NoKey);
                    warn!("目录已创建，设置密钥后运行 `aoc download {}`", day);
                    Ok(())
                }
                _ => Err(e),
            },
        }
    }

    /// 下载某一天的输入，已存在的非空输入不会重复下载
    pub async fn download(&self, selector: DaySelector) -> Result<()> {
        let day = match selector {
            DaySelector::All => {
                error!("❌ 不能一次下载全部天数");
                info!("为减轻服务器负担，请逐天下载");
                bail!(AppError::InvalidDay("all".to_string()));
            }
            DaySelector::Single(day) => day,
        };
        let record = self.store.load_required().await?;
        log_startup("download", Some(record.year));

        self.ensure_src_dir()?;
        let dir = self.runner.day_dir(day);
        if !dir.is_dir() {
            bail!(
                "第 {} 天的目录尚未创建，请先运行 `aoc init {}`",
                day,
                day
            );
        }

        self.download_into(record.year, day).await
    }

    /// 运行某一天或全部天数的解题程序，并记录答案和耗时
    pub async fn run(&self, selector: DaySelector, delay_ms: Option<u64>) -> Result<()> {
        let mut record = self.store.load_required().await?;
        log_startup("run", Some(record.year));

        match selector {
            DaySelector::Single(day) => {
                if !self.runner.has_day(day) {
                    bail!(
                        "未找到第 {} 天的文件，请先运行 `aoc init {}`",
                        day,
                        day
                    );
                }
                self.run_day(&mut record, day).await?;
            }
            DaySelector::All => {
                let delay = Duration::from_millis(delay_ms.unwrap_or(self.config.day_delay_ms));
                let days: Vec<Day> = Day::all().filter(|d| self.runner.has_day(*d)).collect();
                info!("📋 找到 {} 天的解题程序", days.len());

                for (i, day) in days.iter().enumerate() {
                    if i > 0 {
                        sleep(delay).await;
                    }
                    info!("▶ 正在运行第 {} 天...", day.padded());
                    if let Err(e) = self.run_day(&mut record, *day).await {
                        error!("❌ 第 {} 天运行失败: {}", day, e);
                    }
                }
            }
        }

        self.store.save(&record).await?;
        Ok(())
    }

    /// 提交某一天的答案
    pub async fn submit(&self, day: Day) -> Result<SubmitReport> {
        let mut record = self.store.load_required().await?;
        log_startup("submit", Some(record.year));

        let ctx = SubmitCtx::new(record.year, day);
        let day_record = record
            .day(day)
            .cloned()
            .ok_or_else(|| AppError::MalformedWorkspace(format!("记录中缺少第 {} 天", day)))?;
        let cooldown = self.cooldowns.load(day).await?;
        let now_ms = chrono::Utc::now().timestamp_millis();

        let flow = SubmissionFlow::new(&self.client, &self.classifier);
        let report = flow.try_submit(&ctx, &day_record, cooldown, now_ms).await;

        for (part, action) in &report.actions {
            log_action(&ctx, *part, action);
        }

        if report.record != day_record {
            if let Some(slot) = record.day_mut(day) {
                *slot = report.record.clone();
            }
            self.store.save(&record).await?;
        }
        if report.cooldown != cooldown {
            self.cooldowns.sync(day, report.cooldown.as_ref()).await?;
        }

        info!("⭐ 当前共 {} 颗星", record.stars());
        Ok(report)
    }

    async fn run_day(&self, record: &mut RunConfig, day: Day) -> Result<()> {
        let outcome = self.runner.run(day).await?;
        let day = outcome.day;

        if !outcome.success {
            warn!("⚠️ 第 {} 天的解题程序异常退出", day);
        }
        if outcome.parts.is_empty() {
            warn!("⚠️ 第 {} 天没有输出任何答案 (格式: `Part 1 (in 1.23ms): answer`)", day);
            if !outcome.success {
                bail!("第 {} 天运行失败", day);
            }
        }
        for run in &outcome.parts {
            info!(
                "第 {} 天 第 {} 部分 (耗时 {}): {}",
                day,
                run.part,
                ms_fixed(run.time_ms),
                run.answer
            );
        }
        info!("总耗时: {}", ms_fixed(outcome.elapsed_ms));

        if let Some(slot) = record.day_mut(day) {
            let next = outcome.apply_to(slot);
            *slot = next;
        }
        Ok(())
    }

    async fn download_into(&self, year: i32, day: Day) -> Result<()> {
        let file = self.runner.day_dir(day).join("input.txt");
        if let Ok(existing) = fs::read_to_string(&file).await {
            if !existing.is_empty() {
                warn!("⚠️ 输入已下载: {}", file.display());
                info!("如需重新下载，请先删除该文件");
                return Ok(());
            }
        }

        if !self.client.has_session() {
            return Err(RemoteError::NoKey.into());
        }

        info!("📥 正在下载第 {} 天的输入...", day);
        let input = self.client.fetch_input(year, day).await?;
        fs::write(&file, input)
            .await
            .with_context(|| format!("无法写入文件: {}", file.display()))?;

        info!("✓ 第 {} 天的输入下载成功", day.padded());
        Ok(())
    }

    fn ensure_src_dir(&self) -> Result<()> {
        let src = self.config.workspace_dir.join("src");
        if !src.is_dir() {
            return Err(AppError::MalformedWorkspace(format!("缺少目录 {}", src.display())).into());
        }
        Ok(())
    }
}

fn single_day(selector: DaySelector) -> Result<Day> {
    match selector {
        DaySelector::Single(day) => Ok(day),
        DaySelector::All => {
            error!("❌ 不能一次初始化全部天数");
            info!("为减轻服务器负担，请逐天初始化");
            bail!(AppError::InvalidDay("all".to_string()))
        }
    }
}

// ========== 日志辅助函数 ==========

fn log_action(ctx: &SubmitCtx, part: Part, action: &PartAction) {
    match action {
        PartAction::MissingLocalResult => {
            warn!("{} ⚠️ 第 {} 部分还没有运行结果", ctx, part);
            info!("请先运行 `aoc run {}`", ctx.day);
        }
        PartAction::AlreadySolved => info!("{} ✅ 第 {} 部分已经解决", ctx, part),
        PartAction::CooldownActive { remaining_ms } => {
            error!("{} ❌ 现在还不能提交", ctx);
            info!("还需等待 {}", ms_fixed(*remaining_ms as f64));
        }
        PartAction::DuplicateAttempt { answer } => {
            warn!("{} ⚠️ 第 {} 部分的答案 {} 之前已被判定为错误，未提交", ctx, part, answer);
        }
        PartAction::NoKey => error!("{} ❌ {}", ctx, RemoteError::NoKey),
        PartAction::SkippedDoubleSubmit => {
            info!("{} 跳过第 {} 部分，避免重复提交", ctx, part)
        }
        PartAction::TransportFailed { error, .. } => {
            error!("{} ❌ 提交第 {} 部分时出错: {}", ctx, part, error)
        }
        PartAction::Submitted { outcome, .. } => {
            if let Some(wait) = outcome.wait_ms() {
                error!("{} ❌ 现在还不能提交", ctx);
                info!("需要等待 {}", ms_fixed(wait as f64));
            }
            match outcome.kind {
                OutcomeKind::PartSolved => info!("{} ✅ 第 {} 部分回答正确", ctx, part),
                OutcomeKind::PartWrong => warn!("{} ❌ 第 {} 部分答案不正确", ctx, part),
                OutcomeKind::TooSoon => warn!("{} ⚠️ 暂时还不能提交第 {} 部分", ctx, part),
                OutcomeKind::Locked => {
                    warn!("{} ⚠️ 第 {} 部分已锁定或已完成", ctx, part)
                }
                OutcomeKind::Error => {
                    error!("{} ❌ 提交第 {} 部分时发生错误", ctx, part)
                }
            }
        }
    }
}
