use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use aoc_runner::models::{Day, DaySelector};
use aoc_runner::utils::logging;
use aoc_runner::{App, Config};

#[derive(Parser)]
#[command(name = "aoc", version, about = "谜题网站的工作区脚手架与答案提交工具")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// 初始化工作区；指定日期时初始化该天并下载输入
    #[command(alias = "i")]
    Init {
        day: Option<DaySelector>,
        /// 工作区年份，仅在不指定日期时有效
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// 运行某一天的解题程序，`all` 依次运行全部天数
    #[command(alias = "d")]
    Run {
        day: DaySelector,
        /// 两天之间的间隔（毫秒）
        #[arg(short, long)]
        timeout: Option<u64>,
    },
    /// 下载某一天的输入
    Download { day: DaySelector },
    /// 提交某一天的答案
    #[command(alias = "s")]
    Submit { day: Day },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(config.verbose_logging);

    let app = App::initialize(config)?;

    match cli.command {
        Command::Init { day: None, year } => app.init(year).await?,
        Command::Init { day: Some(day), .. } => app.init_day(day).await?,
        Command::Run { day, timeout } => app.run(day, timeout).await?,
        Command::Download { day } => app.download(day).await?,
        Command::Submit { day } => {
            let report = app.submit(day).await?;
            if report.has_failure() {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
