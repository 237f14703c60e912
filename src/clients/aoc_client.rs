/// 谜题网站 API 客户端
///
/// 封装提交答案与下载输入两个调用
use std::time::Duration;

use reqwest::header::COOKIE;
use tracing::debug;

use crate::config::Config;
use crate::error::RemoteError;
use crate::models::{Day, Part};

/// 远程服务能力
///
/// 只返回响应正文或归类后的错误，不关心页面含义
#[allow(async_fn_in_trait)]
pub trait RemoteClient {
    /// 提交某一部分的答案，返回响应页面的原始 HTML
    async fn submit_answer(
        &self,
        year: i32,
        day: Day,
        part: Part,
        answer: &str,
    ) -> Result<String, RemoteError>;

    /// 下载某一天的输入
    async fn fetch_input(&self, year: i32, day: Day) -> Result<String, RemoteError>;
}

/// 基于 reqwest 的客户端
pub struct AocClient {
    http: reqwest::Client,
    base_url: String,
    session_key: Option<String>,
}

impl AocClient {
    /// 创建新的客户端
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_key: config.session_key().map(str::to_string),
        })
    }

    pub fn has_session(&self) -> bool {
        self.session_key.is_some()
    }

    fn session_cookie(&self) -> Result<String, RemoteError> {
        self.session_key
            .as_deref()
            .map(|key| format!("session={}", key))
            .ok_or(RemoteError::NoKey)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, RemoteError> {
        let status = response.status().as_u16();
        if let Some(err) = RemoteError::from_status(status) {
            return Err(err);
        }
        Ok(response.text().await?)
    }
}

impl RemoteClient for AocClient {
    async fn submit_answer(
        &self,
        year: i32,
        day: Day,
        part: Part,
        answer: &str,
    ) -> Result<String, RemoteError> {
        let cookie = self.session_cookie()?;
        let url = format!("{}/{}/day/{}/answer", self.base_url, year, day);
        debug!("提交答案: {} level={} answer={}", url, part, answer);

        let level = part.level().to_string();
        let response = self
            .http
            .post(&url)
            .header(COOKIE, cookie)
            .form(&[("level", level.as_str()), ("answer", answer)])
            .send()
            .await?;

        Self::read_body(response).await
    }

    async fn fetch_input(&self, year: i32, day: Day) -> Result<String, RemoteError> {
        let cookie = self.session_cookie()?;
        let url = format!("{}/{}/day/{}/input", self.base_url, year, day);
        debug!("下载输入: {}", url);

        let response = self.http.get(&url).header(COOKIE, cookie).send().await?;

        Self::read_body(response).await
    }
}
