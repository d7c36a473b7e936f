use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::env;
use std::time::Duration;
use crate::models::*;

/// 默认的 Slack Web API 地址
pub const DEFAULT_BASE_URL: &str = "https://slack.com/api/";

/// 客户端配置，构建后只读
#[derive(Debug, Clone)]
pub struct SlackConfig {
    pub token: String,
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: concat!("SlackRawSDK/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SlackConfig {
    /// 从环境变量读取配置
    ///
    /// - `SLACK_BOT_TOKEN`: 必填
    /// - `SLACK_API_URL`: 可选，覆盖默认地址
    /// - `SLACK_TIMEOUT_SECS`: 可选，请求超时秒数
    pub fn from_env() -> Result<Self, SlackError> {
        let token = env::var("SLACK_BOT_TOKEN")
            .map_err(|_| SlackError::Auth("SLACK_BOT_TOKEN environment variable not set".to_string()))?;

        let mut config = Self {
            token,
            ..Self::default()
        };

        if let Ok(url) = env::var("SLACK_API_URL") {
            config.base_url = url;
        }

        if let Ok(secs) = env::var("SLACK_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|_| SlackError::Params(format!("invalid SLACK_TIMEOUT_SECS: {}", secs)))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

/// 核心客户端，管理 HTTP 客户端和 Bot Token
pub struct SlackClient {
    client: Client,
    config: SlackConfig,
}

impl SlackClient {
    /// 使用完整配置创建客户端
    pub fn with_config(config: SlackConfig) -> Result<Self, SlackError> {
        let mut headers = HeaderMap::new();
        let user_agent: HeaderValue = config
            .user_agent
            .parse()
            .map_err(|_| SlackError::Params(format!("invalid user agent: {}", config.user_agent)))?;
        headers.insert("User-Agent", user_agent);

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| SlackError::Network(e.to_string()))?;

        Ok(SlackClient { client, config })
    }

    /// 使用指定的 token 创建客户端
    pub fn with_token(token: &str) -> Result<Self, SlackError> {
        Self::with_config(SlackConfig {
            token: token.to_string(),
            ..SlackConfig::default()
        })
    }

    /// 从环境变量初始化客户端
    pub fn new() -> Result<Self, SlackError> {
        Self::with_config(SlackConfig::from_env()?)
    }

    pub fn config(&self) -> &SlackConfig {
        &self.config
    }

    pub(crate) fn token(&self) -> &str {
        &self.config.token
    }

    /// 拼接 API 方法的完整地址
    pub fn endpoint(&self, method: &str) -> String {
        let method = method.trim_start_matches('/');
        if self.config.base_url.ends_with('/') {
            format!("{}{}", self.config.base_url, method)
        } else {
            format!("{}/{}", self.config.base_url, method)
        }
    }

    /// 以 JSON 方式 POST 到 Slack API，附带 Bearer token
    pub async fn post_json<B, T>(&self, method: &str, body: &B) -> Result<T, SlackError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post_json_logged(method, body, body).await
    }

    /// 同 `post_json`，但日志中只输出 `logged`，用于请求体中携带 token 的情况
    pub(crate) async fn post_json_logged<B, L, T>(&self, method: &str, body: &B, logged: &L) -> Result<T, SlackError>
    where
        B: Serialize + ?Sized,
        L: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(method);
        let encoded = encode_json(body)?;
        if log::log_enabled!(log::Level::Debug) {
            log::debug!("Sending request to {}: {}", url, encode_json(logged)?);
        }

        let req = self
            .client
            .post(&url)
            .bearer_auth(self.token())
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(encoded);

        let (_, text) = self.send(req).await?;
        decode_envelope(&text)
    }

    /// 以表单方式 POST 到 Slack API，token 放在表单字段中
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        method: &str,
        fields: &[(&str, String)],
    ) -> Result<T, SlackError> {
        let url = self.endpoint(method);
        log::debug!(
            "Sending form request to {}: {:?}",
            url,
            fields.iter().map(|(k, _)| *k).collect::<Vec<_>>()
        );

        let req = self.client.post(&url).form(fields);

        let (_, text) = self.send(req).await?;
        decode_envelope(&text)
    }

    /// 发送请求并读取响应，返回 Content-Type 和响应体
    pub(crate) async fn send(&self, req: RequestBuilder) -> Result<(Option<String>, String), SlackError> {
        let resp = req
            .send()
            .await
            .map_err(|e| SlackError::Network(e.to_string()))?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let response_text = resp
            .text()
            .await
            .map_err(|e| SlackError::Network(e.to_string()))?;

        // 处理 HTTP 错误状态
        if !status.is_success() {
            return Err(SlackError::Http {
                status: status.as_u16(),
                body: response_text,
            });
        }

        Ok((content_type, response_text))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}

pub(crate) fn encode_json<B: Serialize + ?Sized>(body: &B) -> Result<String, SlackError> {
    serde_json::to_string(body).map_err(|e| SlackError::Json(format!("Failed to encode request: {}", e)))
}

/// 解析 envelope 并检查 ok 字段
pub(crate) fn decode_envelope<T: DeserializeOwned>(text: &str) -> Result<T, SlackError> {
    let api_resp: ApiResponse<T> = serde_json::from_str(text)
        .map_err(|e| SlackError::Json(format!("Failed to parse response: {} - Response: {}", e, text)))?;
    api_resp.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_with_base(base_url: &str) -> SlackClient {
        SlackClient::with_config(SlackConfig {
            token: "xoxb-test".to_string(),
            base_url: base_url.to_string(),
            ..SlackConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn joins_endpoint_with_or_without_slash() {
        assert_eq!(
            client_with_base("https://slack.com/api/").endpoint("chat.postMessage"),
            "https://slack.com/api/chat.postMessage"
        );
        assert_eq!(
            client_with_base("http://127.0.0.1:8080/api").endpoint("views.open"),
            "http://127.0.0.1:8080/api/views.open"
        );
    }

    #[test]
    fn default_config_points_at_slack() {
        let config = SlackConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("SlackRawSDK/"));
    }

    #[test]
    fn reads_config_from_env() {
        // 环境变量是进程级共享的，所有分支放在同一个测试中顺序执行
        env::remove_var("SLACK_BOT_TOKEN");
        env::remove_var("SLACK_API_URL");
        env::remove_var("SLACK_TIMEOUT_SECS");
        assert!(matches!(SlackConfig::from_env(), Err(SlackError::Auth(_))));
        assert!(matches!(SlackClient::new(), Err(SlackError::Auth(_))));

        env::set_var("SLACK_BOT_TOKEN", "xoxb-env");
        let config = SlackConfig::from_env().unwrap();
        assert_eq!(config.token, "xoxb-env");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        env::set_var("SLACK_API_URL", "http://127.0.0.1:9000/api");
        env::set_var("SLACK_TIMEOUT_SECS", " 5 ");
        let client = SlackClient::new().unwrap();
        assert_eq!(client.config().base_url, "http://127.0.0.1:9000/api");
        assert_eq!(client.config().timeout, Duration::from_secs(5));
        assert_eq!(client.endpoint("views.open"), "http://127.0.0.1:9000/api/views.open");

        env::set_var("SLACK_TIMEOUT_SECS", "soon");
        assert!(matches!(SlackConfig::from_env(), Err(SlackError::Params(_))));

        env::remove_var("SLACK_BOT_TOKEN");
        env::remove_var("SLACK_API_URL");
        env::remove_var("SLACK_TIMEOUT_SECS");
    }

    #[test]
    fn decode_envelope_reports_garbage_as_json_error() {
        let err = decode_envelope::<ChatPostMessageResponse>("<html>").unwrap_err();
        assert!(matches!(err, SlackError::Json(_)));
    }
}
