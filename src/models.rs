use serde::{Deserialize, Serialize};
use serde_json::Value;

/// API 通用响应结构 (Slack Web API 的 envelope)
///
/// 调用相关的字段直接平铺在顶层，通过 `flatten` 解析到 `data` 中。
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// 是否成功
    pub ok: bool,
    /// 错误码，例如 `invalid_auth`，仅在 ok=false 时存在
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// 非致命警告，例如 `missing_charset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_metadata: Option<ResponseMetadata>,
    /// 具体的数据
    #[serde(flatten)]
    pub data: T,
}

/// 附加的诊断信息
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub messages: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl<T> ApiResponse<T> {
    /// 将 envelope 转换为 Result，ok=false 时返回远端错误码
    pub fn into_result(self) -> Result<T, SlackError> {
        if let Some(warning) = &self.warning {
            log::warn!("Slack API warning: {}", warning);
        }

        if self.ok {
            return Ok(self.data);
        }

        let messages = self
            .response_metadata
            .map(|meta| meta.messages)
            .unwrap_or_default();
        let code = self.error.unwrap_or_else(|| "unknown_error".to_string());
        log::error!("Slack API error: {} {:?}", code, messages);
        Err(SlackError::Api { code, messages })
    }
}

/// chat.postMessage 响应字段
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChatPostMessageResponse {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub ts: String,
    #[serde(default)]
    pub message_ts: String,
    #[serde(default)]
    pub text: String,
}

impl ChatPostMessageResponse {
    /// 优先使用 `ts`，为空时回退到 `message_ts`
    pub fn message_timestamp(&self) -> &str {
        if self.ts.is_empty() {
            &self.message_ts
        } else {
            &self.ts
        }
    }
}

/// 发送消息的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostMessageResult {
    pub channel: String,
    pub timestamp: String,
    pub text: String,
}

impl From<ChatPostMessageResponse> for PostMessageResult {
    fn from(resp: ChatPostMessageResponse) -> Self {
        let timestamp = resp.message_timestamp().to_string();
        Self {
            channel: resp.channel,
            timestamp,
            text: resp.text,
        }
    }
}

/// 视图类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    Modal,
    Home,
    /// 其他类型 (例如 `workflow_step`)，仅出现在响应中
    #[serde(other)]
    Unknown,
}

/// views.* 响应字段
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ViewResponse {
    #[serde(default)]
    pub view: Option<View>,
}

/// Slack 返回的视图对象
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct View {
    pub id: String,
    #[serde(default)]
    pub team_id: String,
    pub r#type: ViewType,
    pub title: Option<Value>,
    #[serde(default)]
    pub blocks: Vec<Value>,
    pub close: Option<Value>,
    pub submit: Option<Value>,
    pub state: Option<Value>,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub private_metadata: String,
    #[serde(default)]
    pub callback_id: String,
    #[serde(default)]
    pub external_id: String,
    pub root_view_id: Option<String>,
    pub previous_view_id: Option<String>,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub bot_id: String,
    #[serde(default)]
    pub clear_on_close: bool,
    #[serde(default)]
    pub notify_on_close: bool,
}

/// Slack SDK 错误类型
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    /// 参数错误，在发起网络请求之前返回
    #[error("Params Error: {0}")]
    Params(String),
    /// 认证错误 (未配置 token)
    #[error("Auth Error: {0}")]
    Auth(String),
    /// 网络错误
    #[error("Network Error: {0}")]
    Network(String),
    /// 非 2xx 的 HTTP 状态
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    /// JSON 编码/解析错误
    #[error("JSON Error: {0}")]
    Json(String),
    /// envelope 中 ok=false
    #[error("Slack API Error: {code}")]
    Api { code: String, messages: Vec<String> },
}

impl SlackError {
    /// 远端返回的原始错误码
    pub fn api_error(&self) -> Option<&str> {
        match self {
            SlackError::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// 是否为认证类错误
    pub fn is_auth_error(&self) -> bool {
        match self {
            SlackError::Auth(_) => true,
            SlackError::Api { code, .. } => matches!(
                code.as_str(),
                "invalid_auth" | "not_authed" | "token_revoked" | "token_expired" | "account_inactive"
            ),
            _ => false,
        }
    }
}
