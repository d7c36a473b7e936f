//! chat.postMessage 的高度可定制实现
use serde::Serialize;
use serde_json::Value;
use crate::client::{encode_json, SlackClient};
use crate::models::*;

const CHAT_POST_MESSAGE: &str = "chat.postMessage";

/// 消息的发送方式
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MessageTransport {
    /// 默认地址，JSON 请求体，token 写入请求体和 Bearer 头
    #[default]
    Json,
    /// 默认地址，表单请求体 (旧版接口)
    Form,
    /// 调用方提供的 Webhook 地址，不携带 token
    Webhook(String),
}

/// chat.postMessage 参数
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostMessageArgs {
    #[serde(skip)]
    pub transport: MessageTransport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_user: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_emoji: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_names: Option<bool>,
    #[serde(rename = "mrkdwn", skip_serializing_if = "Option::is_none")]
    pub markdown: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_broadcast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_media: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl PostMessageArgs {
    pub fn new(channel: &str, text: &str) -> Self {
        Self {
            channel: Some(channel.to_string()),
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    /// 改为发送到 Webhook 地址
    pub fn webhook(mut self, url: &str) -> Self {
        self.transport = MessageTransport::Webhook(url.to_string());
        self
    }

    /// 改为表单编码
    pub fn form_encoded(mut self) -> Self {
        self.transport = MessageTransport::Form;
        self
    }

    /// 在线程中回复
    pub fn in_thread(mut self, thread_ts: &str) -> Self {
        self.thread_ts = Some(thread_ts.to_string());
        self
    }

    pub fn blocks(mut self, blocks: Vec<Value>) -> Self {
        self.blocks = blocks;
        self
    }

    pub fn attachments(mut self, attachments: Vec<Value>) -> Self {
        self.attachments = attachments;
        self
    }

    /// 表单编码的字段，attachments/blocks 以 JSON 字符串形式传递
    pub fn form_fields(&self, token: &str) -> Result<Vec<(&'static str, String)>, SlackError> {
        let mut fields = vec![("token", token.to_string())];

        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(v) = value {
                fields.push((key, v));
            }
        };
        push("channel", self.channel.clone());
        push("text", self.text.clone());
        push("as_user", self.as_user.map(|b| b.to_string()));
        push("icon_emoji", self.icon_emoji.clone());
        push("icon_url", self.icon_url.clone());
        push("link_names", self.link_names.map(|b| b.to_string()));
        push("mrkdwn", self.markdown.map(|b| b.to_string()));
        push("parse", self.parse.clone());
        push("reply_broadcast", self.reply_broadcast.map(|b| b.to_string()));
        push("thread_ts", self.thread_ts.clone());
        push("unfurl_links", self.unfurl_links.map(|b| b.to_string()));
        push("unfurl_media", self.unfurl_media.map(|b| b.to_string()));
        push("username", self.username.clone());

        if !self.attachments.is_empty() {
            fields.push(("attachments", encode_json(&self.attachments)?));
        }
        if !self.blocks.is_empty() {
            fields.push(("blocks", encode_json(&self.blocks)?));
        }

        Ok(fields)
    }
}

/// 请求体，token 为 None 时不序列化
#[derive(Serialize)]
struct Authed<'a, T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(flatten)]
    args: &'a T,
}

impl SlackClient {
    /// 调用 chat.postMessage，按 `args.transport` 选择发送方式
    pub async fn post_message(&self, args: &PostMessageArgs) -> Result<PostMessageResult, SlackError> {
        let response: ChatPostMessageResponse = match &args.transport {
            MessageTransport::Webhook(url) => {
                let body = Authed { token: None, args };
                self.post_webhook(url, &body).await?
            }
            MessageTransport::Json => {
                let body = Authed {
                    token: Some(self.token()),
                    args,
                };
                self.post_json_logged(CHAT_POST_MESSAGE, &body, args).await?
            }
            MessageTransport::Form => {
                let fields = args.form_fields(self.token())?;
                self.post_form(CHAT_POST_MESSAGE, &fields).await?
            }
        };

        Ok(response.into())
    }

    /// 发送纯文本消息
    pub async fn send_text(&self, channel: &str, text: &str) -> Result<PostMessageResult, SlackError> {
        self.post_message(&PostMessageArgs::new(channel, text)).await
    }
}
