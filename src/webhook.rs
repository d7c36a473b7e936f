//! Incoming Webhook 支持
//!
//! Webhook 地址由调用方提供，不携带 Bearer token。
//! 其响应通常是纯文本 `ok`，少数情况下是 JSON envelope。
use reqwest::header::CONTENT_TYPE;
use serde::{de::DeserializeOwned, Serialize};
use crate::client::{decode_envelope, encode_json, SlackClient};
use crate::models::*;

impl SlackClient {
    /// 向调用方提供的 Webhook 地址 POST JSON，不注入任何凭证
    pub async fn post_webhook<B, T>(&self, url: &str, body: &B) -> Result<T, SlackError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        if url.is_empty() {
            return Err(SlackError::Params("webhook url is empty".to_string()));
        }

        let encoded = encode_json(body)?;
        log::debug!("Sending webhook request: {}", encoded);

        let req = self
            .http()
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(encoded);

        let (content_type, text) = self.send(req).await?;
        parse_webhook_reply(content_type.as_deref(), &text)
    }
}

/// 按 Content-Type 解析 Webhook 响应
pub fn parse_webhook_reply<T>(content_type: Option<&str>, body: &str) -> Result<T, SlackError>
where
    T: DeserializeOwned + Default,
{
    let is_json = content_type
        .map(|ct| ct.trim_start().to_ascii_lowercase().starts_with("application/json"))
        .unwrap_or(false);

    if is_json {
        return decode_envelope(body);
    }

    match body.trim() {
        "ok" => Ok(T::default()),
        "" => Err(SlackError::Api {
            code: "empty_response".to_string(),
            messages: Vec::new(),
        }),
        other => {
            log::error!("Webhook 返回错误: {}", other);
            Err(SlackError::Api {
                code: other.to_string(),
                messages: Vec::new(),
            })
        }
    }
}
