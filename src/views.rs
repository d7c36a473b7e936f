//! views.open / views.update / views.push / views.publish
use serde::Serialize;
use serde_json::{json, Value};
use crate::client::SlackClient;
use crate::models::*;

/// 构造 plain_text 文本对象，用于 title/submit/close
pub fn plain_text(text: &str) -> Value {
    json!({ "type": "plain_text", "text": text })
}

/// 视图定义
#[derive(Debug, Clone, Serialize)]
pub struct ViewDefinition {
    pub r#type: ViewType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    pub blocks: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submit: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_metadata: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_on_close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_on_close: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl ViewDefinition {
    /// 创建 modal 视图
    pub fn modal(title: &str, blocks: Vec<Value>) -> Self {
        Self {
            r#type: ViewType::Modal,
            title: Some(plain_text(title)),
            blocks,
            close: None,
            submit: None,
            private_metadata: None,
            callback_id: None,
            clear_on_close: None,
            notify_on_close: None,
            external_id: None,
        }
    }

    /// 创建 App Home 视图
    pub fn home(blocks: Vec<Value>) -> Self {
        Self {
            r#type: ViewType::Home,
            title: None,
            ..Self::modal("", blocks)
        }
    }

    pub fn submit(mut self, text: &str) -> Self {
        self.submit = Some(plain_text(text));
        self
    }

    pub fn close(mut self, text: &str) -> Self {
        self.close = Some(plain_text(text));
        self
    }

    pub fn callback_id(mut self, id: &str) -> Self {
        self.callback_id = Some(id.to_string());
        self
    }

    pub fn private_metadata(mut self, metadata: &str) -> Self {
        self.private_metadata = Some(metadata.to_string());
        self
    }

    pub fn external_id(mut self, id: &str) -> Self {
        self.external_id = Some(id.to_string());
        self
    }

    fn validate(&self) -> Result<(), SlackError> {
        if self.r#type == ViewType::Unknown {
            return Err(SlackError::Params("view type must be modal or home".to_string()));
        }
        if self.r#type == ViewType::Modal && self.title.is_none() {
            return Err(SlackError::Params("modal view requires a title".to_string()));
        }
        Ok(())
    }
}

/// views.open 参数
#[derive(Debug, Clone, Serialize)]
pub struct OpenViewArgs {
    pub trigger_id: String,
    pub view: ViewDefinition,
}

/// views.push 参数
#[derive(Debug, Clone, Serialize)]
pub struct PushViewArgs {
    pub trigger_id: String,
    pub view: ViewDefinition,
}

/// views.update 参数，external_id 与 view_id 必须且只能提供一个
#[derive(Debug, Clone, Serialize)]
pub struct UpdateViewArgs {
    pub view: ViewDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_id: Option<String>,
    /// 用于防止并发更新的 hash
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl UpdateViewArgs {
    pub fn by_view_id(view_id: &str, view: ViewDefinition) -> Self {
        Self {
            view,
            external_id: None,
            view_id: Some(view_id.to_string()),
            hash: None,
        }
    }

    pub fn by_external_id(external_id: &str, view: ViewDefinition) -> Self {
        Self {
            view,
            external_id: Some(external_id.to_string()),
            view_id: None,
            hash: None,
        }
    }

    fn validate(&self) -> Result<(), SlackError> {
        let has_external = self.external_id.as_deref().is_some_and(|s| !s.is_empty());
        let has_view_id = self.view_id.as_deref().is_some_and(|s| !s.is_empty());
        match (has_external, has_view_id) {
            (false, false) => Err(SlackError::Params(
                "either external_id or view_id is required".to_string(),
            )),
            (true, true) => Err(SlackError::Params(
                "external_id and view_id are mutually exclusive".to_string(),
            )),
            _ => self.view.validate(),
        }
    }
}

/// views.publish 参数，只接受 home 视图
#[derive(Debug, Clone, Serialize)]
pub struct PublishViewArgs {
    pub user_id: String,
    pub view: ViewDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

fn require_non_empty(name: &str, value: &str) -> Result<(), SlackError> {
    if value.is_empty() {
        return Err(SlackError::Params(format!("{} is required", name)));
    }
    Ok(())
}

impl SlackClient {
    /// 打开 modal 视图
    pub async fn open_view(&self, args: &OpenViewArgs) -> Result<View, SlackError> {
        require_non_empty("trigger_id", &args.trigger_id)?;
        args.view.validate()?;
        self.post_view("views.open", args).await
    }

    /// 在当前 modal 之上压入新视图
    pub async fn push_view(&self, args: &PushViewArgs) -> Result<View, SlackError> {
        require_non_empty("trigger_id", &args.trigger_id)?;
        args.view.validate()?;
        self.post_view("views.push", args).await
    }

    /// 更新已存在的视图
    pub async fn update_view(&self, args: &UpdateViewArgs) -> Result<View, SlackError> {
        args.validate()?;
        self.post_view("views.update", args).await
    }

    /// 发布用户的 App Home
    pub async fn publish_view(&self, args: &PublishViewArgs) -> Result<View, SlackError> {
        require_non_empty("user_id", &args.user_id)?;
        if args.view.r#type != ViewType::Home {
            return Err(SlackError::Params("views.publish requires a home view".to_string()));
        }
        self.post_view("views.publish", args).await
    }

    async fn post_view<B: Serialize>(&self, method: &str, args: &B) -> Result<View, SlackError> {
        let resp: ViewResponse = self.post_json(method, args).await?;
        resp.view
            .ok_or_else(|| SlackError::Json("Response view is null".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_payload_nests_view() {
        let args = OpenViewArgs {
            trigger_id: "12345.98765.abcd2358fdea".to_string(),
            view: ViewDefinition::modal("Quick poll", vec![json!({"type": "divider"})])
                .submit("Vote")
                .callback_id("poll"),
        };
        let body = serde_json::to_value(&args).unwrap();
        assert_eq!(body["trigger_id"], "12345.98765.abcd2358fdea");
        assert_eq!(body["view"]["type"], "modal");
        assert_eq!(body["view"]["title"]["text"], "Quick poll");
        assert_eq!(body["view"]["submit"]["type"], "plain_text");
        assert!(body["view"].get("close").is_none());
    }

    #[test]
    fn update_requires_exactly_one_identifier() {
        let view = ViewDefinition::modal("t", Vec::new());
        let mut args = UpdateViewArgs::by_view_id("V1", view);
        assert!(args.validate().is_ok());

        args.view_id = None;
        assert!(matches!(args.validate(), Err(SlackError::Params(_))));

        args.view_id = Some("V1".to_string());
        args.external_id = Some("ext-1".to_string());
        assert!(matches!(args.validate(), Err(SlackError::Params(_))));
    }

    #[test]
    fn home_view_has_no_title() {
        let view = ViewDefinition::home(Vec::new());
        assert!(view.validate().is_ok());
        let body = serde_json::to_value(&view).unwrap();
        assert_eq!(body["type"], "home");
        assert!(body.get("title").is_none());
    }

    #[test]
    fn modal_without_title_is_rejected() {
        let mut view = ViewDefinition::modal("t", Vec::new());
        view.title = None;
        assert!(matches!(view.validate(), Err(SlackError::Params(_))));

        view.r#type = ViewType::Unknown;
        assert!(matches!(view.validate(), Err(SlackError::Params(_))));
    }
}
