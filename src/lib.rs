pub mod chat;
pub mod client;
pub mod models;
pub mod views;
pub mod webhook;

// 重新导出主要类型以便外部使用
pub use chat::{MessageTransport, PostMessageArgs};
pub use client::{SlackClient, SlackConfig, DEFAULT_BASE_URL};
pub use models::*;
pub use views::{plain_text, OpenViewArgs, PublishViewArgs, PushViewArgs, UpdateViewArgs, ViewDefinition};
pub use webhook::parse_webhook_reply;
