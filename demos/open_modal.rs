/// Modal 视图示例
///
/// trigger_id 只能从交互事件中获得，有效期 3 秒，
/// 这里从环境变量 SLACK_TRIGGER_ID 读取。

use serde_json::json;
use slack_raw_sdk::{OpenViewArgs, SlackClient, UpdateViewArgs, ViewDefinition};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    let client = SlackClient::new()?;
    let trigger_id = match env::var("SLACK_TRIGGER_ID") {
        Ok(id) => id,
        Err(_) => {
            println!("请设置 SLACK_TRIGGER_ID");
            return Ok(());
        }
    };

    let view = ViewDefinition::modal(
        "反馈",
        vec![json!({
            "type": "input",
            "block_id": "feedback",
            "label": {"type": "plain_text", "text": "你的建议"},
            "element": {"type": "plain_text_input", "action_id": "value", "multiline": true}
        })],
    )
    .submit("提交")
    .close("取消")
    .callback_id("feedback-modal");

    let opened = client
        .open_view(&OpenViewArgs {
            trigger_id,
            view: view.clone(),
        })
        .await?;
    println!("已打开视图: {} (hash: {})", opened.id, opened.hash);

    let mut update = UpdateViewArgs::by_view_id(&opened.id, view.private_metadata("updated"));
    update.hash = Some(opened.hash);
    let updated = client.update_view(&update).await?;
    println!("已更新视图: {}", updated.id);

    Ok(())
}
