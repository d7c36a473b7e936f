/// 发送消息示例
///
/// 本示例展示三种发送方式：
/// - JSON (默认)
/// - 表单编码
/// - Incoming Webhook (设置 SLACK_WEBHOOK_URL 时)

use serde_json::json;
use slack_raw_sdk::{PostMessageArgs, SlackClient};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::init();

    println!("=== Slack 发送消息示例 ===");

    // 自动从环境变量读取 SLACK_BOT_TOKEN
    let client = SlackClient::new()?;
    let channel = env::var("SLACK_CHANNEL").unwrap_or_else(|_| "#general".to_string());

    println!("\n1. JSON 方式发送...");
    let sent = client.send_text(&channel, "你好！这是来自 Rust 的测试消息。").await?;
    println!("频道: {}  时间戳: {}", sent.channel, sent.timestamp);

    println!("\n2. 在线程中以表单方式回复...");
    let reply = PostMessageArgs::new(&channel, "线程回复")
        .in_thread(&sent.timestamp)
        .blocks(vec![json!({
            "type": "section",
            "text": {"type": "mrkdwn", "text": "*线程回复* 带有 block"}
        })])
        .form_encoded();
    match client.post_message(&reply).await {
        Ok(result) => println!("回复成功: {}", result.timestamp),
        Err(e) => println!("回复失败: {}", e),
    }

    println!("\n3. Webhook 方式发送...");
    match env::var("SLACK_WEBHOOK_URL") {
        Ok(url) => {
            let args = PostMessageArgs::new(&channel, "来自 Webhook 的消息").webhook(&url);
            client.post_message(&args).await?;
            println!("Webhook 发送成功");
        }
        Err(_) => println!("跳过 - 未设置 SLACK_WEBHOOK_URL"),
    }

    Ok(())
}
