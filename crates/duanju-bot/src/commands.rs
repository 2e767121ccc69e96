//! Handlers for the search and detail commands
//!
//! Every reply goes back to the originating group with the sender
//! @-mentioned.

use std::fmt::Write;

use duanju_core::{LookupError, RequesterId, SearchResult};
use tracing::{debug, warn};

use crate::DuanjuPlugin;
use crate::command::CommandError;
use crate::message::{ChatSender, InboundMessage};

/// Run a search and cache the displayed entries for the requester
pub async fn search(plugin: &DuanjuPlugin, msg: &InboundMessage, sender: &dyn ChatSender, keyword: &str) {
    let endpoints = plugin.endpoints().await;

    let outcome = match plugin.scraper().search(keyword, &endpoints).await {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!(keyword, error = %e, "search rejected");
            reject(plugin, msg, sender, CommandError::EmptyKeyword).await;
            return;
        }
    };

    if outcome.is_empty() {
        reply(sender, msg, &format!("未找到《{}》相关资源", keyword)).await;
        return;
    }

    let mut results = outcome.results;
    results.truncate(plugin.config().max_results.max(1));
    let text = format_listing(keyword, &results, &plugin.config().command);

    plugin
        .cache()
        .lock()
        .await
        .put(requester(msg), keyword, results, outcome.endpoint);

    reply(sender, msg, &text).await;
}

/// Answer an index lookup from the requester's cached search
pub async fn detail(plugin: &DuanjuPlugin, msg: &InboundMessage, sender: &dyn ChatSender, index: usize) {
    let command = &plugin.config().command;
    let text = {
        let cache = plugin.cache().lock().await;
        match cache.resolve_index(&requester(msg), index) {
            Ok(result) => format_detail(result),
            Err(LookupError::NotFound) => format!(
                "没有找到搜索记录或记录已过期，请先发送「{} 剧名」进行搜索",
                command
            ),
            Err(LookupError::OutOfRange { len, .. }) => {
                format!("序号超出范围，请输入 1-{} 之间的序号", len)
            }
        }
    };

    reply(sender, msg, &text).await;
}

/// Answer a malformed command with a corrective instruction
pub async fn reject(plugin: &DuanjuPlugin, msg: &InboundMessage, sender: &dyn ChatSender, err: CommandError) {
    let command = &plugin.config().command;
    let text = match err {
        CommandError::EmptyKeyword => "请输入要搜索的剧名".to_string(),
        CommandError::InvalidIndex(_) => format!("请输入正确的序号，例如：{}# 1", command),
    };
    reply(sender, msg, &text).await;
}

pub fn format_listing(keyword: &str, results: &[SearchResult], command: &str) -> String {
    let mut text = format!("《{}》搜索结果：\n\n", keyword);
    for (i, result) in results.iter().enumerate() {
        let _ = writeln!(text, "{}. {}", i + 1, result.title);
    }
    let _ = write!(text, "\n发送「{}# 序号」获取网盘链接", command);
    text
}

pub fn format_detail(result: &SearchResult) -> String {
    format!("标题：{}\n网盘链接：{}", result.title, result.pan_link)
}

fn requester(msg: &InboundMessage) -> RequesterId {
    RequesterId::new(msg.group_id.as_str(), msg.sender_id.as_str())
}

async fn reply(sender: &dyn ChatSender, msg: &InboundMessage, text: &str) {
    if let Err(e) = sender
        .send_text(&msg.group_id, text, Some(&msg.sender_id))
        .await
    {
        warn!(chat = %msg.group_id, error = %e, "failed to send reply");
    }
}
