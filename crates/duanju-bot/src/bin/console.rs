//! Terminal stand-in for a chat transport
//!
//! Every stdin line is delivered to the plugin as a group message from a
//! fixed group and sender; replies are printed to stdout.

use std::path::PathBuf;

use async_trait::async_trait;
use clap::Parser;
use duanju_bot::{ChatSender, Dispatch, DuanjuPlugin, InboundMessage, PluginConfig, init_logging};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "duanju-console", version, about = "Drive the short-drama plugin from the terminal")]
struct Args {
    /// Plugin config file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Directory holding search_urls.json
    #[arg(short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Group id the messages appear to come from
    #[arg(long, default_value = "console@chatroom")]
    group: String,

    /// Sender id the messages appear to come from
    #[arg(long, default_value = "console-user")]
    sender: String,
}

struct ConsoleSender;

#[async_trait]
impl ChatSender for ConsoleSender {
    async fn send_text(&self, chat_id: &str, text: &str, mention: Option<&str>) -> Result<(), String> {
        match mention {
            Some(who) => println!("[{}] @{}\n{}\n", chat_id, who, text),
            None => println!("[{}]\n{}\n", chat_id, text),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_logging();
    let args = Args::parse();

    let config = PluginConfig::load(&args.config);
    if !config.enable {
        warn!(config = %args.config.display(), "plugin is disabled, every message will be ignored");
    } else if !config.is_whitelisted(&args.group) {
        warn!(group = %args.group, "group is not whitelisted, every message will be ignored");
    }

    let plugin = DuanjuPlugin::new(config, &args.data_dir)?;
    plugin.init().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.map_err(|e| e.to_string())? {
        let msg = InboundMessage {
            text: line,
            is_group_chat: true,
            group_id: args.group.clone(),
            sender_id: args.sender.clone(),
        };
        if plugin.handle_message(&msg, &ConsoleSender).await == Dispatch::Pass {
            eprintln!("(ignored)");
        }
    }

    Ok(())
}
