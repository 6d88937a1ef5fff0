// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot setup helpers: `logram get-chat-id` and `logram set-webhook`.

use logram_config::LogramConfig;
use logram_core::LogramError;
use logram_telegram::{TelegramClient, chats_from_updates};

use crate::output;

pub async fn run_get_chat_id(config: &LogramConfig, limit: u32, raw: bool) -> Result<(), LogramError> {
    let client = TelegramClient::from_config(&config.telegram)?;

    if raw {
        let body = client.get_updates_raw(limit).await?;
        let pretty = serde_json::to_string_pretty(&body)
            .map_err(|e| LogramError::Internal(format!("failed to render updates: {e}")))?;
        println!("{pretty}");
        return Ok(());
    }

    let updates = match client.get_updates(limit).await {
        Ok(updates) => updates,
        Err(e) => {
            eprintln!("If a webhook is set, Telegram does not return updates via getUpdates.");
            eprintln!("You can temporarily remove it with: logram set-webhook --delete");
            return Err(e);
        }
    };

    if updates.is_empty() {
        println!(
            "No updates found. Make sure you have sent a message to the bot (or in the group) recently."
        );
        return Ok(());
    }

    let chats = chats_from_updates(&updates);
    if chats.is_empty() {
        println!("No chat IDs found in the latest updates.");
        return Ok(());
    }

    println!("Recent chat IDs:");
    for chat in &chats {
        println!("{chat}");
    }
    println!();
    println!("Use one of these IDs as telegram.chat_id (or LOGRAM_TELEGRAM_CHAT_ID).");
    Ok(())
}

/// `public_url` joined with the callback path.
pub fn default_webhook_url(config: &LogramConfig) -> Option<String> {
    let base = config
        .server
        .public_url
        .as_deref()
        .filter(|u| !u.trim().is_empty())?;
    Some(format!(
        "{}{}",
        base.trim_end_matches('/'),
        config.callback.path
    ))
}

pub async fn run_set_webhook(
    config: &LogramConfig,
    url: Option<String>,
    delete: bool,
    drop_pending: bool,
) -> Result<(), LogramError> {
    let client = TelegramClient::from_config(&config.telegram)?;

    if delete {
        if !client.delete_webhook(drop_pending).await? {
            return Err(LogramError::delivery("deleteWebhook returned false"));
        }
        output::success("Telegram webhook deleted.");
        return Ok(());
    }

    let url = url.or_else(|| default_webhook_url(config)).ok_or_else(|| {
        LogramError::Config("server.public_url is not set and no --url option provided.".into())
    })?;

    println!("Setting webhook to: {url}");
    if !client
        .set_webhook(&url, config.callback.secret.as_deref())
        .await?
    {
        return Err(LogramError::delivery("setWebhook returned false"));
    }
    output::success("Telegram webhook set.");
    Ok(())
}
