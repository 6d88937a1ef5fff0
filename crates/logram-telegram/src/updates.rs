// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extracting chat identities from `getUpdates` results.

use std::collections::HashSet;

use serde_json::Value;

/// One chat seen in recent updates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSummary {
    pub id: String,
    pub kind: String,
    pub title: String,
}

impl std::fmt::Display for ChatSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "- id: {} | type: {} | title: {}",
            self.id, self.kind, self.title
        )
    }
}

/// Unique chats from `message` or `channel_post` updates, in first-seen order.
///
/// Updates of any other kind, or without a chat id, are skipped.
pub fn chats_from_updates(updates: &[Value]) -> Vec<ChatSummary> {
    let mut seen = HashSet::new();
    let mut chats = Vec::new();

    for update in updates {
        let Some(chat) = update
            .get("message")
            .or_else(|| update.get("channel_post"))
            .and_then(|m| m.get("chat"))
        else {
            continue;
        };

        let id = match chat.get("id") {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.clone(),
            _ => continue,
        };
        if !seen.insert(id.clone()) {
            continue;
        }

        let kind = chat
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or("unknown")
            .to_string();
        let title = chat
            .get("title")
            .or_else(|| chat.get("username"))
            .and_then(Value::as_str)
            .unwrap_or("(no title)")
            .to_string();

        chats.push(ChatSummary { id, kind, title });
    }

    chats
}
