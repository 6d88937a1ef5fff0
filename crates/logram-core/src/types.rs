// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the producer side, the flush pipeline, and the
//! delivery client.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumString};

/// Severity of a log event.
///
/// Variants are ordered from least to most severe, so `a >= b` reads as
/// "a is at least as severe as b".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, Serialize,
    Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[strum(to_string = "TRACE")]
    Trace,
    #[strum(to_string = "DEBUG")]
    Debug,
    #[strum(to_string = "INFO")]
    Info,
    #[strum(to_string = "NOTICE")]
    Notice,
    #[strum(to_string = "WARNING", serialize = "WARN")]
    Warning,
    #[strum(to_string = "ERROR")]
    Error,
    #[strum(to_string = "CRITICAL")]
    Critical,
    #[strum(to_string = "ALERT")]
    Alert,
    #[strum(to_string = "EMERGENCY")]
    Emergency,
}

impl From<&tracing::Level> for Severity {
    fn from(level: &tracing::Level) -> Self {
        match *level {
            tracing::Level::TRACE => Severity::Trace,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::ERROR => Severity::Error,
        }
    }
}

/// One inline keyboard button. Exactly one target: a URL or callback data.
///
/// A button naming both targets, or any other key, fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum Button {
    /// Opens a URL when pressed.
    Url { text: String, url: String },
    /// Sends `callback_data` back to the bot's webhook when pressed.
    Callback { text: String, callback_data: String },
}

impl Button {
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Button::Url {
            text: text.into(),
            url: url.into(),
        }
    }

    pub fn callback(text: impl Into<String>, callback_data: impl Into<String>) -> Self {
        Button::Callback {
            text: text.into(),
            callback_data: callback_data.into(),
        }
    }

    /// The visible label.
    pub fn text(&self) -> &str {
        match self {
            Button::Url { text, .. } | Button::Callback { text, .. } => text,
        }
    }
}

/// Rows of inline buttons.
///
/// A layout always holds at least one row and every row holds at least one
/// button; [`ButtonLayout::new`] drops empty rows and refuses an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ButtonLayout {
    rows: Vec<Vec<Button>>,
}

impl ButtonLayout {
    /// Builds a layout from raw rows. Returns `None` when no button remains.
    pub fn new(rows: Vec<Vec<Button>>) -> Option<Self> {
        let rows: Vec<Vec<Button>> = rows.into_iter().filter(|row| !row.is_empty()).collect();
        if rows.is_empty() {
            None
        } else {
            Some(Self { rows })
        }
    }

    /// A layout with one row holding one button.
    pub fn single(button: Button) -> Self {
        Self {
            rows: vec![vec![button]],
        }
    }

    pub fn rows(&self) -> &[Vec<Button>] {
        &self.rows
    }

    pub fn button_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// Serializes to the Bot API `reply_markup` object.
    pub fn to_reply_markup(&self) -> serde_json::Value {
        serde_json::json!({ "inline_keyboard": self.rows })
    }
}

impl<'de> Deserialize<'de> for ButtonLayout {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<Button>>::deserialize(deserializer)?;
        ButtonLayout::new(rows)
            .ok_or_else(|| serde::de::Error::custom("button layout contains no buttons"))
    }
}

/// Lenient decoding for the optional `buttons` field: `null`, `[]`, or rows
/// that are all empty decode as "no buttons".
fn deserialize_optional_layout<'de, D>(deserializer: D) -> Result<Option<ButtonLayout>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Vec<Button>>>::deserialize(deserializer)?;
    Ok(rows.and_then(ButtonLayout::new))
}

/// One buffered log event as stored in the pending queue.
///
/// Producers may attach extra keys (older writers add `chat_id` and
/// `parseMode`); they are ignored on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,

    #[serde(default)]
    pub text: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_layout"
    )]
    pub buttons: Option<ButtonLayout>,
}

impl QueueEntry {
    /// An entry carrying only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            level: None,
            time: None,
            text: text.into(),
            buttons: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = Some(level.into());
        self
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_buttons(mut self, buttons: ButtonLayout) -> Self {
        self.buttons = Some(buttons);
        self
    }
}

/// A log event as handed over by the host logging layer, before encoding.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub level: Option<Severity>,
    pub time: Option<DateTime<Utc>>,
    pub text: String,
    pub buttons: Option<ButtonLayout>,
}

impl LogRecord {
    /// A record stamped with the current time.
    pub fn now(level: Severity, text: impl Into<String>) -> Self {
        Self {
            level: Some(level),
            time: Some(Utc::now()),
            text: text.into(),
            buttons: None,
        }
    }
}

impl From<LogRecord> for QueueEntry {
    fn from(record: LogRecord) -> Self {
        QueueEntry {
            level: record.level.map(|l| l.to_string()),
            time: record
                .time
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, false)),
            text: record.text,
            buttons: record.buttons,
        }
    }
}

/// Entries drained in one flush cycle, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Successfully decoded entries.
    pub entries: Vec<QueueEntry>,
    /// Number of queue slots popped, including dropped ones.
    pub consumed: usize,
    /// Number of popped slots that failed to decode.
    pub dropped: usize,
}

impl Batch {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A single outbound chat message built from a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedMessage {
    pub body: String,
    pub buttons: Option<ButtonLayout>,
}

impl ComposedMessage {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            buttons: None,
        }
    }
}
