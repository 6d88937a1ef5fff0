// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Grouping a batch into one message.
//!
//! Each entry becomes one line, `[time] [level] text`, and lines are joined
//! by a blank line. The body is capped by character count, never splitting a
//! multibyte character, and marked when cut. Of all entries carrying buttons
//! the last one wins; layouts are not merged.

use logram_core::{ButtonLayout, ComposedMessage, QueueEntry};

/// Appended to a body that was cut.
pub const TRUNCATION_MARKER: &str = "\n\n...[truncated]";

const LINE_SEPARATOR: &str = "\n\n";

/// Renders one entry. Empty `time` or `level` count as absent.
pub fn format_line(entry: &QueueEntry) -> String {
    let time = entry.time.as_deref().filter(|t| !t.is_empty());
    let level = entry.level.as_deref().filter(|l| !l.is_empty());

    let prefix = match (time, level) {
        (Some(t), Some(l)) => format!("[{t}] [{l}]"),
        (Some(t), None) => format!("[{t}]"),
        (None, Some(l)) => format!("[{l}]"),
        (None, None) => String::new(),
    };

    format!("{prefix} {}", entry.text).trim().to_string()
}

/// Keeps the first `max_chars` characters and appends the marker, or returns
/// `text` unchanged when it already fits.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &text[..cut]),
        None => text.to_string(),
    }
}

/// Builds the outbound message for `entries`, or `None` when there are none.
pub fn compose(entries: &[QueueEntry], max_message_len: usize) -> Option<ComposedMessage> {
    if entries.is_empty() {
        return None;
    }

    let body = entries
        .iter()
        .map(format_line)
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR);

    let buttons: Option<ButtonLayout> = entries.iter().rev().find_map(|e| e.buttons.clone());

    Some(ComposedMessage {
        body: truncate_chars(&body, max_message_len),
        buttons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use logram_core::Button;
    use proptest::prelude::*;

    fn entry(level: Option<&str>, text: &str) -> QueueEntry {
        QueueEntry {
            level: level.map(str::to_string),
            time: None,
            text: text.to_string(),
            buttons: None,
        }
    }

    #[test]
    fn line_prefix_variants() {
        let full = QueueEntry::text("boom")
            .with_time("2026-01-01T00:00:00+00:00")
            .with_level("ERROR");
        assert_eq!(format_line(&full), "[2026-01-01T00:00:00+00:00] [ERROR] boom");

        let time_only = QueueEntry::text("boom").with_time("t");
        assert_eq!(format_line(&time_only), "[t] boom");

        assert_eq!(format_line(&entry(Some("INFO"), "up")), "[INFO] up");
        assert_eq!(format_line(&entry(None, "bare")), "bare");
    }

    #[test]
    fn empty_fields_are_treated_as_absent() {
        let e = QueueEntry::text("x").with_time("").with_level("");
        assert_eq!(format_line(&e), "x");
    }

    #[test]
    fn empty_text_leaves_prefix_only() {
        assert_eq!(format_line(&entry(Some("WARNING"), "")), "[WARNING]");
        assert_eq!(format_line(&entry(None, "   ")), "");
    }

    #[test]
    fn lines_are_joined_with_blank_line() {
        let entries = [
            entry(None, "a"),
            entry(Some("warning"), "b"),
            entry(Some("error"), "c"),
        ];
        let message = compose(&entries, 3500).unwrap();
        assert_eq!(message.body, "a\n\n[warning] b\n\n[error] c");
        assert!(message.buttons.is_none());
    }

    #[test]
    fn empty_batch_composes_nothing() {
        assert!(compose(&[], 100).is_none());
    }

    #[test]
    fn last_layout_wins() {
        let first = ButtonLayout::single(Button::url("one", "https://one"));
        let third = ButtonLayout::single(Button::callback("three", "three:3"));
        let entries = [
            entry(None, "1").with_buttons(first),
            entry(None, "2"),
            entry(None, "3").with_buttons(third.clone()),
        ];
        assert_eq!(compose(&entries, 100).unwrap().buttons, Some(third));
    }

    #[test]
    fn earlier_layout_kept_when_later_entries_have_none() {
        let first = ButtonLayout::single(Button::url("one", "https://one"));
        let entries = [entry(None, "1").with_buttons(first.clone()), entry(None, "2")];
        assert_eq!(compose(&entries, 100).unwrap().buttons, Some(first));
    }

    #[test]
    fn truncates_to_limit_plus_marker() {
        let body = "abcdefghijklmnopqrstuvwxy";
        let cut = truncate_chars(body, 10);
        assert_eq!(cut.chars().count(), 10 + TRUNCATION_MARKER.chars().count());
        assert!(cut.starts_with("abcdefghij"));
        assert!(cut.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn body_at_limit_is_untouched() {
        assert_eq!(truncate_chars("exactly10!", 10), "exactly10!");
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundary() {
        let body = "ошибка базы данных 🔥🔥🔥";
        let cut = truncate_chars(body, 7);
        assert_eq!(cut, format!("ошибка {TRUNCATION_MARKER}"));
    }

    proptest! {
        #[test]
        fn body_length_is_bounded(texts in prop::collection::vec(".{0,80}", 1..8), max in 1usize..200) {
            let entries: Vec<_> = texts.iter().map(|t| QueueEntry::text(t.as_str())).collect();
            let message = compose(&entries, max).unwrap();
            let marker = TRUNCATION_MARKER.chars().count();
            prop_assert!(message.body.chars().count() <= max + marker);
        }

        #[test]
        fn truncation_keeps_a_prefix(text in ".{0,300}", max in 1usize..120) {
            let cut = truncate_chars(&text, max);
            if text.chars().count() > max {
                let kept = cut.strip_suffix(TRUNCATION_MARKER).unwrap();
                prop_assert!(text.starts_with(kept));
                prop_assert_eq!(kept.chars().count(), max);
            } else {
                prop_assert_eq!(cut, text);
            }
        }
    }
}
