// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `logram list-callbacks`.

use std::collections::BTreeMap;

use logram_callback::HandlerCatalog;

/// Renders the `[callbacks.map]` table, or `None` when it is empty.
pub fn render_callback_table(
    map: &BTreeMap<String, String>,
    catalog: &HandlerCatalog,
) -> Option<String> {
    if map.is_empty() {
        return None;
    }

    let rows: Vec<[&str; 3]> = map
        .iter()
        .map(|(action, handler)| {
            let exists = if catalog.contains(handler) { "yes" } else { "no" };
            [action.as_str(), handler.as_str(), exists]
        })
        .collect();

    let headers = ["Action", "Handler", "Exists"];
    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 3]| {
        format!(
            "{:<w0$}  {:<w1$}  {}",
            cells[0],
            cells[1],
            cells[2],
            w0 = widths[0],
            w1 = widths[1]
        )
    };

    let mut out = String::new();
    out.push_str(&line(headers));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 4));
    out.push('\n');
    for row in rows {
        out.push_str(&line(row));
        out.push('\n');
    }
    Some(out)
}

pub fn run_list_callbacks(map: &BTreeMap<String, String>) {
    let catalog = HandlerCatalog::with_builtins();
    match render_callback_table(map, &catalog) {
        Some(table) => {
            print!("{table}");
            println!();
            println!("Available handler ids: {}", catalog.ids().join(", "));
        }
        None => println!("No callbacks configured in [callbacks.map]."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_map_renders_nothing() {
        assert!(render_callback_table(&BTreeMap::new(), &HandlerCatalog::with_builtins()).is_none());
    }

    #[test]
    fn table_marks_unknown_handlers() {
        let mut map = BTreeMap::new();
        map.insert("audit".to_string(), "log".to_string());
        map.insert("ban_user".to_string(), "BanUser".to_string());

        let table = render_callback_table(&map, &HandlerCatalog::with_builtins()).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines[0], "Action    Handler  Exists");
        assert_eq!(lines[2], "audit     log      yes");
        assert_eq!(lines[3], "ban_user  BanUser  no");
    }
}
