// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Operator-facing console lines, colored when stderr is a terminal.

use std::io::IsTerminal;

use colored::Colorize;

fn use_color() -> bool {
    std::io::stderr().is_terminal()
}

pub fn error(message: &str) {
    if use_color() {
        eprintln!("{} {message}", "error:".red().bold());
    } else {
        eprintln!("error: {message}");
    }
}

pub fn warn(message: &str) {
    if use_color() {
        eprintln!("{} {message}", "warning:".yellow().bold());
    } else {
        eprintln!("warning: {message}");
    }
}

pub fn success(message: &str) {
    if use_color() {
        println!("{} {message}", "✓".green());
    } else {
        println!("[OK] {message}");
    }
}
