// SPDX-FileCopyrightText: 2026 Logram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Logram - ship application logs to a Telegram chat.
//!
//! This is the binary entry point: queue flushing, the callback webhook
//! server, and bot setup helpers.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod callbacks;
mod emit;
mod flush;
mod output;
mod serve;
mod shutdown;
mod telegram;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use logram_config::LogramConfig;
use logram_core::{LogramError, Severity};
use logram_log::TelegramLogLayer;

use crate::emit::{ButtonArgs, SinkHandle, parse_pair};

/// Logram - ship application logs to a Telegram chat.
#[derive(Parser, Debug)]
#[command(name = "logram", version, about, long_about = None)]
struct Cli {
    /// Load this TOML file (plus LOGRAM_* overrides) instead of the standard locations.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Send buffered log entries to the chat.
    Flush {
        /// Keep running, flushing and sleeping between batches.
        #[arg(long = "loop")]
        looping: bool,
    },
    /// Run the callback webhook and diagnostics server.
    Serve,
    /// List chat ids from the bot's recent updates.
    GetChatId {
        /// Number of updates to fetch.
        #[arg(long, default_value_t = 100)]
        limit: u32,
        /// Print the raw getUpdates response.
        #[arg(long)]
        raw: bool,
    },
    /// Register (or remove) the Telegram webhook.
    SetWebhook {
        /// Webhook URL. Defaults to server.public_url + callback.path.
        #[arg(long)]
        url: Option<String>,
        /// Delete the webhook instead of setting it.
        #[arg(long)]
        delete: bool,
        /// With --delete, also discard pending updates.
        #[arg(long, requires = "delete")]
        drop_pending: bool,
    },
    /// Show configured callback actions and whether their handlers exist.
    ListCallbacks,
    /// Emit one log entry in the configured delivery mode.
    Log {
        message: String,
        /// Severity, e.g. info, warning, error, critical.
        #[arg(long, default_value = "info")]
        level: Severity,
        /// URL button, repeatable.
        #[arg(long = "url", value_name = "TEXT=URL", value_parser = parse_pair)]
        urls: Vec<(String, String)>,
        /// Callback button, repeatable.
        #[arg(long = "callback", value_name = "TEXT=DATA", value_parser = parse_pair)]
        callbacks: Vec<(String, String)>,
        /// Put every button on its own row.
        #[arg(long)]
        row: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => logram_config::load_and_validate_from_path(path),
        None => logram_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            logram_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let forward = match cli.command {
        Commands::Serve => process_log_layer(&config).await,
        _ => None,
    };
    init_tracing(&config.logging.log_level, forward);

    if let Err(e) = run(cli.command, config).await {
        output::error(&e.to_string());
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: LogramConfig) -> Result<(), LogramError> {
    match command {
        Commands::Flush { looping } => flush::run_flush(&config, looping).await,
        Commands::Serve => serve::run_serve(config).await,
        Commands::GetChatId { limit, raw } => telegram::run_get_chat_id(&config, limit, raw).await,
        Commands::SetWebhook {
            url,
            delete,
            drop_pending,
        } => telegram::run_set_webhook(&config, url, delete, drop_pending).await,
        Commands::ListCallbacks => {
            callbacks::run_list_callbacks(&config.callbacks.map);
            Ok(())
        }
        Commands::Log {
            message,
            level,
            urls,
            callbacks,
            row,
        } => {
            let buttons = ButtonArgs {
                urls,
                callbacks,
                row_per_button: row,
            };
            emit::run_log(&config, level, message, buttons).await
        }
    }
}

/// Forwards the server's own warnings to the chat when a sink can be built.
async fn process_log_layer(config: &LogramConfig) -> Option<TelegramLogLayer> {
    match SinkHandle::open(config).await {
        Ok(handle) => Some(TelegramLogLayer::new(
            handle.sink,
            config.logging.min_severity(),
        )),
        Err(e) => {
            eprintln!("logram: process logs stay local ({e})");
            None
        }
    }
}

fn init_tracing(log_level: &str, telegram: Option<TelegramLogLayer>) {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("logram={log_level},warn")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .with(telegram)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn log_command_parses_buttons() {
        let cli = Cli::try_parse_from([
            "logram",
            "log",
            "payment failed",
            "--level",
            "error",
            "--url",
            "Order=https://shop/o/1?x=y",
            "--callback",
            "Refund=refund:1",
            "--row",
        ])
        .unwrap();

        match cli.command {
            Commands::Log {
                message,
                level,
                urls,
                callbacks,
                row,
            } => {
                assert_eq!(message, "payment failed");
                assert_eq!(level, Severity::Error);
                assert_eq!(urls, vec![("Order".into(), "https://shop/o/1?x=y".into())]);
                assert_eq!(callbacks, vec![("Refund".into(), "refund:1".into())]);
                assert!(row);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_follows_subcommand() {
        let cli = Cli::try_parse_from(["logram", "flush", "--loop", "--config", "/tmp/x.toml"])
            .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
        assert!(matches!(cli.command, Commands::Flush { looping: true }));
    }

    #[test]
    fn bad_level_is_rejected() {
        assert!(Cli::try_parse_from(["logram", "log", "x", "--level", "loud"]).is_err());
    }

    #[test]
    fn drop_pending_requires_delete() {
        assert!(Cli::try_parse_from(["logram", "set-webhook", "--drop-pending"]).is_err());
        assert!(Cli::try_parse_from(["logram", "set-webhook", "--delete", "--drop-pending"]).is_ok());
    }
}
