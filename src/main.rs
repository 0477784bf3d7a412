//! logtree - live, collapsible tree view of an indentation-structured log file
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use logtree::PrintOptions;
use logtree_app::config::{init_config_dir, load_settings, CONFIG_FILENAME, LOGTREE_DIR};
use logtree_core::logging::LogOutput;
use logtree_core::prelude::*;

/// logtree - live, collapsible tree view of a log file
#[derive(Parser, Debug)]
#[command(name = "logtree")]
#[command(about = "Serve an indentation-structured log file as a live tree", long_about = None)]
struct Args {
    /// Log file to view
    #[arg(value_name = "PATH")]
    path: Option<PathBuf>,

    /// Port to listen on
    #[arg(long, short)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Only show records from the last MINUTES minutes
    #[arg(long, value_name = "MINUTES")]
    window: Option<u32>,

    /// Print the tree to stdout and exit instead of serving it
    #[arg(long, requires = "path")]
    print: bool,

    /// Only print entries matching TEXT (and their ancestors)
    #[arg(long, value_name = "TEXT", requires = "print")]
    filter: Option<String>,

    /// Print a flat list instead of an indented tree
    #[arg(long, requires = "print")]
    plain: bool,

    /// Write a default .logtree/config.toml and exit
    #[arg(long)]
    init_config: bool,

    /// Also write diagnostics to stderr (the log file is always written)
    #[arg(long)]
    log_stderr: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    if args.init_config {
        init_config_dir(&cwd)?;
        eprintln!(
            "Wrote {}",
            cwd.join(LOGTREE_DIR).join(CONFIG_FILENAME).display()
        );
        return Ok(());
    }

    let output = if args.log_stderr {
        LogOutput::FileAndStderr
    } else {
        LogOutput::File
    };
    logtree::init_runtime(output)?;

    let mut settings = load_settings(&cwd);
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(minutes) = args.window {
        settings.window.minutes = minutes;
    }

    match (args.print, args.path) {
        (true, Some(path)) => {
            let options = PrintOptions {
                filter: args.filter,
                plain: args.plain,
            };
            logtree::run_headless(&path, &settings, options).await
        }
        (_, path) => logtree::run_server(path, settings).await,
    }
}
