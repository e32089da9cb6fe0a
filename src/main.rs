//! mdsync - parse Markdown and keep a styled presentation tree in sync.
//!
//! # Usage
//!
//! ```bash
//! mdsync README.md            # print canonical Markdown
//! mdsync --tree README.md     # print the presentation tree
//! mdsync --watch README.md    # reparse and reconcile on every save
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use mdsync::config::{MarkdownConfig, global_config_path, resolve_config, save_config};
use mdsync::document::{MarkdownDocument, ToMarkdown};
use mdsync::perf;
use mdsync::presentation::{PresentationDocument, reconcile};
use mdsync::watcher::{DocumentWatcher, load_document};

/// Delay after the last file event before reparsing.
const WATCH_DEBOUNCE: Duration = Duration::from_millis(200);
const WATCH_POLL: Duration = Duration::from_millis(100);

/// Parse Markdown and keep a styled presentation tree in sync with it
#[derive(Parser, Debug)]
#[command(name = "mdsync", version, about, long_about = None)]
struct Cli {
    /// Markdown file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the presentation tree instead of canonical Markdown
    #[arg(long)]
    tree: bool,

    /// Watch the file and reconcile on every change
    #[arg(short, long)]
    watch: bool,

    /// Typography config file (JSON)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write the effective config to the global config file
    #[arg(long)]
    save_config: bool,

    /// Print timings for parse and reconcile
    #[arg(long)]
    perf: bool,

    /// Append timing and watcher events to a file
    #[arg(long, value_name = "PATH")]
    debug_log: Option<PathBuf>,
}

fn render(tree: &PresentationDocument, document: &MarkdownDocument, show_tree: bool) {
    if show_tree {
        print!("{tree}");
    } else {
        println!("{}", document.markdown());
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    perf::set_enabled(cli.perf);
    let debug_log = cli
        .debug_log
        .clone()
        .or_else(|| std::env::var_os("MDSYNC_DEBUG_LOG").map(PathBuf::from));
    if let Err(err) = perf::set_event_log_path(debug_log.as_deref()) {
        tracing::warn!(%err, "failed to open debug log");
    }

    let config: MarkdownConfig = resolve_config(cli.config.as_deref())?;
    if cli.save_config {
        let path = global_config_path();
        save_config(&path, &config)?;
        eprintln!("Saved config to {}", path.display());
    }

    if !cli.file.exists() {
        anyhow::bail!("File not found: {}", cli.file.display());
    }

    let mut tree = PresentationDocument::new();
    let document = load_document(&cli.file)?;
    reconcile(&mut tree, &document, &config);
    render(&tree, &document, cli.tree);

    if !cli.watch {
        return Ok(());
    }

    let mut watcher = DocumentWatcher::new(&cli.file, WATCH_DEBOUNCE)
        .with_context(|| format!("Failed to watch {}", cli.file.display()))?;
    loop {
        if !watcher.wait_for_change(WATCH_POLL, None) {
            continue;
        }
        let document = match watcher.reload() {
            Ok(document) => document,
            Err(err) => {
                tracing::warn!("{err:#}");
                continue;
            }
        };
        let stats = reconcile(&mut tree, &document, &config);
        eprintln!("[reload] {stats}");
        render(&tree, &document, cli.tree);
    }
}
