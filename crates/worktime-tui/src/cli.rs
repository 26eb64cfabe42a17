//! Command-line parsing and the maintenance commands for the offline shell.
//!
//! The commands run without the terminal UI and print to stdout/stderr.

use anyhow::{Context, Result};
use clap::Parser;

use worktime_core::offline::{
    cache_key, DiskCacheStorage, HttpFetcher, OfflineWorker, Request, ResponseSource,
    ShellManifest, Startup,
};
use worktime_core::Config;

use crate::app::open_worker;

/// Number of body characters shown by `--fetch`
const BODY_PREVIEW_CHARS: usize = 300;

/// Convert prices into hours of work.
///
/// Without options, starts the terminal converter. Set WORKTIME_ORIGIN (or
/// shell_origin in config.json) to the offline shell's URL.
#[derive(Parser, Debug)]
#[command(name = "worktime", version, long_about = None)]
pub struct Args {
    /// Install or restore the offline shell, then exit
    #[arg(long, conflicts_with_all = ["fetch", "navigate"])]
    pub sync_shell: bool,

    /// Serve one asset request through the offline shell
    #[arg(long, value_name = "PATH", conflicts_with = "navigate")]
    pub fetch: Option<String>,

    /// Serve one navigation through the offline shell
    #[arg(long, value_name = "PATH")]
    pub navigate: Option<String>,
}

/// What to run instead of the terminal UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SyncShell,
    Fetch { path: String, navigate: bool },
}

impl Args {
    pub fn action(&self) -> Option<Action> {
        if self.sync_shell {
            return Some(Action::SyncShell);
        }
        match (&self.fetch, &self.navigate) {
            (Some(path), _) => Some(Action::Fetch {
                path: path.clone(),
                navigate: false,
            }),
            (None, Some(path)) => Some(Action::Fetch {
                path: path.clone(),
                navigate: true,
            }),
            (None, None) => None,
        }
    }
}

/// Run a maintenance action
pub async fn run(action: Action, config: &Config) -> Result<()> {
    match action {
        Action::SyncShell => sync_shell(config).await,
        Action::Fetch { path, navigate } => fetch(config, &path, navigate).await,
    }
}

fn manifest(config: &Config) -> Result<ShellManifest> {
    config.shell_manifest()?.ok_or_else(|| {
        anyhow::anyhow!(
            "No shell origin configured. Set WORKTIME_ORIGIN or shell_origin in config.json"
        )
    })
}

fn worker(config: &Config) -> Result<OfflineWorker<HttpFetcher, DiskCacheStorage>> {
    open_worker(manifest(config)?, config.cache_dir()?)
}

/// Install (or restore) and activate the shell against the configured origin
async fn sync_shell(config: &Config) -> Result<()> {
    let worker = worker(config)?;
    let manifest = worker.manifest();
    eprintln!("Syncing {} into {}...", manifest.scope(), manifest.cache_name());

    let startup = worker
        .start()
        .await
        .context("Failed to install the offline shell")?;
    match startup {
        Startup::Restored => eprintln!("✓ Restored from cache ({} assets)", manifest.assets().len()),
        Startup::Installed => eprintln!("✓ Installed {} assets", manifest.assets().len()),
    }
    Ok(())
}

/// Serve one request for `path` through the offline worker and report where
/// the answer came from.
async fn fetch(config: &Config, path: &str, navigate: bool) -> Result<()> {
    let worker = worker(config)?;
    if let Err(e) = worker.start().await {
        eprintln!("Warning: offline shell unavailable: {:#}", e);
    }

    let url = worker
        .manifest()
        .url_for(path)
        .with_context(|| format!("Invalid path {}", path))?;
    let request = if navigate {
        Request::navigate(url.clone())
    } else {
        Request::get(url.clone())
    };

    let (response, source) = worker.fetch_through(&request).await?;
    let source = match source {
        Some(ResponseSource::Network) => "network",
        Some(ResponseSource::Cache) => "cache",
        Some(ResponseSource::Offline) => "offline fallback",
        None => "passthrough",
    };

    eprintln!("{} {} ({})", response.status, url, source);
    if let Ok(Some(entry)) = worker
        .caches()
        .get_entry(worker.manifest().cache_name(), &cache_key(&url))
        .await
    {
        eprintln!("Cached {}", entry.age_display());
    }
    if let Some(content_type) = response.header("content-type") {
        eprintln!("Content-Type: {}", content_type);
    }

    let body = response.text();
    let preview: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
    println!("{}", preview);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("worktime").chain(args.iter().copied()))
    }

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_no_args_starts_ui() {
        assert_eq!(parse(&[]).unwrap().action(), None);
    }

    #[test]
    fn test_commands() {
        assert_eq!(
            parse(&["--sync-shell"]).unwrap().action(),
            Some(Action::SyncShell)
        );
        assert_eq!(
            parse(&["--fetch", "./styles.css"]).unwrap().action(),
            Some(Action::Fetch {
                path: "./styles.css".to_string(),
                navigate: false
            })
        );
        assert_eq!(
            parse(&["--navigate", "./"]).unwrap().action(),
            Some(Action::Fetch {
                path: "./".to_string(),
                navigate: true
            })
        );
    }

    #[test]
    fn test_bad_args_rejected() {
        assert!(parse(&["--fetch"]).is_err());
        assert!(parse(&["--sync-shell", "--fetch", "./"]).is_err());
        assert!(parse(&["--fetch", "./", "--navigate", "./"]).is_err());
        assert!(parse(&["--bogus"]).is_err());
    }
}
