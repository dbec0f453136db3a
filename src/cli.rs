use crate::app::{drive, Action, AppState, Content, Controller, View};
use crate::backend::{BlogClient, PostRepository};
use crate::model::ClientConfig;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Parser, Clone)]
#[command(
    name = "blog-cli",
    version,
    about = "Terminal client for a REST-backed blog"
)]
pub struct Cli {
    /// Base URL of the blog backend (serves /posts and /pages)
    #[arg(long, default_value = "http://localhost:3000")]
    pub base_url: String,

    /// Per-request timeout
    #[arg(long, default_value = "10s")]
    pub timeout: humantime::Duration,

    /// Static page slug to offer in the navigation bar (repeatable)
    #[arg(long = "page", value_name = "SLUG", default_value = "about")]
    pub pages: Vec<String>,

    /// Admin username accepted by the login form
    #[arg(long, default_value = "admin")]
    pub admin_username: String,

    /// Admin password accepted by the login form
    #[arg(long, default_value = "admin")]
    pub admin_password: String,

    /// Print the post list (or --show-page) as JSON and exit (no TUI)
    #[arg(long)]
    pub json: bool,

    /// Print the home view (or --show-page) as text and exit (no TUI)
    #[arg(long)]
    pub text: bool,

    /// With --text/--json, show this static page instead of the post list
    #[arg(long, value_name = "SLUG")]
    pub show_page: Option<String>,

    /// With --text/--json, also write the fetched data to this JSON file
    #[arg(long)]
    pub export_json: Option<PathBuf>,

    /// Log file for the interactive UI
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    fn is_non_tui(&self) -> bool {
        self.json || self.text
    }
}

pub async fn run(args: Cli) -> Result<()> {
    if !args.is_non_tui() && (args.show_page.is_some() || args.export_json.is_some()) {
        return Err(anyhow::anyhow!(
            "--show-page and --export-json require --text or --json"
        ));
    }

    if args.is_non_tui() {
        crate::logging::init_stderr();
    } else {
        let path = args
            .log_file
            .clone()
            .unwrap_or_else(crate::logging::default_log_path);
        crate::logging::init_file(&path)?;
    }
    tracing::info!(base_url = %args.base_url, "starting");

    if !args.is_non_tui() {
        #[cfg(feature = "tui")]
        {
            return crate::tui::run(args).await;
        }
        #[cfg(not(feature = "tui"))]
        {
            // Fallback when built without TUI support.
            return run_text(args).await;
        }
    }

    if args.json {
        return run_json(args).await;
    }

    run_text(args).await
}

/// Build a `ClientConfig` from CLI arguments.
pub fn build_config(args: &Cli) -> ClientConfig {
    ClientConfig {
        base_url: args.base_url.clone(),
        timeout: Duration::from(args.timeout),
        user_agent: format!("blog-cli/{}", env!("CARGO_PKG_VERSION")),
        nav_pages: args.pages.clone(),
        admin_username: args.admin_username.clone(),
        admin_password: args.admin_password.clone(),
    }
}

async fn run_json(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = BlogClient::new(&cfg)?;

    let out = match args.show_page.as_deref() {
        Some(slug) => {
            let page = client
                .fetch_page(slug)
                .await
                .context("Error loading page.")?
                .with_context(|| format!("Page not found: {slug}"))?;
            handle_export(&args, &page)?;
            serde_json::to_string_pretty(&page)?
        }
        None => {
            let posts = client
                .list_posts()
                .await
                .context("Error loading posts. Is the server running?")?;
            handle_export(&args, &posts)?;
            serde_json::to_string_pretty(&posts)?
        }
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{out}")?;
    Ok(())
}

async fn run_text(args: Cli) -> Result<()> {
    let cfg = build_config(&args);
    let client = BlogClient::new(&cfg)?;
    let ctrl = Controller::new(&cfg);
    let mut state = AppState::default();

    let action = match args.show_page.clone() {
        Some(slug) => Action::OpenPage(slug),
        None => Action::ShowHome,
    };
    drive(&ctrl, &mut state, &client, action).await;

    let view = crate::text_render::render_lines(&state);
    let mut stdout = std::io::stdout().lock();
    for line in &view.lines {
        writeln!(stdout, "{line}")?;
    }

    match state.content {
        Content::Failed(msg) => Err(anyhow::anyhow!("{msg} ({})", state.info)),
        Content::NotFound(msg) => Err(anyhow::anyhow!(msg)),
        Content::Ready => {
            match &state.view {
                View::StaticPage(_) => {
                    if let Some(page) = state.page.as_ref() {
                        handle_export(&args, page)?;
                    }
                }
                _ => handle_export(&args, &state.posts)?,
            }
            Ok(())
        }
    }
}

fn handle_export<T: serde::Serialize + ?Sized>(args: &Cli, value: &T) -> Result<()> {
    if let Some(p) = args.export_json.as_deref() {
        crate::export::export_json(p, value)?;
        eprintln!("Exported JSON: {}", p.display());
    }
    Ok(())
}
